/// Configuration for the card content backend.
/// Reads backend.json from ~/.config/card-content/backend.json (or platform equivalent).
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BackendConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    /// JSON file holding the card document. Defaults to ~/.config/card-content/cardContent.json.
    #[serde(default)]
    pub data_file: Option<String>,
}

fn default_port() -> u16 {
    8080
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            bind_address: default_bind_address(),
            data_file: None,
        }
    }
}

impl BackendConfig {
    pub fn data_path(&self) -> PathBuf {
        self.data_file
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(default_data_path)
    }
}

fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("card-content")
}

/// Default config path: ~/.config/card-content/backend.json
pub fn default_config_path() -> PathBuf {
    config_dir().join("backend.json")
}

/// Default document path: ~/.config/card-content/cardContent.json
pub fn default_data_path() -> PathBuf {
    config_dir().join("cardContent.json")
}

/// Load config from path. Returns default if the file doesn't exist or is malformed.
pub fn load_config(path: &Path) -> BackendConfig {
    match fs::read_to_string(path) {
        Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
            log::warn!("Failed to parse config {}: {}", path.display(), e);
            BackendConfig::default()
        }),
        Err(_) => {
            log::info!("No config at {}, using defaults", path.display());
            BackendConfig::default()
        }
    }
}
