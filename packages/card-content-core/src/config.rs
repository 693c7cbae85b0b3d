/// Editor configuration.
/// Reads editor.json from ~/.config/card-content/editor.json (or platform equivalent).
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::feed::FEED_PROFILE_TYPE;
use crate::types::{DEFAULT_DIVISIONS, DEFAULT_ROLE, DEFAULT_STYLE};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorConfig {
    #[serde(default = "default_server_url")]
    pub server_url: String,
    #[serde(default = "default_divisions")]
    pub divisions: Vec<String>,
    #[serde(default = "default_role")]
    pub default_role: String,
    #[serde(default = "default_style")]
    pub default_style: String,
    #[serde(default = "default_feed_profile_type")]
    pub feed_profile_type: String,
}

fn default_server_url() -> String {
    "http://127.0.0.1:8080".to_string()
}

fn default_divisions() -> Vec<String> {
    DEFAULT_DIVISIONS.iter().map(|d| d.to_string()).collect()
}

fn default_role() -> String {
    DEFAULT_ROLE.to_string()
}

fn default_style() -> String {
    DEFAULT_STYLE.to_string()
}

fn default_feed_profile_type() -> String {
    FEED_PROFILE_TYPE.to_string()
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            divisions: default_divisions(),
            default_role: default_role(),
            default_style: default_style(),
            feed_profile_type: default_feed_profile_type(),
        }
    }
}

/// Default config path: ~/.config/card-content/editor.json
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("card-content")
        .join("editor.json")
}

/// Load config from path. Returns default if the file is missing or malformed.
pub fn load_config(path: &Path) -> EditorConfig {
    match fs::read_to_string(path) {
        Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
            log::warn!("Failed to parse config {}: {}", path.display(), e);
            EditorConfig::default()
        }),
        Err(_) => {
            log::info!("No config at {}, using defaults", path.display());
            EditorConfig::default()
        }
    }
}
