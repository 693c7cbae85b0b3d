/// Card content backend: config loading, document storage, HTTP server.
pub mod api;
pub mod config;
pub mod content_file;
mod logging;
pub mod server;
pub mod state;

use std::path::PathBuf;
use std::sync::Arc;

use crate::content_file::ContentFile;
use crate::state::AppState;

/// Start the backend with the given config file (or the default one).
pub async fn run(config_path: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    logging::init();

    let config_path = config_path.unwrap_or_else(config::default_config_path);
    let config = config::load_config(&config_path);
    let data_path = config.data_path();

    let content = ContentFile::open(&data_path).map_err(|e| {
        log::error!(
            target: "card_content.storage",
            "Failed to open card content {}: {}",
            data_path.display(),
            e
        );
        e
    })?;
    log::info!("Serving card content from {}", data_path.display());

    let state = AppState {
        content: Arc::new(content),
        port: config.port,
        bind_address: config.bind_address.clone(),
    };

    server::serve(state, async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::error!("Failed to listen for shutdown signal: {}", e);
        }
    })
    .await
}
