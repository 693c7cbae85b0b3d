/// Shared application state passed to axum handlers.
use std::sync::Arc;

use crate::content_file::ContentFile;

#[derive(Clone)]
pub struct AppState {
    pub content: Arc<ContentFile>,
    pub port: u16,
    pub bind_address: String,
}
