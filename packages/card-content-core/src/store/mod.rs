#[cfg(feature = "http-store")]
pub mod http;
pub mod memory;

use async_trait::async_trait;

use crate::types::CardContent;

/// Remote holder of the card document.
/// Implementations: HttpContentStore (REST), MemoryContentStore (in-process).
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Read the whole document.
    async fn fetch(&self) -> Result<CardContent, StoreError>;

    /// Replace the whole document. No partial writes.
    async fn replace(&self, content: &CardContent) -> Result<(), StoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[cfg(feature = "http-store")]
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Server responded with {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed card content: {0}")]
    Parse(#[from] serde_json::Error),
}
