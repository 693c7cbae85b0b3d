/// REST client for the card content endpoint.
///
///   GET /api/cardContent -> full document
///   PUT /api/cardContent -> replace full document
use async_trait::async_trait;

use super::{ContentStore, StoreError};
use crate::types::CardContent;

pub const CONTENT_PATH: &str = "/api/cardContent";

pub struct HttpContentStore {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpContentStore {
    pub fn new(server_url: &str) -> Self {
        Self::with_client(reqwest::Client::new(), server_url)
    }

    pub fn with_client(client: reqwest::Client, server_url: &str) -> Self {
        Self {
            client,
            endpoint: content_endpoint(server_url),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

fn content_endpoint(server_url: &str) -> String {
    format!("{}{}", server_url.trim_end_matches('/'), CONTENT_PATH)
}

async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, StoreError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(StoreError::Status {
        status: status.as_u16(),
        body,
    })
}

#[async_trait]
impl ContentStore for HttpContentStore {
    async fn fetch(&self) -> Result<CardContent, StoreError> {
        let resp = self.client.get(&self.endpoint).send().await?;
        let resp = check_status(resp).await.inspect_err(|e| {
            log::warn!(target: "card_content.store.http", "GET {} failed: {}", self.endpoint, e);
        })?;
        // Read text first so malformed bodies surface as Parse, not Http.
        let text = resp.text().await?;
        let content: CardContent = serde_json::from_str(&text)?;
        log::debug!(
            target: "card_content.store.http",
            "Fetched {} profile types from {}",
            content.card_content.profile_types.len(),
            self.endpoint
        );
        Ok(content)
    }

    async fn replace(&self, content: &CardContent) -> Result<(), StoreError> {
        let resp = self
            .client
            .put(&self.endpoint)
            .json(content)
            .send()
            .await?;
        check_status(resp).await.inspect_err(|e| {
            log::warn!(target: "card_content.store.http", "PUT {} failed: {}", self.endpoint, e);
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        assert_eq!(
            content_endpoint("http://127.0.0.1:8080/"),
            "http://127.0.0.1:8080/api/cardContent"
        );
        assert_eq!(
            content_endpoint("https://cards.example.com"),
            "https://cards.example.com/api/cardContent"
        );
    }
}
