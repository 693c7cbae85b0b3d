use axum::{
    http::{HeaderMap, StatusCode},
    routing::get,
    Router,
};
use serde::Serialize;

mod content;
mod status;

use crate::state::AppState;

/// Axum REST API routes.
///
///   GET  /api/cardContent   -> full card document (+ ETag, honours If-None-Match)
///   PUT  /api/cardContent   -> replace full card document, echoes the saved document
///   GET  /status            -> health check
pub fn api_router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/cardContent",
            get(content::get_content).put(content::put_content),
        )
        .route("/status", get(status::status))
}

// ── Shared types and helpers used across sub-modules ────────────────────

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn insert_header_safe(headers: &mut HeaderMap, name: &'static str, value: &str) {
    match value.parse() {
        Ok(parsed) => {
            headers.insert(name, parsed);
        }
        Err(e) => {
            log::warn!("Failed to set header {}={} ({})", name, value, e);
        }
    }
}

fn log_api_issue(status: StatusCode, target: &'static str, message: impl AsRef<str>) {
    let message = message.as_ref();
    if status.is_server_error() {
        log::error!(target: target, "{}", message);
    } else {
        log::warn!(target: target, "{}", message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content_file::ContentFile;
    use axum::body::Body;
    use axum::http::Request;
    use card_content_core::types::{CardContent, ProfileCard, ProfileTypeSection};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn make_app(dir: &tempfile::TempDir) -> (Router, Arc<ContentFile>) {
        let content = Arc::new(ContentFile::open(&dir.path().join("cards.json")).unwrap());
        let state = AppState {
            content: content.clone(),
            port: 0,
            bind_address: "127.0.0.1".to_string(),
        };
        (crate::server::build_app(state), content)
    }

    fn crew_mate_with(cards: Vec<ProfileCard>) -> CardContent {
        let mut content = CardContent::default();
        content.card_content.profile_types.push(ProfileTypeSection {
            section_type: "CrewMate".to_string(),
            cards,
            ..Default::default()
        });
        content
    }

    fn dev007() -> ProfileCard {
        ProfileCard {
            id: "dev007".to_string(),
            description: "x".to_string(),
            source: "y".to_string(),
            ..Default::default()
        }
    }

    async fn body_json(resp: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn put_request(content: &CardContent) -> Request<Body> {
        Request::builder()
            .method("PUT")
            .uri("/api/cardContent")
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(content).unwrap()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_get_returns_document_with_etag() {
        let dir = tempfile::tempdir().unwrap();
        let (app, content) = make_app(&dir);
        let resp = app
            .oneshot(Request::get("/api/cardContent").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers().get("etag").unwrap().to_str().unwrap(),
            content.etag()
        );
        let json = body_json(resp).await;
        assert_eq!(json["cardContent"]["profileTypes"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_put_then_get() {
        let dir = tempfile::tempdir().unwrap();
        let (app, content) = make_app(&dir);

        let resp = app
            .clone()
            .oneshot(put_request(&crew_mate_with(vec![dev007()])))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(content.version(), 2);

        let resp = app
            .oneshot(Request::get("/api/cardContent").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let json = body_json(resp).await;
        assert_eq!(
            json["cardContent"]["profileTypes"][0]["cards"][0]["id"],
            "dev007"
        );
    }

    #[tokio::test]
    async fn test_if_none_match_returns_not_modified() {
        let dir = tempfile::tempdir().unwrap();
        let (app, content) = make_app(&dir);
        let resp = app
            .oneshot(
                Request::get("/api/cardContent")
                    .header("if-none-match", content.etag())
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_MODIFIED);
    }

    #[tokio::test]
    async fn test_stale_etag_after_restart_gets_full_document() {
        let dir = tempfile::tempdir().unwrap();
        let (_, content) = make_app(&dir);
        let empty_etag = content.etag();
        content.replace(crew_mate_with(vec![dev007()])).unwrap();
        drop(content);

        // Fresh process over the same file.
        let (app, _) = make_app(&dir);
        let resp = app
            .oneshot(
                Request::get("/api/cardContent")
                    .header("if-none-match", empty_etag)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(
            json["cardContent"]["profileTypes"][0]["cards"][0]["id"],
            "dev007"
        );
    }

    #[tokio::test]
    async fn test_put_duplicate_sections_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let (app, content) = make_app(&dir);
        let mut doc = crew_mate_with(vec![]);
        doc.card_content
            .profile_types
            .push(doc.card_content.profile_types[0].clone());

        let resp = app.oneshot(put_request(&doc)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let json = body_json(resp).await;
        assert!(json["error"].as_str().unwrap().contains("CrewMate"));
        assert_eq!(content.version(), 1);
    }

    #[tokio::test]
    async fn test_put_malformed_body_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let (app, _) = make_app(&dir);
        let resp = app
            .oneshot(
                Request::builder()
                    .method("PUT")
                    .uri("/api/cardContent")
                    .header("content-type", "application/json")
                    .body(Body::from("{\"cardContent\": 5}"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert!(resp.status().is_client_error());
    }

    #[tokio::test]
    async fn test_status() {
        let dir = tempfile::tempdir().unwrap();
        let (app, _) = make_app(&dir);
        let resp = app
            .oneshot(Request::get("/status").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json["status"], "ok");
        assert_eq!(json["version"], 1);
    }
}
