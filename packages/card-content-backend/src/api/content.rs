use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::Json,
};
use card_content_core::types::CardContent;

use super::{insert_header_safe, log_api_issue, ErrorResponse};
use crate::content_file::ContentFileError;
use crate::state::AppState;

/// GET /api/cardContent -- the whole document.
pub async fn get_content(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> (StatusCode, HeaderMap, Json<serde_json::Value>) {
    let (content, etag) = state.content.read();

    let mut resp_headers = HeaderMap::new();
    insert_header_safe(&mut resp_headers, "etag", &etag);

    // Check If-None-Match for conditional response
    if let Some(if_none_match) = headers.get("if-none-match") {
        if let Ok(value) = if_none_match.to_str() {
            if value == etag {
                return (
                    StatusCode::NOT_MODIFIED,
                    resp_headers,
                    Json(serde_json::json!({})),
                );
            }
        }
    }

    let body = serde_json::to_value(&content).unwrap_or_else(|e| {
        log::error!(target: "card_content.api.get", "Failed to encode card content: {}", e);
        serde_json::json!({})
    });
    (StatusCode::OK, resp_headers, Json(body))
}

/// PUT /api/cardContent -- replace the whole document.
pub async fn put_content(
    State(state): State<AppState>,
    Json(content): Json<CardContent>,
) -> Result<(HeaderMap, Json<CardContent>), (StatusCode, Json<ErrorResponse>)> {
    let profile_types = content.card_content.profile_types.len();
    let version = state.content.replace(content).map_err(|e| {
        let status = match &e {
            ContentFileError::Invalid(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        log_api_issue(
            status,
            "card_content.api.put",
            format!("Failed to replace card content: {}", e),
        );
        (
            status,
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )
    })?;

    log::info!(
        target: "card_content.api.put",
        "Card content replaced ({} profile types, version {})",
        profile_types,
        version
    );

    let mut resp_headers = HeaderMap::new();
    let (saved, etag) = state.content.read();
    insert_header_safe(&mut resp_headers, "etag", &etag);
    Ok((resp_headers, Json(saved)))
}
