//! HTTP request handlers

use super::state::AppState;
use crate::error::SearchError;
use crate::search::SearchRequest;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use tokio_util::sync::CancellationToken;

/// Route search handler
///
/// Malformed JSON is rejected by the extractor; blank endpoints are rejected
/// here, so the search service only ever sees well-formed requests.
pub async fn search(
    State(state): State<AppState>,
    Json(request): Json<SearchRequest>,
) -> impl IntoResponse {
    if !request.is_valid() {
        return (StatusCode::BAD_REQUEST, "Invalid request").into_response();
    }

    // Dropping the handler (client gone) cancels provider calls.
    let cancel = CancellationToken::new();
    let _guard = cancel.clone().drop_guard();

    match state.search.search(&request, &cancel).await {
        Ok(response) => Json(response.as_ref().clone()).into_response(),
        Err(SearchError::Cancelled) => {
            (StatusCode::SERVICE_UNAVAILABLE, "Search cancelled").into_response()
        }
        Err(e) => {
            tracing::error!("Search failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Internal server error: {}", e),
            )
                .into_response()
        }
    }
}

/// Liveness of all providers
pub async fn ping(State(state): State<AppState>) -> StatusCode {
    let cancel = CancellationToken::new();
    let _guard = cancel.clone().drop_guard();

    if state.search.is_available(&cancel).await {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

/// Metrics snapshot
pub async fn stats(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.search.metrics().snapshot())
}

/// Health check handler
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": crate::VERSION
    }))
}
