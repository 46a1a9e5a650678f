use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::{
    error::AppResult,
    models::{DetailsRequest, DetailsResponse, SearchRequest, SearchResponse},
    services::catalog,
};

use super::AppState;

/// Health check endpoint
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "message": "StreamPortal API is running"
    }))
}

/// Search endpoint: returns basic info only, no availability probing.
pub async fn search(
    State(state): State<AppState>,
    Json(request): Json<SearchRequest>,
) -> AppResult<Json<SearchResponse>> {
    tracing::info!(
        content_type = ?request.type_of_content,
        query = %request.text_search,
        language = %request.option_language,
        "Search request"
    );

    let response = catalog::perform_search(state.metadata.as_ref(), &request).await?;

    tracing::info!(results = response.results.len(), "Search completed");
    Ok(Json(response))
}

/// Details endpoint: metadata plus the streaming availability check.
///
/// Called when a user opens a search result; this is the heavy path that
/// sweeps episode availability for series.
pub async fn details(
    State(state): State<AppState>,
    Json(request): Json<DetailsRequest>,
) -> AppResult<Json<DetailsResponse>> {
    tracing::info!(
        content_type = ?request.type_of_content,
        content_id = request.content_id,
        language = %request.option_language,
        "Details request"
    );

    let response =
        catalog::perform_details(state.metadata.as_ref(), state.prober.as_ref(), &request).await?;

    Ok(Json(response))
}
