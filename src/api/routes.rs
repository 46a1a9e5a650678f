use axum::{
    http::{HeaderValue, Method},
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    config::Config,
    middleware::{observability, rate_limit},
};

use super::{handlers, AppState};

/// Creates the main API router with all routes
pub fn create_router(state: AppState, config: &Config) -> Router {
    let cors = cors_layer(config);

    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/search", post(handlers::search))
        .route("/details", post(handlers::details))
        .layer(middleware::from_fn_with_state(
            state.rate_limiter.clone(),
            rate_limit::rate_limit_middleware,
        ))
        // Trace spans read the request id, so that middleware sits outside.
        .layer(TraceLayer::new_for_http().make_span_with(observability::make_span_with_request_id))
        .layer(middleware::from_fn(
            observability::observability_middleware,
        ))
        .layer(cors)
        .with_state(state)
}

fn cors_layer(config: &Config) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .origins()
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any)
}
