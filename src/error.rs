use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};

/// Application-level errors
///
/// Every variant maps to a stable error code and HTTP status; the boundary
/// layer serializes them into the structured `{"error": {...}}` body that
/// clients depend on.
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Validation failed: {message}")]
    Validation {
        message: String,
        field: Option<&'static str>,
    },

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Not found: {message}")]
    NotFound {
        message: String,
        resource_type: &'static str,
        resource_id: i64,
    },

    #[error("External API error: {message}")]
    ExternalApi {
        message: String,
        api_name: &'static str,
        upstream_status: Option<u16>,
    },

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Streaming availability error: {message}")]
    StreamingAvailability { message: String, content_id: i64 },

    #[error("Rate limit exceeded")]
    RateLimited { retry_after: u64 },

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn validation(message: impl Into<String>, field: &'static str) -> Self {
        Self::Validation {
            message: message.into(),
            field: Some(field),
        }
    }

    pub fn external_api(message: impl Into<String>, api_name: &'static str) -> Self {
        Self::ExternalApi {
            message: message.into(),
            api_name,
            upstream_status: None,
        }
    }

    /// Stable machine-readable code for the error body.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation { .. } => "VALIDATION_ERROR",
            AppError::Authentication(_) => "AUTHENTICATION_ERROR",
            AppError::NotFound { .. } => "NOT_FOUND_ERROR",
            AppError::ExternalApi { .. } | AppError::HttpClient(_) => "EXTERNAL_API_ERROR",
            AppError::StreamingAvailability { .. } => "STREAMING_AVAILABILITY_ERROR",
            AppError::RateLimited { .. } => "RATE_LIMIT_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::Authentication(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::ExternalApi { .. } | AppError::HttpClient(_) => StatusCode::BAD_GATEWAY,
            AppError::StreamingAvailability { .. } => StatusCode::SERVICE_UNAVAILABLE,
            AppError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn details(&self) -> Value {
        match self {
            AppError::Validation { field, .. } => json!({ "field": field }),
            AppError::NotFound {
                resource_type,
                resource_id,
                ..
            } => json!({ "resource_type": resource_type, "resource_id": resource_id }),
            AppError::ExternalApi {
                api_name,
                upstream_status,
                ..
            } => json!({ "api_name": api_name, "upstream_status": upstream_status }),
            AppError::HttpClient(e) => {
                json!({ "api_name": "TMDB API", "upstream_status": e.status().map(|s| s.as_u16()) })
            }
            AppError::StreamingAvailability { content_id, .. } => {
                json!({ "content_id": content_id })
            }
            AppError::RateLimited { retry_after } => json!({ "retry_after": retry_after }),
            _ => json!({}),
        }
    }

    fn message(&self) -> String {
        match self {
            AppError::Validation { message, .. }
            | AppError::NotFound { message, .. }
            | AppError::ExternalApi { message, .. }
            | AppError::StreamingAvailability { message, .. } => message.clone(),
            AppError::Authentication(message) => message.clone(),
            AppError::HttpClient(e) => format!("Upstream request failed: {}", e),
            AppError::RateLimited { .. } => "Rate limit exceeded".to_string(),
            // Internal details stay out of the response body
            AppError::Internal(_) => "An unexpected error occurred".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        tracing::error!(
            code = self.code(),
            status = status.as_u16(),
            error = %self,
            "Request failed"
        );

        let body = Json(json!({
            "error": {
                "code": self.code(),
                "message": self.message(),
                "status_code": status.as_u16(),
                "details": self.details(),
            }
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_shape() {
        let err = AppError::validation("Search query cannot be empty", "text_search");
        assert_eq!(err.code(), "VALIDATION_ERROR");
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.details()["field"], "text_search");
    }

    #[test]
    fn test_not_found_error_shape() {
        let err = AppError::NotFound {
            message: "Movie with ID 42 not found".to_string(),
            resource_type: "Movie",
            resource_id: 42,
        };
        assert_eq!(err.code(), "NOT_FOUND_ERROR");
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.details()["resource_id"], 42);
    }

    #[test]
    fn test_external_api_maps_to_bad_gateway() {
        let err = AppError::ExternalApi {
            message: "TMDB API returned status 500".to_string(),
            api_name: "TMDB API",
            upstream_status: Some(500),
        };
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
        assert_eq!(err.details()["upstream_status"], 500);
    }

    #[test]
    fn test_internal_error_hides_message() {
        let err = AppError::Internal("connection pool exhausted".to_string());
        assert_eq!(err.message(), "An unexpected error occurred");
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
