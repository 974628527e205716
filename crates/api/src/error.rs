use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use cnec_core::error::CoreError;
use cnec_db::repositories::RegionQueryError;
use cnec_db::{BackendError, RegionUnavailable};
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps domain and data-layer errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent `{error, code}` JSON.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `cnec_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A region has no usable backend client.
    #[error(transparent)]
    Region(#[from] RegionUnavailable),

    /// A regional backend call failed.
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// Request body failed `validator` checks.
    #[error(transparent)]
    Validation(#[from] validator::ValidationErrors),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl From<RegionQueryError> for AppError {
    fn from(err: RegionQueryError) -> Self {
        match err {
            RegionQueryError::Unavailable(e) => AppError::Region(e),
            RegionQueryError::Backend(e) => AppError::Backend(e),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(CoreError::Validation(msg)) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }

            // --- Region data layer ---
            AppError::Region(err) => match err {
                RegionUnavailable::UnknownRegion(_) => {
                    (StatusCode::NOT_FOUND, "UNKNOWN_REGION", err.to_string())
                }
                RegionUnavailable::NotConfigured(_) | RegionUnavailable::InvalidUrl { .. } => (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "REGION_UNAVAILABLE",
                    err.to_string(),
                ),
            },
            AppError::Backend(err) => classify_backend_error(err),

            // --- HTTP-specific errors ---
            AppError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                errors.to_string(),
            ),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Classify a regional backend error into an HTTP status, error code, and
/// message.
///
/// - Provider rejections keep the provider's message.
/// - Transport and decode failures are logged and sanitized.
fn classify_backend_error(err: &BackendError) -> (StatusCode, &'static str, String) {
    match err {
        BackendError::Api { status, message } => {
            tracing::warn!(status, error = %message, "Regional backend rejected request");
            (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR", message.clone())
        }
        other => {
            tracing::error!(error = %other, "Regional backend error");
            (
                StatusCode::BAD_GATEWAY,
                "UPSTREAM_ERROR",
                "Regional backend request failed".to_string(),
            )
        }
    }
}
