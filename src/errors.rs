use axum::http::StatusCode;
use tracing::error;

/// Map an unexpected repo/service error to a 500 response.
pub(crate) fn internal<E: std::fmt::Display>(e: E) -> (StatusCode, String) {
    error!(error = %e, "internal error");
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}
