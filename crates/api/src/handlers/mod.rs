pub mod movies;

use axum::http::Method;

use crate::error::AppError;

/// Fallback for requests that match no route.
pub async fn not_found() -> AppError {
    AppError::NotFound
}

/// Fallback for a matched path requested with an unsupported method.
pub async fn method_not_allowed(method: Method) -> AppError {
    AppError::MethodNotAllowed(method.to_string())
}
