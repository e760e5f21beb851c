use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use cinedex_core::decode::DecodeError;
use cinedex_core::error::CoreError;
use serde_json::{json, Value};

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and [`DecodeError`] for rejected
/// request bodies, and adds HTTP-specific variants. Implements
/// [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `cinedex_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A request body that failed strict JSON decoding.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// No route or resource matches the request.
    #[error("Not found")]
    NotFound,

    /// The route exists but not for this HTTP method.
    #[error("Method not allowed: {0}")]
    MethodNotAllowed(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

const INTERNAL_MESSAGE: &str = "An internal error occurred";

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message): (StatusCode, &str, Value) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found").into(),
                ),
                CoreError::FailedValidation(errors) => (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "FAILED_VALIDATION",
                    json!(errors),
                ),
                CoreError::EditConflict => (
                    StatusCode::CONFLICT,
                    "EDIT_CONFLICT",
                    "unable to process the record due to an edit conflict, please try again".into(),
                ),
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        INTERNAL_MESSAGE.into(),
                    )
                }
            },

            // --- Body decoding ---
            AppError::Decode(err) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", err.to_string().into()),

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.as_str().into()),
            AppError::NotFound => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                "the requested resource could not be found".into(),
            ),
            AppError::MethodNotAllowed(method) => (
                StatusCode::METHOD_NOT_ALLOWED,
                "METHOD_NOT_ALLOWED",
                format!("the {method} method is not supported for this resource").into(),
            ),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    INTERNAL_MESSAGE.into(),
                )
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}
