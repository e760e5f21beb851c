//! Strict JSON request-body extraction.
//!
//! Axum's built-in `Json` extractor reports failures in its own format; the
//! API instead reports every rejected body as a `400` carrying one of the
//! [`DecodeError`] messages.

use axum::body::Body;
use axum::extract::{FromRequest, Request};
use cinedex_core::decode::{decode_strict, DecodeError, MAX_BODY_BYTES};
use http_body_util::LengthLimitError;
use serde::de::DeserializeOwned;

use crate::error::AppError;

/// Like `axum::Json`, but with a 1 MiB cap, unknown-key rejection (via the
/// target's `deny_unknown_fields`), single-value enforcement, and
/// client-safe error messages.
#[derive(Debug, Clone, Copy, Default)]
pub struct StrictJson<T>(pub T);

impl<S, T> FromRequest<S> for StrictJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, _state: &S) -> Result<Self, Self::Rejection> {
        read_json(req.into_body()).await.map(StrictJson)
    }
}

/// Buffer at most [`MAX_BODY_BYTES`] of `body` and decode it strictly.
///
/// Handlers that must load state before looking at the body take the raw
/// [`Body`] and call this directly.
pub async fn read_json<T: DeserializeOwned>(body: Body) -> Result<T, AppError> {
    let bytes = axum::body::to_bytes(body, MAX_BODY_BYTES)
        .await
        .map_err(|err| {
            let source = err.into_inner();
            if source.downcast_ref::<LengthLimitError>().is_some() {
                AppError::Decode(DecodeError::TooLarge {
                    limit: MAX_BODY_BYTES,
                })
            } else {
                AppError::BadRequest(format!("failed to read request body: {source}"))
            }
        })?;

    Ok(decode_strict(&bytes)?)
}
