//! Shared response envelope types for API handlers.
//!
//! All API responses use a `{ "data": ... }` envelope per project conventions.

use cinedex_core::filters::Metadata;
use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// `{ "data": [...], "metadata": {...} }` envelope for paginated listings.
#[derive(Debug, Serialize)]
pub struct ListResponse<T: Serialize> {
    pub data: Vec<T>,
    pub metadata: Metadata,
}
