//! Route definitions for the `/movies` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::{self, movies};
use crate::state::AppState;

/// Movie routes mounted at `/movies`.
///
/// ```text
/// GET    /        -> list
/// POST   /        -> create
/// GET    /{id}    -> get_by_id
/// PATCH  /{id}    -> update
/// DELETE /{id}    -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(movies::list).post(movies::create))
        .route(
            "/{id}",
            get(movies::get_by_id)
                .patch(movies::update)
                .delete(movies::delete),
        )
        .method_not_allowed_fallback(handlers::method_not_allowed)
}
