//! Handlers for the `/movies` resource.

use axum::body::Body;
use axum::extract::{Path, Query, State};
use axum::http::header::LOCATION;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use cinedex_core::movie::{CreateMovie, Movie, UpdateMovie};
use cinedex_core::service;
use cinedex_core::types::DbId;

use crate::error::{AppError, AppResult};
use crate::extract::{read_json, StrictJson};
use crate::query::{movie_query, QueryParams};
use crate::response::{DataResponse, ListResponse};
use crate::state::AppState;

/// Parse a `{id}` path segment. Only positive integers are valid ids.
fn parse_id(raw: &str) -> Option<DbId> {
    raw.parse::<DbId>().ok().filter(|id| *id > 0)
}

fn invalid_id() -> AppError {
    AppError::BadRequest("invalid id parameter".into())
}

/// GET /api/v1/movies
///
/// Query parameters: `title`, `genres` (comma-separated), `page`,
/// `page_size`, `sort`.
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<QueryParams>,
) -> AppResult<Json<ListResponse<Movie>>> {
    let query = movie_query(&params);
    let (movies, metadata) = service::list_movies(state.movies.as_ref(), &query).await?;

    tracing::debug!(count = movies.len(), sort = %query.filters.sort, "Movies listed");

    Ok(Json(ListResponse {
        data: movies,
        metadata,
    }))
}

/// POST /api/v1/movies
pub async fn create(
    State(state): State<AppState>,
    StrictJson(input): StrictJson<CreateMovie>,
) -> AppResult<impl IntoResponse> {
    let movie = service::create_movie(state.movies.as_ref(), input).await?;

    tracing::info!(movie_id = movie.id, "Movie created");

    let location = format!("/api/v1/movies/{}", movie.id);
    Ok((
        StatusCode::CREATED,
        [(LOCATION, location)],
        Json(DataResponse { data: movie }),
    ))
}

/// GET /api/v1/movies/{id}
///
/// A malformed id cannot name any movie, so it is reported as not found.
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> AppResult<Json<DataResponse<Movie>>> {
    let id = parse_id(&raw_id).ok_or(AppError::NotFound)?;
    let movie = service::show_movie(state.movies.as_ref(), id).await?;
    Ok(Json(DataResponse { data: movie }))
}

/// PATCH /api/v1/movies/{id}
///
/// The movie is loaded before the body is read, so an unknown id is a 404
/// even when the body is also bad. The write is conditioned on the version
/// seen at load time; a concurrent writer turns this into a 409.
pub async fn update(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    body: Body,
) -> AppResult<Json<DataResponse<Movie>>> {
    let id = parse_id(&raw_id).ok_or_else(invalid_id)?;
    let store = state.movies.as_ref();

    let loaded = service::show_movie(store, id).await?;
    let input: UpdateMovie = read_json(body).await?;
    let movie = service::apply_update(store, loaded, input).await?;

    tracing::info!(movie_id = movie.id, version = movie.version, "Movie updated");

    Ok(Json(DataResponse { data: movie }))
}

/// DELETE /api/v1/movies/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> AppResult<StatusCode> {
    let id = parse_id(&raw_id).ok_or_else(invalid_id)?;
    service::delete_movie(state.movies.as_ref(), id).await?;

    tracing::info!(movie_id = id, "Movie deleted");

    Ok(StatusCode::NO_CONTENT)
}
