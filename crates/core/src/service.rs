//! Movie operations: the create / show / update / delete / list protocol.
//!
//! Each function takes the storage collaborator by `&dyn MovieStore` and a
//! fresh, request-scoped [`Validator`], so nothing here holds state between
//! calls. Input is validated before any write; storage outcomes are mapped
//! onto [`CoreError`] by `From<StoreError>`.

use crate::error::CoreError;
use crate::filters::{validate_filters, Metadata};
use crate::movie::{validate_movie, CreateMovie, Movie, UpdateMovie};
use crate::store::{MovieQuery, MovieStore};
use crate::types::DbId;
use crate::validator::Validator;

/// Validate and insert a new movie. The returned movie has `version == 1`.
pub async fn create_movie(store: &dyn MovieStore, input: CreateMovie) -> Result<Movie, CoreError> {
    let mut movie = input.into_movie();

    let mut v = Validator::new();
    validate_movie(&mut v, &movie);
    v.into_result()?;

    store.create(&mut movie).await?;
    Ok(movie)
}

pub async fn show_movie(store: &dyn MovieStore, id: DbId) -> Result<Movie, CoreError> {
    Ok(store.get(id).await?)
}

/// Load the movie, then run [`apply_update`] against it.
pub async fn update_movie(
    store: &dyn MovieStore,
    id: DbId,
    input: UpdateMovie,
) -> Result<Movie, CoreError> {
    let movie = store.get(id).await?;
    apply_update(store, movie, input).await
}

/// Merge `input` into a movie the caller has already loaded, validate the
/// result, and persist it conditioned on the version observed at load time.
///
/// Fails with [`CoreError::FailedValidation`] (nothing written) or
/// [`CoreError::EditConflict`] when another writer got there first; in the
/// latter case the caller must re-read before retrying.
pub async fn apply_update(
    store: &dyn MovieStore,
    mut movie: Movie,
    input: UpdateMovie,
) -> Result<Movie, CoreError> {
    input.apply_to(&mut movie);

    let mut v = Validator::new();
    validate_movie(&mut v, &movie);
    v.into_result()?;

    store.update(&mut movie).await?;
    Ok(movie)
}

pub async fn delete_movie(store: &dyn MovieStore, id: DbId) -> Result<(), CoreError> {
    Ok(store.delete(id).await?)
}

/// Validate the paging/sort filters, then query the store.
pub async fn list_movies(
    store: &dyn MovieStore,
    query: &MovieQuery,
) -> Result<(Vec<Movie>, Metadata), CoreError> {
    let mut v = Validator::new();
    validate_filters(&mut v, &query.filters);
    v.into_result()?;

    Ok(store.get_all(query).await?)
}
