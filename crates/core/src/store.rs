//! Storage collaborator contract for movies.
//!
//! The domain never talks to a database directly; it goes through
//! [`MovieStore`]. `cinedex_db::store::PgMovieStore` is the production
//! implementation, [`crate::memory::InMemoryMovieStore`] the in-process one.

use async_trait::async_trait;

use crate::filters::{Filters, Metadata};
use crate::movie::Movie;
use crate::types::DbId;

/// Failure reported by a [`MovieStore`].
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("movie {id} not found")]
    NotFound { id: DbId },

    /// The stored version no longer matches the one the writer loaded.
    #[error("edit conflict")]
    EditConflict,

    /// Anything else (connection loss, timeout, constraint failure, ...).
    #[error("storage backend error: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Criteria for [`MovieStore::get_all`].
#[derive(Debug, Clone, Default)]
pub struct MovieQuery {
    /// Full-text match on title; empty matches everything.
    pub title: String,
    /// Every listed genre must be present; empty matches everything.
    pub genres: Vec<String>,
    pub filters: Filters,
}

#[async_trait]
pub trait MovieStore: Send + Sync {
    /// Fetch a movie by id. Ids below 1 are reported as not found.
    async fn get(&self, id: DbId) -> Result<Movie, StoreError>;

    /// Insert `movie`, filling in `id`, `created_at`, and `version = 1`.
    async fn create(&self, movie: &mut Movie) -> Result<(), StoreError>;

    /// Write `movie` if the stored version still equals `movie.version`,
    /// then bump `movie.version` to the newly stored value. A mismatch (or a
    /// row deleted in the meantime) is [`StoreError::EditConflict`] and
    /// writes nothing.
    async fn update(&self, movie: &mut Movie) -> Result<(), StoreError>;

    /// Remove a movie permanently.
    async fn delete(&self, id: DbId) -> Result<(), StoreError>;

    /// List movies matching `query`, with pagination metadata.
    async fn get_all(&self, query: &MovieQuery) -> Result<(Vec<Movie>, Metadata), StoreError>;

    /// Cheap liveness probe for `/health`.
    async fn health_check(&self) -> Result<(), StoreError>;
}
