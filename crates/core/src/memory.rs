//! In-process [`MovieStore`] backed by a `BTreeMap`.
//!
//! Mirrors the Postgres store's semantics (version compare-and-swap, title
//! search, genre containment, stable ordering) closely enough to drive the
//! HTTP layer in tests and in local runs without a database.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::filters::Metadata;
use crate::movie::Movie;
use crate::store::{MovieQuery, MovieStore, StoreError};
use crate::types::DbId;

#[derive(Debug, Default)]
struct Inner {
    next_id: DbId,
    movies: BTreeMap<DbId, Movie>,
}

#[derive(Debug, Default)]
pub struct InMemoryMovieStore {
    inner: RwLock<Inner>,
}

impl InMemoryMovieStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MovieStore for InMemoryMovieStore {
    async fn get(&self, id: DbId) -> Result<Movie, StoreError> {
        let inner = self.inner.read().await;
        inner
            .movies
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound { id })
    }

    async fn create(&self, movie: &mut Movie) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        inner.next_id += 1;

        movie.id = inner.next_id;
        movie.created_at = chrono::Utc::now();
        movie.version = 1;
        inner.movies.insert(movie.id, movie.clone());
        Ok(())
    }

    async fn update(&self, movie: &mut Movie) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        let stored = inner
            .movies
            .get_mut(&movie.id)
            .filter(|stored| stored.version == movie.version)
            .ok_or(StoreError::EditConflict)?;

        movie.version += 1;
        stored.title.clone_from(&movie.title);
        stored.year = movie.year;
        stored.runtime = movie.runtime;
        stored.genres.clone_from(&movie.genres);
        stored.version = movie.version;
        Ok(())
    }

    async fn delete(&self, id: DbId) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        inner
            .movies
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound { id })
    }

    async fn get_all(&self, query: &MovieQuery) -> Result<(Vec<Movie>, Metadata), StoreError> {
        let column = query
            .filters
            .sort_column()
            .map_err(|e| StoreError::Backend(e.into()))?;

        let inner = self.inner.read().await;
        let mut matched: Vec<&Movie> = inner
            .movies
            .values()
            .filter(|m| title_matches(&m.title, &query.title))
            .filter(|m| query.genres.iter().all(|g| m.genres.contains(g)))
            .collect();

        matched.sort_by(|a, b| {
            let primary = compare_by(column, a, b);
            let primary = if query.filters.descending() {
                primary.reverse()
            } else {
                primary
            };
            primary.then(a.id.cmp(&b.id))
        });

        let total = matched.len() as i64;
        let offset = usize::try_from(query.filters.offset()).unwrap_or(usize::MAX);
        let limit = usize::try_from(query.filters.limit()).unwrap_or(0);
        let page = matched
            .into_iter()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect();

        Ok((
            page,
            Metadata::calculate(total, query.filters.page, query.filters.page_size),
        ))
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

fn compare_by(column: &str, a: &Movie, b: &Movie) -> Ordering {
    match column {
        "title" => a.title.cmp(&b.title),
        "year" => a.year.cmp(&b.year),
        "runtime" => a.runtime.cmp(&b.runtime),
        _ => a.id.cmp(&b.id),
    }
}

/// Every whitespace-separated word of `query` must appear as a word of
/// `title`, case-insensitively.
fn title_matches(title: &str, query: &str) -> bool {
    let words: Vec<String> = title.split_whitespace().map(str::to_lowercase).collect();
    query
        .split_whitespace()
        .map(str::to_lowercase)
        .all(|q| words.contains(&q))
}
