//! [`MovieStore`] implementation over PostgreSQL.

use async_trait::async_trait;
use cinedex_core::filters::Metadata;
use cinedex_core::movie::Movie;
use cinedex_core::store::{MovieQuery, MovieStore, StoreError};
use cinedex_core::types::DbId;

use crate::repositories::MovieRepo;
use crate::DbPool;

/// Postgres-backed movie storage. Cheap to clone (the pool is an `Arc`).
#[derive(Debug, Clone)]
pub struct PgMovieStore {
    pool: DbPool,
}

impl PgMovieStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn backend(err: sqlx::Error) -> StoreError {
    StoreError::Backend(Box::new(err))
}

#[async_trait]
impl MovieStore for PgMovieStore {
    async fn get(&self, id: DbId) -> Result<Movie, StoreError> {
        MovieRepo::find_by_id(&self.pool, id)
            .await
            .map_err(backend)?
            .map(Movie::from)
            .ok_or(StoreError::NotFound { id })
    }

    async fn create(&self, movie: &mut Movie) -> Result<(), StoreError> {
        let inserted = MovieRepo::create(&self.pool, movie)
            .await
            .map_err(backend)?;

        movie.id = inserted.id;
        movie.created_at = inserted.created_at;
        movie.version = inserted.version;
        tracing::debug!(movie_id = movie.id, "Movie row inserted");
        Ok(())
    }

    async fn update(&self, movie: &mut Movie) -> Result<(), StoreError> {
        match MovieRepo::update(&self.pool, movie).await.map_err(backend)? {
            Some(version) => {
                movie.version = version;
                Ok(())
            }
            None => {
                tracing::debug!(
                    movie_id = movie.id,
                    expected_version = movie.version,
                    "Movie update matched no row"
                );
                Err(StoreError::EditConflict)
            }
        }
    }

    async fn delete(&self, id: DbId) -> Result<(), StoreError> {
        if MovieRepo::delete(&self.pool, id).await.map_err(backend)? {
            Ok(())
        } else {
            Err(StoreError::NotFound { id })
        }
    }

    async fn get_all(&self, query: &MovieQuery) -> Result<(Vec<Movie>, Metadata), StoreError> {
        let filters = &query.filters;
        let column = filters
            .sort_column()
            .map_err(|e| StoreError::Backend(e.into()))?;
        let order_by = format!("{column} {}", filters.sort_direction());

        let rows = MovieRepo::list(&self.pool, query, &order_by)
            .await
            .map_err(backend)?;

        let total_records = rows.first().map_or(0, |row| row.total_records);
        let movies = rows.into_iter().map(|row| Movie::from(row.movie)).collect();

        Ok((
            movies,
            Metadata::calculate(total_records, filters.page, filters.page_size),
        ))
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        crate::health_check(&self.pool).await.map_err(backend)
    }
}
