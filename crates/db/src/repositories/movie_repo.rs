//! Repository for the `movies` table.

use cinedex_core::movie::Movie;
use cinedex_core::store::MovieQuery;
use cinedex_core::types::DbId;
use sqlx::PgPool;

use crate::models::movie::{InsertedMovie, MovieListRow, MovieRow};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, created_at, title, year, runtime, genres, version";

/// Provides CRUD operations for movies.
pub struct MovieRepo;

impl MovieRepo {
    /// Insert a new movie, returning the server-assigned columns.
    pub async fn create(pool: &PgPool, movie: &Movie) -> Result<InsertedMovie, sqlx::Error> {
        sqlx::query_as::<_, InsertedMovie>(
            "INSERT INTO movies (title, year, runtime, genres) \
             VALUES ($1, $2, $3, $4) \
             RETURNING id, created_at, version",
        )
        .bind(&movie.title)
        .bind(movie.year)
        .bind(movie.runtime.minutes())
        .bind(&movie.genres)
        .fetch_one(pool)
        .await
    }

    /// Find a movie by ID. Ids below 1 are never issued, so they short-circuit
    /// to `None` without a round trip.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<MovieRow>, sqlx::Error> {
        if id < 1 {
            return Ok(None);
        }

        let query = format!("SELECT {COLUMNS} FROM movies WHERE id = $1");
        sqlx::query_as::<_, MovieRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Overwrite the mutable columns if the stored version still matches
    /// `movie.version`, incrementing the version in the same statement.
    ///
    /// Returns the new version, or `None` when no row matched (edit conflict
    /// or concurrent delete).
    pub async fn update(pool: &PgPool, movie: &Movie) -> Result<Option<i32>, sqlx::Error> {
        sqlx::query_scalar::<_, i32>(
            "UPDATE movies SET \
                 title = $1, \
                 year = $2, \
                 runtime = $3, \
                 genres = $4, \
                 version = version + 1 \
             WHERE id = $5 AND version = $6 \
             RETURNING version",
        )
        .bind(&movie.title)
        .bind(movie.year)
        .bind(movie.runtime.minutes())
        .bind(&movie.genres)
        .bind(movie.id)
        .bind(movie.version)
        .fetch_optional(pool)
        .await
    }

    /// Permanently delete a movie. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        if id < 1 {
            return Ok(false);
        }

        let result = sqlx::query("DELETE FROM movies WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// List movies matching the title / genre criteria, one page at a time.
    ///
    /// `order_by` is interpolated into the statement and must be built from
    /// `Filters::sort_column` and `Filters::sort_direction`, which only yield
    /// safelisted values. `id ASC` is appended so pages are stable.
    pub async fn list(
        pool: &PgPool,
        query: &MovieQuery,
        order_by: &str,
    ) -> Result<Vec<MovieListRow>, sqlx::Error> {
        let sql = format!(
            "SELECT count(*) OVER() AS total_records, {COLUMNS} \
             FROM movies \
             WHERE (to_tsvector('simple', title) @@ plainto_tsquery('simple', $1) OR $1 = '') \
               AND (genres @> $2 OR $2 = '{{}}') \
             ORDER BY {order_by}, id ASC \
             LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, MovieListRow>(&sql)
            .bind(&query.title)
            .bind(&query.genres)
            .bind(query.filters.limit())
            .bind(query.filters.offset())
            .fetch_all(pool)
            .await
    }
}
