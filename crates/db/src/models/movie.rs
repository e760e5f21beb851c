//! Movie row structs.

use cinedex_core::movie::Movie;
use cinedex_core::runtime::Runtime;
use cinedex_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `movies` table.
#[derive(Debug, Clone, FromRow)]
pub struct MovieRow {
    pub id: DbId,
    pub created_at: Timestamp,
    pub title: String,
    pub year: i32,
    pub runtime: i32,
    pub genres: Vec<String>,
    pub version: i32,
}

/// A `movies` row plus the windowed total used for pagination metadata.
#[derive(Debug, Clone, FromRow)]
pub struct MovieListRow {
    pub total_records: i64,
    #[sqlx(flatten)]
    pub movie: MovieRow,
}

impl From<MovieRow> for Movie {
    fn from(row: MovieRow) -> Self {
        Movie {
            id: row.id,
            created_at: row.created_at,
            title: row.title,
            year: row.year,
            runtime: Runtime(row.runtime),
            genres: row.genres,
            version: row.version,
        }
    }
}

/// Server-assigned columns returned by `INSERT ... RETURNING`.
#[derive(Debug, Clone, FromRow)]
pub struct InsertedMovie {
    pub id: DbId,
    pub created_at: Timestamp,
    pub version: i32,
}
