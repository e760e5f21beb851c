//! Movie entity, request DTOs, and field validation rules.

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use crate::runtime::Runtime;
use crate::types::{DbId, Timestamp};
use crate::validator::{unique, Validator};

/// Maximum title length in bytes.
pub const MAX_TITLE_BYTES: usize = 500;

/// Year of the earliest surviving motion picture.
pub const MIN_YEAR: i32 = 1888;

/// Maximum number of genres per movie.
pub const MAX_GENRES: usize = 5;

/// A stored movie.
///
/// `created_at` is server-internal and never serialized. `version` is the
/// optimistic-concurrency token: 1 on creation, +1 per successful update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Movie {
    pub id: DbId,
    #[serde(skip_serializing)]
    pub created_at: Timestamp,
    pub title: String,
    pub year: i32,
    pub runtime: Runtime,
    pub genres: Vec<String>,
    pub version: i32,
}

/// DTO for creating a movie.
///
/// Every field is part of the full replacement; keys missing from the body
/// decode to zero values and are then reported by [`validate_movie`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CreateMovie {
    pub title: String,
    pub year: i32,
    pub runtime: Runtime,
    pub genres: Vec<String>,
}

/// DTO for partially updating a movie. Absent (or `null`) fields are left
/// unchanged; `genres` replaces the whole list when present.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateMovie {
    pub title: Option<String>,
    pub year: Option<i32>,
    pub runtime: Option<Runtime>,
    pub genres: Option<Vec<String>>,
}

impl CreateMovie {
    /// Build an unsaved movie. `id`, `created_at`, and `version` are assigned
    /// by the store on insert.
    pub fn into_movie(self) -> Movie {
        Movie {
            id: 0,
            created_at: chrono::Utc::now(),
            title: self.title,
            year: self.year,
            runtime: self.runtime,
            genres: self.genres,
            version: 0,
        }
    }
}

impl UpdateMovie {
    /// Overlay the supplied fields onto `movie`.
    pub fn apply_to(self, movie: &mut Movie) {
        if let Some(title) = self.title {
            movie.title = title;
        }
        if let Some(year) = self.year {
            movie.year = year;
        }
        if let Some(runtime) = self.runtime {
            movie.runtime = runtime;
        }
        if let Some(genres) = self.genres {
            movie.genres = genres;
        }
    }
}

/// Check every movie field invariant against the current calendar year.
pub fn validate_movie(v: &mut Validator, movie: &Movie) {
    validate_movie_at(v, movie, chrono::Utc::now().year());
}

/// Check every movie field invariant. All checks run so that simultaneous
/// violations on different fields are all reported.
pub fn validate_movie_at(v: &mut Validator, movie: &Movie, current_year: i32) {
    v.check(!movie.title.is_empty(), "title", "must be provided");
    v.check(
        movie.title.len() <= MAX_TITLE_BYTES,
        "title",
        "must not be more than 500 bytes long",
    );

    v.check(movie.year != 0, "year", "must be provided");
    v.check(movie.year >= MIN_YEAR, "year", "must be greater than 1888");
    v.check(movie.year <= current_year, "year", "must not be in the future");

    v.check(movie.runtime.minutes() != 0, "runtime", "must be provided");
    v.check(
        movie.runtime.minutes() > 0,
        "runtime",
        "must be a positive integer",
    );

    v.check(
        !movie.genres.is_empty(),
        "genres",
        "must contain at least 1 genre",
    );
    v.check(
        movie.genres.len() <= MAX_GENRES,
        "genres",
        "must not contain more than 5 genres",
    );
    v.check(
        unique(&movie.genres),
        "genres",
        "must not contain duplicate values",
    );
}
