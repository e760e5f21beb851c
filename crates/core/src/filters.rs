//! Pagination, sorting, and list metadata for movie listings.

use serde::Serialize;

use crate::error::CoreError;
use crate::validator::{permitted_value, Validator};

/// Default page when the query string omits or mangles `page`.
pub const DEFAULT_PAGE: i64 = 1;

/// Default page size when the query string omits or mangles `page_size`.
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Upper bound on `page`.
pub const MAX_PAGE: i64 = 10_000_000;

/// Upper bound on `page_size`.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Default sort key.
pub const DEFAULT_SORT: &str = "id";

/// Sort keys accepted for movie listings. A leading `-` sorts descending.
pub const MOVIE_SORT_SAFELIST: &[&str] = &[
    "id", "title", "year", "runtime", "-id", "-title", "-year", "-runtime",
];

/// Client-supplied paging and ordering for a list query.
///
/// `sort` flows into an `ORDER BY` clause, so it must pass
/// [`validate_filters`] (and is re-checked by [`Filters::sort_column`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filters {
    pub page: i64,
    pub page_size: i64,
    pub sort: String,
    pub sort_safelist: &'static [&'static str],
}

impl Default for Filters {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
            sort: DEFAULT_SORT.to_string(),
            sort_safelist: MOVIE_SORT_SAFELIST,
        }
    }
}

impl Filters {
    /// Column name for the `ORDER BY` clause, without the direction prefix.
    ///
    /// Fails closed: a sort value outside the safelist is an internal error
    /// rather than something that reaches SQL.
    pub fn sort_column(&self) -> Result<&str, CoreError> {
        if !permitted_value(&self.sort.as_str(), self.sort_safelist) {
            return Err(CoreError::Internal(format!(
                "unsafe sort parameter: {}",
                self.sort
            )));
        }
        Ok(self.sort.trim_start_matches('-'))
    }

    /// `"DESC"` for `-`-prefixed sort keys, otherwise `"ASC"`.
    pub fn sort_direction(&self) -> &'static str {
        if self.sort.starts_with('-') {
            "DESC"
        } else {
            "ASC"
        }
    }

    pub fn descending(&self) -> bool {
        self.sort.starts_with('-')
    }

    pub fn limit(&self) -> i64 {
        self.page_size
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.page_size
    }
}

/// Check page bounds and sort-key membership.
pub fn validate_filters(v: &mut Validator, filters: &Filters) {
    v.check(filters.page > 0, "page", "must be greater than zero");
    v.check(
        filters.page <= MAX_PAGE,
        "page",
        "must be a maximum of 10 million",
    );
    v.check(filters.page_size > 0, "page_size", "must be greater than zero");
    v.check(
        filters.page_size <= MAX_PAGE_SIZE,
        "page_size",
        "must be a maximum of 100",
    );
    v.check(
        permitted_value(&filters.sort.as_str(), filters.sort_safelist),
        "sort",
        "invalid sort value",
    );
}

/// Pagination summary returned alongside list results. All zero when the
/// query matched nothing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Metadata {
    pub current_page: i64,
    pub page_size: i64,
    pub first_page: i64,
    pub last_page: i64,
    pub total_records: i64,
}

impl Metadata {
    pub fn calculate(total_records: i64, page: i64, page_size: i64) -> Self {
        if total_records == 0 {
            return Self::default();
        }

        Self {
            current_page: page,
            page_size,
            first_page: 1,
            last_page: (total_records + page_size - 1) / page_size,
            total_records,
        }
    }
}
