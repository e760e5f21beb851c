//! Query-string parsing for list endpoints.
//!
//! Parsing is deliberately lenient: a missing or malformed value falls back
//! to its default instead of failing the request. Range and safelist checks
//! happen afterwards in `cinedex_core::filters::validate_filters`.

use std::collections::HashMap;

use cinedex_core::filters::{
    Filters, DEFAULT_PAGE, DEFAULT_PAGE_SIZE, DEFAULT_SORT, MOVIE_SORT_SAFELIST,
};
use cinedex_core::store::MovieQuery;

/// Raw `?key=value` pairs as extracted by `Query<QueryParams>`.
pub type QueryParams = HashMap<String, String>;

/// The value for `key`, or `default` when absent.
pub fn read_string(params: &QueryParams, key: &str, default: &str) -> String {
    params
        .get(key)
        .map_or_else(|| default.to_string(), Clone::clone)
}

/// Comma-separated values for `key` with empty segments dropped, or
/// `default` when absent or empty.
pub fn read_csv(params: &QueryParams, key: &str, default: Vec<String>) -> Vec<String> {
    match params.get(key) {
        Some(raw) if !raw.is_empty() => raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        _ => default,
    }
}

/// Integer value for `key`, or `default` when absent or not an integer.
pub fn read_int(params: &QueryParams, key: &str, default: i64) -> i64 {
    params
        .get(key)
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(default)
}

/// Build the movie list query from `?title=&genres=&page=&page_size=&sort=`.
pub fn movie_query(params: &QueryParams) -> MovieQuery {
    MovieQuery {
        title: read_string(params, "title", ""),
        genres: read_csv(params, "genres", Vec::new()),
        filters: Filters {
            page: read_int(params, "page", DEFAULT_PAGE),
            page_size: read_int(params, "page_size", DEFAULT_PAGE_SIZE),
            sort: read_string(params, "sort", DEFAULT_SORT),
            sort_safelist: MOVIE_SORT_SAFELIST,
        },
    }
}
