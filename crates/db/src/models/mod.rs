//! Database row structs.
//!
//! Rows are converted into the domain types from `cinedex_core` at the
//! repository boundary.

pub mod movie;
