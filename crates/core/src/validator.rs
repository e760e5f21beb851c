//! Field-keyed error accumulator.
//!
//! A [`Validator`] is created per request, threaded by `&mut` through the
//! validation functions in [`crate::movie`] and [`crate::filters`], and then
//! either discarded (valid input) or turned into
//! [`CoreError::FailedValidation`].

use std::collections::BTreeMap;
use std::hash::Hash;

use crate::error::CoreError;

/// Validation failures keyed by field name, one message per field.
pub type FieldErrors = BTreeMap<String, String>;

/// Collects at most one error message per field key.
///
/// The first message recorded for a key wins; later failures for the same
/// key are ignored.
#[derive(Debug, Default, Clone)]
pub struct Validator {
    errors: FieldErrors,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// `true` when no errors have been recorded.
    pub fn valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Record `message` under `key` unless `key` already has an error.
    pub fn add_error(&mut self, key: &str, message: &str) {
        self.errors
            .entry(key.to_string())
            .or_insert_with(|| message.to_string());
    }

    /// Record `message` under `key` if `ok` is false.
    pub fn check(&mut self, ok: bool, key: &str, message: &str) {
        if !ok {
            self.add_error(key, message);
        }
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// Convert into `Ok(())` or a [`CoreError::FailedValidation`] carrying
    /// every recorded field error.
    pub fn into_result(self) -> Result<(), CoreError> {
        if self.valid() {
            Ok(())
        } else {
            Err(CoreError::FailedValidation(self.errors))
        }
    }
}

/// `true` if `value` is one of `permitted`.
pub fn permitted_value<T: PartialEq>(value: &T, permitted: &[T]) -> bool {
    permitted.iter().any(|p| p == value)
}

/// `true` if no two elements of `values` are equal.
pub fn unique<T: Eq + Hash>(values: &[T]) -> bool {
    let mut seen = std::collections::HashSet::with_capacity(values.len());
    values.iter().all(|v| seen.insert(v))
}
