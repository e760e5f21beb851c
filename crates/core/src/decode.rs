//! Strict JSON request-body decoding.
//!
//! [`decode_strict`] accepts exactly one JSON object and turns every serde
//! failure it can recognise into a [`DecodeError`] whose `Display` is safe to
//! send back to the client verbatim. Destination types are expected to carry
//! `#[serde(deny_unknown_fields)]`; the decoder reports those rejections as
//! [`DecodeError::UnknownKey`].

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::error::Category;

use crate::runtime::InvalidRuntimeFormat;

/// Upper bound on request body size (1 MiB).
pub const MAX_BODY_BYTES: usize = 1_048_576;

/// A classified request-body decoding failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("body must not be empty")]
    Empty,

    #[error("body must not be larger than {limit} bytes")]
    TooLarge { limit: usize },

    #[error("body contains badly formatted JSON (at character {offset})")]
    Syntax { offset: usize },

    #[error("body contains badly-formed JSON")]
    UnexpectedEof,

    #[error("body contains incorrect JSON type for field \"{field}\"")]
    IncorrectFieldType { field: String },

    #[error("body contains incorrect JSON type (at character {offset})")]
    IncorrectType { offset: usize },

    #[error("body contains unknown key \"{0}\"")]
    UnknownKey(String),

    #[error("body must contain a single JSON value")]
    TrailingData,

    #[error("invalid runtime format")]
    InvalidRuntimeFormat,

    /// Anything serde reported that has no dedicated classification.
    #[error("{0}")]
    Other(String),
}

impl From<InvalidRuntimeFormat> for DecodeError {
    fn from(_: InvalidRuntimeFormat) -> Self {
        DecodeError::InvalidRuntimeFormat
    }
}

/// Decode `body` into `T`, rejecting oversized, empty, malformed,
/// mistyped, multi-value and unknown-key input.
///
/// The top-level value must be an object. Derived struct deserializers also
/// accept arrays (fields by position), so anything else is rejected before
/// the typed decode runs.
///
/// # Panics
///
/// Panics if serde_json reports an I/O failure, which cannot happen when
/// reading from an in-memory slice and indicates a broken decode target.
pub fn decode_strict<T: DeserializeOwned>(body: &[u8]) -> Result<T, DecodeError> {
    if body.len() > MAX_BODY_BYTES {
        return Err(DecodeError::TooLarge {
            limit: MAX_BODY_BYTES,
        });
    }
    let Some(start) = body.iter().position(|b| !b.is_ascii_whitespace()) else {
        return Err(DecodeError::Empty);
    };
    if body[start] != b'{' {
        return Err(reject_non_object(body, start));
    }

    let mut de = serde_json::Deserializer::from_slice(body);
    let value: T = serde_path_to_error::deserialize(&mut de).map_err(|err| {
        let field = field_name(err.path());
        classify(body, err.into_inner(), field)
    })?;

    de.end().map_err(|_| DecodeError::TrailingData)?;

    Ok(value)
}

/// Classify a body whose first token is not `{`. Malformed or multi-value
/// input keeps its usual classification; a well-formed non-object is a
/// wrong-type error at the value's first character.
fn reject_non_object(body: &[u8], start: usize) -> DecodeError {
    let mut de = serde_json::Deserializer::from_slice(body);
    if let Err(err) = serde::de::IgnoredAny::deserialize(&mut de) {
        return classify(body, err, None);
    }
    if de.end().is_err() {
        return DecodeError::TrailingData;
    }
    DecodeError::IncorrectType { offset: start + 1 }
}

fn classify(body: &[u8], err: serde_json::Error, field: Option<String>) -> DecodeError {
    match err.classify() {
        Category::Syntax => DecodeError::Syntax {
            offset: byte_offset(body, err.line(), err.column()),
        },
        Category::Eof => DecodeError::UnexpectedEof,
        Category::Data => {
            let message = strip_position(&err);
            if message == InvalidRuntimeFormat.to_string() {
                return DecodeError::InvalidRuntimeFormat;
            }
            if let Some(name) = unknown_field(&message) {
                return DecodeError::UnknownKey(name.to_string());
            }
            if ["invalid type:", "invalid value:", "invalid length"]
                .iter()
                .any(|prefix| message.starts_with(prefix))
            {
                return match field {
                    Some(field) => DecodeError::IncorrectFieldType { field },
                    None => DecodeError::IncorrectType {
                        offset: byte_offset(body, err.line(), err.column()),
                    },
                };
            }
            DecodeError::Other(message)
        }
        Category::Io => panic!("invalid JSON decode target: {err}"),
    }
}

/// Dotted chain of object keys leading to the failing value. Array indices
/// are dropped so `genres[2]` reports as `genres`.
fn field_name(path: &serde_path_to_error::Path) -> Option<String> {
    let keys: Vec<&str> = path
        .iter()
        .filter_map(|segment| match segment {
            serde_path_to_error::Segment::Map { key } => Some(key.as_str()),
            _ => None,
        })
        .collect();

    if keys.is_empty() {
        None
    } else {
        Some(keys.join("."))
    }
}

/// `unknown field `name`, expected ...` -> `name`
fn unknown_field(message: &str) -> Option<&str> {
    let rest = message.strip_prefix("unknown field `")?;
    rest.split('`').next()
}

/// serde_json appends ` at line L column C` to its messages; the position is
/// reported separately, so drop it.
fn strip_position(err: &serde_json::Error) -> String {
    let message = err.to_string();
    let suffix = format!(" at line {} column {}", err.line(), err.column());
    match message.strip_suffix(&suffix) {
        Some(stripped) => stripped.to_string(),
        None => message,
    }
}

/// Convert serde_json's 1-based line/column into a byte offset into `body`.
fn byte_offset(body: &[u8], line: usize, column: usize) -> usize {
    let preceding: usize = body
        .split(|b| *b == b'\n')
        .take(line.saturating_sub(1))
        .map(|l| l.len() + 1)
        .sum();
    preceding + column
}
