//! Movie runtime in minutes, rendered on the wire as `"<n> mins"`.

use std::fmt;
use std::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Unit suffix of the wire format.
const UNIT: &str = "mins";

/// Returned for any runtime value that is not exactly `"<n> mins"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("invalid runtime format")]
pub struct InvalidRuntimeFormat;

/// Runtime of a movie in whole minutes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Runtime(pub i32);

impl Runtime {
    pub fn minutes(self) -> i32 {
        self.0
    }
}

impl From<i32> for Runtime {
    fn from(minutes: i32) -> Self {
        Runtime(minutes)
    }
}

impl fmt::Display for Runtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {UNIT}", self.0)
    }
}

impl FromStr for Runtime {
    type Err = InvalidRuntimeFormat;

    /// Accepts only the canonical form produced by `Display`: no sign
    /// prefix, no leading zeros, exactly one space before `mins`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(' ').collect();
        let [number, unit] = parts.as_slice() else {
            return Err(InvalidRuntimeFormat);
        };
        if *unit != UNIT {
            return Err(InvalidRuntimeFormat);
        }

        let minutes: i32 = number.parse().map_err(|_| InvalidRuntimeFormat)?;
        if minutes.to_string() != *number {
            return Err(InvalidRuntimeFormat);
        }

        Ok(Runtime(minutes))
    }
}

impl Serialize for Runtime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Runtime {
    /// Any JSON value other than a well-formed string, including numbers,
    /// is reported as [`InvalidRuntimeFormat`].
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match serde_json::Value::deserialize(deserializer)? {
            serde_json::Value::String(s) => s.parse().map_err(D::Error::custom),
            _ => Err(D::Error::custom(InvalidRuntimeFormat)),
        }
    }
}
