//! Lenient JSON scalars.
//!
//! Nodes are inconsistent about how they print numbers and flags: 64-bit
//! values come back as strings once they outgrow a JavaScript number, and
//! booleans sometimes arrive as `0`/`1`. These helpers accept every shape we
//! have seen and nothing else.

use std::fmt;
use std::str::FromStr;

use serde::de;
use serde::{Deserialize, Deserializer};

/// Accept an integer either as a JSON number or as a numeric string.
pub(crate) fn int_or_string<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr + Deserialize<'de>,
    T::Err: fmt::Display,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw<T> {
        Int(T),
        Str(String),
    }

    match Raw::<T>::deserialize(deserializer)? {
        Raw::Int(value) => Ok(value),
        Raw::Str(s) => s.trim().parse().map_err(de::Error::custom),
    }
}

/// Accept `true`/`false` or `0`/`1`.
pub(crate) fn bool_or_int<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Bool(bool),
        Int(u64),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Bool(flag) => Ok(flag),
        Raw::Int(0) => Ok(false),
        Raw::Int(1) => Ok(true),
        Raw::Int(other) => Err(de::Error::custom(format!(
            "expected a boolean or 0/1, got {other}"
        ))),
    }
}
