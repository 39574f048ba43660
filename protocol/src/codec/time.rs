//! # Points in Time
//!
//! The ledger stores timestamps as unsigned 32-bit seconds since the Unix
//! epoch and speaks them in JSON as `YYYY-MM-DDTHH:MM:SS` without a zone
//! suffix (always UTC). Anything finer than a second is dropped on the way
//! in, so a value only round-trips to second precision.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::error::CodecError;
use super::Encode;

const ISO_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// UTC instant with whole-second precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PointInTime(u32);

impl PointInTime {
    /// Wrap raw epoch seconds.
    pub const fn from_secs(secs: u32) -> Self {
        Self(secs)
    }

    /// Build from a signed Unix timestamp, rejecting anything outside `u32`.
    pub fn from_timestamp(secs: i64) -> Result<Self, CodecError> {
        super::checked_u32(secs).map(Self)
    }

    /// The current wall-clock time, truncated to the second.
    pub fn now() -> Result<Self, CodecError> {
        Self::from_timestamp(Utc::now().timestamp())
    }

    pub const fn as_secs(&self) -> u32 {
        self.0
    }

    /// Shift forward by `secs`, failing instead of wrapping past 2106.
    pub fn checked_add_secs(&self, secs: u32) -> Result<Self, CodecError> {
        self.0
            .checked_add(secs)
            .map(Self)
            .ok_or(CodecError::Overflow {
                value: i128::from(self.0) + i128::from(secs),
                width: "u32",
            })
    }
}

impl FromStr for PointInTime {
    type Err = CodecError;

    /// Accepts `YYYY-MM-DDTHH:MM:SS`, optionally followed by fractional
    /// seconds and/or a `Z`. Fractions are discarded.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().trim_end_matches('Z');
        let whole = match trimmed.split_once('.') {
            Some((whole, fraction)) if fraction.chars().all(|c| c.is_ascii_digit()) => whole,
            Some(_) => {
                return Err(CodecError::InvalidTimestamp(
                    s.to_string(),
                    "malformed fractional seconds".to_string(),
                ))
            }
            None => trimmed,
        };
        let parsed = NaiveDateTime::parse_from_str(whole, ISO_FORMAT)
            .map_err(|e| CodecError::InvalidTimestamp(s.to_string(), e.to_string()))?;
        Self::from_timestamp(parsed.and_utc().timestamp())
    }
}

impl fmt::Display for PointInTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match DateTime::<Utc>::from_timestamp(i64::from(self.0), 0) {
            Some(dt) => write!(f, "{}", dt.format(ISO_FORMAT)),
            // Unreachable for a u32, but never panic in Display.
            None => write!(f, "@{}", self.0),
        }
    }
}

impl Encode for PointInTime {
    fn encode(&self, out: &mut Vec<u8>) {
        self.0.encode(out);
    }
}

impl Serialize for PointInTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PointInTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
