// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Timestamp precision and epoch conversions.
//!
//! Column timestamps are read as [`SystemTime`], reduced to epoch
//! milliseconds, then converted into the precision declared on the
//! measurement. Conversion follows the usual "convert from milliseconds"
//! rules: coarser units truncate toward zero, finer units multiply and
//! saturate at the `i64` bounds.

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// Precision of a point timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TimeUnit {
    Nanoseconds,
    Microseconds,
    #[default]
    Milliseconds,
    Seconds,
    Minutes,
    Hours,
}

impl TimeUnit {
    /// Convert a count of epoch milliseconds into this unit.
    #[must_use]
    pub const fn from_millis(self, millis: i64) -> i64 {
        match self {
            TimeUnit::Nanoseconds => millis.saturating_mul(1_000_000),
            TimeUnit::Microseconds => millis.saturating_mul(1_000),
            TimeUnit::Milliseconds => millis,
            TimeUnit::Seconds => millis / 1_000,
            TimeUnit::Minutes => millis / 60_000,
            TimeUnit::Hours => millis / 3_600_000,
        }
    }

    /// Duration-literal suffix used when a timestamp appears in InfluxQL.
    #[must_use]
    pub const fn query_suffix(self) -> &'static str {
        match self {
            TimeUnit::Nanoseconds => "ns",
            TimeUnit::Microseconds => "u",
            TimeUnit::Milliseconds => "ms",
            TimeUnit::Seconds => "s",
            TimeUnit::Minutes => "m",
            TimeUnit::Hours => "h",
        }
    }

    /// Value of the `precision` parameter for line-protocol writes.
    #[must_use]
    pub const fn write_precision(self) -> &'static str {
        match self {
            TimeUnit::Nanoseconds => "n",
            other => other.query_suffix(),
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            TimeUnit::Nanoseconds => "nanoseconds",
            TimeUnit::Microseconds => "microseconds",
            TimeUnit::Milliseconds => "milliseconds",
            TimeUnit::Seconds => "seconds",
            TimeUnit::Minutes => "minutes",
            TimeUnit::Hours => "hours",
        }
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Milliseconds since the Unix epoch, floored for instants before it.
#[must_use]
pub fn epoch_millis(time: SystemTime) -> i64 {
    match time.duration_since(UNIX_EPOCH) {
        Ok(after) => i64::try_from(after.as_millis()).unwrap_or(i64::MAX),
        Err(err) => {
            let before = err.duration();
            let whole = i64::try_from(before.as_millis()).unwrap_or(i64::MAX);
            if before.subsec_nanos() % 1_000_000 == 0 {
                -whole
            } else {
                -whole - 1
            }
        }
    }
}

/// Current wall-clock time as epoch milliseconds.
#[must_use]
pub fn now_millis() -> i64 {
    epoch_millis(SystemTime::now())
}
