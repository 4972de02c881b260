// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Runtime column values read from domain instances.

use std::fmt;
use std::time::SystemTime;

use chrono::{DateTime, SecondsFormat, Utc};
use thiserror::Error;

/// Value of one declared column, as exposed by [`Measurement::read_field`].
///
/// The first six variants are the types the mapper knows how to put on the
/// wire. `Other` carries any other declared type in its display form; such
/// values can be written as tags but never as fields or timestamps.
///
/// [`Measurement::read_field`]: crate::Measurement::read_field
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnValue {
    Boolean(bool),
    Int64(i64),
    Float64(f64),
    Int32(i32),
    Text(String),
    Timestamp(SystemTime),
    Other {
        /// Declared Rust type, as written on the struct field.
        type_name: &'static str,
        /// `Display` rendering of the value.
        text: String,
    },
}

impl ColumnValue {
    /// Name of the declared type behind this value.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            ColumnValue::Boolean(_) => "bool",
            ColumnValue::Int64(_) => "i64",
            ColumnValue::Float64(_) => "f64",
            ColumnValue::Int32(_) => "i32",
            ColumnValue::Text(_) => "String",
            ColumnValue::Timestamp(_) => "SystemTime",
            ColumnValue::Other { type_name, .. } => type_name,
        }
    }
}

/// String form used for tag values.
///
/// Timestamps render as UTC ISO-8601 (`2024-05-01T12:00:00.250Z`), with 0, 3,
/// 6 or 9 fractional digits as needed.
impl fmt::Display for ColumnValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnValue::Boolean(v) => write!(f, "{}", v),
            ColumnValue::Int64(v) => write!(f, "{}", v),
            ColumnValue::Float64(v) => write!(f, "{}", v),
            ColumnValue::Int32(v) => write!(f, "{}", v),
            ColumnValue::Text(v) => f.write_str(v),
            ColumnValue::Timestamp(t) => f.write_str(
                &DateTime::<Utc>::from(*t).to_rfc3339_opts(SecondsFormat::AutoSi, true),
            ),
            ColumnValue::Other { text, .. } => f.write_str(text),
        }
    }
}

impl From<bool> for ColumnValue {
    fn from(v: bool) -> Self {
        ColumnValue::Boolean(v)
    }
}

impl From<i64> for ColumnValue {
    fn from(v: i64) -> Self {
        ColumnValue::Int64(v)
    }
}

impl From<f64> for ColumnValue {
    fn from(v: f64) -> Self {
        ColumnValue::Float64(v)
    }
}

impl From<i32> for ColumnValue {
    fn from(v: i32) -> Self {
        ColumnValue::Int32(v)
    }
}

impl From<String> for ColumnValue {
    fn from(v: String) -> Self {
        ColumnValue::Text(v)
    }
}

impl From<&str> for ColumnValue {
    fn from(v: &str) -> Self {
        ColumnValue::Text(v.to_string())
    }
}

impl From<SystemTime> for ColumnValue {
    fn from(v: SystemTime) -> Self {
        ColumnValue::Timestamp(v)
    }
}

/// Failure to read a column value from an instance.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldAccessError {
    /// The binding names a field the type does not expose.
    #[error("type {type_name} has no readable field `{field}`")]
    UnknownField {
        type_name: &'static str,
        field: String,
    },
    /// A column that is not nullable holds no value.
    #[error("column `{column}` is not nullable but has no value")]
    Absent { column: String },
}
