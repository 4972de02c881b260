// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Points: one timestamped record of a measurement.
//!
//! A [`Point`] renders to InfluxDB Line Protocol for writes:
//! ```text
//! measurement,tag1=val1,tag2=val2 field1=val1,field2=val2 timestamp
//! ```
//! and to an InfluxQL `DELETE` statement scoped by its tags (and optionally
//! its timestamp) for deletes.
//!
//! See: <https://docs.influxdata.com/influxdb/v1/write_protocols/line_protocol_reference/>

use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

use crate::time::TimeUnit;

/// A value that can be stored in an InfluxDB field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// 64-bit floating point.
    Float(f64),
    /// 64-bit signed integer.
    Integer(i64),
    /// UTF-8 string.
    String(String),
    /// Boolean value.
    Boolean(bool),
}

impl FieldValue {
    /// Format this value for InfluxDB Line Protocol.
    ///
    /// - Float: written as-is (e.g., `3.14`)
    /// - Integer: suffixed with `i` (e.g., `42i`)
    /// - String: quoted with double quotes, inner quotes escaped (e.g., `"hello"`)
    /// - Boolean: `true` or `false`
    pub fn to_line_protocol(&self) -> String {
        match self {
            FieldValue::Float(v) => format!("{}", v),
            FieldValue::Integer(v) => format!("{}i", v),
            FieldValue::String(v) => {
                let escaped = v.replace('\\', "\\\\").replace('"', "\\\"");
                format!("\"{}\"", escaped)
            }
            FieldValue::Boolean(v) => v.to_string(),
        }
    }
}

impl FieldValue {
    /// Line Protocol has no spelling for NaN or infinities.
    pub fn is_writable(&self) -> bool {
        match self {
            FieldValue::Float(v) => v.is_finite(),
            _ => true,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_line_protocol())
    }
}

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self {
        FieldValue::Boolean(v)
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        FieldValue::Integer(v)
    }
}

impl From<i32> for FieldValue {
    fn from(v: i32) -> Self {
        FieldValue::Integer(i64::from(v))
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        FieldValue::Float(v)
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        FieldValue::String(v)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        FieldValue::String(v.to_string())
    }
}

/// Strict bound on time for delete statements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeRelation {
    /// `time > t`
    After,
    /// `time < t`
    Before,
}

impl TimeRelation {
    #[must_use]
    pub const fn operator(self) -> &'static str {
        match self {
            TimeRelation::After => ">",
            TimeRelation::Before => "<",
        }
    }
}

/// Reasons a point cannot be built or rendered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PointError {
    #[error("measurement name must not be empty")]
    EmptyMeasurement,
    /// Line Protocol requires at least one field.
    #[error("point for measurement '{0}' has no fields")]
    NoFields(String),
    /// A time-bounded delete was requested for a point without a timestamp.
    #[error("point for measurement '{0}' has no timestamp to bound the delete")]
    MissingTimestamp(String),
}

/// One timestamped record: measurement, tags, fields.
///
/// Tags and fields are kept sorted by key, so two points built from the
/// same values are equal and render identically.
#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    measurement: String,
    time: Option<(i64, TimeUnit)>,
    tags: BTreeMap<String, String>,
    fields: BTreeMap<String, FieldValue>,
}

impl Point {
    /// Start building a point for `measurement`.
    pub fn measurement(measurement: impl Into<String>) -> PointBuilder {
        PointBuilder {
            measurement: measurement.into(),
            time: None,
            tags: BTreeMap::new(),
            fields: BTreeMap::new(),
        }
    }

    pub fn measurement_name(&self) -> &str {
        &self.measurement
    }

    /// Timestamp and its precision, if one was assigned.
    pub fn time(&self) -> Option<(i64, TimeUnit)> {
        self.time
    }

    pub fn tags(&self) -> &BTreeMap<String, String> {
        &self.tags
    }

    pub fn tag(&self, name: &str) -> Option<&str> {
        self.tags.get(name).map(String::as_str)
    }

    pub fn fields(&self) -> &BTreeMap<String, FieldValue> {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// Render as a single Line Protocol line.
    ///
    /// The timestamp, when present, is written in the point's own precision;
    /// the writer must send the matching `precision` parameter
    /// (see [`TimeUnit::write_precision`]).
    pub fn to_line_protocol(&self) -> Result<String, PointError> {
        if self.fields.is_empty() {
            return Err(PointError::NoFields(self.measurement.clone()));
        }

        let mut line = escape_measurement(&self.measurement);

        for (key, value) in &self.tags {
            line.push(',');
            line.push_str(&escape_key(key));
            line.push('=');
            line.push_str(&escape_key(value));
        }

        line.push(' ');

        for (i, (key, value)) in self.fields.iter().enumerate() {
            if i > 0 {
                line.push(',');
            }
            line.push_str(&escape_key(key));
            line.push('=');
            line.push_str(&value.to_line_protocol());
        }

        if let Some((timestamp, _)) = self.time {
            line.push(' ');
            line.push_str(&timestamp.to_string());
        }

        Ok(line)
    }

    /// Render an InfluxQL statement deleting the series matching this
    /// point's tags, optionally bounded by its timestamp.
    ///
    /// ```text
    /// DELETE FROM "cpu" WHERE "host"='a' AND "region"='eu' AND time > 1500ms
    /// ```
    pub fn delete_query(&self, relation: Option<TimeRelation>) -> Result<String, PointError> {
        let mut conditions: Vec<String> = self
            .tags
            .iter()
            .map(|(key, value)| format!("{}={}", quote_identifier(key), quote_literal(value)))
            .collect();

        if let Some(relation) = relation {
            let (timestamp, unit) = self
                .time
                .ok_or_else(|| PointError::MissingTimestamp(self.measurement.clone()))?;
            conditions.push(format!(
                "time {} {}{}",
                relation.operator(),
                timestamp,
                unit.query_suffix()
            ));
        }

        let mut statement = format!("DELETE FROM {}", quote_identifier(&self.measurement));
        if !conditions.is_empty() {
            statement.push_str(" WHERE ");
            statement.push_str(&conditions.join(" AND "));
        }
        Ok(statement)
    }
}

/// Incremental construction of a [`Point`].
#[derive(Debug, Clone)]
pub struct PointBuilder {
    measurement: String,
    time: Option<(i64, TimeUnit)>,
    tags: BTreeMap<String, String>,
    fields: BTreeMap<String, FieldValue>,
}

impl PointBuilder {
    /// Set the timestamp, replacing any earlier one.
    #[must_use]
    pub fn time(mut self, timestamp: i64, unit: TimeUnit) -> Self {
        self.time = Some((timestamp, unit));
        self
    }

    /// Add a tag. Tags with an empty name or value are ignored.
    #[must_use]
    pub fn tag(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert_tag(name, value);
        self
    }

    /// Add a field. Non-finite floats are ignored.
    #[must_use]
    pub fn add_field(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert_field(name, value);
        self
    }

    /// In-place variants, for callers that build in a loop.
    pub fn set_time(&mut self, timestamp: i64, unit: TimeUnit) {
        self.time = Some((timestamp, unit));
    }

    pub fn insert_tag(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let (name, value) = (name.into(), value.into());
        if name.is_empty() || value.is_empty() {
            log::trace!("[point] dropping empty tag '{}' on {}", name, self.measurement);
            return;
        }
        self.tags.insert(name, value);
    }

    pub fn insert_field(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        let (name, value) = (name.into(), value.into());
        if !value.is_writable() {
            log::trace!("[point] dropping non-finite field '{}' on {}", name, self.measurement);
            return;
        }
        self.fields.insert(name, value);
    }

    /// Finish the point.
    ///
    /// With `include_fields == false` the field set is dropped and the point
    /// is only good for tag-scoped queries. Otherwise at least one field is
    /// required.
    pub fn build(self, include_fields: bool) -> Result<Point, PointError> {
        if self.measurement.is_empty() {
            return Err(PointError::EmptyMeasurement);
        }
        let fields = if include_fields {
            if self.fields.is_empty() {
                return Err(PointError::NoFields(self.measurement));
            }
            self.fields
        } else {
            BTreeMap::new()
        };
        Ok(Point {
            measurement: self.measurement,
            time: self.time,
            tags: self.tags,
            fields,
        })
    }
}

/// Escape measurement name per Line Protocol escaping rules.
/// Spaces and commas must be escaped with backslash.
fn escape_measurement(s: &str) -> String {
    s.replace(',', "\\,").replace(' ', "\\ ")
}

/// Escape tag keys, tag values and field keys per Line Protocol escaping rules.
/// Commas, equals signs, and spaces must be escaped.
fn escape_key(s: &str) -> String {
    s.replace(',', "\\,")
        .replace('=', "\\=")
        .replace(' ', "\\ ")
}

pub(crate) fn quote_identifier(s: &str) -> String {
    format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
}

fn quote_literal(s: &str) -> String {
    format!("'{}'", s.replace('\\', "\\\\").replace('\'', "\\'"))
}
