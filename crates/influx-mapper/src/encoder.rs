// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Domain instance to [`Point`] encoding.
//!
//! Each bound column takes one of three roles:
//! - tag: the value's string form, whatever its type (tags are strings)
//! - time: the column whose wire name is the reserved time name; its
//!   `SystemTime` value becomes the point timestamp
//! - field: a typed value from the closed set bool / i64 / f64 / i32 / String
//!
//! A nullable column with no value is skipped before its role is looked at.

use crate::cache::ColumnBindings;
use crate::config::DEFAULT_TIME_COLUMN;
use crate::error::{MapperError, Result};
use crate::measurement::{ColumnDescriptor, Measurement};
use crate::point::{FieldValue, Point, PointBuilder};
use crate::resolver;
use crate::time::{epoch_millis, now_millis, TimeUnit};
use crate::value::{ColumnValue, FieldAccessError};

/// What to put in an encoded point besides tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeOptions {
    /// Stamp the point with the current time before reading columns.
    pub set_default_time: bool,
    /// Encode field columns. Without them the point only serves tag queries.
    pub include_fields: bool,
}

impl EncodeOptions {
    /// Full point for a write.
    pub const WRITE: Self = Self {
        set_default_time: true,
        include_fields: true,
    };

    /// Tags (and an explicit time column, if set) for delete statements.
    pub const TAGS_ONLY: Self = Self {
        set_default_time: false,
        include_fields: false,
    };
}

/// Encodes instances using cached [`ColumnBindings`].
#[derive(Debug, Clone)]
pub struct PointEncoder {
    time_column: String,
}

impl Default for PointEncoder {
    fn default() -> Self {
        Self::new(DEFAULT_TIME_COLUMN)
    }
}

impl PointEncoder {
    /// Encoder treating `time_column` as the reserved time name.
    pub fn new(time_column: impl Into<String>) -> Self {
        Self {
            time_column: time_column.into(),
        }
    }

    pub fn time_column(&self) -> &str {
        &self.time_column
    }

    /// Encode `model` into a point.
    pub fn encode<T: Measurement>(
        &self,
        model: &T,
        bindings: &ColumnBindings,
        options: EncodeOptions,
    ) -> Result<Point> {
        let measurement = resolver::measurement_name::<T>()?;
        let time_unit = resolver::time_unit::<T>()?;
        let mut builder = Point::measurement(measurement);

        if options.set_default_time {
            builder.set_time(time_unit.from_millis(now_millis()), time_unit);
        }

        for column in bindings.iter() {
            let value = model.read_field(column.field)?;
            self.encode_column(&mut builder, column, value, time_unit, options)?;
        }

        Ok(builder.build(options.include_fields)?)
    }

    fn encode_column(
        &self,
        builder: &mut PointBuilder,
        column: &ColumnDescriptor,
        value: Option<ColumnValue>,
        time_unit: TimeUnit,
        options: EncodeOptions,
    ) -> Result<()> {
        if column.nullable && value.is_none() {
            log::trace!("[encoder] skipping absent nullable column '{}'", column.name);
            return Ok(());
        }

        if column.tag {
            let value = value.ok_or_else(|| absent(column))?;
            builder.insert_tag(column.name, value.to_string());
        } else if column.name == self.time_column {
            if let Some(value) = value {
                set_time(builder, column, value, time_unit)?;
            }
        } else if options.include_fields {
            let value = value.ok_or_else(|| absent(column))?;
            builder.insert_field(column.name, field_value(column, value)?);
        }
        Ok(())
    }
}

fn absent(column: &ColumnDescriptor) -> MapperError {
    FieldAccessError::Absent {
        column: column.name.to_string(),
    }
    .into()
}

fn set_time(
    builder: &mut PointBuilder,
    column: &ColumnDescriptor,
    value: ColumnValue,
    time_unit: TimeUnit,
) -> Result<()> {
    match value {
        ColumnValue::Timestamp(instant) => {
            builder.set_time(time_unit.from_millis(epoch_millis(instant)), time_unit);
            Ok(())
        }
        other => Err(unsupported(column, &other)),
    }
}

fn field_value(column: &ColumnDescriptor, value: ColumnValue) -> Result<FieldValue> {
    match value {
        ColumnValue::Boolean(v) => Ok(FieldValue::from(v)),
        ColumnValue::Int64(v) => Ok(FieldValue::from(v)),
        ColumnValue::Float64(v) => Ok(FieldValue::from(v)),
        ColumnValue::Int32(v) => Ok(FieldValue::from(v)),
        ColumnValue::Text(v) => Ok(FieldValue::from(v)),
        other @ (ColumnValue::Timestamp(_) | ColumnValue::Other { .. }) => {
            Err(unsupported(column, &other))
        }
    }
}

fn unsupported(column: &ColumnDescriptor, value: &ColumnValue) -> MapperError {
    MapperError::UnsupportedType {
        column: column.name.to_string(),
        type_name: value.type_name(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measurement::MeasurementDescriptor;
    use std::time::{Duration, SystemTime, UNIX_EPOCH};

    /// Hand-written impl, so these tests do not depend on the derive.
    struct Reading {
        time: Option<SystemTime>,
        sensor: String,
        port: u16,
        value: Option<f64>,
        count: i32,
    }

    impl Measurement for Reading {
        fn descriptor() -> Option<&'static MeasurementDescriptor> {
            static DESCRIPTOR: MeasurementDescriptor = MeasurementDescriptor {
                name: "reading",
                database: None,
                retention_policy: None,
                time_unit: TimeUnit::Seconds,
            };
            Some(&DESCRIPTOR)
        }

        fn columns() -> &'static [ColumnDescriptor] {
            &[
                ColumnDescriptor {
                    name: "time",
                    field: "time",
                    tag: false,
                    nullable: false,
                },
                ColumnDescriptor {
                    name: "sensor",
                    field: "sensor",
                    tag: true,
                    nullable: false,
                },
                ColumnDescriptor {
                    name: "port",
                    field: "port",
                    tag: true,
                    nullable: false,
                },
                ColumnDescriptor {
                    name: "value",
                    field: "value",
                    tag: false,
                    nullable: true,
                },
                ColumnDescriptor {
                    name: "count",
                    field: "count",
                    tag: false,
                    nullable: false,
                },
            ]
        }

        fn read_field(
            &self,
            field: &str,
        ) -> std::result::Result<Option<ColumnValue>, FieldAccessError> {
            Ok(match field {
                "time" => self.time.map(ColumnValue::from),
                "sensor" => Some(ColumnValue::from(self.sensor.clone())),
                "port" => Some(ColumnValue::Other {
                    type_name: "u16",
                    text: self.port.to_string(),
                }),
                "value" => self.value.map(ColumnValue::from),
                "count" => Some(ColumnValue::from(self.count)),
                other => {
                    return Err(FieldAccessError::UnknownField {
                        type_name: "Reading",
                        field: other.to_string(),
                    })
                }
            })
        }
    }

    fn reading() -> Reading {
        Reading {
            time: Some(UNIX_EPOCH + Duration::from_millis(90_500)),
            sensor: "s-1".to_string(),
            port: 8080,
            value: Some(21.5),
            count: 3,
        }
    }

    fn encode(model: &Reading, options: EncodeOptions) -> Result<Point> {
        let bindings = ColumnBindings::scan::<Reading>();
        PointEncoder::default().encode(model, &bindings, options)
    }

    #[test]
    fn test_encode_full_point() {
        let point = encode(&reading(), EncodeOptions::WRITE).expect("encode");

        assert_eq!(point.measurement_name(), "reading");
        assert_eq!(point.time(), Some((90, TimeUnit::Seconds)));
        assert_eq!(point.tag("sensor"), Some("s-1"));
        assert_eq!(point.tag("port"), Some("8080"));
        assert_eq!(point.field("value"), Some(&FieldValue::Float(21.5)));
        assert_eq!(point.field("count"), Some(&FieldValue::Integer(3)));
        assert!(point.field("time").is_none());
    }

    #[test]
    fn test_nullable_absent_column_is_skipped() {
        let mut model = reading();
        model.value = None;

        let point = encode(&model, EncodeOptions::WRITE).expect("encode");
        assert!(point.field("value").is_none());
        assert_eq!(point.fields().len(), 1);
    }

    #[test]
    fn test_default_time_applies_without_time_column() {
        let mut model = reading();
        model.time = None;

        let before = TimeUnit::Seconds.from_millis(now_millis());
        let point = encode(&model, EncodeOptions::WRITE).expect("encode");
        let after = TimeUnit::Seconds.from_millis(now_millis());

        let (timestamp, unit) = point.time().expect("default time");
        assert_eq!(unit, TimeUnit::Seconds);
        assert!(before <= timestamp && timestamp <= after);
    }

    #[test]
    fn test_no_time_without_default_or_column() {
        let mut model = reading();
        model.time = None;

        let point = encode(&model, EncodeOptions::TAGS_ONLY).expect("encode");
        assert!(point.time().is_none());
        assert!(point.fields().is_empty());
        assert_eq!(point.tags().len(), 2);
    }

    #[test]
    fn test_time_column_overrides_default_time() {
        let point = encode(&reading(), EncodeOptions::WRITE).expect("encode");
        assert_eq!(point.time(), Some((90, TimeUnit::Seconds)));
    }

    #[test]
    fn test_tags_only_keeps_explicit_time() {
        let point = encode(&reading(), EncodeOptions::TAGS_ONLY).expect("encode");
        assert_eq!(point.time(), Some((90, TimeUnit::Seconds)));
        assert!(point.fields().is_empty());
    }

    #[test]
    fn test_custom_time_column_name() {
        let bindings = ColumnBindings::scan::<Reading>();
        let encoder = PointEncoder::new("ts");

        let err = encoder
            .encode(&reading(), &bindings, EncodeOptions::WRITE)
            .unwrap_err();
        // "time" is now an ordinary field holding a SystemTime.
        assert!(matches!(
            err,
            MapperError::UnsupportedType { ref column, type_name: "SystemTime" } if column == "time"
        ));
    }

    #[test]
    fn test_unsupported_field_type_is_rejected() {
        let column = ColumnDescriptor {
            name: "port",
            field: "port",
            tag: false,
            nullable: false,
        };
        let value = ColumnValue::Other {
            type_name: "u16",
            text: "1".to_string(),
        };

        let err = field_value(&column, value).unwrap_err();
        assert_eq!(err.to_string(), "unsupported type u16 for column port");
    }

    #[test]
    fn test_non_timestamp_time_column_is_rejected() {
        let column = ColumnDescriptor {
            name: "time",
            field: "time",
            tag: false,
            nullable: false,
        };
        let mut builder = Point::measurement("m");

        let err = set_time(&mut builder, &column, ColumnValue::Int64(5), TimeUnit::Seconds)
            .unwrap_err();
        assert!(matches!(err, MapperError::UnsupportedType { type_name: "i64", .. }));
    }

    #[test]
    fn test_absent_non_nullable_field_is_an_access_error() {
        let column = ColumnDescriptor {
            name: "count",
            field: "count",
            tag: false,
            nullable: false,
        };
        let mut builder = Point::measurement("m");

        let err = PointEncoder::default()
            .encode_column(&mut builder, &column, None, TimeUnit::Seconds, EncodeOptions::WRITE)
            .unwrap_err();
        assert!(matches!(
            err,
            MapperError::FieldAccess(FieldAccessError::Absent { ref column }) if column == "count"
        ));

        // Skipped entirely when fields are not requested.
        PointEncoder::default()
            .encode_column(&mut builder, &column, None, TimeUnit::Seconds, EncodeOptions::TAGS_ONLY)
            .expect("fields are not read for tag-only points");
    }
}
