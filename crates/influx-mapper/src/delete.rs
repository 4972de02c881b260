// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Delete statements scoped by an instance's tags.

use crate::cache::ColumnBindings;
use crate::encoder::{EncodeOptions, PointEncoder};
use crate::error::Result;
use crate::measurement::Measurement;
use crate::point::TimeRelation;
use crate::query::Query;
use crate::resolver;

/// Build the `DELETE` query matching `model`'s tag values.
///
/// The instance is encoded tags-only: no default timestamp and no fields.
/// With a `relation`, the instance's own time column bounds the delete and
/// must be set.
pub fn build_delete_query<T: Measurement>(
    encoder: &PointEncoder,
    model: &T,
    bindings: &ColumnBindings,
    relation: Option<TimeRelation>,
) -> Result<Query> {
    let database = resolver::database_name::<T>()?;
    let point = encoder.encode(model, bindings, EncodeOptions::TAGS_ONLY)?;
    let command = point.delete_query(relation)?;

    Ok(match database {
        Some(database) => Query::with_database(command, database),
        None => Query::new(command),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MapperError;
    use crate::measurement::{ColumnDescriptor, MeasurementDescriptor};
    use crate::point::PointError;
    use crate::time::TimeUnit;
    use crate::value::{ColumnValue, FieldAccessError};
    use std::time::{Duration, SystemTime, UNIX_EPOCH};

    struct Host {
        time: Option<SystemTime>,
        name: String,
        load: f64,
    }

    impl Measurement for Host {
        fn descriptor() -> Option<&'static MeasurementDescriptor> {
            static DESCRIPTOR: MeasurementDescriptor = MeasurementDescriptor {
                name: "host",
                database: Some("infra"),
                retention_policy: None,
                time_unit: TimeUnit::Milliseconds,
            };
            Some(&DESCRIPTOR)
        }

        fn columns() -> &'static [ColumnDescriptor] {
            &[
                ColumnDescriptor {
                    name: "time",
                    field: "time",
                    tag: false,
                    nullable: true,
                },
                ColumnDescriptor {
                    name: "name",
                    field: "name",
                    tag: true,
                    nullable: false,
                },
                ColumnDescriptor {
                    name: "load",
                    field: "load",
                    tag: false,
                    nullable: false,
                },
            ]
        }

        fn read_field(
            &self,
            field: &str,
        ) -> std::result::Result<Option<ColumnValue>, FieldAccessError> {
            match field {
                "time" => Ok(self.time.map(ColumnValue::from)),
                "name" => Ok(Some(ColumnValue::from(self.name.as_str()))),
                "load" => Ok(Some(ColumnValue::from(self.load))),
                other => Err(FieldAccessError::UnknownField {
                    type_name: "Host",
                    field: other.to_string(),
                }),
            }
        }
    }

    fn build(model: &Host, relation: Option<TimeRelation>) -> Result<Query> {
        let bindings = ColumnBindings::scan::<Host>();
        build_delete_query(&PointEncoder::default(), model, &bindings, relation)
    }

    #[test]
    fn test_delete_without_time() {
        let host = Host {
            time: Some(UNIX_EPOCH + Duration::from_millis(10)),
            name: "web-1".to_string(),
            load: 0.7,
        };

        let query = build(&host, None).expect("query");
        assert_eq!(query.database(), Some("infra"));
        assert_eq!(query.command(), "DELETE FROM \"host\" WHERE \"name\"='web-1'");
    }

    #[test]
    fn test_since_and_until_differ_only_in_operator() {
        let host = Host {
            time: Some(UNIX_EPOCH + Duration::from_millis(10)),
            name: "web-1".to_string(),
            load: 0.7,
        };

        let since = build(&host, Some(TimeRelation::After)).expect("since");
        let until = build(&host, Some(TimeRelation::Before)).expect("until");

        assert_eq!(
            since.command(),
            "DELETE FROM \"host\" WHERE \"name\"='web-1' AND time > 10ms"
        );
        assert_eq!(since.command().replace(" > ", " < "), until.command());
    }

    #[test]
    fn test_time_bound_requires_time_column_value() {
        let host = Host {
            time: None,
            name: "web-1".to_string(),
            load: 0.7,
        };

        let err = build(&host, Some(TimeRelation::After)).unwrap_err();
        assert!(matches!(err, MapperError::Point(PointError::MissingTimestamp(_))));
        assert!(build(&host, None).is_ok());
    }
}
