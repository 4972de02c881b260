// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! InfluxDB measurement mapper
//!
//! Maps annotated Rust types to InfluxDB points and back.
//!
//! This crate provides:
//! - `#[derive(Measurement)]` for declaring measurements, tags and fields
//! - A per-type column metadata cache shared across threads
//! - Point encoding (Line Protocol) with timestamp precision handling
//! - Tag-scoped `DELETE` statements, optionally bounded by time
//! - YAML configuration for the reserved time column and default retention policy
//!
//! # Overview
//!
//! The mapper does NOT perform network I/O. Finished points and queries go to
//! an [`InfluxClient`] implementation, and query results come back through
//! [`FromQueryResult`].
//!
//! ```text
//! &T --> Measurement --> MetadataCache --> PointEncoder --> Point --> InfluxClient
//! ```
//!
//! # Example
//!
//! ```rust
//! use influx_mapper::{EncodeOptions, InfluxClient, InfluxMapper, Measurement, Point, Query, QueryResult};
//! use influx_mapper::client::ClientError;
//! use std::time::SystemTime;
//!
//! #[derive(Measurement)]
//! #[measurement(name = "cpu", database = "metrics")]
//! struct Cpu {
//!     #[column(name = "time")]
//!     time: Option<SystemTime>,
//!     #[column(name = "host", tag)]
//!     host: String,
//!     #[column(name = "idle")]
//!     idle: f64,
//! }
//!
//! struct Stdout;
//!
//! impl InfluxClient for Stdout {
//!     fn write(&self, point: &Point) -> Result<(), ClientError> {
//!         println!("{}", point.to_line_protocol()?);
//!         Ok(())
//!     }
//!     fn write_to(&self, db: &str, rp: &str, point: &Point) -> Result<(), ClientError> {
//!         println!("{}.{}: {}", db, rp, point.to_line_protocol()?);
//!         Ok(())
//!     }
//!     fn query(&self, query: &Query) -> Result<QueryResult, ClientError> {
//!         println!("{}", query.command());
//!         Ok(QueryResult::default())
//!     }
//! }
//!
//! let mapper = InfluxMapper::new(Stdout);
//! let cpu = Cpu { time: None, host: "web-1".into(), idle: 97.5 };
//! mapper.save(&cpu)?;
//!
//! let point = mapper.create_point(&cpu, EncodeOptions::TAGS_ONLY)?;
//! assert_eq!(point.tag("host"), Some("web-1"));
//! # Ok::<(), influx_mapper::MapperError>(())
//! ```

pub mod cache;
pub mod client;
pub mod config;
pub mod delete;
pub mod encoder;
pub mod error;
pub mod mapper;
pub mod measurement;
pub mod point;
pub mod query;
pub mod resolver;
pub mod time;
pub mod value;

pub use cache::{ColumnBindings, MetadataCache};
pub use client::InfluxClient;
pub use config::MapperConfig;
pub use encoder::{EncodeOptions, PointEncoder};
pub use error::{MapperError, Result};
pub use mapper::InfluxMapper;
pub use measurement::{ColumnDescriptor, Measurement, MeasurementDescriptor};
pub use point::{FieldValue, Point, PointBuilder, PointError, TimeRelation};
pub use query::{FromQueryResult, Query, QueryResult, Row, Series};
pub use time::TimeUnit;
pub use value::{ColumnValue, FieldAccessError};

// Derive macro (for #[derive(influx_mapper::Measurement)])
pub use influx_mapper_codegen::Measurement;
