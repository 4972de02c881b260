// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Static measurement and column declarations.
//!
//! Types usually get these through `#[derive(Measurement)]`:
//!
//! ```rust
//! use influx_mapper::Measurement;
//! use std::time::SystemTime;
//!
//! #[derive(Measurement)]
//! #[measurement(name = "cpu", database = "metrics", time_unit = "seconds")]
//! struct Cpu {
//!     #[column(name = "time")]
//!     time: Option<SystemTime>,
//!     #[column(name = "host", tag)]
//!     host: String,
//!     #[column(name = "idle", nullable)]
//!     idle: Option<f64>,
//!     // Not a column: never read by the mapper.
//!     scratch: Vec<u8>,
//! }
//!
//! let descriptor = Cpu::descriptor().expect("declared");
//! assert_eq!(descriptor.name, "cpu");
//! assert_eq!(Cpu::columns().len(), 3);
//! ```

use crate::time::TimeUnit;
use crate::value::{ColumnValue, FieldAccessError};

/// Measurement-level declaration of a domain type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeasurementDescriptor {
    /// Measurement name on the wire.
    pub name: &'static str,
    /// Target database. `None` means "use the client default".
    pub database: Option<&'static str>,
    /// Retention policy for writes. `None` means "use the configured default".
    pub retention_policy: Option<&'static str>,
    /// Precision of point timestamps.
    pub time_unit: TimeUnit,
}

impl MeasurementDescriptor {
    /// Descriptor with no database, no retention policy and millisecond precision.
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            database: None,
            retention_policy: None,
            time_unit: TimeUnit::Milliseconds,
        }
    }
}

/// Column declaration attached to one struct field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnDescriptor {
    /// Column name on the wire.
    pub name: &'static str,
    /// Rust field the value is read from.
    pub field: &'static str,
    /// Tag column (string, indexed) rather than a field column.
    pub tag: bool,
    /// An absent value is skipped instead of rejected.
    pub nullable: bool,
}

/// Capability implemented by every mappable domain type.
///
/// `descriptor` returns `None` for types that declare columns without a
/// measurement; every mapper operation rejects those before doing any work.
/// `read_field` is the only way the mapper reads instance data, so private
/// fields stay private.
pub trait Measurement: Send + Sync + 'static {
    /// Measurement declaration, if any.
    fn descriptor() -> Option<&'static MeasurementDescriptor>;

    /// Declared columns, in declaration order.
    fn columns() -> &'static [ColumnDescriptor];

    /// Read the current value of `field`. `Ok(None)` means the value is absent.
    fn read_field(&self, field: &str) -> Result<Option<ColumnValue>, FieldAccessError>;
}
