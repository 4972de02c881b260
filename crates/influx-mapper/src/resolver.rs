// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Reads of a type's measurement declaration.

use std::any::type_name;

use crate::error::{MapperError, Result};
use crate::measurement::{Measurement, MeasurementDescriptor};
use crate::time::TimeUnit;

/// Descriptor of `T`, or `MissingMetadata` when `T` declares none.
pub fn validate<T: Measurement>() -> Result<&'static MeasurementDescriptor> {
    T::descriptor().ok_or(MapperError::MissingMetadata {
        type_name: type_name::<T>(),
    })
}

pub fn measurement_name<T: Measurement>() -> Result<&'static str> {
    validate::<T>().map(|d| d.name)
}

/// Declared database; `None` means the client default applies.
pub fn database_name<T: Measurement>() -> Result<Option<&'static str>> {
    validate::<T>().map(|d| d.database)
}

/// Declared database, for operations that cannot fall back to a default.
pub fn require_database<T: Measurement>() -> Result<&'static str> {
    database_name::<T>()?.ok_or(MapperError::MissingRequiredAttribute {
        attribute: "database",
        type_name: type_name::<T>(),
    })
}

/// Declared retention policy, or `default` when none is declared.
pub fn retention_policy<'a, T: Measurement>(default: &'a str) -> Result<&'a str> {
    validate::<T>().map(|d| d.retention_policy.unwrap_or(default))
}

pub fn time_unit<T: Measurement>() -> Result<TimeUnit> {
    validate::<T>().map(|d| d.time_unit)
}
