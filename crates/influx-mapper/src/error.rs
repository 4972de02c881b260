// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Mapper errors.

use thiserror::Error;

use crate::client::ClientError;
use crate::point::PointError;
use crate::value::FieldAccessError;

/// Errors returned by mapper operations.
///
/// Everything except `Client` and `Query` is raised before the database
/// client is called, so a failed `save` or delete never performs I/O.
#[derive(Debug, Error)]
pub enum MapperError {
    /// The type declares no `#[measurement(...)]`.
    #[error("type {type_name} has no measurement declaration")]
    MissingMetadata { type_name: &'static str },

    /// A measurement attribute needed by this operation was not declared.
    #[error("measurement of type {type_name} should specify a {attribute} value for this operation")]
    MissingRequiredAttribute {
        attribute: &'static str,
        type_name: &'static str,
    },

    /// A column value cannot be written with its declared type.
    #[error("unsupported type {type_name} for column {column}")]
    UnsupportedType {
        column: String,
        type_name: &'static str,
    },

    #[error("failed to read column value: {0}")]
    FieldAccess(#[from] FieldAccessError),

    #[error("invalid point: {0}")]
    Point(#[from] PointError),

    /// The server answered with an error instead of rows.
    #[error("query failed: {0}")]
    Query(String),

    #[error("database client error: {0}")]
    Client(#[source] ClientError),
}

/// Convenient alias for mapper results.
pub type Result<T> = std::result::Result<T, MapperError>;
