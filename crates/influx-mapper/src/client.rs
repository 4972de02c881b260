// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Database client seam.
//!
//! The mapper does not talk to the network. It hands finished points and
//! queries to an [`InfluxClient`], which owns connections, authentication,
//! batching and retries.

use crate::point::Point;
use crate::query::{Query, QueryResult};

/// Transport error reported by a client implementation.
pub type ClientError = Box<dyn std::error::Error + Send + Sync>;

/// Operations the mapper needs from a database client.
pub trait InfluxClient {
    /// Write to the client's default database and retention policy.
    fn write(&self, point: &Point) -> Result<(), ClientError>;

    /// Write to an explicit database and retention policy.
    fn write_to(
        &self,
        database: &str,
        retention_policy: &str,
        point: &Point,
    ) -> Result<(), ClientError>;

    fn query(&self, query: &Query) -> Result<QueryResult, ClientError>;
}

impl<C: InfluxClient + ?Sized> InfluxClient for &C {
    fn write(&self, point: &Point) -> Result<(), ClientError> {
        (**self).write(point)
    }

    fn write_to(
        &self,
        database: &str,
        retention_policy: &str,
        point: &Point,
    ) -> Result<(), ClientError> {
        (**self).write_to(database, retention_policy, point)
    }

    fn query(&self, query: &Query) -> Result<QueryResult, ClientError> {
        (**self).query(query)
    }
}

impl<C: InfluxClient + ?Sized> InfluxClient for std::sync::Arc<C> {
    fn write(&self, point: &Point) -> Result<(), ClientError> {
        (**self).write(point)
    }

    fn write_to(
        &self,
        database: &str,
        retention_policy: &str,
        point: &Point,
    ) -> Result<(), ClientError> {
        (**self).write_to(database, retention_policy, point)
    }

    fn query(&self, query: &Query) -> Result<QueryResult, ClientError> {
        (**self).query(query)
    }
}
