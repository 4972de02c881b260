// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Mapper facade.
//!
//! Connects declaration checks, the metadata cache, point encoding and
//! delete-query construction to an [`InfluxClient`].
//!
//! ```text
//! &T --> validate --> MetadataCache --> PointEncoder --> Point --> client.write
//!                                  \--> build_delete_query --> Query --> client.query
//! ```

use std::any::type_name;
use std::sync::Arc;

use crate::cache::{ColumnBindings, MetadataCache};
use crate::client::InfluxClient;
use crate::config::MapperConfig;
use crate::delete::build_delete_query;
use crate::encoder::{EncodeOptions, PointEncoder};
use crate::error::{MapperError, Result};
use crate::measurement::Measurement;
use crate::point::{quote_identifier, Point, TimeRelation};
use crate::query::{FromQueryResult, Query, QueryResult};
use crate::resolver;

/// Saves, queries and deletes measurement types through a database client.
///
/// All operations take `&self`; share one mapper between threads (it is
/// `Sync` whenever the client is) so every caller reuses the same column
/// bindings.
pub struct InfluxMapper<C> {
    client: C,
    config: MapperConfig,
    encoder: PointEncoder,
    cache: MetadataCache,
}

impl<C: InfluxClient> InfluxMapper<C> {
    /// Mapper with the default configuration.
    pub fn new(client: C) -> Self {
        Self::with_config(client, MapperConfig::default())
    }

    pub fn with_config(client: C, config: MapperConfig) -> Self {
        Self {
            client,
            encoder: PointEncoder::new(config.time_column.clone()),
            config,
            cache: MetadataCache::new(),
        }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn config(&self) -> &MapperConfig {
        &self.config
    }

    pub fn cache(&self) -> &MetadataCache {
        &self.cache
    }

    /// Run a caller-supplied statement and materialize its rows as `T`.
    pub fn query<T: Measurement + FromQueryResult>(&self, query: &Query) -> Result<Vec<T>> {
        resolver::validate::<T>()?;
        log::debug!("[mapper] query for {}: {}", type_name::<T>(), query.command());
        let result = self.client.query(query).map_err(MapperError::Client)?;
        materialize(&result)
    }

    /// Select every row of `T`'s measurement from its declared database.
    pub fn query_all<T: Measurement + FromQueryResult>(&self) -> Result<Vec<T>> {
        let measurement = resolver::measurement_name::<T>()?;
        let database = resolver::require_database::<T>()?;
        let query = Query::with_database(
            format!("SELECT * FROM {}", quote_identifier(measurement)),
            database,
        );
        log::debug!("[mapper] query_all {} from '{}'", measurement, database);
        let result = self.client.query(&query).map_err(MapperError::Client)?;
        materialize(&result)
    }

    /// Encode `model` with the current time as default timestamp and write it.
    ///
    /// Without a declared database the client's defaults apply; otherwise the
    /// declared database and retention policy are used.
    pub fn save<T: Measurement>(&self, model: &T) -> Result<()> {
        let bindings = self.warm::<T>()?;
        let point = self.encoder.encode(model, &bindings, EncodeOptions::WRITE)?;

        let written = match resolver::database_name::<T>()? {
            None => {
                log::debug!("[mapper] save {} to default database", point.measurement_name());
                self.client.write(&point)
            }
            Some(database) => {
                let retention_policy =
                    resolver::retention_policy::<T>(&self.config.default_retention_policy)?;
                log::debug!(
                    "[mapper] save {} to '{}'.'{}'",
                    point.measurement_name(),
                    database,
                    retention_policy
                );
                self.client.write_to(database, retention_policy, &point)
            }
        };
        written.map_err(MapperError::Client)
    }

    /// Encode `model` without writing it.
    pub fn create_point<T: Measurement>(&self, model: &T, options: EncodeOptions) -> Result<Point> {
        let bindings = self.warm::<T>()?;
        self.encoder.encode(model, &bindings, options)
    }

    /// Delete all points whose tags match `model`'s.
    pub fn delete_measurements_by_tags_without_time<T: Measurement>(&self, model: &T) -> Result<()> {
        self.delete(model, None)
    }

    /// Delete points matching `model`'s tags strictly after its time column.
    pub fn delete_measurements_by_tags_since_time<T: Measurement>(&self, model: &T) -> Result<()> {
        self.delete(model, Some(TimeRelation::After))
    }

    /// Delete points matching `model`'s tags strictly before its time column.
    pub fn delete_measurements_by_tags_until_time<T: Measurement>(&self, model: &T) -> Result<()> {
        self.delete(model, Some(TimeRelation::Before))
    }

    fn delete<T: Measurement>(&self, model: &T, relation: Option<TimeRelation>) -> Result<()> {
        let bindings = self.warm::<T>()?;
        let query = build_delete_query(&self.encoder, model, &bindings, relation)?;
        log::debug!("[mapper] {}", query.command());
        let result = self.client.query(&query).map_err(MapperError::Client)?;
        match result.error() {
            Some(error) => Err(MapperError::Query(error.to_string())),
            None => Ok(()),
        }
    }

    /// Validate `T` and fetch (or build) its bindings.
    fn warm<T: Measurement>(&self) -> Result<Arc<ColumnBindings>> {
        resolver::validate::<T>()?;
        Ok(self.cache.bindings::<T>())
    }
}

fn materialize<T: FromQueryResult>(result: &QueryResult) -> Result<Vec<T>> {
    if let Some(error) = result.error() {
        return Err(MapperError::Query(error.to_string()));
    }
    T::from_query_result(result)
}
