// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

// Shared fixtures: a recording client and a few declared measurement types.

#![allow(dead_code)]

use influx_mapper::client::ClientError;
use influx_mapper::{FromQueryResult, InfluxClient, MapperError, Measurement, Point, Query, QueryResult};
use parking_lot::Mutex;
use std::time::SystemTime;

/// One call received by [`RecordingClient`].
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Write(Point),
    WriteTo {
        database: String,
        retention_policy: String,
        point: Point,
    },
    Query(Query),
}

/// Client that records every call and answers queries with a canned result.
#[derive(Default)]
pub struct RecordingClient {
    calls: Mutex<Vec<Call>>,
    response: Mutex<QueryResult>,
    fail: Mutex<Option<String>>,
}

impl RecordingClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond_with(&self, result: QueryResult) {
        *self.response.lock() = result;
    }

    /// Make every subsequent call fail with `message`.
    pub fn fail_with(&self, message: &str) {
        *self.fail.lock() = Some(message.to_string());
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    pub fn last_query(&self) -> Option<Query> {
        self.calls.lock().iter().rev().find_map(|call| match call {
            Call::Query(query) => Some(query.clone()),
            _ => None,
        })
    }

    fn record(&self, call: Call) -> Result<(), ClientError> {
        if let Some(message) = self.fail.lock().clone() {
            return Err(message.into());
        }
        self.calls.lock().push(call);
        Ok(())
    }
}

impl InfluxClient for RecordingClient {
    fn write(&self, point: &Point) -> Result<(), ClientError> {
        self.record(Call::Write(point.clone()))
    }

    fn write_to(
        &self,
        database: &str,
        retention_policy: &str,
        point: &Point,
    ) -> Result<(), ClientError> {
        self.record(Call::WriteTo {
            database: database.to_string(),
            retention_policy: retention_policy.to_string(),
            point: point.clone(),
        })
    }

    fn query(&self, query: &Query) -> Result<QueryResult, ClientError> {
        self.record(Call::Query(query.clone()))?;
        Ok(self.response.lock().clone())
    }
}

#[derive(Measurement, Debug, Clone, PartialEq)]
#[measurement(name = "cpu", database = "metrics", retention_policy = "week")]
pub struct Cpu {
    #[column(name = "time")]
    pub time: Option<SystemTime>,
    #[column(name = "host", tag)]
    pub host: String,
    #[column(name = "region", tag)]
    pub region: String,
    #[column(name = "idle")]
    pub idle: f64,
}

impl FromQueryResult for Cpu {
    fn from_query_result(result: &QueryResult) -> Result<Vec<Self>, MapperError> {
        let mut rows = Vec::new();
        for series in result.series() {
            for row in series.rows() {
                let idle = row
                    .get("idle")
                    .and_then(serde_json::Value::as_f64)
                    .ok_or_else(|| MapperError::Query("missing idle".to_string()))?;
                rows.push(Cpu {
                    time: None,
                    host: row.tag("host").unwrap_or_default().to_string(),
                    region: row.tag("region").unwrap_or_default().to_string(),
                    idle,
                });
            }
        }
        Ok(rows)
    }
}

/// Declared without a database: writes go to the client default.
#[derive(Measurement, Debug, Clone)]
#[measurement(name = "disk", time_unit = "seconds")]
pub struct Disk {
    #[column(name = "time")]
    pub time: Option<SystemTime>,
    #[column(name = "device", tag)]
    pub device: String,
    #[column(name = "used")]
    pub used: i64,
}

impl FromQueryResult for Disk {
    fn from_query_result(_result: &QueryResult) -> Result<Vec<Self>, MapperError> {
        Ok(Vec::new())
    }
}

/// Columns but no `#[measurement]`: rejected everywhere.
#[derive(Measurement, Debug, Clone)]
pub struct Undeclared {
    #[column(name = "value")]
    pub value: i64,
}

impl FromQueryResult for Undeclared {
    fn from_query_result(_result: &QueryResult) -> Result<Vec<Self>, MapperError> {
        Ok(Vec::new())
    }
}
