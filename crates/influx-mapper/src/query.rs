// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Queries sent to the database and the result sets that come back.
//!
//! [`QueryResult`] mirrors the InfluxDB 1.x JSON response body:
//! ```text
//! {"results":[{"statement_id":0,"series":[{"name":"cpu","tags":{..},
//!   "columns":["time","value"],"values":[[..],[..]]}]}]}
//! ```
//! Turning rows back into domain objects is left to [`FromQueryResult`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::MapperError;

/// An InfluxQL statement, optionally scoped to a database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    command: String,
    database: Option<String>,
}

impl Query {
    /// Statement run against the client's default database.
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            database: None,
        }
    }

    pub fn with_database(command: impl Into<String>, database: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            database: Some(database.into()),
        }
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn database(&self) -> Option<&str> {
        self.database.as_deref()
    }
}

/// Response to one or more statements.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    #[serde(default)]
    pub results: Vec<StatementResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Response to a single statement.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatementResult {
    #[serde(default)]
    pub statement_id: u32,
    #[serde(default)]
    pub series: Vec<Series>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Rows of one measurement (and one tag group, for `GROUP BY` queries).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub name: String,
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
    #[serde(default)]
    pub columns: Vec<String>,
    #[serde(default)]
    pub values: Vec<Vec<serde_json::Value>>,
}

impl QueryResult {
    /// Parse a JSON response body.
    pub fn from_json(body: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(body)
    }

    /// First error reported by the server, top-level before per-statement.
    pub fn error(&self) -> Option<&str> {
        self.error
            .as_deref()
            .or_else(|| self.results.iter().find_map(|r| r.error.as_deref()))
    }

    /// All series of all statements, in response order.
    pub fn series(&self) -> impl Iterator<Item = &Series> {
        self.results.iter().flat_map(|r| r.series.iter())
    }
}

impl Series {
    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> {
        self.values.iter().map(move |values| Row {
            series: self,
            values,
        })
    }
}

/// One row of a [`Series`], addressed by column name.
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    series: &'a Series,
    values: &'a [serde_json::Value],
}

impl<'a> Row<'a> {
    pub fn get(&self, column: &str) -> Option<&'a serde_json::Value> {
        let idx = self.series.columns.iter().position(|c| c == column)?;
        self.values.get(idx)
    }

    /// Tag value, from the series' `GROUP BY` tags or from a row column.
    pub fn tag(&self, name: &str) -> Option<&'a str> {
        if let Some(value) = self.series.tags.get(name) {
            return Some(value.as_str());
        }
        self.get(name).and_then(serde_json::Value::as_str)
    }
}

/// Materialization of domain objects from a result set.
///
/// The mapper hands every successful result of [`InfluxMapper::query`] and
/// [`InfluxMapper::query_all`] to this trait; it never inspects rows itself.
///
/// [`InfluxMapper::query`]: crate::InfluxMapper::query
/// [`InfluxMapper::query_all`]: crate::InfluxMapper::query_all
pub trait FromQueryResult: Sized {
    fn from_query_result(result: &QueryResult) -> Result<Vec<Self>, MapperError>;
}
