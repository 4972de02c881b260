// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Per-type column bindings, computed once and shared.
//!
//! Bindings are a pure function of a type's static declarations, so an
//! entry is never invalidated. The cache grows with the number of distinct
//! domain types a process maps and never evicts.
//!
//! First use of a type goes through `DashMap::entry`, which holds the shard
//! write lock while the bindings are scanned: concurrent first callers block
//! briefly and then all see the one published entry. Later lookups only take
//! the shard read lock.

use std::any::{type_name, TypeId};
use std::collections::btree_map;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use dashmap::DashMap;

use crate::measurement::{ColumnDescriptor, Measurement};

/// Column wire name to declaration, for one domain type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnBindings {
    type_name: &'static str,
    columns: BTreeMap<&'static str, &'static ColumnDescriptor>,
}

impl ColumnBindings {
    /// Scan the declared columns of `T`.
    ///
    /// A wire name declared twice keeps its first declaration.
    pub fn scan<T: Measurement>() -> Self {
        let type_name = type_name::<T>();
        let mut columns = BTreeMap::new();
        for column in T::columns() {
            match columns.entry(column.name) {
                btree_map::Entry::Vacant(slot) => {
                    slot.insert(column);
                }
                btree_map::Entry::Occupied(existing) => {
                    log::warn!(
                        "[cache] {} declares column '{}' on both '{}' and '{}', keeping '{}'",
                        type_name,
                        column.name,
                        existing.get().field,
                        column.field,
                        existing.get().field
                    );
                }
            }
        }
        Self { type_name, columns }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn get(&self, column: &str) -> Option<&'static ColumnDescriptor> {
        self.columns.get(column).copied()
    }

    /// Bindings in wire-name order.
    pub fn iter(&self) -> impl Iterator<Item = &'static ColumnDescriptor> + '_ {
        self.columns.values().copied()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Concurrent store of [`ColumnBindings`] keyed by domain type.
#[derive(Debug, Default)]
pub struct MetadataCache {
    entries: DashMap<TypeId, Arc<ColumnBindings>>,
    populations: AtomicUsize,
}

impl MetadataCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bindings for `T`, scanning its declarations on first use.
    pub fn bindings<T: Measurement>(&self) -> Arc<ColumnBindings> {
        let key = TypeId::of::<T>();
        if let Some(entry) = self.entries.get(&key) {
            return Arc::clone(entry.value());
        }

        let entry = self.entries.entry(key).or_insert_with(|| {
            let bindings = ColumnBindings::scan::<T>();
            self.populations.fetch_add(1, Ordering::Relaxed);
            log::debug!(
                "[cache] bound {} column(s) for {}",
                bindings.len(),
                bindings.type_name()
            );
            Arc::new(bindings)
        });
        Arc::clone(entry.value())
    }

    pub fn contains<T: Measurement>(&self) -> bool {
        self.entries.contains_key(&TypeId::of::<T>())
    }

    /// Number of cached types.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// How many times bindings were scanned. Equals `len()` unless a scan
    /// was ever repeated for the same type.
    pub fn populations(&self) -> usize {
        self.populations.load(Ordering::Relaxed)
    }
}
