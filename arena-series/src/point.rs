//! Core data types for the equity series.
//!
//! A [`SeriesPoint`] serializes to the row shape the chart consumes:
//! `{ "timestamp": 1730000000000, "model-a": 10123.5, "model-b": 9876.0 }`

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::collections::BTreeMap;

/// Stable string id of a tracked entity (e.g. a trading model).
pub type EntityId = SmolStr;

/// One timestamp plus a partial mapping of entity to value.
///
/// The mapping is partial by design: an entity absent at a timestamp had
/// no update at that time, which is not the same as a value of zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    /// Epoch milliseconds.
    pub timestamp: i64,
    /// Per-entity values observed at this timestamp.
    #[serde(flatten)]
    pub values: BTreeMap<EntityId, f64>,
}

impl SeriesPoint {
    /// Create an empty point at `timestamp`.
    pub fn new(timestamp: i64) -> Self {
        Self {
            timestamp,
            values: BTreeMap::new(),
        }
    }

    /// Create a point with initial entity values.
    pub fn with_values(
        timestamp: i64,
        values: impl IntoIterator<Item = (EntityId, f64)>,
    ) -> Self {
        Self {
            timestamp,
            values: values.into_iter().collect(),
        }
    }

    /// Value for `entity` at this point, if defined.
    pub fn value(&self, entity: &str) -> Option<f64> {
        self.values.get(entity).copied()
    }

    /// Set or overwrite the value for a single entity.
    pub fn insert(&mut self, entity: EntityId, value: f64) {
        self.values.insert(entity, value);
    }

    /// Overlay `values` onto this point. Existing entities not present in
    /// `values` are untouched; colliding entities take the new value.
    pub fn merge(&mut self, values: impl IntoIterator<Item = (EntityId, f64)>) {
        for (entity, value) in values {
            self.values.insert(entity, value);
        }
    }

    /// Number of entities with a defined value at this point.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when no entity has a value at this point.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
