//! Authoritative time-ordered series, owned by a single session/view.
//!
//! The store is created empty at session start, seeded once per full
//! reload, and thereafter grows through [`SeriesStore::upsert`] as poll
//! results arrive. Upserts merge by timestamp rather than arrival order,
//! so overlapping poll requests completing out of order cannot corrupt
//! the series: the final state is the union of all applied
//! `(timestamp, entity, value)` triples. For identical
//! `(timestamp, entity)` keys the last applied value wins.

use crate::point::{EntityId, SeriesPoint};
use std::collections::{BTreeMap, BTreeSet};

/// Deduplicated, timestamp-ordered series for all entities.
///
/// Backed by a `BTreeMap` keyed by epoch milliseconds: upsert-by-key is
/// O(log n) whether the incoming point appends past the current maximum
/// (the common poll-cycle case), merges into the latest point, or
/// backfills out of order, and iteration is always ascending.
#[derive(Debug, Clone, Default)]
pub struct SeriesStore {
    points: BTreeMap<i64, SeriesPoint>,
    entities: BTreeSet<EntityId>,
}

impl SeriesStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the entire series with `points`, e.g. on a full reload.
    ///
    /// Prior points and the entity registry are cleared unconditionally;
    /// there is no merge with old state. Points sharing a timestamp are
    /// merged into one.
    pub fn seed(&mut self, points: impl IntoIterator<Item = SeriesPoint>) {
        self.clear();
        for point in points {
            self.upsert_point(point);
        }
    }

    /// Merge `values` into the point at `timestamp`, creating it if absent.
    ///
    /// Idempotent: applying the same arguments twice leaves the store in
    /// the same state as applying them once. Values at other timestamps
    /// are never touched.
    pub fn upsert(&mut self, timestamp: i64, values: impl IntoIterator<Item = (EntityId, f64)>) {
        let point = self
            .points
            .entry(timestamp)
            .or_insert_with(|| SeriesPoint::new(timestamp));
        for (entity, value) in values {
            self.entities.insert(entity.clone());
            point.insert(entity, value);
        }
    }

    /// Upsert an already-assembled point.
    pub fn upsert_point(&mut self, point: SeriesPoint) {
        self.upsert(point.timestamp, point.values);
    }

    /// All points, ascending by timestamp, one per distinct timestamp.
    pub fn ordered_series(&self) -> Vec<SeriesPoint> {
        self.points.values().cloned().collect()
    }

    /// Borrowing iterator over points in ascending timestamp order.
    pub fn iter(&self) -> impl Iterator<Item = &SeriesPoint> {
        self.points.values()
    }

    /// Entities observed since the last seed/clear, sorted by id.
    ///
    /// The registry only grows between seeds: an entity that stops
    /// updating remains known for the rest of the session.
    pub fn entity_ids(&self) -> Vec<EntityId> {
        self.entities.iter().cloned().collect()
    }

    /// Timestamp of the most recent point, if any.
    pub fn latest_timestamp(&self) -> Option<i64> {
        self.points.keys().next_back().copied()
    }

    /// Number of distinct timestamps held.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True when the store holds no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Drop all points and forget all entities.
    pub fn clear(&mut self) {
        self.points.clear();
        self.entities.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smol_str::SmolStr;

    fn id(s: &str) -> EntityId {
        SmolStr::new(s)
    }

    #[test]
    fn test_basic_accumulation() {
        let mut store = SeriesStore::new();
        store.seed([SeriesPoint::with_values(1000, [(id("A"), 10.0)])]);
        store.upsert(2000, [(id("A"), 12.0), (id("B"), 5.0)]);
        // Partial update at an existing timestamp merges in place.
        store.upsert(2000, [(id("A"), 13.0)]);

        let series = store.ordered_series();
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].timestamp, 1000);
        assert_eq!(series[0].value("A"), Some(10.0));
        assert_eq!(series[1].timestamp, 2000);
        assert_eq!(series[1].value("A"), Some(13.0));
        assert_eq!(series[1].value("B"), Some(5.0));
    }

    #[test]
    fn test_upsert_is_idempotent() {
        let mut once = SeriesStore::new();
        once.upsert(1000, [(id("A"), 10.0), (id("B"), 20.0)]);

        let mut twice = SeriesStore::new();
        twice.upsert(1000, [(id("A"), 10.0), (id("B"), 20.0)]);
        twice.upsert(1000, [(id("A"), 10.0), (id("B"), 20.0)]);

        assert_eq!(once.ordered_series(), twice.ordered_series());
        assert_eq!(once.entity_ids(), twice.entity_ids());
    }

    #[test]
    fn test_batches_commute_when_writes_are_disjoint() {
        let batch_a = vec![
            SeriesPoint::with_values(1000, [(id("A"), 1.0)]),
            SeriesPoint::with_values(3000, [(id("A"), 3.0)]),
        ];
        let batch_b = vec![
            SeriesPoint::with_values(2000, [(id("B"), 2.0)]),
            SeriesPoint::with_values(3000, [(id("B"), 4.0)]),
        ];

        let mut ab = SeriesStore::new();
        for p in batch_a.iter().chain(batch_b.iter()) {
            ab.upsert_point(p.clone());
        }
        let mut ba = SeriesStore::new();
        for p in batch_b.iter().chain(batch_a.iter()) {
            ba.upsert_point(p.clone());
        }

        assert_eq!(ab.ordered_series(), ba.ordered_series());
    }

    #[test]
    fn test_conflicting_write_takes_last_applied() {
        // Same (timestamp, entity) key from two overlapping polls:
        // last-applied wins, by contract.
        let mut store = SeriesStore::new();
        store.upsert(1000, [(id("A"), 10.0)]);
        store.upsert(1000, [(id("A"), 11.0)]);
        assert_eq!(store.ordered_series()[0].value("A"), Some(11.0));
    }

    #[test]
    fn test_out_of_order_inserts_come_back_sorted() {
        let mut store = SeriesStore::new();
        for ts in [5000, 1000, 3000, 2000, 4000] {
            store.upsert(ts, [(id("A"), ts as f64)]);
        }

        let timestamps: Vec<i64> = store.ordered_series().iter().map(|p| p.timestamp).collect();
        assert_eq!(timestamps, vec![1000, 2000, 3000, 4000, 5000]);
    }

    #[test]
    fn test_no_duplicate_timestamps() {
        let mut store = SeriesStore::new();
        store.seed([
            SeriesPoint::with_values(1000, [(id("A"), 1.0)]),
            SeriesPoint::with_values(1000, [(id("B"), 2.0)]),
        ]);
        store.upsert(1000, [(id("C"), 3.0)]);
        store.upsert(2000, [(id("A"), 4.0)]);
        store.upsert(2000, [(id("A"), 4.0)]);

        let series = store.ordered_series();
        let mut timestamps: Vec<i64> = series.iter().map(|p| p.timestamp).collect();
        timestamps.dedup();
        assert_eq!(timestamps.len(), series.len());
        // Colliding seeds merged rather than dropped.
        assert_eq!(series[0].len(), 3);
    }

    #[test]
    fn test_seed_replaces_everything() {
        let mut store = SeriesStore::new();
        store.upsert(1000, [(id("old"), 1.0)]);
        store.seed([SeriesPoint::with_values(9000, [(id("new"), 9.0)])]);

        assert_eq!(store.len(), 1);
        assert_eq!(store.latest_timestamp(), Some(9000));
        assert_eq!(store.entity_ids(), vec![id("new")]);
    }

    #[test]
    fn test_entity_registry_grows_monotonically() {
        let mut store = SeriesStore::new();
        store.upsert(1000, [(id("A"), 1.0)]);
        store.upsert(2000, [(id("B"), 2.0)]);
        // A has no value at the latest timestamp but stays registered.
        assert_eq!(store.entity_ids(), vec![id("A"), id("B")]);
    }
}
