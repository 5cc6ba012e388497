//! Snapshot ingestion: raw upstream records into canonical points.
//!
//! The upstream API is third-party and its schema drifts, so extraction
//! is driven by ordered candidate-field lists rather than a fixed struct:
//! the first defined candidate wins. Records missing a usable entity id,
//! timestamp, or numeric value are dropped silently; sparse data is
//! routine upstream, not an error.

use crate::point::{EntityId, SeriesPoint};
use crate::store::SeriesStore;
use serde_json::Value;
use smol_str::SmolStr;
use std::collections::BTreeMap;
use tracing::{debug, trace};

/// Timestamps above this magnitude are taken as already in milliseconds,
/// otherwise as seconds.
///
/// Pragmatic but fragile: if upstream ever switches epoch base this
/// misreads silently. Known limitation inherited from the feed contract.
pub const MS_EPOCH_CUTOFF: f64 = 1e12;

/// Ordered candidate-field lists tried in priority order per record.
#[derive(Debug, Clone)]
pub struct IngestConfig {
    /// Fields that may carry the entity id.
    pub entity_fields: Vec<String>,
    /// Fields that may carry the timestamp (seconds or milliseconds).
    pub timestamp_fields: Vec<String>,
    /// Fields that may carry the equity value, most authoritative first.
    pub value_fields: Vec<String>,
    /// Field carrying the incremental-fetch cursor, when present.
    pub marker_field: String,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            entity_fields: vec!["model_id".into(), "id".into()],
            timestamp_fields: vec!["timestamp".into()],
            value_fields: vec![
                "dollar_equity".into(),
                "equity".into(),
                "account_value".into(),
            ],
            marker_field: "since_inception_hourly_marker".into(),
        }
    }
}

/// Normalizes batches of raw upstream records into canonical points.
#[derive(Debug, Clone, Default)]
pub struct Ingestor {
    config: IngestConfig,
}

impl Ingestor {
    pub fn new(config: IngestConfig) -> Self {
        Self { config }
    }

    /// Normalize a batch into points keyed by millisecond timestamp.
    ///
    /// Duplicate `(entity, timestamp)` pairs within the batch resolve to
    /// the last record seen. Unusable records are dropped.
    pub fn ingest_batch(&self, records: &[Value]) -> BTreeMap<i64, SeriesPoint> {
        let mut points = BTreeMap::new();
        let mut dropped = 0usize;

        for record in records {
            let Some((entity, timestamp, value)) = self.extract(record) else {
                dropped += 1;
                continue;
            };
            points
                .entry(timestamp)
                .or_insert_with(|| SeriesPoint::new(timestamp))
                .insert(entity, value);
        }

        if dropped > 0 {
            debug!(
                dropped,
                total = records.len(),
                "dropped records without a usable entity/timestamp/value"
            );
        }
        points
    }

    /// Ingest a batch and upsert every resulting point into `store`.
    /// Returns the number of points applied.
    pub fn apply(&self, store: &mut SeriesStore, records: &[Value]) -> usize {
        let points = self.ingest_batch(records);
        let applied = points.len();
        for (_, point) in points {
            store.upsert_point(point);
        }
        trace!(applied, "applied ingested points to store");
        applied
    }

    /// Largest incremental-fetch marker present in `records`, if any.
    pub fn max_marker(&self, records: &[Value]) -> Option<u64> {
        records
            .iter()
            .filter_map(|record| record.get(&self.config.marker_field)?.as_u64())
            .max()
    }

    fn extract(&self, record: &Value) -> Option<(EntityId, i64, f64)> {
        let entity = self.extract_entity(record)?;
        let timestamp = self.extract_timestamp(record)?;
        let value = self.extract_value(record)?;
        Some((entity, timestamp, value))
    }

    fn extract_entity(&self, record: &Value) -> Option<EntityId> {
        self.config
            .entity_fields
            .iter()
            .filter_map(|field| record.get(field)?.as_str())
            .find(|s| !s.is_empty())
            .map(SmolStr::new)
    }

    fn extract_timestamp(&self, record: &Value) -> Option<i64> {
        self.config
            .timestamp_fields
            .iter()
            .filter_map(|field| record.get(field)?.as_f64())
            .next()
            .map(normalize_timestamp_ms)
    }

    fn extract_value(&self, record: &Value) -> Option<f64> {
        self.config
            .value_fields
            .iter()
            .filter_map(|field| record.get(field)?.as_f64())
            .find(|v| v.is_finite())
    }
}

/// Normalize a raw timestamp to epoch milliseconds using the magnitude
/// heuristic: values above [`MS_EPOCH_CUTOFF`] are already milliseconds.
pub fn normalize_timestamp_ms(raw: f64) -> i64 {
    if raw > MS_EPOCH_CUTOFF {
        raw.floor() as i64
    } else {
        (raw * 1000.0).floor() as i64
    }
}
