//! Chart-ready projections over the raw series.
//!
//! Projection never mutates stored data: the raw series stays the single
//! source of truth while multiple view configurations (range, units) are
//! derived on demand. Fewer than two projected points is an expected
//! "insufficient data" rendering state for callers, not an error.

use crate::point::{EntityId, SeriesPoint};
use std::collections::BTreeMap;

/// Downsampling threshold for bounded ranges, matching the chart's
/// render budget.
pub const DEFAULT_MAX_POINTS: usize = 600;

/// Time window projected onto the chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeMode {
    /// Full history, never downsampled.
    All,
    /// Points within the trailing N hours, cutoff inclusive.
    LastHours(u32),
}

/// Unit of the projected values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueMode {
    /// Raw values as ingested.
    Absolute,
    /// Percent change against each entity's first defined value within
    /// the filtered range: `(v / baseline - 1) * 100`.
    PercentOfBaseline,
}

/// One view configuration, typically toggled by the chart's controls.
#[derive(Debug, Clone, Copy)]
pub struct ViewConfig {
    pub range: RangeMode,
    pub mode: ValueMode,
    pub max_points: usize,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            range: RangeMode::All,
            mode: ValueMode::Absolute,
            max_points: DEFAULT_MAX_POINTS,
        }
    }
}

/// Project `series` through filter, normalization, and (for bounded
/// ranges only) downsampling. `now_ms` anchors the range cutoff and is
/// taken once so a long projection cannot drift mid-pass.
pub fn project(series: &[SeriesPoint], config: &ViewConfig, now_ms: i64) -> Vec<SeriesPoint> {
    let mut points = filter_range(series, config.range, now_ms);
    if config.mode == ValueMode::PercentOfBaseline {
        points = normalize(points, config.mode);
    }
    if matches!(config.range, RangeMode::LastHours(_)) {
        points = downsample(points, config.max_points);
    }
    points
}

/// Retain points within the configured range. The `LastHours` cutoff is
/// `now_ms - hours`, boundary inclusive.
pub fn filter_range(series: &[SeriesPoint], range: RangeMode, now_ms: i64) -> Vec<SeriesPoint> {
    match range {
        RangeMode::All => series.to_vec(),
        RangeMode::LastHours(hours) => {
            let cutoff = now_ms - i64::from(hours) * 3_600_000;
            series
                .iter()
                .filter(|point| point.timestamp >= cutoff)
                .cloned()
                .collect()
        }
    }
}

/// Apply value normalization to an already-filtered series.
///
/// In percent mode each entity is normalized independently against its
/// own baseline: the first point in `points` where it has a defined
/// value. Entities with no defined value in range, or a zero baseline,
/// stay undefined throughout. Degenerate, not an error.
pub fn normalize(points: Vec<SeriesPoint>, mode: ValueMode) -> Vec<SeriesPoint> {
    if mode == ValueMode::Absolute {
        return points;
    }

    let mut baselines: BTreeMap<EntityId, f64> = BTreeMap::new();
    for point in &points {
        for (entity, value) in &point.values {
            baselines.entry(entity.clone()).or_insert(*value);
        }
    }

    points
        .into_iter()
        .map(|point| {
            let values = point
                .values
                .into_iter()
                .filter_map(|(entity, value)| {
                    let baseline = *baselines.get(&entity)?;
                    if baseline == 0.0 {
                        return None;
                    }
                    Some((entity, (value / baseline - 1.0) * 100.0))
                })
                .collect();
            SeriesPoint {
                timestamp: point.timestamp,
                values,
            }
        })
        .collect()
}

/// Stride-sample `points` down to roughly `max_points`, always keeping
/// the final point so the most recent value is never dropped.
pub fn downsample(points: Vec<SeriesPoint>, max_points: usize) -> Vec<SeriesPoint> {
    if max_points == 0 || points.len() <= max_points {
        return points;
    }

    let stride = points.len().div_ceil(max_points);
    let last_index = points.len() - 1;
    let mut sampled: Vec<SeriesPoint> = points
        .iter()
        .step_by(stride)
        .cloned()
        .collect();

    if sampled.last().map(|p| p.timestamp) != points.last().map(|p| p.timestamp) {
        sampled.push(points[last_index].clone());
    }
    sampled
}

/// Pad a single-point projection with a synthetic baseline one minute
/// earlier carrying identical values, so a trend line can render while
/// the session is still accumulating. Leaves any other length untouched.
pub fn pad_single_point(points: Vec<SeriesPoint>) -> Vec<SeriesPoint> {
    if points.len() != 1 {
        return points;
    }
    let only = &points[0];
    let synthetic = SeriesPoint {
        timestamp: only.timestamp - 60_000,
        values: only.values.clone(),
    };
    vec![synthetic, points.into_iter().next().unwrap()]
}
