//! Arena Series - Equity Time-Series Accumulation
//!
//! Process-local cache behind the "total account value" chart of an
//! AI-trading-model dashboard. A session seeds the store once with full
//! history, then folds in periodically polled snapshots without ever
//! rebuilding the series:
//!
//! - [`ingest`]: normalizes heterogeneous upstream snapshot records
//!   (drifting field names, second- or millisecond-based timestamps)
//!   into canonical points.
//! - [`store`]: the authoritative timestamp-ordered series, mutated only
//!   via commutative, idempotent upserts.
//! - [`project`]: derives chart-ready views (range filter, percent
//!   normalization, downsampling) without touching stored data.

pub mod ingest;
pub mod point;
pub mod project;
pub mod store;

pub use ingest::{IngestConfig, Ingestor};
pub use point::{EntityId, SeriesPoint};
pub use project::{
    downsample, filter_range, normalize, pad_single_point, project, RangeMode, ValueMode,
    ViewConfig, DEFAULT_MAX_POINTS,
};
pub use store::SeriesStore;
