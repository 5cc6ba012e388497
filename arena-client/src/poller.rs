//! Seed-then-poll task keeping a shared [`SeriesStore`] current.
//!
//! One full-history fetch seeds the store and establishes the hourly
//! marker cursor; afterwards a fixed-interval loop fetches increments
//! past the cursor and upserts them. Because upserts merge by timestamp,
//! responses applied late or twice (overlapping poll intervals, slow
//! fetches) converge to the same series regardless of completion order.
//! Fetch failures are logged and skipped; the store simply keeps serving
//! its last-known series.

use crate::client::ApiClient;
use arena_series::{Ingestor, SeriesStore};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::interval;
use tracing::{debug, info, warn};

/// Ingest one response batch into the store and advance the marker cursor.
/// Returns the number of points applied.
fn apply_batch(
    store: &mut SeriesStore,
    ingestor: &Ingestor,
    records: &[Value],
    cursor: &mut Option<u64>,
) -> usize {
    if let Some(marker) = ingestor.max_marker(records) {
        *cursor = Some(cursor.map_or(marker, |current| current.max(marker)));
    }
    ingestor.apply(store, records)
}

/// Spawn the equity polling task. Aborting the returned handle (or
/// dropping the last external `Arc` to the store at session teardown)
/// is the only cancellation needed; an in-flight response arriving
/// after that is discarded with the task.
pub fn spawn_equity_poller(
    store: Arc<Mutex<SeriesStore>>,
    client: ApiClient,
    ingestor: Ingestor,
    poll_interval: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!("starting equity poller");
        let mut cursor: Option<u64> = None;

        // Full history first; retry until upstream answers once.
        loop {
            match client.account_totals(None).await {
                Ok(response) => {
                    let mut store = store.lock().await;
                    // Full reload replaces prior state unconditionally.
                    store.clear();
                    let applied =
                        apply_batch(&mut store, &ingestor, &response.account_totals, &mut cursor);
                    info!(
                        points = applied,
                        entities = store.entity_ids().len(),
                        cursor = ?cursor,
                        "seeded series from full history"
                    );
                    break;
                }
                Err(error) => {
                    warn!(%error, "full-history fetch failed, retrying");
                    tokio::time::sleep(poll_interval).await;
                }
            }
        }

        let mut ticker = interval(poll_interval);
        loop {
            ticker.tick().await;
            match client.account_totals(cursor).await {
                Ok(response) => {
                    if response.account_totals.is_empty() {
                        debug!("incremental poll returned no records");
                        continue;
                    }
                    let mut store = store.lock().await;
                    let applied =
                        apply_batch(&mut store, &ingestor, &response.account_totals, &mut cursor);
                    debug!(
                        points = applied,
                        total = store.len(),
                        cursor = ?cursor,
                        "merged incremental poll"
                    );
                }
                Err(error) => {
                    // Transport failures are this layer's only error
                    // surface; the store never enters an error state.
                    warn!(%error, "incremental poll failed, keeping last-known series");
                }
            }
        }
    })
}
