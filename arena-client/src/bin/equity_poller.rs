//! Headless equity poller: accumulates the account-value series from the
//! upstream API and periodically logs a chart-shaped summary. Useful for
//! watching what a dashboard session would render without a front end.

use arena_client::{ApiClient, Config};
use arena_series::{
    pad_single_point, project, Ingestor, RangeMode, SeriesStore, ValueMode, ViewConfig,
};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::interval;
use tracing::info;

#[tokio::main]
async fn main() {
    init_logging();

    let config = Config::from_env();
    info!(
        base_url = %config.base_url,
        poll_interval_secs = config.poll_interval.as_secs(),
        "starting equity poller"
    );

    let store = Arc::new(Mutex::new(SeriesStore::new()));
    let client = ApiClient::new(config.base_url.clone());
    let _poller = arena_client::spawn_equity_poller(
        store.clone(),
        client,
        Ingestor::default(),
        config.poll_interval,
    );

    // Summary cadence is deliberately slower than the poll cadence.
    let mut ticker = interval(Duration::from_secs(30));
    loop {
        ticker.tick().await;
        log_summary(&store).await;
    }
}

async fn log_summary(store: &Arc<Mutex<SeriesStore>>) {
    let store = store.lock().await;
    if store.is_empty() {
        info!("series empty, waiting for first successful poll");
        return;
    }

    let series = store.ordered_series();
    let latest = store
        .latest_timestamp()
        .and_then(DateTime::<Utc>::from_timestamp_millis)
        .map(|dt| dt.to_rfc3339())
        .unwrap_or_else(|| "-".to_string());

    let view = ViewConfig {
        range: RangeMode::LastHours(72),
        mode: ValueMode::PercentOfBaseline,
        ..ViewConfig::default()
    };
    let now_ms = Utc::now().timestamp_millis();
    let projected = pad_single_point(project(&series, &view, now_ms));

    info!(
        points = series.len(),
        entities = store.entity_ids().len(),
        latest = %latest,
        projected_72h = projected.len(),
        "series summary"
    );
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}
