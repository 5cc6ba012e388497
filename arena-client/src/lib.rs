//! Arena Client - Upstream Polling Layer
//!
//! Talks to the dashboard's upstream HTTP JSON API and feeds polled
//! equity snapshots into an [`arena_series::SeriesStore`]:
//! - [`config`]: environment-driven service configuration
//! - [`client`]: typed endpoint wrappers over `reqwest`
//! - [`poller`]: the seed-then-poll task keeping a shared store current

pub mod client;
pub mod config;
pub mod poller;

pub use client::{AccountTotalsResponse, ApiClient, ClientError};
pub use config::Config;
pub use poller::spawn_equity_poller;
