//! Core logic for the soilwatch NPK dashboard.
//!
//! This crate contains everything below the presentation layer:
//!
//! - **Fetch client**: one HTTP GET against the feed URL, returning the
//!   decoded reading sequence verbatim ([`SensorClient`])
//! - **Health classifier**: pure, total mapping from ZTotal to a
//!   [`HealthStatus`](soilwatch_types::HealthStatus) ([`HealthThresholds`])
//! - **History engine**: filter/sort/paginate over the in-memory reading
//!   list as a pure function of its inputs ([`history::view`])
//! - **Polling state**: a reducer that owns the reading list, latest
//!   reading, and error slot across fetch completions ([`PollerState`])
//!
//! # Quick Start
//!
//! ```no_run
//! use soilwatch_core::{HealthThresholds, SensorClient, history};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = SensorClient::new("http://api.ehub.ph/rgb.php")?;
//! let readings = client.fetch_readings().await?;
//!
//! let thresholds = HealthThresholds::default();
//! let query = history::HistoryQuery::default();
//! let page = history::view(
//!     &readings,
//!     &query,
//!     &thresholds,
//!     time::OffsetDateTime::now_utc(),
//! );
//! println!("{} of {} rows", page.rows.len(), page.total_rows);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod history;
pub mod poller;
pub mod thresholds;

pub use client::{ClientError, SensorClient};
pub use history::{DateRange, HistoryPage, HistoryQuery, PAGE_SIZE, view};
pub use poller::{DisplayState, Phase, PollerState};
pub use thresholds::HealthThresholds;

// Re-export the shared types for downstream convenience.
pub use soilwatch_types::{HealthStatus, Reading, Timestamp};
