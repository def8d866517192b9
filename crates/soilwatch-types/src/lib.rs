//! Shared types for soilwatch NPK sensor dashboards.
//!
//! This crate provides the data model consumed by soilwatch-core and the
//! TUI frontend:
//!
//! - [`Reading`]: one sensor sample (nutrients, ZTotal, RGB, metadata)
//! - [`Timestamp`]: lenient timestamp wrapper (string or numeric epoch)
//! - [`HealthStatus`]: the five-way health category
//! - Error types for user-entered filter values
//!
//! All deserialization in this crate is deliberately lenient: the upstream
//! feed performs no schema validation, so missing or non-numeric fields
//! degrade to `None` rather than failing the whole payload.

pub mod error;
pub mod health;
pub mod reading;

pub use error::{ParseError, ParseResult};
pub use health::HealthStatus;
pub use reading::{Reading, Timestamp};
