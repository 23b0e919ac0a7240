//! Data models module
//!
//! Contains the data structures shared by the engine:
//! - Contact and lead records
//! - Timestamp and category selectors
//! - Reporting periods and intervals

pub mod period;
pub mod record;

pub use period::{Interval, PeriodSelector};
pub use record::{CategoryField, Record, RecordKind, TimestampPolicy};
