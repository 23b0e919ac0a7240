//! Metrics calculation module
//!
//! Provides calculators for:
//! - Category breakdowns (origin, county, service, status)
//! - Period-over-period comparisons
//! - Lead conversion figures

pub mod categories;
pub mod comparison;
pub mod conversion;

pub use categories::{CategoryOptions, CategoryRow, CategoryShare, UNKNOWN_CATEGORY};
pub use comparison::{Comparison, Direction};
pub use conversion::{ConversionCounts, ConversionSummary, ConversionVocabulary};
