//! Nightly pattern aggregation.

pub mod aggregator;
pub mod emerging;

pub use aggregator::{AggregationReport, PatternAggregator};
