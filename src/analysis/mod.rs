//! Analysis modules.
//!
//! Aggregation of a loaded table into the series a chart is drawn from.

pub mod aggregator;

pub use aggregator::*;
