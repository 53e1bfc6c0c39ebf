//! Cross-run statistics for repeated simulation batches.
//!
//! Each run's packet arrivals are bucketed into a fixed-width per-second
//! [`histogram`]; once every run has finished, [`aggregate`] reduces the
//! histograms index-wise into `(x, mean, stddev)` points.

pub mod aggregate;
pub mod error;
pub mod histogram;
pub mod recorder;

pub use aggregate::{AggregatePoint, aggregate};
pub use error::StatsError;
pub use histogram::{histogram, histogram_range};
pub use recorder::ArrivalRecorder;
