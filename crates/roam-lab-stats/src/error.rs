use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum StatsError {
    #[error("run count must be at least 1")]
    InvalidRunCount,

    #[error("horizon {horizon}s does not leave any bucket after warm-up {start}s")]
    InvalidHorizon { start: u32, horizon: u32 },

    #[error("histogram of run {run} has {found} buckets, expected {expected}")]
    LengthMismatch {
        run: usize,
        expected: usize,
        found: usize,
    },

    #[error("{found} x values supplied for {expected} buckets")]
    XValuesMismatch { expected: usize, found: usize },
}
