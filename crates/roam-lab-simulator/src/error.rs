use roam_lab_stats::StatsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid scenario: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Stats(#[from] StatsError),
}
