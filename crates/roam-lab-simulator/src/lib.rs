pub mod batch;
pub mod engine;
pub mod error;
pub mod mobility;
pub mod trace;

pub use batch::{BatchOutcome, BatchSettings, SweepOutcome, run_batch, run_sweep};
pub use engine::Simulator;
pub use error::EngineError;
pub use trace::{DropCounts, LinkEventSummary, RunReport, RunTrace};
