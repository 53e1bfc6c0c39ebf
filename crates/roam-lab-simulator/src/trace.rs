use roam_lab_abstract::{RoutingProtocol, ScenarioConfig};
use serde::Serialize;

/// Packets the channel refused, by reason.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DropCounts {
    pub no_coverage: u32,
    pub route_recovery: u32,
    pub random_loss: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub seed: u64,
    pub routing: RoutingProtocol,
    pub duration_s: f64,
    pub packets_sent: u32,
    pub packets_delivered: u32,
    pub handoffs: u32,
    pub drops: DropCounts,
}

/// A compact textual summary of a channel event.
#[derive(Debug, Clone, Serialize)]
pub struct LinkEventSummary {
    pub time_s: f64,
    pub description: String,
}

/// Everything recorded about a single run, for `--trace-out`.
#[derive(Debug, Clone, Serialize)]
pub struct RunTrace {
    pub config: ScenarioConfig,
    pub report: RunReport,
    pub link_events: Vec<LinkEventSummary>,
}
