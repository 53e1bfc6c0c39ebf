use crate::config::{ApGrid, Position, RoutingProtocol, ScenarioConfig, SpeedChange};
use serde::{Deserialize, Serialize};

/// A batch of repeated runs as loaded from a TOML file.
#[derive(Deserialize, Debug, Clone)]
pub struct BatchFile {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub runs: u32,
    /// Leading seconds excluded from every per-run histogram.
    #[serde(default)]
    pub warmup_s: u32,
    #[serde(default)]
    pub scenario: ScenarioOverride,
    pub sweep: Option<SweepSpec>,
}

/// Scenario fields set by a batch file or the command line. Unknown keys are
/// rejected so that a misspelt field cannot silently fall back to its default.
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct ScenarioOverride {
    pub sim_time_s: Option<u32>,
    pub seed: Option<u64>,
    pub routing: Option<RoutingProtocol>,
    pub route_recovery_s: Option<f64>,
    pub ap_grid: Option<ApGrid>,
    pub server: Option<Position>,
    pub robot_start: Option<Position>,
    pub waypoint_min: Option<f64>,
    pub waypoint_max: Option<f64>,
    pub robot_speed_mps: Option<f64>,
    pub robot_pause_s: Option<f64>,
    pub speed_changes: Option<Vec<SpeedChange>>,
    pub app_start_s: Option<f64>,
    pub app_stop_s: Option<f64>,
    pub packet_size: Option<u32>,
    pub app_data_rate_bps: Option<u64>,
    pub on_time_s: Option<f64>,
    pub off_time_s: Option<f64>,
    pub wifi_data_rate_bps: Option<u64>,
    pub csma_data_rate_bps: Option<u64>,
    pub csma_delay_ms: Option<f64>,
    pub radio_range_m: Option<f64>,
    pub loss_rate: Option<f64>,
}

impl ScenarioOverride {
    pub fn apply_to(&self, config: &mut ScenarioConfig) {
        if let Some(v) = self.sim_time_s {
            config.sim_time_s = v;
        }
        if let Some(v) = self.seed {
            config.seed = v;
        }
        if let Some(v) = self.routing {
            config.routing = v;
        }
        if let Some(v) = self.route_recovery_s {
            config.route_recovery_s = Some(v);
        }
        if let Some(v) = &self.ap_grid {
            config.ap_grid = v.clone();
        }
        if let Some(v) = self.server {
            config.server = v;
        }
        if let Some(v) = self.robot_start {
            config.robot_start = v;
        }
        if let Some(v) = self.waypoint_min {
            config.waypoint_min = v;
        }
        if let Some(v) = self.waypoint_max {
            config.waypoint_max = v;
        }
        if let Some(v) = self.robot_speed_mps {
            config.robot_speed_mps = v;
        }
        if let Some(v) = self.robot_pause_s {
            config.robot_pause_s = v;
        }
        if let Some(v) = &self.speed_changes {
            config.speed_changes = v.clone();
        }
        if let Some(v) = self.app_start_s {
            config.app_start_s = v;
        }
        if let Some(v) = self.app_stop_s {
            config.app_stop_s = Some(v);
        }
        if let Some(v) = self.packet_size {
            config.packet_size = v;
        }
        if let Some(v) = self.app_data_rate_bps {
            config.app_data_rate_bps = v;
        }
        if let Some(v) = self.on_time_s {
            config.on_time_s = v;
        }
        if let Some(v) = self.off_time_s {
            config.off_time_s = v;
        }
        if let Some(v) = self.wifi_data_rate_bps {
            config.wifi_data_rate_bps = v;
        }
        if let Some(v) = self.csma_data_rate_bps {
            config.csma_data_rate_bps = v;
        }
        if let Some(v) = self.csma_delay_ms {
            config.csma_delay_ms = v;
        }
        if let Some(v) = self.radio_range_m {
            config.radio_range_m = v;
        }
        if let Some(v) = self.loss_rate {
            config.loss_rate = v;
        }
    }
}

/// Scenario knob varied across the outer loop of a sweep.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SweepParameter {
    /// WiFi PHY data rate in bit/s.
    WifiDataRate,
    /// Wired backbone data rate in bit/s.
    CsmaDataRate,
    /// Offered load of the robot's on/off source in bit/s.
    AppDataRate,
    /// Robot speed in m/s; replaces any scheduled speed changes.
    RobotSpeed,
}

impl SweepParameter {
    pub fn name(&self) -> &'static str {
        match self {
            SweepParameter::WifiDataRate => "wifi_data_rate",
            SweepParameter::CsmaDataRate => "csma_data_rate",
            SweepParameter::AppDataRate => "app_data_rate",
            SweepParameter::RobotSpeed => "robot_speed",
        }
    }

    pub fn apply(&self, config: &mut ScenarioConfig, value: f64) {
        match self {
            SweepParameter::WifiDataRate => config.wifi_data_rate_bps = value as u64,
            SweepParameter::CsmaDataRate => config.csma_data_rate_bps = value as u64,
            SweepParameter::AppDataRate => config.app_data_rate_bps = value as u64,
            SweepParameter::RobotSpeed => {
                config.robot_speed_mps = value;
                config.speed_changes.clear();
            }
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct SweepSpec {
    pub parameter: SweepParameter,
    pub values: Vec<f64>,
}
