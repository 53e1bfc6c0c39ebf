use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Position) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Ad-hoc routing protocol installed on the wireless nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoutingProtocol {
    /// Proactive: a broken route is only noticed once neighbour state times out.
    Olsr,
    /// Reactive: a route error triggers a fresh discovery.
    #[default]
    Aodv,
}

impl RoutingProtocol {
    /// Outage after a hand-off before traffic flows again, in seconds.
    pub fn default_recovery_s(&self) -> f64 {
        match self {
            RoutingProtocol::Olsr => 2.0,
            RoutingProtocol::Aodv => 0.3,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            RoutingProtocol::Olsr => "olsr",
            RoutingProtocol::Aodv => "aodv",
        }
    }
}

impl fmt::Display for RoutingProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Access points laid out row-first on a regular grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApGrid {
    pub count: u32,
    pub grid_width: u32,
    pub min_x: f64,
    pub min_y: f64,
    pub delta_x: f64,
    pub delta_y: f64,
}

impl Default for ApGrid {
    fn default() -> Self {
        Self {
            count: 20,
            grid_width: 5,
            min_x: 10.0,
            min_y: 10.0,
            delta_x: 20.0,
            delta_y: 20.0,
        }
    }
}

impl ApGrid {
    pub fn positions(&self) -> Vec<Position> {
        let width = self.grid_width.max(1);
        (0..self.count)
            .map(|i| {
                let col = (i % width) as f64;
                let row = (i / width) as f64;
                Position::new(
                    self.min_x + col * self.delta_x,
                    self.min_y + row * self.delta_y,
                )
            })
            .collect()
    }
}

/// One-shot change of the robot's travel speed at a fixed simulated time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpeedChange {
    pub at_s: f64,
    pub speed_mps: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioConfig {
    /// Stop time of every run; also the histogram horizon.
    pub sim_time_s: u32,
    pub seed: u64,

    pub routing: RoutingProtocol,
    /// Overrides the protocol's default hand-off outage.
    pub route_recovery_s: Option<f64>,

    pub ap_grid: ApGrid,
    pub server: Position,
    pub robot_start: Position,

    /// Waypoints are drawn uniformly from `[waypoint_min, waypoint_max]` on both axes.
    pub waypoint_min: f64,
    pub waypoint_max: f64,
    pub robot_speed_mps: f64,
    pub robot_pause_s: f64,
    pub speed_changes: Vec<SpeedChange>,

    pub app_start_s: f64,
    /// Defaults to one second before the end of the run.
    pub app_stop_s: Option<f64>,
    pub packet_size: u32,
    pub app_data_rate_bps: u64,
    pub on_time_s: f64,
    pub off_time_s: f64,

    pub wifi_data_rate_bps: u64,
    pub csma_data_rate_bps: u64,
    pub csma_delay_ms: f64,
    pub radio_range_m: f64,
    pub loss_rate: f64,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            sim_time_s: 30,
            seed: 1,
            routing: RoutingProtocol::default(),
            route_recovery_s: None,
            ap_grid: ApGrid::default(),
            server: Position::new(200.0, 50.0),
            robot_start: Position::new(50.0, 50.0),
            waypoint_min: -30.0,
            waypoint_max: 130.0,
            robot_speed_mps: 20.0,
            robot_pause_s: 0.0,
            speed_changes: vec![SpeedChange {
                at_s: 5.0,
                speed_mps: 40.0,
            }],
            app_start_s: 3.0,
            app_stop_s: None,
            packet_size: 1472,
            app_data_rate_bps: 100_000,
            on_time_s: 1.0,
            off_time_s: 1.0,
            wifi_data_rate_bps: 54_000_000,
            csma_data_rate_bps: 5_000_000,
            csma_delay_ms: 2.0,
            radio_range_m: 50.0,
            loss_rate: 0.0,
        }
    }
}

impl ScenarioConfig {
    pub fn route_recovery_s(&self) -> f64 {
        self.route_recovery_s
            .unwrap_or_else(|| self.routing.default_recovery_s())
    }

    pub fn app_stop_s(&self) -> f64 {
        self.app_stop_s
            .unwrap_or(f64::from(self.sim_time_s) - 1.0)
    }

    /// Gap between two packets while the on/off source is in its on phase.
    pub fn packet_interval_s(&self) -> f64 {
        f64::from(self.packet_size) * 8.0 / self.app_data_rate_bps as f64
    }
}
