pub mod config;
pub mod interface;
pub mod scenario;

pub use interface::ArrivalSink;

pub use config::{ApGrid, Position, RoutingProtocol, ScenarioConfig, SpeedChange};
pub use scenario::{BatchFile, ScenarioOverride, SweepParameter, SweepSpec};
