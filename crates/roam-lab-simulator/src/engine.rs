use crate::error::EngineError;
use crate::mobility::RandomWaypoint;
use crate::trace::{DropCounts, LinkEventSummary, RunReport, RunTrace};
use rand::{Rng, SeedableRng};
use roam_lab_abstract::{ArrivalSink, Position, ScenarioConfig};
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use tracing::{debug, info};

// Keeps the channel draws independent of the mobility draws for a given seed.
const CHANNEL_SEED_SALT: u64 = 0x9E37_79B9_7F4A_7C15;

pub(crate) fn secs_to_us(s: f64) -> u64 {
    (s * 1e6).round().max(0.0) as u64
}

fn us_to_secs(us: u64) -> f64 {
    us as f64 / 1e6
}

#[derive(Debug)]
pub enum EventType {
    /// The on/off source switches phase.
    AppToggle { on: bool },
    /// The source emits one packet, if still in the on phase identified by `generation`.
    AppSend { generation: u64 },
    /// The robot reached the end of its current leg.
    WaypointReached { generation: u64 },
    /// Scheduled one-shot change of the robot's speed.
    SetRobotSpeed { speed_mps: f64 },
    /// A packet reaches the server's sink.
    PacketArrival { seq: u32 },
}

#[derive(Debug)]
struct Event {
    time: u64,
    event_type: EventType,
    id: u64, // Unique ID to differentiate events at same time
}

// Custom Ord for Min-Heap (smallest time pops first)
impl PartialEq for Event {
    fn eq(&self, other: &Self) -> bool {
        self.time == other.time && self.id == other.id
    }
}

impl Eq for Event {}

impl PartialOrd for Event {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Event {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .time
            .cmp(&self.time)
            .then_with(|| other.id.cmp(&self.id))
    }
}

/// Stand-in for the network simulator: drives one run of the robot scenario
/// and reports every packet reaching the server to an [`ArrivalSink`].
///
/// The channel is deliberately coarse. A packet is delivered if the robot is
/// within `radio_range_m` of some AP, no hand-off outage is in progress and the
/// random loss draw passes; it then crosses the WiFi hop and the serialised
/// wired link to the server.
pub struct Simulator {
    /// Current time in microseconds.
    time: u64,
    stop_time: u64,
    event_queue: BinaryHeap<Event>,
    event_id_counter: u64,

    config: ScenarioConfig,
    mobility_rng: rand::rngs::StdRng,
    channel_rng: rand::rngs::StdRng,

    ap_positions: Vec<Position>,
    robot: RandomWaypoint,

    app_on: bool,
    app_generation: u64,
    app_stop_time: u64,
    packet_interval: u64,
    next_seq: u32,

    associated_ap: Option<usize>,
    outage_until: u64,
    csma_free_at: u64,
    wifi_tx_time: u64,
    csma_tx_time: u64,
    csma_delay: u64,

    // Stats
    packets_sent: u32,
    packets_delivered: u32,
    handoffs: u32,
    drops: DropCounts,

    /// Timeline of channel events for the JSON trace.
    link_events: Vec<LinkEventSummary>,
}

impl Simulator {
    pub fn new(config: ScenarioConfig) -> Result<Self, EngineError> {
        validate(&config)?;

        let mobility_rng = rand::rngs::StdRng::seed_from_u64(config.seed);
        let channel_rng = rand::rngs::StdRng::seed_from_u64(config.seed ^ CHANNEL_SEED_SALT);
        let bits = f64::from(config.packet_size) * 8.0;

        Ok(Self {
            time: 0,
            stop_time: secs_to_us(f64::from(config.sim_time_s)),
            event_queue: BinaryHeap::new(),
            event_id_counter: 0,
            mobility_rng,
            channel_rng,
            ap_positions: config.ap_grid.positions(),
            robot: RandomWaypoint::new(
                config.robot_start,
                config.robot_speed_mps,
                config.robot_pause_s,
            ),
            app_on: false,
            app_generation: 0,
            app_stop_time: secs_to_us(config.app_stop_s()),
            packet_interval: secs_to_us(config.packet_interval_s()).max(1),
            next_seq: 0,
            associated_ap: None,
            outage_until: 0,
            csma_free_at: 0,
            wifi_tx_time: secs_to_us(bits / config.wifi_data_rate_bps as f64),
            csma_tx_time: secs_to_us(bits / config.csma_data_rate_bps as f64),
            csma_delay: secs_to_us(config.csma_delay_ms / 1e3),
            packets_sent: 0,
            packets_delivered: 0,
            handoffs: 0,
            drops: DropCounts::default(),
            link_events: Vec::new(),
            config,
        })
    }

    pub fn current_time_s(&self) -> f64 {
        us_to_secs(self.time)
    }

    pub fn link_events(&self) -> &[LinkEventSummary] {
        &self.link_events
    }

    fn push_event(&mut self, time: u64, event_type: EventType) {
        self.event_queue.push(Event {
            time,
            event_type,
            id: self.event_id_counter,
        });
        self.event_id_counter += 1;
    }

    fn log_link_event(&mut self, description: String) {
        self.link_events.push(LinkEventSummary {
            time_s: us_to_secs(self.time),
            description,
        });
    }

    /// Schedule the initial events: first waypoint, speed changes and the source start.
    pub fn init(&mut self) {
        let start = self.config.robot_start;
        let first = self.draw_waypoint();
        if let Some(at) = self.robot.begin_leg(start, first, 0) {
            let generation = self.robot.generation();
            self.push_event(at, EventType::WaypointReached { generation });
        }

        for change in self.config.speed_changes.clone() {
            self.push_event(
                secs_to_us(change.at_s),
                EventType::SetRobotSpeed {
                    speed_mps: change.speed_mps,
                },
            );
        }

        let app_start = secs_to_us(self.config.app_start_s);
        self.push_event(app_start, EventType::AppToggle { on: true });
    }

    /// Process the next event. Returns false once the queue is empty or the
    /// next event lies at or beyond the stop time.
    pub fn step(&mut self, sink: &mut dyn ArrivalSink) -> bool {
        match self.event_queue.peek() {
            Some(e) if e.time < self.stop_time => {}
            _ => return false,
        }
        let Some(event) = self.event_queue.pop() else {
            return false;
        };

        self.time = event.time;
        debug!("Processing event at {}us: {:?}", self.time, event.event_type);

        match event.event_type {
            EventType::AppToggle { on } => self.handle_app_toggle(on),
            EventType::AppSend { generation } => {
                if self.app_on && generation == self.app_generation && self.time < self.app_stop_time {
                    self.send_packet();
                    let next = self.time + self.packet_interval;
                    self.push_event(next, EventType::AppSend { generation });
                }
            }
            EventType::WaypointReached { generation } => {
                if generation != self.robot.generation() {
                    debug!("Skipping stale waypoint event (generation {})", generation);
                    return true;
                }
                let next = self.draw_waypoint();
                if let Some(at) = self.robot.arrive(self.time, next) {
                    let generation = self.robot.generation();
                    self.push_event(at, EventType::WaypointReached { generation });
                }
            }
            EventType::SetRobotSpeed { speed_mps } => {
                info!(
                    "Robot speed {} -> {} m/s at {:.3}s",
                    self.robot.speed_mps(),
                    speed_mps,
                    us_to_secs(self.time)
                );
                if let Some(at) = self.robot.set_speed(self.time, speed_mps) {
                    let generation = self.robot.generation();
                    self.push_event(at, EventType::WaypointReached { generation });
                }
            }
            EventType::PacketArrival { seq } => {
                self.packets_delivered += 1;
                sink.on_arrival(us_to_secs(self.time));
                self.log_link_event(format!("[AP->Server] DELIVERED seq={seq}"));
            }
        }
        true
    }

    pub fn run_until_complete(&mut self, sink: &mut dyn ArrivalSink) {
        self.init();
        while self.step(sink) {}
        self.time = self.time.max(self.stop_time);
        info!(
            "Run seed={} routing={} finished: sent={} delivered={} handoffs={}",
            self.config.seed,
            self.config.routing,
            self.packets_sent,
            self.packets_delivered,
            self.handoffs
        );
    }

    pub fn export_report(&self) -> RunReport {
        RunReport {
            seed: self.config.seed,
            routing: self.config.routing,
            duration_s: us_to_secs(self.time),
            packets_sent: self.packets_sent,
            packets_delivered: self.packets_delivered,
            handoffs: self.handoffs,
            drops: self.drops.clone(),
        }
    }

    pub fn export_trace(&self) -> RunTrace {
        RunTrace {
            config: self.config.clone(),
            report: self.export_report(),
            link_events: self.link_events.clone(),
        }
    }

    fn draw_waypoint(&mut self) -> Position {
        let (min, max) = (self.config.waypoint_min, self.config.waypoint_max);
        Position::new(
            self.mobility_rng.random_range(min..=max),
            self.mobility_rng.random_range(min..=max),
        )
    }

    fn handle_app_toggle(&mut self, on: bool) {
        if self.time >= self.app_stop_time {
            self.app_on = false;
            return;
        }

        self.app_on = on;
        self.app_generation += 1;

        if on {
            let generation = self.app_generation;
            self.push_event(self.time, EventType::AppSend { generation });
            if self.config.off_time_s > 0.0 {
                let off_at = self.time + secs_to_us(self.config.on_time_s);
                self.push_event(off_at, EventType::AppToggle { on: false });
            }
        } else {
            let on_at = self.time + secs_to_us(self.config.off_time_s);
            self.push_event(on_at, EventType::AppToggle { on: true });
        }
    }

    fn nearest_ap_in_range(&self, at: &Position) -> Option<usize> {
        self.ap_positions
            .iter()
            .enumerate()
            .map(|(idx, ap)| (idx, ap.distance(at)))
            .filter(|(_, d)| *d <= self.config.radio_range_m)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(idx, _)| idx)
    }

    fn send_packet(&mut self) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.packets_sent += 1;

        let robot_at = self.robot.position_at(self.time);

        // 1. Coverage
        let Some(ap) = self.nearest_ap_in_range(&robot_at) else {
            self.drops.no_coverage += 1;
            self.log_link_event(format!(
                "[Robot] DROP (no coverage) seq={seq} at ({:.1}, {:.1})",
                robot_at.x, robot_at.y
            ));
            return;
        };

        // 2. Hand-off: the route through the previous AP is stale until recovery ends
        if let Some(previous) = self.associated_ap
            && previous != ap
        {
            self.handoffs += 1;
            self.outage_until = self.time + secs_to_us(self.config.route_recovery_s());
            self.log_link_event(format!(
                "[Robot] HANDOFF AP{previous} -> AP{ap} ({} recovery until {:.3}s)",
                self.config.routing,
                us_to_secs(self.outage_until)
            ));
        }
        self.associated_ap = Some(ap);

        if self.time < self.outage_until {
            self.drops.route_recovery += 1;
            self.log_link_event(format!("[Robot->AP{ap}] DROP (route recovery) seq={seq}"));
            return;
        }

        // 3. Random loss
        if self.channel_rng.random::<f64>() < self.config.loss_rate {
            self.drops.random_loss += 1;
            self.log_link_event(format!("[Robot->AP{ap}] DROP (random loss) seq={seq}"));
            return;
        }

        // 4. WiFi hop, then the shared wired link one packet at a time
        let at_ap = self.time + self.wifi_tx_time;
        let csma_start = at_ap.max(self.csma_free_at);
        self.csma_free_at = csma_start + self.csma_tx_time;
        let arrival = self.csma_free_at + self.csma_delay;

        self.log_link_event(format!(
            "[Robot->AP{ap}->Server] SEND seq={seq} (latency={}us)",
            arrival - self.time
        ));
        self.push_event(arrival, EventType::PacketArrival { seq });
    }
}

fn validate(config: &ScenarioConfig) -> Result<(), EngineError> {
    let invalid = |msg: String| -> Result<(), EngineError> { Err(EngineError::InvalidConfig(msg)) };

    if config.sim_time_s == 0 {
        return invalid("sim_time_s must be positive".into());
    }
    if config.ap_grid.count == 0 {
        return invalid("AP grid must contain at least one AP".into());
    }
    if config.packet_size == 0 {
        return invalid("packet_size must be positive".into());
    }
    if config.app_data_rate_bps == 0 || config.wifi_data_rate_bps == 0 || config.csma_data_rate_bps == 0 {
        return invalid("data rates must be positive".into());
    }
    if !(config.on_time_s > 0.0) || config.off_time_s < 0.0 {
        return invalid(format!(
            "on/off periods {}s/{}s are not usable",
            config.on_time_s, config.off_time_s
        ));
    }
    if config.app_stop_s() <= config.app_start_s {
        return invalid(format!(
            "app stops at {}s before it starts at {}s",
            config.app_stop_s(),
            config.app_start_s
        ));
    }
    if !(0.0..=1.0).contains(&config.loss_rate) {
        return invalid(format!("loss_rate {} outside [0, 1]", config.loss_rate));
    }
    let mut times = vec![
        ("app_start_s", config.app_start_s),
        ("app_stop_s", config.app_stop_s()),
        ("off_time_s", config.off_time_s),
        ("robot_pause_s", config.robot_pause_s),
        ("csma_delay_ms", config.csma_delay_ms),
        ("route_recovery_s", config.route_recovery_s()),
    ];
    times.extend(config.speed_changes.iter().map(|c| ("speed change time", c.at_s)));
    if let Some((name, value)) = times.iter().find(|(_, v)| !v.is_finite() || *v < 0.0) {
        return invalid(format!("{name} {value} must be finite and not negative"));
    }
    if !config.waypoint_min.is_finite()
        || !config.waypoint_max.is_finite()
        || config.waypoint_min >= config.waypoint_max
    {
        return invalid(format!(
            "waypoint area [{}, {}] is empty or unbounded",
            config.waypoint_min, config.waypoint_max
        ));
    }
    if !config.radio_range_m.is_finite() || config.radio_range_m < 0.0 {
        return invalid(format!("radio_range_m {} is not usable", config.radio_range_m));
    }
    let mut speeds = config.speed_changes.iter().map(|c| c.speed_mps);
    if !(config.robot_speed_mps.is_finite() && config.robot_speed_mps >= 0.0)
        || speeds.any(|v| !(v.is_finite() && v >= 0.0))
    {
        return invalid("robot speed must be finite and not negative".into());
    }
    Ok(())
}
