use roam_lab_abstract::Position;

use crate::engine::secs_to_us;

/// Shortest leg the engine schedules; keeps simulated time moving for very fast robots.
pub const MIN_LEG_US: u64 = 1_000;

/// Random-waypoint state of the robot: one straight leg at a time.
///
/// `generation` is bumped whenever the pending leg is re-planned so that an
/// already scheduled arrival event can be recognised as stale.
#[derive(Debug, Clone)]
pub struct RandomWaypoint {
    from: Position,
    to: Position,
    leg_start_us: u64,
    speed_mps: f64,
    pause_us: u64,
    generation: u64,
}

impl RandomWaypoint {
    pub fn new(start: Position, speed_mps: f64, pause_s: f64) -> Self {
        Self {
            from: start,
            to: start,
            leg_start_us: 0,
            speed_mps,
            pause_us: secs_to_us(pause_s),
            generation: 0,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn speed_mps(&self) -> f64 {
        self.speed_mps
    }

    pub fn position_at(&self, now_us: u64) -> Position {
        if now_us <= self.leg_start_us || self.speed_mps <= 0.0 {
            return self.from;
        }
        let total = self.from.distance(&self.to);
        if total == 0.0 {
            return self.from;
        }
        let elapsed_s = (now_us - self.leg_start_us) as f64 / 1e6;
        let fraction = (self.speed_mps * elapsed_s / total).min(1.0);
        Position::new(
            self.from.x + (self.to.x - self.from.x) * fraction,
            self.from.y + (self.to.y - self.from.y) * fraction,
        )
    }

    /// Start a leg from `from` toward `to` at `leg_start_us`.
    /// Returns when the robot will reach `to`, or `None` if it is not moving.
    pub fn begin_leg(&mut self, from: Position, to: Position, leg_start_us: u64) -> Option<u64> {
        self.from = from;
        self.to = to;
        self.leg_start_us = leg_start_us;
        self.generation += 1;
        self.arrival_us()
    }

    /// The current leg finished at `now_us`; head for `next` after the pause.
    pub fn arrive(&mut self, now_us: u64, next: Position) -> Option<u64> {
        let here = self.to;
        self.begin_leg(here, next, now_us + self.pause_us)
    }

    /// Change speed mid-leg, keeping the current destination.
    pub fn set_speed(&mut self, now_us: u64, speed_mps: f64) -> Option<u64> {
        let here = self.position_at(now_us);
        let start = self.leg_start_us.max(now_us);
        self.speed_mps = speed_mps;
        let to = self.to;
        self.begin_leg(here, to, start)
    }

    fn arrival_us(&self) -> Option<u64> {
        if self.speed_mps <= 0.0 {
            return None;
        }
        let travel_s = self.from.distance(&self.to) / self.speed_mps;
        Some(self.leg_start_us + secs_to_us(travel_s).max(MIN_LEG_US))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn moves_linearly_along_leg() {
        let mut robot = RandomWaypoint::new(Position::new(0.0, 0.0), 10.0, 0.0);
        let arrival = robot.begin_leg(Position::new(0.0, 0.0), Position::new(100.0, 0.0), 0);
        assert_eq!(arrival, Some(10_000_000));
        assert_eq!(robot.position_at(5_000_000), Position::new(50.0, 0.0));
        assert_eq!(robot.position_at(20_000_000), Position::new(100.0, 0.0));
    }

    #[test]
    fn speed_change_replans_from_current_position() {
        let mut robot = RandomWaypoint::new(Position::new(0.0, 0.0), 10.0, 0.0);
        robot.begin_leg(Position::new(0.0, 0.0), Position::new(100.0, 0.0), 0);
        let before = robot.generation();
        let arrival = robot.set_speed(5_000_000, 50.0);
        assert_eq!(arrival, Some(6_000_000));
        assert!(robot.generation() > before);
        assert_eq!(robot.position_at(5_500_000), Position::new(75.0, 0.0));
    }

    #[test]
    fn stationary_robot_never_arrives() {
        let mut robot = RandomWaypoint::new(Position::new(1.0, 2.0), 0.0, 0.0);
        assert_eq!(robot.begin_leg(Position::new(1.0, 2.0), Position::new(9.0, 9.0), 0), None);
        assert_eq!(robot.position_at(1_000_000_000), Position::new(1.0, 2.0));
    }

    #[test]
    fn near_instant_leg_still_takes_minimum_time() {
        let mut robot = RandomWaypoint::new(Position::new(0.0, 0.0), 1e10, 0.0);
        let arrival = robot.begin_leg(Position::new(0.0, 0.0), Position::new(1.0, 1.0), 500);
        assert_eq!(arrival, Some(500 + MIN_LEG_US));
        let arrival = robot.arrive(2_000, Position::new(1.0, 1.0));
        assert_eq!(arrival, Some(2_000 + MIN_LEG_US));
    }

    #[test]
    fn pause_holds_position_before_next_leg() {
        let mut robot = RandomWaypoint::new(Position::new(0.0, 0.0), 10.0, 2.0);
        robot.begin_leg(Position::new(0.0, 0.0), Position::new(10.0, 0.0), 0);
        let next = robot.arrive(1_000_000, Position::new(10.0, 10.0));
        assert_eq!(next, Some(4_000_000));
        assert_eq!(robot.position_at(2_500_000), Position::new(10.0, 0.0));
    }
}
