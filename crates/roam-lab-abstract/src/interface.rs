/// Receives packet arrivals observed at the server during a run.
///
/// The engine calls this once per delivered packet, in simulated time order.
/// Implementors own whatever per-run state they accumulate; the engine never
/// resets it.
pub trait ArrivalSink {
    /// Called with the arrival time in simulated seconds.
    fn on_arrival(&mut self, time_s: f64);
}

impl ArrivalSink for Vec<f64> {
    fn on_arrival(&mut self, time_s: f64) {
        self.push(time_s);
    }
}
