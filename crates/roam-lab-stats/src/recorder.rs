use crate::error::StatsError;
use crate::histogram::histogram_range;
use roam_lab_abstract::ArrivalSink;
use tracing::debug;

/// Arrival timestamps of the run currently being simulated.
///
/// Hand a `&mut ArrivalRecorder` to the engine for one run, then call
/// [`ArrivalRecorder::drain_histogram`] before starting the next one.
#[derive(Debug, Default, Clone)]
pub struct ArrivalRecorder {
    arrivals: Vec<f64>,
}

impl ArrivalRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arrivals(&self) -> &[f64] {
        &self.arrivals
    }

    pub fn len(&self) -> usize {
        self.arrivals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arrivals.is_empty()
    }

    pub fn reset(&mut self) {
        self.arrivals.clear();
    }

    /// Bucket the recorded arrivals over `[start, horizon)` and clear the record.
    ///
    /// On error the record is left untouched.
    pub fn drain_histogram(&mut self, start: u32, horizon: u32) -> Result<Vec<u64>, StatsError> {
        let counts = histogram_range(&self.arrivals, start, horizon)?;
        debug!(
            "Drained {} arrivals into {} buckets",
            self.arrivals.len(),
            counts.len()
        );
        self.reset();
        Ok(counts)
    }
}

impl ArrivalSink for ArrivalRecorder {
    fn on_arrival(&mut self, time_s: f64) {
        self.arrivals.push(time_s);
    }
}
