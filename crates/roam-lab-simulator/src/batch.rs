use crate::engine::Simulator;
use crate::error::EngineError;
use crate::trace::RunReport;
use roam_lab_abstract::{RoutingProtocol, ScenarioConfig, SweepParameter, SweepSpec};
use roam_lab_stats::{AggregatePoint, ArrivalRecorder, StatsError, aggregate};
use serde::Serialize;
use tracing::info;

#[derive(Debug, Clone, Copy)]
pub struct BatchSettings {
    pub runs: u32,
    /// Leading seconds left out of every histogram.
    pub warmup_s: u32,
}

/// Per-second arrivals of every run and their cross-run summary.
#[derive(Debug, Clone, Serialize)]
pub struct BatchOutcome {
    pub routing: RoutingProtocol,
    pub horizon_s: u32,
    pub warmup_s: u32,
    pub histograms: Vec<Vec<u64>>,
    pub points: Vec<AggregatePoint>,
    pub runs: Vec<RunReport>,
}

/// Delivered-packet totals across a swept parameter.
#[derive(Debug, Clone, Serialize)]
pub struct SweepOutcome {
    pub routing: RoutingProtocol,
    pub parameter: SweepParameter,
    pub values: Vec<f64>,
    /// `totals[r][i]` is what run `r` delivered with the `i`-th swept value.
    pub totals: Vec<Vec<u64>>,
    pub points: Vec<AggregatePoint>,
}

fn check_settings(settings: &BatchSettings, horizon: u32) -> Result<(), EngineError> {
    if settings.runs == 0 {
        return Err(StatsError::InvalidRunCount.into());
    }
    if horizon == 0 || settings.warmup_s >= horizon {
        return Err(StatsError::InvalidHorizon {
            start: settings.warmup_s,
            horizon,
        }
        .into());
    }
    Ok(())
}

/// Seed of the `run`-th repetition; each run gets a fresh stream.
fn run_seed(base: u64, run: u32) -> u64 {
    base.wrapping_add(u64::from(run))
}

fn simulate(config: ScenarioConfig, recorder: &mut ArrivalRecorder) -> Result<RunReport, EngineError> {
    let mut sim = Simulator::new(config)?;
    sim.run_until_complete(recorder);
    Ok(sim.export_report())
}

/// Run the scenario `settings.runs` times and aggregate arrivals per second.
///
/// The recorder is drained after every run, so no run sees another's arrivals.
/// Point `x` values are the absolute second each bucket starts at.
pub fn run_batch(config: &ScenarioConfig, settings: &BatchSettings) -> Result<BatchOutcome, EngineError> {
    let horizon = config.sim_time_s;
    check_settings(settings, horizon)?;

    let mut recorder = ArrivalRecorder::new();
    let mut histograms = Vec::with_capacity(settings.runs as usize);
    let mut runs = Vec::with_capacity(settings.runs as usize);

    for run in 0..settings.runs {
        let run_config = ScenarioConfig {
            seed: run_seed(config.seed, run),
            ..config.clone()
        };
        let report = simulate(run_config, &mut recorder)?;
        histograms.push(recorder.drain_histogram(settings.warmup_s, horizon)?);
        runs.push(report);
    }

    let xs: Vec<f64> = (settings.warmup_s..horizon).map(f64::from).collect();
    let points = aggregate(&histograms, Some(&xs))?;
    info!(
        "Batch of {} runs ({}) aggregated into {} buckets",
        settings.runs,
        config.routing,
        points.len()
    );

    Ok(BatchOutcome {
        routing: config.routing,
        horizon_s: horizon,
        warmup_s: settings.warmup_s,
        histograms,
        points,
        runs,
    })
}

/// For every swept value, run the scenario `settings.runs` times and count the
/// packets delivered after warm-up; aggregate with the swept values as x.
pub fn run_sweep(
    config: &ScenarioConfig,
    settings: &BatchSettings,
    sweep: &SweepSpec,
) -> Result<SweepOutcome, EngineError> {
    let horizon = config.sim_time_s;
    check_settings(settings, horizon)?;
    if sweep.values.is_empty() {
        return Err(EngineError::InvalidConfig(format!(
            "sweep over {} has no values",
            sweep.parameter.name()
        )));
    }

    let mut recorder = ArrivalRecorder::new();
    let mut totals = vec![vec![0u64; sweep.values.len()]; settings.runs as usize];

    for (i, &value) in sweep.values.iter().enumerate() {
        let mut swept = config.clone();
        sweep.parameter.apply(&mut swept, value);

        for run in 0..settings.runs {
            let run_config = ScenarioConfig {
                seed: run_seed(config.seed, run),
                ..swept.clone()
            };
            simulate(run_config, &mut recorder)?;
            let counts = recorder.drain_histogram(settings.warmup_s, horizon)?;
            totals[run as usize][i] = counts.iter().sum();
        }
        info!(
            "Sweep {}={} done ({} runs)",
            sweep.parameter.name(),
            value,
            settings.runs
        );
    }

    let points = aggregate(&totals, Some(&sweep.values))?;

    Ok(SweepOutcome {
        routing: config.routing,
        parameter: sweep.parameter,
        values: sweep.values.clone(),
        totals,
        points,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_runs_fail_before_simulating() {
        let settings = BatchSettings {
            runs: 0,
            warmup_s: 0,
        };
        let err = run_batch(&ScenarioConfig::default(), &settings).unwrap_err();
        assert!(matches!(err, EngineError::Stats(StatsError::InvalidRunCount)));
    }

    #[test]
    fn warmup_must_leave_a_bucket() {
        let settings = BatchSettings {
            runs: 1,
            warmup_s: 30,
        };
        let err = run_batch(&ScenarioConfig::default(), &settings).unwrap_err();
        assert!(matches!(
            err,
            EngineError::Stats(StatsError::InvalidHorizon {
                start: 30,
                horizon: 30
            })
        ));
    }

    #[test]
    fn empty_sweep_is_rejected() {
        let settings = BatchSettings {
            runs: 1,
            warmup_s: 0,
        };
        let sweep = SweepSpec {
            parameter: SweepParameter::AppDataRate,
            values: Vec::new(),
        };
        let err = run_sweep(&ScenarioConfig::default(), &settings, &sweep).unwrap_err();
        assert!(matches!(err, EngineError::InvalidConfig(_)));
    }

    #[test]
    fn run_seeds_are_consecutive() {
        assert_eq!(run_seed(7, 0), 7);
        assert_eq!(run_seed(7, 3), 10);
        assert_eq!(run_seed(u64::MAX, 1), 0);
    }
}
