mod output;
mod spec;

use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{Level, info};

use roam_lab_abstract::{BatchFile, ScenarioConfig, ScenarioOverride, SweepSpec};
use roam_lab_simulator::{BatchSettings, Simulator, run_batch, run_sweep};

use crate::output::{write_json, write_plot_data};
use crate::spec::{routing_by_name, sweep_by_name};

const DEFAULT_RUNS: u32 = 10;

#[derive(Parser, Debug)]
#[command(author, version, about = "Repeated robot roaming runs with per-second arrival statistics")]
struct Args {
    /// Load a batch description (TOML) from disk.
    #[arg(long)]
    batch: Option<PathBuf>,

    /// Number of repeated runs.
    #[arg(long)]
    runs: Option<u32>,

    /// Simulated seconds per run; also the histogram horizon.
    #[arg(long)]
    sim_time: Option<u32>,

    /// Leading seconds excluded from the statistics.
    #[arg(long)]
    warmup: Option<u32>,

    /// Routing protocol on the wireless nodes (olsr or aodv).
    #[arg(long)]
    routing: Option<String>,

    /// Seed of the first run; run r uses seed + r.
    #[arg(long)]
    seed: Option<u64>,

    /// Parameter to sweep instead of aggregating over time.
    #[arg(long, requires = "values")]
    sweep: Option<String>,

    /// Comma-separated values for --sweep.
    #[arg(long, value_delimiter = ',', num_args = 1.., requires = "sweep")]
    values: Vec<f64>,

    /// Write `x mean stddev` rows for the plot renderer.
    #[arg(long)]
    plot_out: Option<PathBuf>,

    /// Write the full JSON report of the batch.
    #[arg(long)]
    report_out: Option<PathBuf>,

    /// Write a JSON trace of one run with the base seed.
    #[arg(long)]
    trace_out: Option<PathBuf>,

    /// Log every simulator event.
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);
    info!("roam-lab starting…");

    let batch = match &args.batch {
        Some(path) => load_batch(path)?,
        None => default_batch(),
    };
    info!("Batch: {}", batch.name);
    if !batch.description.is_empty() {
        info!("Description: {}", batch.description);
    }

    let config = args.scenario_config(&batch)?;
    let settings = BatchSettings {
        runs: args.runs.unwrap_or(batch.runs),
        warmup_s: args.warmup.unwrap_or(batch.warmup_s),
    };
    let sweep = args.sweep_spec(&batch)?;

    if let Some(path) = &args.trace_out {
        let mut sim = Simulator::new(config.clone())?;
        sim.run_until_complete(&mut Vec::<f64>::new());
        write_json(path, &sim.export_trace())?;
        info!("Trace written to {}", path.display());
    }

    let title = format!("{} ({}, {} runs)", batch.name, config.routing, settings.runs);

    if let Some(sweep) = sweep {
        let outcome = run_sweep(&config, &settings, &sweep)?;
        for p in &outcome.points {
            info!(
                "{}={} delivered mean={:.2} stddev={:.2}",
                sweep.parameter.name(),
                p.x,
                p.mean,
                p.stddev
            );
        }
        if let Some(path) = &args.plot_out {
            write_plot_data(path, &title, sweep.parameter.name(), &outcome.points)?;
        }
        if let Some(path) = &args.report_out {
            write_json(path, &outcome)?;
        }
    } else {
        let outcome = run_batch(&config, &settings)?;
        log_summary(&outcome.points);
        if let Some(path) = &args.plot_out {
            write_plot_data(path, &title, "time_s", &outcome.points)?;
        }
        if let Some(path) = &args.report_out {
            write_json(path, &outcome)?;
        }
    }

    Ok(())
}

impl Args {
    /// Defaults, then the batch file's overrides, then command-line flags.
    fn scenario_config(&self, batch: &BatchFile) -> Result<ScenarioConfig> {
        let mut config = ScenarioConfig::default();
        batch.scenario.apply_to(&mut config);

        let flags = ScenarioOverride {
            sim_time_s: self.sim_time,
            seed: self.seed,
            routing: self.routing.as_deref().map(routing_by_name).transpose()?,
            ..Default::default()
        };
        flags.apply_to(&mut config);
        Ok(config)
    }

    fn sweep_spec(&self, batch: &BatchFile) -> Result<Option<SweepSpec>> {
        match &self.sweep {
            Some(name) => Ok(Some(SweepSpec {
                parameter: sweep_by_name(name)?,
                values: self.values.clone(),
            })),
            None => Ok(batch.sweep.clone()),
        }
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt().with_max_level(level).init();
}

fn default_batch() -> BatchFile {
    BatchFile {
        name: "default".to_string(),
        description: String::new(),
        runs: DEFAULT_RUNS,
        warmup_s: 0,
        scenario: ScenarioOverride::default(),
        sweep: None,
    }
}

fn load_batch(path: &Path) -> Result<BatchFile> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read batch file {}", path.display()))?;
    let batch: BatchFile = toml::from_str(&content).context("Failed to parse batch file")?;
    Ok(batch)
}

fn log_summary(points: &[roam_lab_stats::AggregatePoint]) {
    let total: f64 = points.iter().map(|p| p.mean).sum();
    let peak = points.iter().map(|p| p.stddev).fold(0.0, f64::max);
    info!(
        "{} buckets | mean arrivals per run: {:.1} | largest per-second stddev: {:.2}",
        points.len(),
        total,
        peak
    );
}
