use anyhow::{Context, Result};
use roam_lab_stats::AggregatePoint;
use serde::Serialize;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

/// Render points as a whitespace-separated data file, one `x mean stddev`
/// row per point, readable by gnuplot's `with yerrorlines`.
pub fn render_plot_data(title: &str, x_label: &str, points: &[AggregatePoint]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# {title}");
    let _ = writeln!(out, "# {x_label} mean stddev");
    for p in points {
        let _ = writeln!(out, "{} {:.6} {:.6}", p.x, p.mean, p.stddev);
    }
    out
}

pub fn write_plot_data(path: &Path, title: &str, x_label: &str, points: &[AggregatePoint]) -> Result<()> {
    fs::write(path, render_plot_data(title, x_label, points))
        .with_context(|| format!("Failed to write plot data {}", path.display()))
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let data = serde_json::to_vec_pretty(value).context("Failed to serialize report")?;
    fs::write(path, &data).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}
