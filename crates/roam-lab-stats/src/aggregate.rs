use crate::error::StatsError;
use serde::Serialize;

/// Cross-run summary of one bucket or one swept configuration value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AggregatePoint {
    pub x: f64,
    pub mean: f64,
    /// Population standard deviation across runs.
    pub stddev: f64,
}

/// Reduce per-run histograms index-wise into mean and population stddev.
///
/// All histograms must have the same length. `x_values`, when given, labels
/// each index; otherwise the index itself is used.
pub fn aggregate(
    histograms: &[Vec<u64>],
    x_values: Option<&[f64]>,
) -> Result<Vec<AggregatePoint>, StatsError> {
    let first = histograms.first().ok_or(StatsError::InvalidRunCount)?;
    let len = first.len();

    if let Some((run, h)) = histograms.iter().enumerate().find(|(_, h)| h.len() != len) {
        return Err(StatsError::LengthMismatch {
            run,
            expected: len,
            found: h.len(),
        });
    }

    if let Some(xs) = x_values
        && xs.len() != len
    {
        return Err(StatsError::XValuesMismatch {
            expected: len,
            found: xs.len(),
        });
    }

    let runs = histograms.len() as f64;
    let points = (0..len)
        .map(|i| {
            let mean = histograms.iter().map(|h| h[i] as f64).sum::<f64>() / runs;
            let variance = histograms
                .iter()
                .map(|h| {
                    let d = h[i] as f64 - mean;
                    d * d
                })
                .sum::<f64>()
                / runs;
            AggregatePoint {
                x: x_values.map_or(i as f64, |xs| xs[i]),
                mean,
                stddev: variance.sqrt(),
            }
        })
        .collect();

    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_and_population_stddev() {
        let points = aggregate(&[vec![2, 0], vec![4, 0], vec![6, 0]], None).unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].x, 0.0);
        assert_eq!(points[0].mean, 4.0);
        assert!((points[0].stddev - (8.0f64 / 3.0).sqrt()).abs() < 1e-12);
        assert!((points[0].stddev - 1.633).abs() < 1e-3);
        assert_eq!(points[1].x, 1.0);
        assert_eq!(points[1].mean, 0.0);
        assert_eq!(points[1].stddev, 0.0);
    }

    #[test]
    fn aggregate_is_repeatable() {
        let input = vec![vec![1, 5, 9], vec![3, 2, 0]];
        let before = input.clone();
        let a = aggregate(&input, None).unwrap();
        let b = aggregate(&input, None).unwrap();
        assert_eq!(a, b);
        assert_eq!(input, before);
    }

    #[test]
    fn single_run_has_no_spread() {
        let points = aggregate(&[vec![7, 0, 12]], None).unwrap();
        assert!(points.iter().all(|p| p.stddev == 0.0));
        assert_eq!(points[2].mean, 12.0);
    }

    #[test]
    fn empty_run_set_is_rejected() {
        assert_eq!(aggregate(&[], None), Err(StatsError::InvalidRunCount));
    }

    #[test]
    fn length_mismatch_is_rejected() {
        let err = aggregate(&[vec![1, 2], vec![1, 2, 3]], None).unwrap_err();
        assert_eq!(
            err,
            StatsError::LengthMismatch {
                run: 1,
                expected: 2,
                found: 3
            }
        );
    }

    #[test]
    fn x_values_label_points() {
        let rates = [1e6, 2e6];
        let points = aggregate(&[vec![10, 20], vec![30, 40]], Some(&rates)).unwrap();
        assert_eq!(points[0].x, 1e6);
        assert_eq!(points[1].x, 2e6);
        assert_eq!(points[1].mean, 30.0);
        assert_eq!(points[1].stddev, 10.0);

        let err = aggregate(&[vec![1, 2]], Some(&[1.0])).unwrap_err();
        assert_eq!(
            err,
            StatsError::XValuesMismatch {
                expected: 2,
                found: 1
            }
        );
    }
}
