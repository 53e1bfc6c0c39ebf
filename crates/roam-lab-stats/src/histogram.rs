use crate::error::StatsError;

/// Count timestamps into one-second buckets `[k, k + 1)` for `k` in `0..horizon`.
///
/// Timestamps outside `[0, horizon)` and non-finite values are dropped. Input
/// order does not matter.
pub fn histogram(timestamps: &[f64], horizon: u32) -> Result<Vec<u64>, StatsError> {
    histogram_range(timestamps, 0, horizon)
}

/// Like [`histogram`], but only buckets `start..horizon` are kept. Slot `i` of
/// the result covers `[start + i, start + i + 1)`.
pub fn histogram_range(timestamps: &[f64], start: u32, horizon: u32) -> Result<Vec<u64>, StatsError> {
    if start >= horizon {
        return Err(StatsError::InvalidHorizon { start, horizon });
    }

    let lower = f64::from(start);
    let upper = f64::from(horizon);
    let mut counts = vec![0u64; (horizon - start) as usize];

    for &t in timestamps {
        // NaN fails both comparisons
        if !(t >= lower && t < upper) {
            continue;
        }
        let slot = (t.floor() - lower) as usize;
        counts[slot] += 1;
    }

    Ok(counts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundaries_fall_into_later_bucket() {
        let counts = histogram(&[0.0, 0.99, 1.0, 4.999, 5.0], 5).unwrap();
        assert_eq!(counts, vec![2, 1, 0, 0, 1]);
    }

    #[test]
    fn empty_input_is_all_zero() {
        assert_eq!(histogram(&[], 3).unwrap(), vec![0, 0, 0]);
    }

    #[test]
    fn unsorted_input_is_tolerated() {
        let sorted = histogram(&[0.5, 1.5, 1.7, 2.2], 4).unwrap();
        let shuffled = histogram(&[2.2, 1.7, 0.5, 1.5], 4).unwrap();
        assert_eq!(sorted, shuffled);
        assert_eq!(sorted, vec![1, 2, 1, 0]);
    }

    #[test]
    fn every_bucket_is_scanned() {
        let counts = histogram(&[7.25, 9.0, 3.5], 10).unwrap();
        assert_eq!(counts, vec![0, 0, 0, 1, 0, 0, 0, 1, 0, 1]);
    }

    #[test]
    fn out_of_horizon_and_non_finite_dropped() {
        let counts = histogram(&[-0.001, 3.0, 12.0, f64::NAN, f64::INFINITY], 3).unwrap();
        assert_eq!(counts, vec![0, 0, 0]);
    }

    #[test]
    fn zero_horizon_is_rejected() {
        assert_eq!(
            histogram(&[0.1], 0),
            Err(StatsError::InvalidHorizon {
                start: 0,
                horizon: 0
            })
        );
    }

    #[test]
    fn warmup_window_skips_leading_seconds() {
        let counts = histogram_range(&[0.5, 2.9, 3.0, 3.1, 4.5], 3, 5).unwrap();
        assert_eq!(counts, vec![2, 1]);
        assert!(histogram_range(&[], 5, 5).is_err());
    }
}
