//! Rolling-sum smoothing of onset strength
//!
//! Spreads each flux peak over its neighbours so the grid phase search
//! rewards grid points that land near an onset, not only exactly on it.

/// Centred rolling sum: `out[i] = Σ values[i - radius ..= i + radius]`
///
/// The window is clamped at both ends of the array. A radius of 0
/// returns a copy of the input.
pub fn rolling_sum(values: &[f64], radius: usize) -> Vec<f64> {
    if radius == 0 || values.is_empty() {
        return values.to_vec();
    }

    let len = values.len();
    let mut out = Vec::with_capacity(len);

    // Running sum over [i - radius, i + radius], seeded with [0, radius)
    let mut sum: f64 = values[..radius.min(len)].iter().sum();
    for i in 0..len {
        if i + radius < len {
            sum += values[i + radius];
        }
        if i > radius {
            sum -= values[i - radius - 1];
        }
        out.push(sum);
    }

    log::debug!("Smoothed {} flux values with radius {}", len, radius);

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rolling_sum_matches_naive() {
        let values: Vec<f64> = (0..40).map(|i| ((i * 7) % 11) as f64).collect();
        let radius = 3;
        let smoothed = rolling_sum(&values, radius);

        for i in 0..values.len() {
            let lo = i.saturating_sub(radius);
            let hi = (i + radius + 1).min(values.len());
            let expected: f64 = values[lo..hi].iter().sum();
            assert!((smoothed[i] - expected).abs() < 1e-9, "mismatch at {}", i);
        }
    }

    #[test]
    fn test_radius_zero_is_identity() {
        let values = vec![1.0, 0.0, 4.0];
        assert_eq!(rolling_sum(&values, 0), values);
    }

    #[test]
    fn test_radius_larger_than_input() {
        let values = vec![1.0, 2.0, 3.0];
        assert_eq!(rolling_sum(&values, 10), vec![6.0, 6.0, 6.0]);
    }
}
