use serde::Serialize;

/// Median of `values`; `0.0` for an empty slice.
pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        sorted[mid]
    } else {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    }
}

/// Median of absolute deviations from `center`, which defaults to the median
/// of `values`.
pub fn median_absolute_deviation(values: &[f64], center: Option<f64>) -> f64 {
    let center = center.unwrap_or_else(|| median(values));
    let deviations: Vec<f64> = values.iter().map(|v| (v - center).abs()).collect();
    median(&deviations)
}

/// Population mean, standard deviation and coefficient of variation of a series.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct VolatilityMetric {
    pub mean: f64,
    pub std_dev: f64,
    /// `None` when the mean is zero.
    pub cv: Option<f64>,
}

impl VolatilityMetric {
    /// Signed distance of `value` from the mean in standard deviations, or
    /// `0.0` for a flat series.
    pub fn z_score(&self, value: f64) -> f64 {
        if self.std_dev > 0.0 {
            (value - self.mean) / self.std_dev
        } else {
            0.0
        }
    }
}

pub fn volatility_stats(values: &[f64]) -> VolatilityMetric {
    if values.is_empty() {
        return VolatilityMetric::default();
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    let std_dev = variance.sqrt();
    let cv = if mean.abs() == 0.0 {
        None
    } else {
        Some(std_dev / mean.abs())
    };

    VolatilityMetric { mean, std_dev, cv }
}

/// Percentage change from `prev` to `current`, undefined unless `prev > 0`.
pub fn percent_change(current: f64, prev: f64) -> Option<f64> {
    if prev > 0.0 {
        Some((current - prev) / prev * 100.0)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_median() {
        assert_eq!(median(&[]), 0.0);
        assert_eq!(median(&[5.0]), 5.0);
        assert_eq!(median(&[3.0, 1.0, 2.0]), 2.0);
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), 2.5);
    }

    #[test]
    fn test_mad_default_center() {
        // median 3, deviations [2, 1, 0, 1, 6] -> median 1
        assert_eq!(median_absolute_deviation(&[1.0, 2.0, 3.0, 4.0, 9.0], None), 1.0);
    }

    #[test]
    fn test_mad_explicit_center() {
        assert_eq!(median_absolute_deviation(&[1.0, 2.0, 3.0], Some(0.0)), 2.0);
        assert_eq!(median_absolute_deviation(&[], None), 0.0);
    }

    #[test]
    fn test_volatility_stats_population() {
        let metric = volatility_stats(&[1000.0, 1000.0, 1000.0, 5000.0]);
        assert_eq!(metric.mean, 2000.0);
        assert!((metric.std_dev - 1732.0508).abs() < 0.001);
        assert!((metric.cv.unwrap() - 0.866025).abs() < 0.0001);
    }

    #[test]
    fn test_volatility_zero_mean_has_no_cv() {
        let metric = volatility_stats(&[-10.0, 10.0]);
        assert_eq!(metric.mean, 0.0);
        assert_eq!(metric.std_dev, 10.0);
        assert!(metric.cv.is_none());

        let empty = volatility_stats(&[]);
        assert_eq!(empty, VolatilityMetric::default());
    }

    #[test]
    fn test_z_score_flat_series() {
        let metric = volatility_stats(&[7.0, 7.0, 7.0]);
        assert_eq!(metric.z_score(100.0), 0.0);
    }

    #[test]
    fn test_percent_change() {
        assert_eq!(percent_change(1200.0, 1000.0), Some(20.0));
        assert_eq!(percent_change(500.0, 0.0), None);
        assert_eq!(percent_change(500.0, -10.0), None);
    }
}
