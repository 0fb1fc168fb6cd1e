use serde::Serialize;

use crate::date_utils::month_label;
use crate::services::stats::{median, median_absolute_deviation, volatility_stats};
use crate::sort_utils::{sort_by_f64, SortDirection};

/// Makes the MAD a consistent estimator of the standard deviation for
/// normally distributed data.
pub const MAD_SCALE: f64 = 1.4826;
pub const NOTABLE_SCORE_THRESHOLD: f64 = 2.8;
pub const MAX_NOTABLE_MONTHS: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Above,
    Below,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NotableMonth {
    /// 1-based month number.
    pub month: usize,
    pub label: &'static str,
    pub value: f64,
    pub score: f64,
    pub direction: Direction,
}

/// Months that sit far from the median of `values`, measured in scaled MADs.
///
/// Falls back to the population standard deviation when the MAD is zero and
/// to `1` when both are zero. Zero-valued months are never reported.
pub fn notable_months(values: &[f64]) -> Vec<NotableMonth> {
    if values.is_empty() {
        return Vec::new();
    }

    let center = median(values);
    let scaled_mad = median_absolute_deviation(values, Some(center)) * MAD_SCALE;
    let std_dev = volatility_stats(values).std_dev;
    let scale = if scaled_mad > 0.0 {
        scaled_mad
    } else if std_dev > 0.0 {
        std_dev
    } else {
        1.0
    };

    let mut notable: Vec<NotableMonth> = values
        .iter()
        .enumerate()
        .filter(|(_, value)| **value != 0.0)
        .map(|(idx, value)| NotableMonth {
            month: idx + 1,
            label: month_label(idx),
            value: *value,
            score: (value - center).abs() / scale,
            direction: if *value >= center {
                Direction::Above
            } else {
                Direction::Below
            },
        })
        .filter(|m| m.score >= NOTABLE_SCORE_THRESHOLD)
        .collect();

    sort_by_f64(&mut notable, SortDirection::Desc, |m| m.score);
    notable.truncate(MAX_NOTABLE_MONTHS);
    notable
}
