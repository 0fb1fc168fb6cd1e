use serde::Serialize;

use crate::date_utils::month_label;
use crate::models::{FlowKind, MonthlyFlow};
use crate::services::stats::{volatility_stats, VolatilityMetric};
use crate::sort_utils::sort_by_magnitude;

/// Minimum |z-score| for a month to count as a spike.
pub const SPIKE_Z_THRESHOLD: f64 = 1.5;
pub const MAX_SPIKES: usize = 6;

/// A month whose cash flow stands out from the rest of the year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Spike {
    /// 1-based month number.
    pub month: usize,
    pub label: &'static str,
    /// The series with the largest |z-score| that month.
    pub kind: FlowKind,
    pub value: f64,
    pub z_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VolatilitySummary {
    pub income: VolatilityMetric,
    pub expense: VolatilityMetric,
    pub net: VolatilityMetric,
    /// 0-100, higher is steadier. `None` when no series has a defined CV.
    pub stability_score: Option<f64>,
    pub spikes: Vec<Spike>,
}

impl VolatilitySummary {
    pub fn metric(&self, kind: FlowKind) -> &VolatilityMetric {
        match kind {
            FlowKind::Income => &self.income,
            FlowKind::Expense => &self.expense,
            FlowKind::Net => &self.net,
        }
    }
}

/// Dispersion of income, expense and net across `months`, plus the months
/// that deviate most from their series mean.
pub fn volatility_summary(months: &[MonthlyFlow]) -> Option<VolatilitySummary> {
    if months.is_empty() {
        return None;
    }

    let series = |kind: FlowKind| -> Vec<f64> { months.iter().map(|m| m.value(kind)).collect() };
    let income = volatility_stats(&series(FlowKind::Income));
    let expense = volatility_stats(&series(FlowKind::Expense));
    let net = volatility_stats(&series(FlowKind::Net));

    let cvs: Vec<f64> = [income.cv, expense.cv, net.cv]
        .into_iter()
        .flatten()
        .collect();
    let stability_score = if cvs.is_empty() {
        None
    } else {
        let avg_cv = cvs.iter().sum::<f64>() / cvs.len() as f64;
        Some((100.0 - (avg_cv * 100.0).min(100.0)).max(0.0))
    };

    let mut summary = VolatilitySummary {
        income,
        expense,
        net,
        stability_score,
        spikes: Vec::new(),
    };

    let mut spikes: Vec<Spike> = months
        .iter()
        .enumerate()
        .filter_map(|(idx, month)| {
            let mut best: Option<(FlowKind, f64)> = None;
            for kind in FlowKind::ALL {
                let z = summary.metric(kind).z_score(month.value(kind));
                if best.map_or(true, |(_, b)| z.abs() > b.abs()) {
                    best = Some((kind, z));
                }
            }
            let (kind, z_score) = best?;
            (z_score.abs() >= SPIKE_Z_THRESHOLD).then(|| Spike {
                month: idx + 1,
                label: month_label(idx),
                kind,
                value: month.value(kind),
                z_score,
            })
        })
        .collect();

    sort_by_magnitude(&mut spikes, |s| s.z_score);
    spikes.truncate(MAX_SPIKES);
    summary.spikes = spikes;

    Some(summary)
}
