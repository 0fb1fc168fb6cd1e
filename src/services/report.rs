//! View models assembled from the individual analytics.
//!
//! Everything here is recomputed from scratch for each request; the inputs are
//! already-validated [`Overview`]s and an explicit [`AnalysisOptions`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::date_utils::month_label;
use crate::models::overview::check_year_order;
use crate::models::{BreakdownRow, FlowKind, Overview, ValidationError};
use crate::services::anomaly::{notable_months, NotableMonth};
use crate::services::concentration::{breakdown_concentration, ConcentrationSummary, DEFAULT_TOP_N};
use crate::services::flows::{category_heatmap, Heatmap, DEFAULT_HEATMAP_ROWS};
use crate::services::savings::{decompose_savings, SavingsDecomposition};
use crate::services::stats::median;
use crate::services::volatility::{volatility_summary, VolatilitySummary};
use crate::services::yoy::{compare_stats, join_deltas, DeltaRecord, StatsComparison};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisOptions {
    /// Categories counted in the top share of a concentration summary.
    pub top_n: usize,
    /// Categories shown in the heatmap.
    pub heatmap_rows: usize,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            heatmap_rows: DEFAULT_HEATMAP_ROWS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearComparison {
    pub stats: StatsComparison,
    pub expense_categories: Vec<DeltaRecord>,
    pub income_categories: Vec<DeltaRecord>,
    pub expense_sources: Vec<DeltaRecord>,
    pub income_sources: Vec<DeltaRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearlyAnalysis {
    pub year: i32,
    pub previous_year: Option<i32>,
    /// `None` without a prior year to compare against.
    pub comparison: Option<YearComparison>,
    pub savings: Option<SavingsDecomposition>,
    pub expense_concentration: Option<ConcentrationSummary>,
    pub income_concentration: Option<ConcentrationSummary>,
    pub volatility: Option<VolatilitySummary>,
    pub heatmap: Heatmap,
}

pub fn analyze_year(
    current: &Overview,
    previous: Option<&Overview>,
    options: &AnalysisOptions,
) -> Result<YearlyAnalysis, ValidationError> {
    if let Some(previous) = previous {
        check_year_order(current, previous)?;
    }

    let comparison = previous.map(|previous| YearComparison {
        stats: compare_stats(&current.stats, &previous.stats),
        expense_categories: join_deltas(
            &current.category_breakdown,
            &previous.category_breakdown,
        ),
        income_categories: join_deltas(
            &current.income_category_breakdown,
            &previous.income_category_breakdown,
        ),
        expense_sources: join_deltas(&current.expense_sources, &previous.expense_sources),
        income_sources: join_deltas(&current.income_sources, &previous.income_sources),
    });

    let savings = comparison.as_ref().and_then(|cmp| {
        decompose_savings(
            Some(&current.stats),
            previous.map(|p| &p.stats),
            &cmp.income_categories,
            &cmp.expense_categories,
        )
    });

    let heatmap_months = current
        .category_breakdown
        .iter()
        .map(BreakdownRow::active_months)
        .fold(current.active_months(), usize::max);

    Ok(YearlyAnalysis {
        year: current.year,
        previous_year: previous.map(|p| p.year),
        comparison,
        savings,
        expense_concentration: breakdown_concentration(
            &current.category_breakdown,
            options.top_n,
        ),
        income_concentration: breakdown_concentration(
            &current.income_category_breakdown,
            options.top_n,
        ),
        volatility: volatility_summary(current.active_flows()),
        heatmap: category_heatmap(
            &current.category_breakdown,
            heatmap_months,
            options.heatmap_rows,
        ),
    })
}

/// Which monthly series a drill-down looks at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DrilldownTarget {
    Total { series: FlowKind },
    Category { key: String },
    IncomeCategory { key: String },
    ExpenseSource { key: String },
    IncomeSource { key: String },
}

#[derive(Error, Debug, Clone, PartialEq)]
#[error("no {section} row with key {key:?}")]
pub struct UnknownKey {
    pub section: &'static str,
    pub key: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthPoint {
    pub month: usize,
    pub label: &'static str,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Drilldown {
    pub year: i32,
    pub label: String,
    pub points: Vec<MonthPoint>,
    pub total: f64,
    pub average: f64,
    pub median: f64,
    pub notable_months: Vec<NotableMonth>,
}

fn find_row<'a>(
    rows: &'a [BreakdownRow],
    section: &'static str,
    key: &str,
) -> Result<&'a BreakdownRow, UnknownKey> {
    rows.iter().find(|r| r.key == key).ok_or_else(|| UnknownKey {
        section,
        key: key.to_string(),
    })
}

/// Monthly values of a row over the overview's active months, extended to the
/// row's own last non-zero month when the flows stop earlier or are missing.
fn row_series(overview: &Overview, row: &BreakdownRow) -> (String, Vec<f64>) {
    let months = overview.active_months().max(row.active_months());
    (row.name.clone(), row.monthly[..months].to_vec())
}

pub fn drilldown(overview: &Overview, target: &DrilldownTarget) -> Result<Drilldown, UnknownKey> {
    let (label, values): (String, Vec<f64>) = match target {
        DrilldownTarget::Total { series } => (
            series.label().to_string(),
            overview.active_flows().iter().map(|m| m.value(*series)).collect(),
        ),
        DrilldownTarget::Category { key } => {
            row_series(overview, find_row(&overview.category_breakdown, "category", key)?)
        }
        DrilldownTarget::IncomeCategory { key } => row_series(
            overview,
            find_row(&overview.income_category_breakdown, "income category", key)?,
        ),
        DrilldownTarget::ExpenseSource { key } => row_series(
            overview,
            find_row(&overview.expense_sources, "expense source", key)?,
        ),
        DrilldownTarget::IncomeSource { key } => row_series(
            overview,
            find_row(&overview.income_sources, "income source", key)?,
        ),
    };

    // Summing an empty f64 iterator yields -0.0.
    let (total, average) = if values.is_empty() {
        (0.0, 0.0)
    } else {
        let total: f64 = values.iter().sum();
        (total, total / values.len() as f64)
    };

    Ok(Drilldown {
        year: overview.year,
        label,
        points: values
            .iter()
            .enumerate()
            .map(|(idx, value)| MonthPoint {
                month: idx + 1,
                label: month_label(idx),
                value: *value,
            })
            .collect(),
        total,
        average,
        median: median(&values),
        notable_months: notable_months(&values),
    })
}
