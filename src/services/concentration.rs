use serde::{Deserialize, Serialize};

use crate::models::breakdown::{is_other_bucket, BreakdownRow};
use crate::sort_utils::{sort_by_f64, SortDirection};

pub const DEFAULT_TOP_N: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub name: String,
    pub total: f64,
}

impl From<&BreakdownRow> for CategoryTotal {
    fn from(row: &BreakdownRow) -> Self {
        Self {
            name: row.name.clone(),
            total: row.total,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryShare {
    pub name: String,
    pub total: f64,
    pub share_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConcentrationSummary {
    pub total: f64,
    pub top_share_pct: f64,
    pub diversity_score: f64,
    pub top_categories: Vec<CategoryShare>,
}

/// How much of the total the largest `top_n` categories account for, and how
/// evenly the total is spread across all categories.
///
/// Totals are taken by absolute value. Returns `None` when there is nothing
/// to measure. The "Other" bucket is left out of the top-N ranking but still
/// counts toward the diversity score.
pub fn concentration(rows: &[CategoryTotal], top_n: usize) -> Option<ConcentrationSummary> {
    if rows.is_empty() {
        return None;
    }
    let total: f64 = rows.iter().map(|r| r.total.abs()).sum();
    if total <= 0.0 {
        return None;
    }

    let herfindahl: f64 = rows.iter().map(|r| (r.total.abs() / total).powi(2)).sum();
    let diversity_score = ((1.0 - herfindahl) * 100.0).max(0.0);

    let mut ranked: Vec<CategoryShare> = rows
        .iter()
        .filter(|r| !is_other_bucket(&r.name))
        .map(|r| CategoryShare {
            name: r.name.clone(),
            total: r.total.abs(),
            share_pct: r.total.abs() / total * 100.0,
        })
        .collect();
    sort_by_f64(&mut ranked, SortDirection::Desc, |c| c.total);
    ranked.truncate(top_n);

    let top_share_pct = ranked.iter().map(|c| c.share_pct).sum();

    Some(ConcentrationSummary {
        total,
        top_share_pct,
        diversity_score,
        top_categories: ranked,
    })
}

pub fn breakdown_concentration(
    rows: &[BreakdownRow],
    top_n: usize,
) -> Option<ConcentrationSummary> {
    let totals: Vec<CategoryTotal> = rows.iter().map(CategoryTotal::from).collect();
    concentration(&totals, top_n)
}
