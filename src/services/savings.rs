use serde::Serialize;

use crate::models::OverviewStats;
use crate::services::yoy::DeltaRecord;
use crate::sort_utils::sort_by_magnitude;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContributionKind {
    Income,
    Expense,
}

/// Effect of one category's year-over-year change on net savings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Contribution {
    pub key: String,
    pub name: String,
    pub kind: ContributionKind,
    pub delta: f64,
    /// Positive when the change helped savings.
    pub contribution: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SavingsDecomposition {
    pub income_delta: f64,
    pub expense_delta: f64,
    pub net_delta: f64,
    pub contributions: Vec<Contribution>,
}

/// Breaks the change in net savings down into per-category contributions.
///
/// Income gains and expense cuts are put on the same sign convention so they
/// rank together by dollars of savings impact. Returns `None` without both
/// years of stats.
pub fn decompose_savings(
    current: Option<&OverviewStats>,
    previous: Option<&OverviewStats>,
    income_deltas: &[DeltaRecord],
    expense_deltas: &[DeltaRecord],
) -> Option<SavingsDecomposition> {
    let (current, previous) = (current?, previous?);

    let income_delta = current.total_income - previous.total_income;
    let expense_delta = current.total_expense - previous.total_expense;

    let income = income_deltas.iter().map(|d| Contribution {
        key: d.key.clone(),
        name: d.name.clone(),
        kind: ContributionKind::Income,
        delta: d.delta,
        contribution: d.delta,
    });
    let expense = expense_deltas.iter().map(|d| Contribution {
        key: d.key.clone(),
        name: d.name.clone(),
        kind: ContributionKind::Expense,
        delta: d.delta,
        contribution: -d.delta,
    });

    let mut contributions: Vec<Contribution> = income.chain(expense).collect();
    sort_by_magnitude(&mut contributions, |c| c.contribution);

    Some(SavingsDecomposition {
        income_delta,
        expense_delta,
        net_delta: income_delta - expense_delta,
        contributions,
    })
}
