use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::breakdown::BreakdownRow;
use crate::models::OverviewStats;
use crate::services::stats::percent_change;
use crate::sort_utils::sort_by_magnitude;

/// Year-over-year change of one category or source.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeltaRecord {
    pub key: String,
    pub id: Option<String>,
    pub name: String,
    pub current: f64,
    pub prev: f64,
    pub delta: f64,
    /// `None` when the prior-year value is not positive.
    pub delta_pct: Option<f64>,
}

#[derive(Default)]
struct JoinedRow {
    id: Option<String>,
    name: Option<String>,
    current: f64,
    prev: f64,
}

impl JoinedRow {
    /// First id and first non-"Other" name seen win. A key that only ever
    /// carries the "Other" name keeps `name` unset.
    fn merge_identity(&mut self, row: &BreakdownRow) {
        if self.id.is_none() {
            self.id = row.id.clone();
        }
        if self.name.is_none() && !row.is_other() {
            self.name = Some(row.name.clone());
        }
    }
}

/// Full outer join of two yearly breakdowns on the row key.
///
/// A key missing from one year counts as zero there. The result holds one
/// record per key, ranked by absolute change with the largest first. Keys
/// whose rows are all named "Other" are dropped; a key that was a named
/// category in either year is kept under that name.
pub fn join_deltas(current: &[BreakdownRow], previous: &[BreakdownRow]) -> Vec<DeltaRecord> {
    let mut joined: BTreeMap<&str, JoinedRow> = BTreeMap::new();

    for row in current {
        let entry = joined.entry(row.key.as_str()).or_default();
        entry.current += row.total;
        entry.merge_identity(row);
    }
    for row in previous {
        let entry = joined.entry(row.key.as_str()).or_default();
        entry.prev += row.total;
        entry.merge_identity(row);
    }

    let mut records: Vec<DeltaRecord> = joined
        .into_iter()
        .filter_map(|(key, row)| {
            let name = row.name?;
            let delta = row.current - row.prev;
            Some(DeltaRecord {
                key: key.to_string(),
                id: row.id,
                name,
                current: row.current,
                prev: row.prev,
                delta,
                delta_pct: percent_change(row.current, row.prev),
            })
        })
        .collect();

    sort_by_magnitude(&mut records, |r| r.delta);
    records
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MetricDelta {
    pub current: f64,
    pub prev: f64,
    pub delta: f64,
    pub delta_pct: Option<f64>,
}

impl MetricDelta {
    pub fn new(current: f64, prev: f64) -> Self {
        Self {
            current,
            prev,
            delta: current - prev,
            delta_pct: percent_change(current, prev),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StatsComparison {
    pub income: MetricDelta,
    pub expense: MetricDelta,
    pub net: MetricDelta,
    pub savings_rate_current: Option<f64>,
    pub savings_rate_prev: Option<f64>,
}

/// Net savings as a percentage of income, undefined without positive income.
pub fn savings_rate(stats: &OverviewStats) -> Option<f64> {
    if stats.total_income > 0.0 {
        Some(stats.net_savings / stats.total_income * 100.0)
    } else {
        None
    }
}

pub fn compare_stats(current: &OverviewStats, previous: &OverviewStats) -> StatsComparison {
    StatsComparison {
        income: MetricDelta::new(current.total_income, previous.total_income),
        expense: MetricDelta::new(current.total_expense, previous.total_expense),
        net: MetricDelta::new(current.net_savings, previous.net_savings),
        savings_rate_current: savings_rate(current),
        savings_rate_prev: savings_rate(previous),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: Option<&str>, name: &str, total: f64) -> BreakdownRow {
        BreakdownRow::with_total(id, name, total)
    }

    #[test]
    fn test_grocery_increase() {
        let deltas = join_deltas(
            &[row(None, "Groceries", 1200.0)],
            &[row(None, "Groceries", 1000.0)],
        );
        assert_eq!(deltas.len(), 1);
        let groceries = &deltas[0];
        assert_eq!(groceries.key, "name:Groceries");
        assert_eq!(groceries.current, 1200.0);
        assert_eq!(groceries.prev, 1000.0);
        assert_eq!(groceries.delta, 200.0);
        assert_eq!(groceries.delta_pct, Some(20.0));
    }

    #[test]
    fn test_new_category_has_no_percentage() {
        let deltas = join_deltas(&[row(None, "Bonus", 500.0)], &[]);
        assert_eq!(deltas[0].prev, 0.0);
        assert_eq!(deltas[0].delta, 500.0);
        assert_eq!(deltas[0].delta_pct, None);
    }

    #[test]
    fn test_dropped_category_appears_with_zero_current() {
        let deltas = join_deltas(&[], &[row(Some("9"), "Gym", 300.0)]);
        assert_eq!(deltas[0].current, 0.0);
        assert_eq!(deltas[0].delta, -300.0);
        assert_eq!(deltas[0].delta_pct, Some(-100.0));
        assert_eq!(deltas[0].id.as_deref(), Some("9"));
    }

    #[test]
    fn test_ranked_by_absolute_delta_and_other_excluded() {
        let current = vec![
            row(Some("1"), "Rent", 12000.0),
            row(Some("2"), "Travel", 500.0),
            row(None, "Other", 9000.0),
        ];
        let previous = vec![
            row(Some("1"), "Rent", 11900.0),
            row(Some("2"), "Travel", 3000.0),
            row(Some("3"), "Car", 1000.0),
            row(None, "Other", 100.0),
        ];

        let deltas = join_deltas(&current, &previous);
        let names: Vec<&str> = deltas.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["Travel", "Car", "Rent"]);
    }

    #[test]
    fn test_id_joins_across_renames() {
        let deltas = join_deltas(
            &[row(Some("4"), "Dining Out", 80.0)],
            &[row(Some("4"), "Restaurants", 100.0)],
        );
        assert_eq!(deltas.len(), 1);
        assert_eq!(deltas[0].name, "Dining Out");
        assert_eq!(deltas[0].delta, -20.0);
    }

    #[test]
    fn test_category_renamed_to_other_keeps_prior_spend() {
        let deltas = join_deltas(
            &[row(Some("5"), "Other", 40.0)],
            &[row(Some("5"), "Misc", 250.0)],
        );
        assert_eq!(deltas.len(), 1);
        assert_eq!(deltas[0].key, "5");
        assert_eq!(deltas[0].name, "Misc");
        assert_eq!(deltas[0].prev, 250.0);
        assert_eq!(deltas[0].delta, -210.0);
    }

    #[test]
    fn test_duplicate_keys_are_summed() {
        let deltas = join_deltas(
            &[row(None, "Coffee", 10.0), row(None, "Coffee", 15.0)],
            &[row(None, "Coffee", 20.0)],
        );
        assert_eq!(deltas.len(), 1);
        assert_eq!(deltas[0].current, 25.0);
    }

    #[test]
    fn test_compare_stats() {
        let current = OverviewStats {
            total_income: 60000.0,
            total_expense: 45000.0,
            net_savings: 15000.0,
        };
        let previous = OverviewStats {
            total_income: 50000.0,
            total_expense: 50000.0,
            net_savings: 0.0,
        };

        let cmp = compare_stats(&current, &previous);
        assert_eq!(cmp.income.delta, 10000.0);
        assert_eq!(cmp.income.delta_pct, Some(20.0));
        assert_eq!(cmp.expense.delta_pct, Some(-10.0));
        assert_eq!(cmp.net.delta, 15000.0);
        assert_eq!(cmp.net.delta_pct, None);
        assert_eq!(cmp.savings_rate_current, Some(25.0));
        assert_eq!(cmp.savings_rate_prev, Some(0.0));
    }

    #[test]
    fn test_savings_rate_without_income() {
        assert_eq!(savings_rate(&OverviewStats::default()), None);
    }
}
