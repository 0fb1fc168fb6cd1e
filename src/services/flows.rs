use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::date_utils::month_labels;
use crate::models::{BreakdownRow, Overview};
use crate::sort_utils::{sort_by_f64, SortDirection};

pub const DEFAULT_HEATMAP_ROWS: usize = 8;

pub const BUDGET_NODE: &str = "Budget";
pub const SAVINGS_NODE: &str = "Savings";
pub const DEFICIT_NODE: &str = "Deficit";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatmapCell {
    pub month: usize,
    pub value: f64,
    /// |value| relative to the largest |value| in the grid, 0-1.
    pub intensity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatmapRow {
    pub key: String,
    pub name: String,
    pub total: f64,
    pub cells: Vec<HeatmapCell>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Heatmap {
    pub months: Vec<&'static str>,
    pub rows: Vec<HeatmapRow>,
}

/// Category by month grid for the `limit` largest categories over the first
/// `months` months.
pub fn category_heatmap(rows: &[BreakdownRow], months: usize, limit: usize) -> Heatmap {
    let months = months.min(12);
    let mut selected: Vec<&BreakdownRow> = rows.iter().filter(|r| !r.is_other()).collect();
    sort_by_f64(&mut selected, SortDirection::Desc, |r| r.total.abs());
    selected.truncate(limit);

    let max_abs = selected
        .iter()
        .flat_map(|r| r.monthly[..months].iter())
        .fold(0.0_f64, |acc, v| acc.max(v.abs()));

    let rows = selected
        .into_iter()
        .map(|row| HeatmapRow {
            key: row.key.clone(),
            name: row.name.clone(),
            total: row.total,
            cells: row.monthly[..months]
                .iter()
                .enumerate()
                .map(|(idx, value)| HeatmapCell {
                    month: idx + 1,
                    value: *value,
                    intensity: if max_abs > 0.0 {
                        value.abs() / max_abs
                    } else {
                        0.0
                    },
                })
                .collect(),
        })
        .collect();

    Heatmap {
        months: month_labels(months),
        rows,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SankeyNode {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SankeyLink {
    pub source: String,
    pub target: String,
    pub value: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Sankey {
    pub nodes: Vec<SankeyNode>,
    pub links: Vec<SankeyLink>,
}

impl Sankey {
    fn push_node(&mut self, name: &str) {
        self.nodes.push(SankeyNode {
            name: name.to_string(),
        });
    }

    fn push_link(&mut self, source: &str, target: &str, value: f64) {
        self.links.push(SankeyLink {
            source: source.to_string(),
            target: target.to_string(),
            value,
        });
    }
}

/// Sums rows by display name, drops empty ones and ranks the rest by size.
fn totals_by_name(rows: &[BreakdownRow]) -> Vec<(String, f64)> {
    let mut order: Vec<String> = Vec::new();
    let mut sums: HashMap<String, f64> = HashMap::new();
    for row in rows {
        let name = if row.name.trim().is_empty() {
            "Uncategorized".to_string()
        } else {
            row.name.trim().to_string()
        };
        let entry = sums.entry(name.clone()).or_insert_with(|| {
            order.push(name);
            0.0
        });
        *entry += row.total.abs();
    }

    let mut totals: Vec<(String, f64)> = order
        .into_iter()
        .filter_map(|name| {
            let value = sums.get(&name).copied().unwrap_or(0.0);
            (value > 0.0).then_some((name, value))
        })
        .collect();
    sort_by_f64(&mut totals, SortDirection::Desc, |(_, v)| *v);
    totals
}

/// Income categories flowing into a central budget node and out to expense
/// categories, balanced by a savings or deficit node.
///
/// Names that occur on both sides are suffixed so that no node flows both
/// into and out of the budget.
pub fn cash_flow_sankey(overview: &Overview) -> Sankey {
    let income = totals_by_name(&overview.income_category_breakdown);
    let expense = totals_by_name(&overview.category_breakdown);

    let income_total: f64 = income.iter().map(|(_, v)| v).sum();
    let expense_total: f64 = expense.iter().map(|(_, v)| v).sum();
    let balance = income_total - expense_total;

    let reserved = [BUDGET_NODE, SAVINGS_NODE, DEFICIT_NODE];
    let expense_names: HashSet<String> = expense
        .iter()
        .map(|(name, _)| {
            if reserved.contains(&name.as_str()) {
                format!("{} (Out)", name)
            } else {
                name.clone()
            }
        })
        .collect();

    let mut sankey = Sankey::default();

    for (name, value) in &income {
        let node = if expense_names.contains(name) || reserved.contains(&name.as_str()) {
            format!("{} (In)", name)
        } else {
            name.clone()
        };
        sankey.push_node(&node);
        sankey.push_link(&node, BUDGET_NODE, *value);
    }
    if balance < 0.0 {
        sankey.push_node(DEFICIT_NODE);
        sankey.push_link(DEFICIT_NODE, BUDGET_NODE, -balance);
    }

    sankey.push_node(BUDGET_NODE);

    for (name, value) in &expense {
        let node = if reserved.contains(&name.as_str()) {
            format!("{} (Out)", name)
        } else {
            name.clone()
        };
        sankey.push_node(&node);
        sankey.push_link(BUDGET_NODE, &node, *value);
    }
    if balance > 0.0 {
        sankey.push_node(SAVINGS_NODE);
        sankey.push_link(BUDGET_NODE, SAVINGS_NODE, balance);
    }

    if sankey.links.is_empty() {
        return Sankey::default();
    }
    sankey
}
