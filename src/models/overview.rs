use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::breakdown::{BreakdownRow, MONTHS};

/// Rejections raised while turning an upstream payload into an [`Overview`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("year {0} is out of range")]
    YearOutOfRange(i32),

    #[error("{field} has {len} monthly values, at most 12 are allowed")]
    TooManyMonths { field: String, len: usize },

    #[error("month {0} is out of range (expected 1-12)")]
    MonthOutOfRange(u32),

    #[error("month {0} appears more than once")]
    DuplicateMonth(u32),

    #[error("{0} is not a finite number")]
    NotFinite(String),

    #[error("previous year {previous} must be earlier than {current}")]
    YearOrder { current: i32, previous: i32 },
}

/// Category identifiers arrive as numbers or strings depending on the endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawId {
    Number(i64),
    Text(String),
}

impl RawId {
    fn normalize(self) -> Option<String> {
        match self {
            RawId::Number(n) => Some(n.to_string()),
            RawId::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                }
            }
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawStats {
    #[serde(default)]
    pub total_income: f64,
    #[serde(default)]
    pub total_expense: f64,
    #[serde(default)]
    pub net_savings: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawMonthlyPoint {
    pub month: u32,
    #[serde(default)]
    pub income: f64,
    #[serde(default)]
    pub expense: f64,
    pub net: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawBreakdownRow {
    #[serde(default)]
    pub id: Option<RawId>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub total: f64,
    #[serde(default)]
    pub monthly: Vec<f64>,
}

/// Yearly overview payload as served by the upstream API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawOverview {
    pub year: i32,
    #[serde(default)]
    pub stats: RawStats,
    #[serde(default)]
    pub monthly: Vec<RawMonthlyPoint>,
    #[serde(default)]
    pub category_breakdown: Vec<RawBreakdownRow>,
    #[serde(default)]
    pub income_category_breakdown: Vec<RawBreakdownRow>,
    #[serde(default)]
    pub income_sources: Vec<RawBreakdownRow>,
    #[serde(default)]
    pub expense_sources: Vec<RawBreakdownRow>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct OverviewStats {
    pub total_income: f64,
    pub total_expense: f64,
    pub net_savings: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct MonthlyFlow {
    pub income: f64,
    pub expense: f64,
    pub net: f64,
}

/// One of the three monthly cash-flow series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowKind {
    Income,
    Expense,
    Net,
}

impl FlowKind {
    pub const ALL: [FlowKind; 3] = [FlowKind::Income, FlowKind::Expense, FlowKind::Net];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Income => "Income",
            Self::Expense => "Expense",
            Self::Net => "Net",
        }
    }
}

impl MonthlyFlow {
    pub fn new(income: f64, expense: f64) -> Self {
        Self {
            income,
            expense,
            net: income - expense,
        }
    }

    pub fn value(&self, kind: FlowKind) -> f64 {
        match kind {
            FlowKind::Income => self.income,
            FlowKind::Expense => self.expense,
            FlowKind::Net => self.net,
        }
    }

    fn is_empty(&self) -> bool {
        self.income == 0.0 && self.expense == 0.0
    }
}

/// A validated yearly overview. Every monthly series holds exactly 12 values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Overview {
    pub year: i32,
    pub stats: OverviewStats,
    pub monthly: [MonthlyFlow; MONTHS],
    pub category_breakdown: Vec<BreakdownRow>,
    pub income_category_breakdown: Vec<BreakdownRow>,
    pub income_sources: Vec<BreakdownRow>,
    pub expense_sources: Vec<BreakdownRow>,
}

impl Overview {
    /// Number of leading months up to and including the last month with any
    /// income or expense. Months after that have not happened yet.
    pub fn active_months(&self) -> usize {
        self.monthly
            .iter()
            .rposition(|m| !m.is_empty())
            .map(|idx| idx + 1)
            .unwrap_or(0)
    }

    pub fn active_flows(&self) -> &[MonthlyFlow] {
        &self.monthly[..self.active_months()]
    }
}

impl TryFrom<RawOverview> for Overview {
    type Error = ValidationError;

    fn try_from(raw: RawOverview) -> Result<Self, Self::Error> {
        if !(1900..=2200).contains(&raw.year) || NaiveDate::from_ymd_opt(raw.year, 1, 1).is_none()
        {
            return Err(ValidationError::YearOutOfRange(raw.year));
        }

        let stats = OverviewStats {
            total_income: finite("stats.total_income", raw.stats.total_income)?,
            total_expense: finite("stats.total_expense", raw.stats.total_expense)?,
            net_savings: finite("stats.net_savings", raw.stats.net_savings)?,
        };

        if raw.monthly.len() > MONTHS {
            return Err(ValidationError::TooManyMonths {
                field: "monthly".into(),
                len: raw.monthly.len(),
            });
        }

        let mut monthly = [MonthlyFlow::default(); MONTHS];
        let mut seen = [false; MONTHS];
        for point in raw.monthly {
            if !(1..=12).contains(&point.month) {
                return Err(ValidationError::MonthOutOfRange(point.month));
            }
            let idx = (point.month - 1) as usize;
            if seen[idx] {
                return Err(ValidationError::DuplicateMonth(point.month));
            }
            seen[idx] = true;

            let income = finite("monthly.income", point.income)?;
            let expense = finite("monthly.expense", point.expense)?;
            let net = match point.net {
                Some(net) => finite("monthly.net", net)?,
                None => income - expense,
            };
            monthly[idx] = MonthlyFlow {
                income,
                expense,
                net,
            };
        }

        Ok(Self {
            year: raw.year,
            stats,
            monthly,
            category_breakdown: parse_rows("category_breakdown", raw.category_breakdown)?,
            income_category_breakdown: parse_rows(
                "income_category_breakdown",
                raw.income_category_breakdown,
            )?,
            income_sources: parse_rows("income_sources", raw.income_sources)?,
            expense_sources: parse_rows("expense_sources", raw.expense_sources)?,
        })
    }
}

/// Validates a prior-year overview against the selected year.
pub fn check_year_order(current: &Overview, previous: &Overview) -> Result<(), ValidationError> {
    if previous.year >= current.year {
        return Err(ValidationError::YearOrder {
            current: current.year,
            previous: previous.year,
        });
    }
    if previous.year != current.year - 1 {
        tracing::warn!(
            current = current.year,
            previous = previous.year,
            "Comparing against a non-adjacent year"
        );
    }
    Ok(())
}

fn finite(field: &str, value: f64) -> Result<f64, ValidationError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ValidationError::NotFinite(field.to_string()))
    }
}

pub fn parse_rows(
    field: &str,
    raw_rows: Vec<RawBreakdownRow>,
) -> Result<Vec<BreakdownRow>, ValidationError> {
    raw_rows
        .into_iter()
        .map(|raw| {
            if raw.monthly.len() > MONTHS {
                return Err(ValidationError::TooManyMonths {
                    field: format!("{}.monthly", field),
                    len: raw.monthly.len(),
                });
            }
            let mut monthly = [0.0; MONTHS];
            for (slot, value) in monthly.iter_mut().zip(raw.monthly) {
                *slot = finite(field, value)?;
            }
            Ok(BreakdownRow::new(
                raw.id.and_then(RawId::normalize),
                raw.name,
                finite(field, raw.total)?,
                monthly,
            ))
        })
        .collect()
}
