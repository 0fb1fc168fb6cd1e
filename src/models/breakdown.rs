use serde::Serialize;

pub const MONTHS: usize = 12;

/// Name of the synthetic bucket that aggregates everything below the
/// upstream top-N cutoff.
pub const OTHER_BUCKET: &str = "Other";

/// A named category or merchant aggregate for one year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BreakdownRow {
    pub key: String,
    pub id: Option<String>,
    pub name: String,
    pub total: f64,
    pub monthly: [f64; MONTHS],
}

impl BreakdownRow {
    pub fn new(
        id: Option<String>,
        name: impl Into<String>,
        total: f64,
        monthly: [f64; MONTHS],
    ) -> Self {
        let name = name.into();
        Self {
            key: row_key(id.as_deref(), &name),
            id,
            name,
            total,
            monthly,
        }
    }

    /// A row with a total and no monthly detail.
    pub fn with_total(id: Option<&str>, name: &str, total: f64) -> Self {
        Self::new(id.map(str::to_string), name, total, [0.0; MONTHS])
    }

    pub fn is_other(&self) -> bool {
        is_other_bucket(&self.name)
    }

    /// Leading months up to and including the last non-zero month.
    pub fn active_months(&self) -> usize {
        self.monthly
            .iter()
            .rposition(|v| *v != 0.0)
            .map(|idx| idx + 1)
            .unwrap_or(0)
    }
}

/// Join key for a breakdown row: the id when present, otherwise the name,
/// otherwise `"unknown"`.
pub fn row_key(id: Option<&str>, name: &str) -> String {
    match id.map(str::trim).filter(|id| !id.is_empty()) {
        Some(id) => id.to_string(),
        None => {
            let name = name.trim();
            if name.is_empty() {
                "unknown".to_string()
            } else {
                format!("name:{}", name)
            }
        }
    }
}

pub fn is_other_bucket(name: &str) -> bool {
    name.trim() == OTHER_BUCKET
}
