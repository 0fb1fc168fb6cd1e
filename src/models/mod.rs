pub mod breakdown;
pub mod overview;

pub use breakdown::{BreakdownRow, MONTHS, OTHER_BUCKET};
pub use overview::{
    parse_rows, FlowKind, MonthlyFlow, Overview, OverviewStats, RawBreakdownRow, RawOverview,
    ValidationError,
};
