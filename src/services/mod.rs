pub mod anomaly;
pub mod concentration;
pub mod flows;
pub mod report;
pub mod savings;
pub mod stats;
pub mod volatility;
pub mod yoy;
