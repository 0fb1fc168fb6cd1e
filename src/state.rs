use std::sync::Arc;

use crate::config::Config;
use crate::services::report::AnalysisOptions;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Configured analysis defaults with any per-request overrides applied.
    pub fn analysis_options(
        &self,
        top_n: Option<usize>,
        heatmap_rows: Option<usize>,
    ) -> AnalysisOptions {
        let defaults = self.config.analysis;
        AnalysisOptions {
            top_n: top_n.filter(|n| *n > 0).unwrap_or(defaults.top_n),
            heatmap_rows: heatmap_rows.unwrap_or(defaults.heatmap_rows),
        }
    }
}
