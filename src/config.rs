use std::env;
use std::str::FromStr;

use crate::services::report::AnalysisOptions;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Upper bound on request body size in bytes.
    pub max_body_bytes: usize,
    /// Defaults applied when a request does not override them.
    pub analysis: AnalysisOptions,
}

pub const DEFAULT_MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 7070,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            analysis: AnalysisOptions::default(),
        }
    }
}

fn parse_var<T: FromStr>(name: &str) -> Option<T> {
    let raw = env::var(name).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!("Ignoring invalid value for {}: {:?}", name, raw);
            None
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let defaults = Self::default();

        Self {
            host: env::var("FINLENS_HOST").unwrap_or(defaults.host),
            port: parse_var("FINLENS_PORT").unwrap_or(defaults.port),
            max_body_bytes: parse_var("FINLENS_MAX_BODY_BYTES")
                .unwrap_or(defaults.max_body_bytes),
            analysis: AnalysisOptions {
                top_n: parse_var::<usize>("FINLENS_TOP_N")
                    .filter(|n| *n > 0)
                    .unwrap_or(defaults.analysis.top_n),
                heatmap_rows: parse_var("FINLENS_HEATMAP_ROWS")
                    .unwrap_or(defaults.analysis.heatmap_rows),
            },
        }
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
