//! Engine configuration

use crate::DiagnosticsError;
use anomaly_scorer::ScorerConfig;
use ::config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Environment variable prefix, e.g. `FLEET_DIAG__SCORER__SEED=7`
pub const ENV_PREFIX: &str = "FLEET_DIAG";

/// What to do when the outlier model cannot be fitted on a batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeErrorPolicy {
    /// Fail the whole batch
    #[default]
    Abort,
    /// Continue with rule verdicts only
    Skip,
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Max level: trace, debug, info, warn or error
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

/// Diagnostics engine configuration
///
/// Rule thresholds are fixed and deliberately absent here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub scorer: ScorerConfig,
    pub on_shape_error: ShapeErrorPolicy,
    pub logging: LoggingConfig,
}

impl EngineConfig {
    /// Load defaults, overlaid by an optional TOML file, overlaid by environment
    pub fn load(path: Option<&Path>) -> Result<Self, DiagnosticsError> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            debug!("Loading engine config from {}", path.display());
            builder = builder.add_source(File::from(path).required(true));
        }
        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        );

        Ok(builder.build()?.try_deserialize()?)
    }
}
