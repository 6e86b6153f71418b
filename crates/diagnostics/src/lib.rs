//! Fleet Diagnostics Engine
//!
//! Combines deterministic rule faults, an unsupervised outlier model and
//! batch health statistics into one verdict per reading and one summary
//! per batch.

mod config;
mod engine;
mod report;

pub use config::{EngineConfig, LogFormat, LoggingConfig, ShapeErrorPolicy, ENV_PREFIX};
pub use engine::DiagnosticsEngine;
pub use report::{DiagnosticReport, RowReport};

pub use anomaly_scorer::{AnomalyVerdict, ScorerConfig, ScorerError};
pub use reading_table::{Cell, RawTable, Reading, ReadingTable, ValidationError};
pub use rule_engine::{Fault, RuleVerdict};
pub use verdict_fusion::{BatchSummary, FinalStatus, FusionError, RowVerdict};

use thiserror::Error;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Errors that abort analysis of a batch
#[derive(Debug, Error)]
pub enum DiagnosticsError {
    #[error("Malformed input: {0}")]
    MalformedInput(#[from] ValidationError),
    #[error("Data shape error: {0}")]
    DataShape(#[from] ScorerError),
    #[error(transparent)]
    Fusion(#[from] FusionError),
    #[error("Configuration error: {0}")]
    Config(#[from] ::config::ConfigError),
    #[error("Invalid engine configuration: {0}")]
    InvalidConfig(String),
    #[error("Logging setup failed: {0}")]
    Logging(String),
}

/// Initialize logging
pub fn init_logging(config: &LoggingConfig) -> Result<(), DiagnosticsError> {
    let level: Level = config
        .level
        .parse()
        .map_err(|_| DiagnosticsError::Logging(format!("unknown level {:?}", config.level)))?;

    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr);

    let result = match config.format {
        LogFormat::Pretty => tracing::subscriber::set_global_default(builder.finish()),
        LogFormat::Json => tracing::subscriber::set_global_default(builder.json().finish()),
    };

    result.map_err(|e| DiagnosticsError::Logging(e.to_string()))
}
