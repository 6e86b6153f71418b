//! Anomaly Scorer
//!
//! Fits an isolation forest over one batch of readings and flags the rows
//! that isolate anomalously fast. The model lives only for the duration of
//! a single scoring call.

mod forest;
mod scorer;

pub use forest::{average_path_length, IsolationForest};
pub use scorer::{
    AnomalyScorer, AnomalyVerdict, ScorerConfig, CONTAMINATION, DEFAULT_MAX_SAMPLES,
    DEFAULT_TREES, MIN_ROWS, SEED,
};

use feature_engine::FeatureError;
use thiserror::Error;

/// Errors during anomaly scoring
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScorerError {
    #[error("Need at least {min} rows to fit the outlier model, got {actual}")]
    TooFewRows { min: usize, actual: usize },
    #[error("Feature matrix has no columns")]
    EmptyFeatureSet,
    #[error("Feature {column} in row {row} is not finite")]
    NonFiniteFeature { column: String, row: usize },
    #[error("Feature {column} spans a range too wide to split")]
    FeatureRangeOverflow { column: String },
    #[error("Inconsistent feature matrix: {0}")]
    InvalidShape(#[from] FeatureError),
    #[error("Invalid scorer configuration: {0}")]
    InvalidConfig(String),
}

impl ScorerError {
    /// True for errors caused by the batch itself rather than configuration
    pub fn is_data_shape(&self) -> bool {
        !matches!(self, ScorerError::InvalidConfig(_))
    }
}
