//! Feature Engineering Engine
//!
//! Batch-level column statistics and the feature matrix fed to the
//! anomaly detector.

mod features;
mod statistics;

pub use features::{FeatureError, FeatureMatrix};
pub use statistics::ColumnStatistics;
