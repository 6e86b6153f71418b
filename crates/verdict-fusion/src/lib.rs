//! Verdict Fusion Engine
//!
//! Joins the two diagnostic signals for each reading:
//! - rule faults (deterministic thresholds)
//! - model outliers (isolation forest)
//!
//! and reduces the fused verdicts into a fleet-level batch summary.

mod fuser;
mod summary;

pub use fuser::{fuse, fuse_all, FinalStatus, RowVerdict};
pub use summary::{
    AuxHealth, BatchSummarizer, BatchSummary, BrakeBalance, CurrentSpread, DominantFault,
    FaultRecord, LoadStability, SensorStability, BRAKE_BALANCED_STD, MOTOR_TEMP_STABLE_STD,
};

use thiserror::Error;

/// Fusion error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FusionError {
    #[error("Cannot summarize an empty batch")]
    EmptyBatch,

    #[error("{what} has {actual} entries, expected {expected}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },
}
