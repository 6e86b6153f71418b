//! Batch Health Summary

use crate::{FinalStatus, FusionError, RowVerdict};
use feature_engine::ColumnStatistics;
use reading_table::{ReadingTable, Sensor};
use rule_engine::{Fault, RuleVerdict, AUX_STATUS_VALID};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, info};

/// Motor temperature std (°C) below which load is stable
pub const MOTOR_TEMP_STABLE_STD: f64 = 10.0;
/// Brake pressure std (kg/cm²) below which braking is balanced
pub const BRAKE_BALANCED_STD: f64 = 1.5;

/// Motor temperature spread across the batch
///
/// A single reading has no spread and counts as fluctuating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LoadStability {
    Stable,
    Fluctuating,
}

/// Brake pressure spread across the batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BrakeBalance {
    Balanced,
    Unstable,
}

/// Auxiliary status codes across the batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AuxHealth {
    Nominal,
    Irregular,
}

impl LoadStability {
    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            LoadStability::Stable => "Stable",
            LoadStability::Fluctuating => "Fluctuating",
        }
    }
}

impl fmt::Display for LoadStability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl BrakeBalance {
    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            BrakeBalance::Balanced => "Balanced",
            BrakeBalance::Unstable => "Unstable",
        }
    }
}

impl fmt::Display for BrakeBalance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AuxHealth {
    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            AuxHealth::Nominal => "Nominal",
            AuxHealth::Irregular => "Irregular",
        }
    }
}

impl fmt::Display for AuxHealth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Wheel current differential spread, reported as a magnitude
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CurrentSpread {
    /// Sample standard deviation in amperes, NaN for a single reading
    pub std_dev_amps: f64,
}

impl fmt::Display for CurrentSpread {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.std_dev_amps.is_nan() {
            f.write_str("nan A")
        } else {
            write!(f, "{:.2} A", self.std_dev_amps)
        }
    }
}

/// Per-sensor stability classification
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SensorStability {
    pub motor_temp: LoadStability,
    pub brake_pressure: BrakeBalance,
    pub wheel_current_diff: CurrentSpread,
    pub aux_status: AuxHealth,
}

impl SensorStability {
    /// Classify a batch
    pub fn classify(table: &ReadingTable) -> Self {
        let motor = ColumnStatistics::for_sensor(table, Sensor::MotorTemp);
        let brake = ColumnStatistics::for_sensor(table, Sensor::BrakePressure);
        let wheel = ColumnStatistics::for_sensor(table, Sensor::WheelCurrentDiff);

        Self {
            motor_temp: if motor.std_dev < MOTOR_TEMP_STABLE_STD {
                LoadStability::Stable
            } else {
                LoadStability::Fluctuating
            },
            brake_pressure: if brake.std_dev < BRAKE_BALANCED_STD {
                BrakeBalance::Balanced
            } else {
                BrakeBalance::Unstable
            },
            wheel_current_diff: CurrentSpread {
                std_dev_amps: wheel.std_dev,
            },
            aux_status: if table.iter().all(|r| AUX_STATUS_VALID.contains(&r.aux_status)) {
                AuxHealth::Nominal
            } else {
                AuxHealth::Irregular
            },
        }
    }

    /// Sensor column name to display text
    pub fn as_map(&self) -> BTreeMap<&'static str, String> {
        BTreeMap::from([
            (Sensor::MotorTemp.column_name(), self.motor_temp.to_string()),
            (Sensor::BrakePressure.column_name(), self.brake_pressure.to_string()),
            (Sensor::WheelCurrentDiff.column_name(), self.wheel_current_diff.to_string()),
            (Sensor::AuxStatus.column_name(), self.aux_status.to_string()),
        ])
    }
}

/// Most frequent rule fault among anomalous rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DominantFault {
    pub fault: Fault,
    pub count: usize,
}

/// An anomalous row as shown in the detected-faults listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FaultRecord {
    pub row: usize,
    pub faulty_component: String,
    pub recommended_action: String,
}

/// Fleet-level aggregates for one batch
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchSummary {
    pub total_rows: usize,
    pub anomaly_count: usize,
    /// Share of anomalous rows, percent, two decimals
    pub anomaly_rate_pct: f64,
    pub stability: SensorStability,
    pub dominant_fault: Option<DominantFault>,
    pub fault_records: Vec<FaultRecord>,
}

impl BatchSummary {
    /// One-line description of the dominant fault
    pub fn summary_text(&self) -> String {
        match &self.dominant_fault {
            Some(d) => format!("Most common fault: {} ({} occurrences)", d.fault, d.count),
            None => "No faults detected".to_string(),
        }
    }
}

/// Reduces fused verdicts into a batch summary
#[derive(Debug, Default, Clone, Copy)]
pub struct BatchSummarizer;

impl BatchSummarizer {
    /// Create a new summarizer
    pub fn new() -> Self {
        Self
    }

    /// Summarize a batch; all inputs are index-aligned with the table rows
    pub fn summarize(
        &self,
        table: &ReadingTable,
        rules: &[RuleVerdict],
        rows: &[RowVerdict],
    ) -> Result<BatchSummary, FusionError> {
        let total_rows = table.len();
        if total_rows == 0 {
            return Err(FusionError::EmptyBatch);
        }
        for (what, actual) in [("rule verdicts", rules.len()), ("row verdicts", rows.len())] {
            if actual != total_rows {
                return Err(FusionError::LengthMismatch {
                    what,
                    expected: total_rows,
                    actual,
                });
            }
        }

        let anomaly_count = rows.iter().filter(|r| r.is_anomaly()).count();
        let anomaly_rate_pct = round_pct(anomaly_count as f64 / total_rows as f64 * 100.0);

        let fault_records = rows
            .iter()
            .zip(rules)
            .enumerate()
            .filter(|(_, (row, _))| row.final_status == FinalStatus::Anomaly)
            .map(|(idx, (_, rule))| FaultRecord {
                row: idx,
                faulty_component: rule.faulty_component(),
                recommended_action: rule.recommended_action(),
            })
            .collect();

        let dominant_fault = dominant_fault(rules, rows);
        let stability = SensorStability::classify(table);

        debug!("Sensor stability: {:?}", stability);
        info!(
            "Batch summary: {}/{} anomalous ({:.2}%), dominant fault {:?}",
            anomaly_count, total_rows, anomaly_rate_pct, dominant_fault
        );

        Ok(BatchSummary {
            total_rows,
            anomaly_count,
            anomaly_rate_pct,
            stability,
            dominant_fault,
            fault_records,
        })
    }
}

/// Round to two decimals, ties to even
fn round_pct(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

/// Count labels over anomalous rows; ties go to the label seen first
fn dominant_fault(rules: &[RuleVerdict], rows: &[RowVerdict]) -> Option<DominantFault> {
    let mut counts: Vec<(Fault, usize)> = Vec::new();
    for (rule, row) in rules.iter().zip(rows) {
        if !row.is_anomaly() {
            continue;
        }
        for fault in &rule.faults {
            match counts.iter_mut().find(|(f, _)| f == fault) {
                Some((_, n)) => *n += 1,
                None => counts.push((*fault, 1)),
            }
        }
    }

    counts
        .into_iter()
        .fold(None, |best: Option<DominantFault>, (fault, count)| match best {
            Some(b) if b.count >= count => Some(b),
            _ => Some(DominantFault { fault, count }),
        })
}
