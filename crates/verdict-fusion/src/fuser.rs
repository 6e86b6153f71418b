//! Per-Row Verdict Fusion

use crate::FusionError;
use anomaly_scorer::AnomalyVerdict;
use rule_engine::RuleVerdict;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fused status of one reading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FinalStatus {
    Normal,
    Anomaly,
}

impl FinalStatus {
    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            FinalStatus::Normal => "Normal",
            FinalStatus::Anomaly => "Anomaly",
        }
    }
}

impl fmt::Display for FinalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fused verdict with the signals that produced it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowVerdict {
    pub final_status: FinalStatus,
    /// At least one domain rule fired
    pub rule_triggered: bool,
    /// The outlier model flagged the row
    pub model_triggered: bool,
}

impl RowVerdict {
    /// Check if the row is anomalous
    pub fn is_anomaly(&self) -> bool {
        self.final_status == FinalStatus::Anomaly
    }
}

/// Anomaly when either signal fires
pub fn fuse(rule: &RuleVerdict, anomaly: &AnomalyVerdict) -> RowVerdict {
    let rule_triggered = !rule.is_clean();
    let model_triggered = anomaly.is_outlier;

    RowVerdict {
        final_status: if rule_triggered || model_triggered {
            FinalStatus::Anomaly
        } else {
            FinalStatus::Normal
        },
        rule_triggered,
        model_triggered,
    }
}

/// Fuse index-aligned verdict sequences
pub fn fuse_all(
    rules: &[RuleVerdict],
    anomalies: &[AnomalyVerdict],
) -> Result<Vec<RowVerdict>, FusionError> {
    if rules.len() != anomalies.len() {
        return Err(FusionError::LengthMismatch {
            what: "anomaly verdicts",
            expected: rules.len(),
            actual: anomalies.len(),
        });
    }

    Ok(rules.iter().zip(anomalies).map(|(r, a)| fuse(r, a)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rule_engine::Fault;

    fn outlier(is_outlier: bool) -> AnomalyVerdict {
        AnomalyVerdict {
            is_outlier,
            score: if is_outlier { 0.7 } else { 0.4 },
        }
    }

    fn faults(faults: Vec<Fault>) -> RuleVerdict {
        RuleVerdict { faults }
    }

    #[test]
    fn test_truth_table() {
        let clean = faults(vec![]);
        let faulty = faults(vec![Fault::WheelSlip]);

        assert_eq!(fuse(&clean, &outlier(false)).final_status, FinalStatus::Normal);
        assert_eq!(fuse(&clean, &outlier(true)).final_status, FinalStatus::Anomaly);
        assert_eq!(fuse(&faulty, &outlier(false)).final_status, FinalStatus::Anomaly);
        assert_eq!(fuse(&faulty, &outlier(true)).final_status, FinalStatus::Anomaly);
    }

    #[test]
    fn test_traceability() {
        let verdict = fuse(&faults(vec![Fault::MotorOverheat]), &outlier(false));
        assert!(verdict.rule_triggered);
        assert!(!verdict.model_triggered);

        let verdict = fuse(&faults(vec![]), &outlier(true));
        assert!(!verdict.rule_triggered);
        assert!(verdict.model_triggered);
    }

    #[test]
    fn test_fuse_all_length_mismatch() {
        let err = fuse_all(&[faults(vec![])], &[]).unwrap_err();
        assert_eq!(
            err,
            FusionError::LengthMismatch {
                what: "anomaly verdicts",
                expected: 1,
                actual: 0
            }
        );
    }

    #[test]
    fn test_status_strings() {
        assert_eq!(FinalStatus::Anomaly.to_string(), "Anomaly");
        assert_eq!(FinalStatus::Normal.as_str(), "Normal");
    }
}
