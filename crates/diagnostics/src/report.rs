//! Structured analysis output

use anomaly_scorer::AnomalyVerdict;
use rule_engine::RuleVerdict;
use serde::Serialize;
use std::collections::BTreeMap;
use verdict_fusion::{BatchSummary, FinalStatus, RowVerdict};

/// Per-row output handed to the persistence/render layer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowReport {
    /// Outlier flag from the model
    pub ml_anomaly: bool,
    /// Isolation score, 0.0 when scoring was skipped
    pub anomaly_score: f64,
    /// Comma-joined fault labels, or "OK"
    pub faulty_component: String,
    /// Comma-joined actions, or "All systems nominal"
    pub recommended_action: String,
    pub final_status: FinalStatus,
}

/// Complete result of one analysis run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiagnosticReport {
    pub rows: Vec<RowReport>,
    pub summary: BatchSummary,
    /// Sensor column to stability text
    pub sensor_status: BTreeMap<&'static str, String>,
    /// One-line dominant fault description
    pub summary_text: String,
    /// True when the outlier model could not run on this batch
    pub scoring_skipped: bool,
}

impl DiagnosticReport {
    pub(crate) fn assemble(
        rules: &[RuleVerdict],
        anomalies: &[AnomalyVerdict],
        verdicts: &[RowVerdict],
        summary: BatchSummary,
        scoring_skipped: bool,
    ) -> Self {
        let rows = rules
            .iter()
            .zip(anomalies)
            .zip(verdicts)
            .map(|((rule, anomaly), verdict)| RowReport {
                ml_anomaly: anomaly.is_outlier,
                anomaly_score: anomaly.score,
                faulty_component: rule.faulty_component(),
                recommended_action: rule.recommended_action(),
                final_status: verdict.final_status,
            })
            .collect();

        Self {
            rows,
            sensor_status: summary.stability.as_map(),
            summary_text: summary.summary_text(),
            summary,
            scoring_skipped,
        }
    }

    /// Rows with final status Anomaly, with their indices
    pub fn anomalies(&self) -> impl Iterator<Item = (usize, &RowReport)> {
        self.rows
            .iter()
            .enumerate()
            .filter(|(_, r)| r.final_status == FinalStatus::Anomaly)
    }

    /// Serialize as pretty JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
