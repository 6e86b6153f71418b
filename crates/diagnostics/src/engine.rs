//! Diagnostics pipeline

use crate::config::{EngineConfig, ShapeErrorPolicy};
use crate::report::DiagnosticReport;
use crate::DiagnosticsError;
use anomaly_scorer::{AnomalyScorer, AnomalyVerdict};
use reading_table::{RawTable, ReadingTable, Validator};
use rule_engine::RuleEngine;
use std::time::Instant;
use tracing::{debug, info, warn};
use verdict_fusion::{fuse_all, BatchSummarizer, FusionError};

/// Runs rules, outlier scoring, fusion and summary over one batch at a time
///
/// Holds no per-batch state: every call fits and drops its own model.
#[derive(Debug, Clone)]
pub struct DiagnosticsEngine {
    validator: Validator,
    rules: RuleEngine,
    scorer: AnomalyScorer,
    summarizer: BatchSummarizer,
    on_shape_error: ShapeErrorPolicy,
}

impl DiagnosticsEngine {
    /// Create an engine from configuration
    pub fn new(config: &EngineConfig) -> Result<Self, DiagnosticsError> {
        info!(
            "Creating diagnostics engine (on_shape_error={:?})",
            config.on_shape_error
        );
        Ok(Self {
            validator: Validator::new(),
            rules: RuleEngine::default(),
            scorer: AnomalyScorer::new(config.scorer.clone())
                .map_err(|e| DiagnosticsError::InvalidConfig(e.to_string()))?,
            summarizer: BatchSummarizer::new(),
            on_shape_error: config.on_shape_error,
        })
    }

    /// Coerce a raw table, then analyze it
    pub fn analyze_raw(&self, raw: &RawTable) -> Result<DiagnosticReport, DiagnosticsError> {
        let table = self.validator.coerce(raw).map_err(|e| {
            warn!("Rejecting batch: {}", e);
            metrics::counter!("diagnostics_batches_rejected_total").increment(1);
            e
        })?;
        self.analyze(&table)
    }

    /// Analyze a validated table
    ///
    /// Either the full report is returned or nothing is.
    pub fn analyze(&self, table: &ReadingTable) -> Result<DiagnosticReport, DiagnosticsError> {
        let start = Instant::now();

        if table.is_empty() {
            warn!("Rejecting empty batch");
            metrics::counter!("diagnostics_batches_rejected_total").increment(1);
            return Err(FusionError::EmptyBatch.into());
        }

        let rules = self.rules.evaluate_table(table);

        let (anomalies, scoring_skipped) = match self.scorer.score_table(table) {
            Ok(verdicts) => (verdicts, false),
            Err(e) if e.is_data_shape() && self.on_shape_error == ShapeErrorPolicy::Skip => {
                warn!("Skipping anomaly scoring: {}", e);
                (vec![AnomalyVerdict::inlier(); table.len()], true)
            }
            Err(e) => {
                warn!("Aborting batch: {}", e);
                metrics::counter!("diagnostics_batches_rejected_total").increment(1);
                return Err(e.into());
            }
        };

        let verdicts = fuse_all(&rules, &anomalies)?;
        let summary = self.summarizer.summarize(table, &rules, &verdicts)?;
        debug!("Summary text: {}", summary.summary_text());

        let report =
            DiagnosticReport::assemble(&rules, &anomalies, &verdicts, summary, scoring_skipped);

        let elapsed = start.elapsed();
        metrics::counter!("diagnostics_batches_total").increment(1);
        metrics::counter!("diagnostics_rows_total").increment(table.len() as u64);
        metrics::counter!("diagnostics_anomalies_total")
            .increment(report.summary.anomaly_count as u64);
        metrics::histogram!("diagnostics_analysis_seconds").record(elapsed.as_secs_f64());

        info!(
            "Analyzed {} rows in {}ms: {} anomalous ({}%)",
            table.len(),
            elapsed.as_millis(),
            report.summary.anomaly_count,
            report.summary.anomaly_rate_pct
        );

        Ok(report)
    }
}

impl Default for DiagnosticsEngine {
    fn default() -> Self {
        Self {
            validator: Validator::new(),
            rules: RuleEngine::default(),
            scorer: AnomalyScorer::default(),
            summarizer: BatchSummarizer::new(),
            on_shape_error: ShapeErrorPolicy::default(),
        }
    }
}
