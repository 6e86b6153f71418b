//! Batch Outlier Scoring

use crate::forest::IsolationForest;
use crate::ScorerError;
use feature_engine::FeatureMatrix;
use reading_table::ReadingTable;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Expected fraction of outliers per batch
pub const CONTAMINATION: f64 = 0.1;
/// Seed for tree construction
pub const SEED: u64 = 42;
/// Trees in the ensemble
pub const DEFAULT_TREES: usize = 100;
/// Upper bound on rows drawn per tree
pub const DEFAULT_MAX_SAMPLES: usize = 256;
/// Smallest batch the model can be fitted on
pub const MIN_ROWS: usize = 2;

/// Scorer configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScorerConfig {
    /// Number of isolation trees
    pub n_trees: usize,
    /// Subsample size per tree (capped by batch size)
    pub max_samples: usize,
    /// Fraction of rows to flag, in (0, 0.5]
    pub contamination: f64,
    /// RNG seed
    pub seed: u64,
}

impl Default for ScorerConfig {
    fn default() -> Self {
        Self {
            n_trees: DEFAULT_TREES,
            max_samples: DEFAULT_MAX_SAMPLES,
            contamination: CONTAMINATION,
            seed: SEED,
        }
    }
}

/// Per-row result of outlier scoring
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnomalyVerdict {
    /// Flagged by the model
    pub is_outlier: bool,
    /// Isolation score in (0, 1]; higher is more anomalous
    pub score: f64,
}

impl AnomalyVerdict {
    /// Verdict used when scoring did not run
    pub fn inlier() -> Self {
        Self {
            is_outlier: false,
            score: 0.0,
        }
    }
}

/// Fits a fresh isolation forest per batch and labels each row
#[derive(Debug, Clone)]
pub struct AnomalyScorer {
    config: ScorerConfig,
}

impl AnomalyScorer {
    /// Create a scorer, rejecting unusable configuration
    pub fn new(config: ScorerConfig) -> Result<Self, ScorerError> {
        if !(config.contamination > 0.0 && config.contamination <= 0.5) {
            return Err(ScorerError::InvalidConfig(format!(
                "contamination must be in (0, 0.5], got {}",
                config.contamination
            )));
        }
        if config.n_trees == 0 {
            return Err(ScorerError::InvalidConfig("n_trees must be > 0".to_string()));
        }
        if config.max_samples < MIN_ROWS {
            return Err(ScorerError::InvalidConfig(format!(
                "max_samples must be >= {}, got {}",
                MIN_ROWS, config.max_samples
            )));
        }

        info!(
            "Creating anomaly scorer: trees={}, max_samples={}, contamination={}, seed={}",
            config.n_trees, config.max_samples, config.contamination, config.seed
        );
        Ok(Self { config })
    }

    /// Get configuration
    pub fn config(&self) -> &ScorerConfig {
        &self.config
    }

    /// Score every row of a table using its raw sensor and extra columns
    pub fn score_table(&self, table: &ReadingTable) -> Result<Vec<AnomalyVerdict>, ScorerError> {
        let matrix = FeatureMatrix::from_table(table)?;
        self.score_matrix(&matrix)
    }

    /// Score every row of a prepared feature matrix
    pub fn score_matrix(&self, matrix: &FeatureMatrix) -> Result<Vec<AnomalyVerdict>, ScorerError> {
        if matrix.rows() < MIN_ROWS {
            return Err(ScorerError::TooFewRows {
                min: MIN_ROWS,
                actual: matrix.rows(),
            });
        }
        if matrix.width() == 0 {
            return Err(ScorerError::EmptyFeatureSet);
        }
        if let Some(((row, column), _)) = matrix
            .values()
            .indexed_iter()
            .find(|(_, v)| !v.is_finite())
        {
            return Err(ScorerError::NonFiniteFeature {
                column: matrix.names()[column].clone(),
                row,
            });
        }

        // Split thresholds are drawn from [min, max); the span itself must be finite
        if let Some((column, _)) = matrix
            .values()
            .columns()
            .into_iter()
            .enumerate()
            .find(|(_, col)| {
                let (lo, hi) = col
                    .iter()
                    .fold((f64::MAX, f64::MIN), |(lo, hi), &v| (lo.min(v), hi.max(v)));
                !(hi - lo).is_finite()
            })
        {
            return Err(ScorerError::FeatureRangeOverflow {
                column: matrix.names()[column].clone(),
            });
        }

        let start = std::time::Instant::now();
        let forest = IsolationForest::fit(
            matrix.values(),
            self.config.n_trees,
            self.config.max_samples,
            self.config.seed,
        );
        let scores = forest.score_samples(matrix.values());

        // Same decision rule as scikit-learn: the offset is a percentile of
        // the negated scores, and only rows strictly below it are outliers.
        let negated: Vec<f64> = scores.iter().map(|s| -s).collect();
        let offset = percentile(&negated, 100.0 * self.config.contamination);

        let verdicts: Vec<AnomalyVerdict> = scores
            .iter()
            .map(|&score| AnomalyVerdict {
                is_outlier: -score < offset,
                score,
            })
            .collect();

        debug!(
            "Scored {} rows in {}ms: {} outliers (subsample={})",
            verdicts.len(),
            start.elapsed().as_millis(),
            verdicts.iter().filter(|v| v.is_outlier).count(),
            forest.subsample()
        );

        Ok(verdicts)
    }
}

impl Default for AnomalyScorer {
    fn default() -> Self {
        Self {
            config: ScorerConfig::default(),
        }
    }
}

/// Percentile with linear interpolation between closest ranks
fn percentile(values: &[f64], q: f64) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let rank = (q / 100.0) * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (rank - lo as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use reading_table::Reading;

    /// Smoothly varying in-band readings, all distinct
    fn fleet(rows: usize) -> Vec<Reading> {
        (0..rows)
            .map(|i| {
                let t = i as f64;
                Reading::new(
                    70.0 + 5.0 * (t * 0.7).sin(),
                    6.5 + 0.4 * (t * 1.3).cos(),
                    50.0 + 10.0 * (t * 2.1).sin(),
                    (i % 2) as i64,
                )
            })
            .collect()
    }

    #[test]
    fn test_percentile_interpolation() {
        let values = [4.0, 1.0, 3.0, 2.0, 5.0];
        assert_eq!(percentile(&values, 0.0), 1.0);
        assert_eq!(percentile(&values, 50.0), 3.0);
        assert_eq!(percentile(&values, 100.0), 5.0);
        assert!((percentile(&values, 10.0) - 1.4).abs() < 1e-12);
    }

    #[test]
    fn test_flag_rate_near_contamination() {
        let table = ReadingTable::from_readings(fleet(200));
        let verdicts = AnomalyScorer::default().score_table(&table).unwrap();

        let flagged = verdicts.iter().filter(|v| v.is_outlier).count();
        assert_eq!(verdicts.len(), 200);
        assert!((10..=20).contains(&flagged), "flagged {}", flagged);
    }

    #[test]
    fn test_clear_outlier_flagged() {
        let mut readings = fleet(99);
        readings.push(Reading::new(160.0, 1.0, 450.0, 1));
        let table = ReadingTable::from_readings(readings);

        let verdicts = AnomalyScorer::default().score_table(&table).unwrap();
        assert!(verdicts[99].is_outlier);
    }

    #[test]
    fn test_reproducible_with_fixed_seed() {
        let table = ReadingTable::from_readings(fleet(150));
        let a = AnomalyScorer::default().score_table(&table).unwrap();
        let b = AnomalyScorer::default().score_table(&table).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_too_few_rows() {
        let table = ReadingTable::from_readings(fleet(1));
        assert_eq!(
            AnomalyScorer::default().score_table(&table),
            Err(ScorerError::TooFewRows { min: 2, actual: 1 })
        );
        assert_eq!(
            AnomalyScorer::default().score_table(&ReadingTable::default()),
            Err(ScorerError::TooFewRows { min: 2, actual: 0 })
        );
    }

    #[test]
    fn test_non_finite_feature() {
        let mut readings = fleet(5);
        readings[3].wheel_current_diff = f64::INFINITY;
        let table = ReadingTable::from_readings(readings);

        assert_eq!(
            AnomalyScorer::default().score_table(&table),
            Err(ScorerError::NonFiniteFeature {
                column: "wheel_current_diff".to_string(),
                row: 3
            })
        );
    }

    #[test]
    fn test_feature_range_overflow() {
        let mut readings = fleet(3);
        readings[0].motor_temp = 1.7e308;
        readings[1].motor_temp = -1.7e308;
        let table = ReadingTable::from_readings(readings);

        let err = AnomalyScorer::default().score_table(&table).unwrap_err();
        assert_eq!(
            err,
            ScorerError::FeatureRangeOverflow {
                column: "motor_temp".to_string()
            }
        );
        assert!(err.is_data_shape());
    }

    #[test]
    fn test_wide_but_finite_range_scores() {
        let mut readings = fleet(20);
        readings[0].motor_temp = 8.0e307;
        readings[1].motor_temp = -8.0e307;
        let table = ReadingTable::from_readings(readings);

        let verdicts = AnomalyScorer::default().score_table(&table).unwrap();
        assert_eq!(verdicts.len(), 20);
    }

    #[test]
    fn test_extra_columns_are_features() {
        let mut readings = fleet(100);
        for (i, r) in readings.iter_mut().enumerate() {
            r.extras = vec![750.0 + (i as f64 * 0.9).sin()];
        }
        readings[42].extras = vec![5000.0];
        let table = ReadingTable {
            extra_columns: vec!["line_voltage".to_string()],
            readings,
        };

        let verdicts = AnomalyScorer::default().score_table(&table).unwrap();
        assert!(verdicts[42].is_outlier);
    }

    #[test]
    fn test_invalid_config() {
        let config = ScorerConfig {
            contamination: 0.7,
            ..Default::default()
        };
        let err = AnomalyScorer::new(config).unwrap_err();
        assert!(matches!(err, ScorerError::InvalidConfig(_)));
        assert!(!err.is_data_shape());
        assert!(ScorerError::EmptyFeatureSet.is_data_shape());
    }
}
