//! Statistical Features Computation

use reading_table::{ReadingTable, Sensor};
use serde::{Deserialize, Serialize};

/// Descriptive statistics for one column of a batch
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColumnStatistics {
    /// Number of values
    pub count: usize,
    /// Mean value
    pub mean: f64,
    /// Sample standard deviation (n - 1 denominator), NaN for a single value
    pub std_dev: f64,
    /// Minimum value
    pub min: f64,
    /// Maximum value
    pub max: f64,
}

impl ColumnStatistics {
    /// Compute statistics from a slice of values
    pub fn compute(values: &[f64]) -> Self {
        if values.is_empty() {
            return Self::default();
        }

        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;

        let min = values.iter().cloned().fold(f64::MAX, f64::min);
        let max = values.iter().cloned().fold(f64::MIN, f64::max);

        // Undefined for a single value
        let std_dev = if values.len() >= 2 {
            let m2: f64 = values.iter().map(|v| (v - mean) * (v - mean)).sum();
            (m2 / (n - 1.0)).sqrt()
        } else {
            f64::NAN
        };

        Self {
            count: values.len(),
            mean,
            std_dev,
            min,
            max,
        }
    }

    /// Compute statistics for one sensor column of a table
    pub fn for_sensor(table: &ReadingTable, sensor: Sensor) -> Self {
        Self::compute(&table.column(sensor))
    }
}
