//! Feature Matrix Assembly

use ndarray::Array2;
use reading_table::{ReadingTable, Sensor};
use thiserror::Error;
use tracing::debug;

/// Errors while assembling the feature matrix
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FeatureError {
    /// A row carries a different number of extra values than the header declares
    #[error("Row {row} has {actual} extra values, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        actual: usize,
    },

    /// Values could not be arranged into a matrix
    #[error("Feature matrix shape error: {0}")]
    Shape(String),
}

/// Row-major feature matrix with named columns
///
/// Columns are the raw sensor readings followed by pass-through extra
/// columns. Engine outputs are never part of it.
#[derive(Debug, Clone)]
pub struct FeatureMatrix {
    names: Vec<String>,
    values: Array2<f64>,
}

impl FeatureMatrix {
    /// Assemble features from a reading table
    pub fn from_table(table: &ReadingTable) -> Result<Self, FeatureError> {
        let expected = table.extra_columns.len();
        let width = Sensor::ALL.len() + expected;

        let mut data = Vec::with_capacity(table.len() * width);
        for (row, reading) in table.iter().enumerate() {
            if reading.extras.len() != expected {
                return Err(FeatureError::RaggedRow {
                    row,
                    expected,
                    actual: reading.extras.len(),
                });
            }
            data.extend(Sensor::ALL.iter().map(|s| reading.value(*s)));
            data.extend_from_slice(&reading.extras);
        }

        let names = Sensor::ALL
            .iter()
            .map(|s| s.column_name().to_string())
            .chain(table.extra_columns.iter().cloned())
            .collect();

        let values = Array2::from_shape_vec((table.len(), width), data)
            .map_err(|e| FeatureError::Shape(e.to_string()))?;

        debug!("Assembled feature matrix {}x{}", values.nrows(), values.ncols());

        Ok(Self { names, values })
    }

    /// Column names in matrix order
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Underlying values
    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    /// Number of rows
    pub fn rows(&self) -> usize {
        self.values.nrows()
    }

    /// Number of feature columns
    pub fn width(&self) -> usize {
        self.values.ncols()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reading_table::Reading;

    #[test]
    fn test_sensor_columns_first() {
        let mut reading = Reading::new(60.0, 6.0, 50.0, 1);
        reading.extras = vec![750.0];
        let table = ReadingTable {
            extra_columns: vec!["line_voltage".to_string()],
            readings: vec![reading.clone(), reading],
        };

        let matrix = FeatureMatrix::from_table(&table).unwrap();
        assert_eq!(matrix.rows(), 2);
        assert_eq!(matrix.width(), 5);
        assert_eq!(
            matrix.names(),
            &["motor_temp", "brake_pressure", "wheel_current_diff", "aux_status", "line_voltage"]
        );
        assert_eq!(matrix.values()[[1, 0]], 60.0);
        assert_eq!(matrix.values()[[1, 3]], 1.0);
        assert_eq!(matrix.values()[[1, 4]], 750.0);
    }

    #[test]
    fn test_ragged_extras() {
        let table = ReadingTable {
            extra_columns: vec!["line_voltage".to_string()],
            readings: vec![Reading::new(60.0, 6.0, 50.0, 1)],
        };

        assert_eq!(
            FeatureMatrix::from_table(&table).unwrap_err(),
            FeatureError::RaggedRow {
                row: 0,
                expected: 1,
                actual: 0
            }
        );
    }

    #[test]
    fn test_empty_table() {
        let matrix = FeatureMatrix::from_table(&ReadingTable::default()).unwrap();
        assert_eq!(matrix.rows(), 0);
        assert_eq!(matrix.width(), 4);
    }
}
