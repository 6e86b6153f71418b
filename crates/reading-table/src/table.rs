//! Validated Reading Table

use crate::{Reading, Sensor};
use serde::{Deserialize, Serialize};

/// Fully materialized batch of readings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReadingTable {
    /// Names of pass-through numeric columns, in input order
    pub extra_columns: Vec<String>,
    /// Rows in input order
    pub readings: Vec<Reading>,
}

impl ReadingTable {
    /// Create a table from readings without extra columns
    pub fn from_readings(readings: Vec<Reading>) -> Self {
        Self {
            extra_columns: Vec::new(),
            readings,
        }
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.readings.len()
    }

    /// Check if the table has no rows
    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    /// Iterate over rows in order
    pub fn iter(&self) -> impl Iterator<Item = &Reading> {
        self.readings.iter()
    }

    /// Values of one declared sensor across all rows
    pub fn column(&self, sensor: Sensor) -> Vec<f64> {
        self.readings.iter().map(|r| r.value(sensor)).collect()
    }

    /// Values of one extra column across all rows
    pub fn extra_column(&self, name: &str) -> Option<Vec<f64>> {
        let idx = self.extra_columns.iter().position(|c| c == name)?;
        Some(
            self.readings
                .iter()
                .map(|r| r.extras.get(idx).copied().unwrap_or(f64::NAN))
                .collect(),
        )
    }
}

impl<'a> IntoIterator for &'a ReadingTable {
    type Item = &'a Reading;
    type IntoIter = std::slice::Iter<'a, Reading>;

    fn into_iter(self) -> Self::IntoIter {
        self.readings.iter()
    }
}
