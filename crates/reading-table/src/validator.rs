//! Raw Table Coercion

use crate::error::ValidationError;
use crate::{Cell, RawTable, Reading, ReadingTable, Sensor};
use std::collections::HashSet;
use tracing::{debug, warn};

/// Columns the engine writes to its own output; never read back as input
pub const RESERVED_OUTPUT_COLUMNS: [&str; 4] = [
    "ml_anomaly",
    "faulty_component",
    "recommended_action",
    "final_status",
];

/// Where a header column ends up in a `Reading`
#[derive(Debug, Clone, Copy)]
enum Slot {
    Sensor(Sensor),
    Extra(usize),
    Dropped,
}

/// Coerces raw tables into validated reading tables
#[derive(Debug, Default, Clone, Copy)]
pub struct Validator;

impl Validator {
    /// Create a new validator
    pub fn new() -> Self {
        Self
    }

    /// Coerce a raw table, failing the whole batch on the first bad cell
    pub fn coerce(&self, raw: &RawTable) -> Result<ReadingTable, ValidationError> {
        let (slots, extra_columns) = self.map_header(&raw.columns)?;

        let mut readings = Vec::with_capacity(raw.rows.len());
        for (row_idx, row) in raw.rows.iter().enumerate() {
            if row.len() != slots.len() {
                return Err(ValidationError::RaggedRow {
                    row: row_idx,
                    expected: slots.len(),
                    actual: row.len(),
                });
            }

            let mut reading = Reading {
                extras: vec![0.0; extra_columns.len()],
                ..Default::default()
            };

            for ((slot, cell), name) in slots.iter().zip(row).zip(&raw.columns) {
                match *slot {
                    Slot::Dropped => {}
                    Slot::Sensor(sensor) => {
                        let value = Self::numeric(name, row_idx, cell)?;
                        Self::assign(&mut reading, sensor, value, row_idx)?;
                    }
                    Slot::Extra(idx) => {
                        reading.extras[idx] = Self::numeric(name, row_idx, cell)?;
                    }
                }
            }

            readings.push(reading);
        }

        debug!(
            "Coerced {} rows ({} extra columns)",
            readings.len(),
            extra_columns.len()
        );

        Ok(ReadingTable {
            extra_columns,
            readings,
        })
    }

    fn map_header(&self, columns: &[String]) -> Result<(Vec<Slot>, Vec<String>), ValidationError> {
        let mut seen = HashSet::new();
        let mut slots = Vec::with_capacity(columns.len());
        let mut extra_columns = Vec::new();

        for name in columns {
            if !seen.insert(name.as_str()) {
                return Err(ValidationError::DuplicateColumn(name.clone()));
            }

            if let Some(sensor) = Sensor::ALL.iter().find(|s| s.column_name() == name.as_str()) {
                slots.push(Slot::Sensor(*sensor));
            } else if RESERVED_OUTPUT_COLUMNS.contains(&name.as_str()) {
                warn!("Dropping engine output column {} from input", name);
                slots.push(Slot::Dropped);
            } else {
                slots.push(Slot::Extra(extra_columns.len()));
                extra_columns.push(name.clone());
            }
        }

        for sensor in Sensor::ALL {
            if !seen.contains(sensor.column_name()) {
                return Err(ValidationError::MissingColumn(sensor.column_name()));
            }
        }

        Ok((slots, extra_columns))
    }

    fn numeric(column: &str, row: usize, cell: &Cell) -> Result<f64, ValidationError> {
        cell.as_f64().ok_or_else(|| ValidationError::NotNumeric {
            column: column.to_string(),
            row,
            value: match cell {
                Cell::Number(v) => v.to_string(),
                Cell::Text(s) => s.clone(),
            },
        })
    }

    fn assign(reading: &mut Reading, sensor: Sensor, value: f64, row: usize) -> Result<(), ValidationError> {
        match sensor {
            Sensor::MotorTemp => reading.motor_temp = value,
            Sensor::BrakePressure => reading.brake_pressure = value,
            Sensor::WheelCurrentDiff => reading.wheel_current_diff = value,
            Sensor::AuxStatus => {
                if value.fract() != 0.0 || value.abs() > i64::MAX as f64 {
                    return Err(ValidationError::NotInteger {
                        column: sensor.column_name(),
                        row,
                        value,
                    });
                }
                reading.aux_status = value as i64;
            }
        }
        Ok(())
    }
}
