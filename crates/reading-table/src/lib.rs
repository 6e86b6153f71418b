//! Reading Table
//!
//! In-memory batch of sensor readings handed to the diagnostics engine,
//! plus coercion of loosely typed input tables into validated readings.

mod error;
mod raw;
mod table;
mod validator;

pub use error::ValidationError;
pub use raw::{Cell, RawTable};
pub use table::ReadingTable;
pub use validator::{Validator, RESERVED_OUTPUT_COLUMNS};

use serde::{Deserialize, Serialize};

/// Declared sensor columns every batch must carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Sensor {
    /// Traction motor temperature (°C)
    MotorTemp,
    /// Brake cylinder pressure (kg/cm²)
    BrakePressure,
    /// Current differential between wheel sets (A)
    WheelCurrentDiff,
    /// Auxiliary system status flag
    AuxStatus,
}

impl Sensor {
    /// All declared sensors, in feature-column order
    pub const ALL: [Sensor; 4] = [
        Sensor::MotorTemp,
        Sensor::BrakePressure,
        Sensor::WheelCurrentDiff,
        Sensor::AuxStatus,
    ];

    /// Column name in the input table
    pub fn column_name(&self) -> &'static str {
        match self {
            Sensor::MotorTemp => "motor_temp",
            Sensor::BrakePressure => "brake_pressure",
            Sensor::WheelCurrentDiff => "wheel_current_diff",
            Sensor::AuxStatus => "aux_status",
        }
    }
}

/// One row of periodic sensor measurements
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub motor_temp: f64,
    pub brake_pressure: f64,
    pub wheel_current_diff: f64,
    pub aux_status: i64,
    /// Additional numeric columns, aligned with `ReadingTable::extra_columns`
    #[serde(default)]
    pub extras: Vec<f64>,
}

impl Reading {
    /// Create a reading with only the declared sensor fields
    pub fn new(motor_temp: f64, brake_pressure: f64, wheel_current_diff: f64, aux_status: i64) -> Self {
        Self {
            motor_temp,
            brake_pressure,
            wheel_current_diff,
            aux_status,
            extras: Vec::new(),
        }
    }

    /// Value of a declared sensor as a float
    pub fn value(&self, sensor: Sensor) -> f64 {
        match sensor {
            Sensor::MotorTemp => self.motor_temp,
            Sensor::BrakePressure => self.brake_pressure,
            Sensor::WheelCurrentDiff => self.wheel_current_diff,
            Sensor::AuxStatus => self.aux_status as f64,
        }
    }
}
