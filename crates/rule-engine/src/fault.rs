//! Fault Catalogue

use serde::{Deserialize, Serialize};
use std::fmt;

/// Fault detected by a domain rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Fault {
    /// Motor temperature outside its operating band
    #[serde(rename = "Motor Overheat")]
    MotorOverheat,
    /// Brake pressure outside its operating band
    #[serde(rename = "Brake Pressure Issue")]
    BrakePressureIssue,
    /// Excessive current differential between wheel sets
    #[serde(rename = "Wheel Slip Detected")]
    WheelSlip,
    /// Auxiliary status outside {0, 1}
    #[serde(rename = "Auxiliary Sensor Error")]
    AuxiliarySensorError,
}

impl Fault {
    /// Display label
    pub fn label(&self) -> &'static str {
        match self {
            Fault::MotorOverheat => "Motor Overheat",
            Fault::BrakePressureIssue => "Brake Pressure Issue",
            Fault::WheelSlip => "Wheel Slip Detected",
            Fault::AuxiliarySensorError => "Auxiliary Sensor Error",
        }
    }

    /// Get recommended action
    pub fn recommended_action(&self) -> &'static str {
        match self {
            Fault::MotorOverheat => "Inspect cooling system or motor windings",
            Fault::BrakePressureIssue => "Check compressor & pipe for leakage",
            Fault::WheelSlip => "Inspect traction motor & current diff relay",
            Fault::AuxiliarySensorError => "Reset or replace the sensor",
        }
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
