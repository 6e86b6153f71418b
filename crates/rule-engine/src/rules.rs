//! Rule Table and Evaluation

use crate::Fault;
use reading_table::{Reading, ReadingTable};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Lowest motor temperature (°C) not flagged
pub const MOTOR_TEMP_MIN: f64 = 30.0;
/// Highest motor temperature (°C) not flagged
pub const MOTOR_TEMP_MAX: f64 = 120.0;
/// Lowest brake pressure (kg/cm²) not flagged
pub const BRAKE_PRESSURE_MIN: f64 = 5.0;
/// Highest brake pressure (kg/cm²) not flagged
pub const BRAKE_PRESSURE_MAX: f64 = 8.0;
/// Highest wheel current differential (A) not flagged
pub const WHEEL_CURRENT_DIFF_MAX: f64 = 200.0;
/// Accepted auxiliary status codes
pub const AUX_STATUS_VALID: [i64; 2] = [0, 1];

/// Component text for a rule-clean reading
pub const NO_FAULT_COMPONENT: &str = "OK";
/// Action text for a rule-clean reading
pub const NO_FAULT_ACTION: &str = "All systems nominal";

/// A single domain check
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    /// Fault reported when the check fires
    pub fault: Fault,
    /// Returns true when the reading violates the rule
    pub check: fn(&Reading) -> bool,
}

fn motor_temp_out_of_band(r: &Reading) -> bool {
    r.motor_temp < MOTOR_TEMP_MIN || r.motor_temp > MOTOR_TEMP_MAX
}

fn brake_pressure_out_of_band(r: &Reading) -> bool {
    r.brake_pressure < BRAKE_PRESSURE_MIN || r.brake_pressure > BRAKE_PRESSURE_MAX
}

fn wheel_current_diff_excessive(r: &Reading) -> bool {
    r.wheel_current_diff > WHEEL_CURRENT_DIFF_MAX
}

fn aux_status_invalid(r: &Reading) -> bool {
    !AUX_STATUS_VALID.contains(&r.aux_status)
}

/// Standard rule table; order is the reporting order
pub const DEFAULT_RULES: [Rule; 4] = [
    Rule {
        fault: Fault::MotorOverheat,
        check: motor_temp_out_of_band,
    },
    Rule {
        fault: Fault::BrakePressureIssue,
        check: brake_pressure_out_of_band,
    },
    Rule {
        fault: Fault::WheelSlip,
        check: wheel_current_diff_excessive,
    },
    Rule {
        fault: Fault::AuxiliarySensorError,
        check: aux_status_invalid,
    },
];

/// Faults fired for one reading, in rule order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleVerdict {
    pub faults: Vec<Fault>,
}

impl RuleVerdict {
    /// True when no rule fired
    pub fn is_clean(&self) -> bool {
        self.faults.is_empty()
    }

    /// Fault labels, one per fired rule
    pub fn fault_labels(&self) -> Vec<&'static str> {
        self.faults.iter().map(Fault::label).collect()
    }

    /// Actions, index-aligned with `fault_labels`
    pub fn actions(&self) -> Vec<&'static str> {
        self.faults.iter().map(Fault::recommended_action).collect()
    }

    /// Comma-joined labels, or "OK"
    pub fn faulty_component(&self) -> String {
        if self.is_clean() {
            NO_FAULT_COMPONENT.to_string()
        } else {
            self.fault_labels().join(", ")
        }
    }

    /// Comma-joined actions, or "All systems nominal"
    pub fn recommended_action(&self) -> String {
        if self.is_clean() {
            NO_FAULT_ACTION.to_string()
        } else {
            self.actions().join(", ")
        }
    }
}

/// Evaluates a rule table against readings
#[derive(Debug, Clone)]
pub struct RuleEngine {
    rules: Vec<Rule>,
}

impl RuleEngine {
    /// Create an engine with a custom rule table
    pub fn with_rules(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// Evaluate every rule against one reading
    pub fn evaluate(&self, reading: &Reading) -> RuleVerdict {
        RuleVerdict {
            faults: self
                .rules
                .iter()
                .filter(|rule| (rule.check)(reading))
                .map(|rule| rule.fault)
                .collect(),
        }
    }

    /// Evaluate every reading of a table, preserving row order
    pub fn evaluate_table(&self, table: &ReadingTable) -> Vec<RuleVerdict> {
        let verdicts: Vec<RuleVerdict> = table.iter().map(|r| self.evaluate(r)).collect();

        debug!(
            "Rule evaluation: {} of {} rows with faults",
            verdicts.iter().filter(|v| !v.is_clean()).count(),
            verdicts.len()
        );

        verdicts
    }
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::with_rules(DEFAULT_RULES.to_vec())
    }
}
