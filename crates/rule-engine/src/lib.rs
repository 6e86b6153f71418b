//! Rule-Based Fault Diagnosis
//!
//! Fixed domain-rule checks applied to each reading independently. Every
//! rule that fires is reported, in rule-table order, together with its
//! remedial action.

mod fault;
mod rules;

pub use fault::Fault;
pub use rules::{
    Rule, RuleEngine, RuleVerdict, AUX_STATUS_VALID, BRAKE_PRESSURE_MAX, BRAKE_PRESSURE_MIN,
    DEFAULT_RULES, MOTOR_TEMP_MAX, MOTOR_TEMP_MIN, NO_FAULT_ACTION, NO_FAULT_COMPONENT,
    WHEEL_CURRENT_DIFF_MAX,
};
