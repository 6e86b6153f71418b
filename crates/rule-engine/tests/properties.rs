//! Property-based tests for rule-engine
//!
//! These tests verify that in-band readings are rule-clean and that labels
//! and actions stay index-aligned for arbitrary readings.

use proptest::prelude::*;

use reading_table::Reading;
use rule_engine::{Fault, RuleEngine};

// ============================================================================
// Proptest Strategies for generating test data
// ============================================================================

/// Strategy for readings inside every operating band.
fn arb_in_band_reading() -> impl Strategy<Value = Reading> {
    (30.0f64..=120.0, 5.0f64..=8.0, -500.0f64..=200.0, 0i64..=1)
        .prop_map(|(t, p, w, a)| Reading::new(t, p, w, a))
}

/// Strategy for arbitrary readings, including out-of-band values.
fn arb_reading() -> impl Strategy<Value = Reading> {
    (-50.0f64..250.0, 0.0f64..15.0, -500.0f64..600.0, -3i64..5)
        .prop_map(|(t, p, w, a)| Reading::new(t, p, w, a))
}

fn expected_action(label: &str) -> &'static str {
    match label {
        "Motor Overheat" => "Inspect cooling system or motor windings",
        "Brake Pressure Issue" => "Check compressor & pipe for leakage",
        "Wheel Slip Detected" => "Inspect traction motor & current diff relay",
        "Auxiliary Sensor Error" => "Reset or replace the sensor",
        other => panic!("unexpected label {other}"),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn property_in_band_readings_are_clean(reading in arb_in_band_reading()) {
        let verdict = RuleEngine::default().evaluate(&reading);
        prop_assert!(verdict.is_clean(), "unexpected faults {:?} for {:?}", verdict.faults, reading);
        prop_assert_eq!(verdict.faulty_component(), "OK");
    }

    #[test]
    fn property_labels_and_actions_aligned(reading in arb_reading()) {
        let verdict = RuleEngine::default().evaluate(&reading);
        let labels = verdict.fault_labels();
        let actions = verdict.actions();

        prop_assert_eq!(labels.len(), actions.len());
        for (label, action) in labels.iter().zip(&actions) {
            prop_assert_eq!(expected_action(label), *action);
        }
    }

    #[test]
    fn property_each_rule_matches_its_condition(reading in arb_reading()) {
        let faults = RuleEngine::default().evaluate(&reading).faults;

        prop_assert_eq!(
            faults.contains(&Fault::MotorOverheat),
            reading.motor_temp < 30.0 || reading.motor_temp > 120.0
        );
        prop_assert_eq!(
            faults.contains(&Fault::BrakePressureIssue),
            reading.brake_pressure < 5.0 || reading.brake_pressure > 8.0
        );
        prop_assert_eq!(faults.contains(&Fault::WheelSlip), reading.wheel_current_diff > 200.0);
        prop_assert_eq!(
            faults.contains(&Fault::AuxiliarySensorError),
            reading.aux_status != 0 && reading.aux_status != 1
        );
    }

    #[test]
    fn property_evaluation_is_idempotent(reading in arb_reading()) {
        let engine = RuleEngine::default();
        prop_assert_eq!(engine.evaluate(&reading), engine.evaluate(&reading));
    }
}
