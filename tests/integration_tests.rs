//! Integration tests for servo-pdm.
//!
//! These tests cover the workflow from TOML parsing to a configured servo
//! emitting pulses.

mod common;

use common::RecordingOutput;
use servo_pdm::config::units::Degrees;
use servo_pdm::error::{ConfigError, Error};
use servo_pdm::{parse_config, Curve, MotionGenerator, ServoBuilder, ServoConfig, ServoPdm};

// =============================================================================
// Test configuration data
// =============================================================================

const FULL_CONFIG: &str = r#"
[servos.pan]
name = "Pan"
min_pulse_us = 500
max_pulse_us = 2500
min_angle = 0.0
max_angle = 180.0

[servos.tilt]
name = "Tilt"
min_pulse_us = 1000
max_pulse_us = 2000
frequency_hz = 100
min_angle = 90.0
max_angle = -90.0
invert = true

[motions.center]
servo = "pan"
target_angle = 90.0
duration_ms = 2000
curve = "ease_in_out_cubic"

[motions.look_down]
servo = "tilt"
target_angle = -45.0
"#;

fn sg90() -> (ServoPdm<RecordingOutput>, RecordingOutput) {
    let output = RecordingOutput::new();
    let servo = ServoPdm::new(output.clone(), ServoConfig::sg90()).expect("valid servo");
    (servo, output)
}

// =============================================================================
// Configuration
// =============================================================================

#[test]
fn parse_full_config() {
    let config = parse_config(FULL_CONFIG).expect("Should parse full config");

    let names: Vec<&str> = config.servo_names().collect();
    assert_eq!(names, ["pan", "tilt"]);

    let tilt = config.servo("tilt").expect("Tilt servo should exist");
    assert_eq!(tilt.name.as_str(), "Tilt");
    assert_eq!(tilt.period_us(), 10_000);
    assert_eq!(tilt.tick_interval_ms(), 10);
    assert!(tilt.is_angle_reversed());
    assert!(tilt.invert);

    let center = config.motion("center").expect("Center preset should exist");
    assert_eq!(center.servo.as_str(), "pan");
    assert_eq!(center.curve, Curve::EaseInOutCubic);

    let look_down = config.motion_request("look_down").unwrap();
    assert_eq!(look_down.target, Degrees(-45.0));
    assert_eq!(look_down.duration_ms, 0);
    assert_eq!(look_down.curve, Curve::Linear);
    assert!(look_down.on_complete.is_none());
}

#[test]
fn unknown_preset_is_reported() {
    let config = parse_config(FULL_CONFIG).unwrap();
    assert!(matches!(
        config.motion_request("wave"),
        Err(ConfigError::MotionNotFound(name)) if name.as_str() == "wave"
    ));
}

#[test]
fn motion_for_unknown_servo_fails_validation() {
    let toml = r#"
[servos.pan]
name = "Pan"

[motions.nod]
servo = "tilt"
target_angle = 10.0
"#;
    assert!(matches!(
        parse_config(toml),
        Err(Error::Config(ConfigError::ServoNotFound(_)))
    ));
}

#[test]
fn pulse_beyond_period_fails_validation() {
    let toml = r#"
[servos.fast]
frequency_hz = 400
"#;
    assert!(matches!(
        parse_config(toml),
        Err(Error::Config(ConfigError::InvalidPulseRange {
            min_us: 500,
            max_us: 2500,
            period_us: 2500
        }))
    ));
}

#[test]
fn unknown_curve_is_a_parse_error() {
    let toml = r#"
[servos.pan]

[motions.spin]
servo = "pan"
target_angle = 10.0
curve = "ease_in_sideways"
"#;
    assert!(matches!(
        parse_config(toml),
        Err(Error::Config(ConfigError::ParseError(_)))
    ));
}

#[test]
fn builder_from_config() {
    let config = parse_config(FULL_CONFIG).unwrap();
    let output = RecordingOutput::new();
    let mut servo = ServoBuilder::new()
        .from_config(&config, "tilt")
        .unwrap()
        .output(output.clone())
        .build()
        .unwrap();

    assert_eq!(output.frequency_hz(), 100);
    // Inverted: min_angle now lands on the maximum pulse.
    assert_eq!(servo.set_angle(90).unwrap(), 2000);
    assert_eq!(servo.set_angle(-90).unwrap(), 1000);
}

// =============================================================================
// Driver
// =============================================================================

#[test]
fn set_angle_scenarios() {
    let (mut servo, output) = sg90();

    assert_eq!(servo.set_angle(90).unwrap(), 1500);
    assert_eq!(servo.set_angle(-10).unwrap(), 500);
    assert_eq!(servo.angle(), Degrees(0.0));
    assert_eq!(servo.set_angle(270).unwrap(), 2500);
    assert_eq!(servo.angle(), Degrees(180.0));

    assert_eq!(output.writes(), [1500, 500, 2500]);
}

#[test]
fn reversed_servo_maps_toward_max_pulse() {
    let output = RecordingOutput::new();
    let mut servo = ServoBuilder::new()
        .angle_range(180, 0)
        .output(output.clone())
        .build()
        .unwrap();

    let pulse = servo.set_angle(45).unwrap();
    assert_eq!(pulse, 2000);
    assert!(pulse.abs_diff(2500) < pulse.abs_diff(500));

    // Out of range on both sides saturates to the nearer bound.
    assert_eq!(servo.set_angle(200).unwrap(), 500);
    assert_eq!(servo.set_angle(-20).unwrap(), 2500);
}

#[test]
fn release_is_idempotent() {
    let (mut servo, output) = sg90();
    servo.set_angle(60).unwrap();
    servo.release().unwrap();
    servo.release().unwrap();

    assert!(servo.is_released());
    assert_eq!(servo.angle(), Degrees(60.0));
    assert_eq!(output.writes(), [1166, 0, 0]);
}

#[test]
fn write_failure_is_reported() {
    let (mut servo, output) = sg90();
    output.fail_writes(true);
    assert!(servo.set_angle(10).is_err());
    assert!(servo.is_released());
    assert_eq!(output.write_count(), 0);
}

#[test]
fn planned_motion_drives_servo_to_target() {
    let (mut servo, output) = sg90();
    servo.set_angle(90).unwrap();

    let request = servo_pdm::MotionRequest::new(20, 500);
    let generator: MotionGenerator = servo.plan_motion(&request);
    assert_eq!(generator.len(), 25);
    for step in generator {
        servo.apply(&step).unwrap();
    }

    assert_eq!(servo.pulse_us(), 722);
    assert_eq!(output.last(), Some(722));
    let writes = output.writes();
    assert!(writes.windows(2).all(|w| w[1] <= w[0]));
}

#[test]
fn deinit_shuts_output_down() {
    let (mut servo, output) = sg90();
    servo.set_angle(30).unwrap();
    servo.deinit().unwrap();
    assert!(output.is_deinit());
    assert!(servo.is_released());
}
