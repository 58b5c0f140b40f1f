//! Integration tests for the DriveService command-dispatch chain.
//!
//! These run on the host and verify that a parsed console command flows
//! through the service to the power stage and output port correctly,
//! without any real hardware.

use crate::mock_hw::{MockDrive, RecordingSink};

use drumdrive::app::commands::DriveCommand;
use drumdrive::app::service::DriveService;
use drumdrive::config::SystemConfig;
use drumdrive::console::parse_command;
use drumdrive::faults::FaultRegister;

fn make_app() -> (DriveService, MockDrive, RecordingSink, FaultRegister) {
    let mut app = DriveService::new(SystemConfig::default());
    let mut sink = RecordingSink::new();
    app.start(&mut sink);
    (app, MockDrive::new(), sink, FaultRegister::new())
}

#[test]
fn manual_power_override_ramps_and_disables_auto() {
    let (mut app, mut hw, mut sink, faults) = make_app();

    app.handle_command(DriveCommand::SetPower(100), &mut hw, &faults, &mut sink);
    assert!(!app.is_auto());
    assert_eq!(app.power_level(), 30, "first step out of standstill is capped");

    // Repeating the request walks up by at most 10 per step.
    app.handle_command(DriveCommand::SetPower(100), &mut hw, &faults, &mut sink);
    assert_eq!(app.power_level(), 40);
    app.handle_command(DriveCommand::SetPower(100), &mut hw, &faults, &mut sink);
    assert_eq!(app.power_level(), 50);

    // While overridden, control ticks leave power alone even with the
    // drum reported stopped.
    hw.set_measured_rpm(0);
    for _ in 0..10 {
        app.tick(&mut hw, &faults, &mut sink);
    }
    assert_eq!(app.power_level(), 50);

    assert_eq!(sink.accepted_count(), 3, "every accepted command is acknowledged");
}

#[test]
fn set_speed_reenables_automatic_control() {
    let (mut app, mut hw, mut sink, faults) = make_app();

    app.handle_command(DriveCommand::SetPower(40), &mut hw, &faults, &mut sink);
    assert!(!app.is_auto());
    assert_eq!(app.power_level(), 30, "override is still ramp-limited");

    app.handle_command(DriveCommand::SetSpeed(60), &mut hw, &faults, &mut sink);
    assert!(app.is_auto());

    // The controller now steers power again: reported stopped and below
    // band, it steps +1 every 2 cycles from the overridden level.
    hw.set_measured_rpm(0);
    for _ in 0..3 {
        app.tick(&mut hw, &faults, &mut sink);
    }
    assert_eq!(app.power_level(), 31);
}

#[test]
fn boost_is_a_pure_passthrough() {
    let (mut app, mut hw, mut sink, faults) = make_app();

    app.handle_command(DriveCommand::Boost(true), &mut hw, &faults, &mut sink);
    assert!(hw.boost_on());
    app.handle_command(DriveCommand::Boost(false), &mut hw, &faults, &mut sink);
    assert!(!hw.boost_on());

    // Boost never touches power or control mode.
    assert_eq!(app.power_level(), 0);
    assert!(app.is_auto());
}

#[test]
fn console_line_to_power_stage_end_to_end() {
    let (mut app, mut hw, mut sink, faults) = make_app();

    let cmd = parse_command("P=25").expect("valid line");
    app.handle_command(cmd, &mut hw, &faults, &mut sink);
    assert_eq!(app.power_level(), 25);

    let cmd = parse_command("S=-60").expect("valid line");
    app.handle_command(cmd, &mut hw, &faults, &mut sink);
    assert!(app.is_auto());
    assert_eq!(app.power_level(), 0, "sign flip cuts power for the reversal");
}

#[test]
fn telemetry_carries_sensor_and_setpoint_fields() {
    let (mut app, mut hw, mut sink, faults) = make_app();

    hw.set_measured_rpm(60);
    hw.water.latest = 23_000;
    hw.temperature = 771;
    app.handle_command(DriveCommand::SetSpeed(60), &mut hw, &faults, &mut sink);

    let t = app.build_telemetry(&mut hw, &faults);
    assert_eq!(t.rpm, 60);
    assert_eq!(t.tacho_ticks, 15_000);
    assert_eq!(t.water_ticks, 23_000);
    assert_eq!(t.temperature_raw, 771);
    assert_eq!(t.wanted_rpm, 60);
    assert_eq!(t.fault_flags, 0);
}
