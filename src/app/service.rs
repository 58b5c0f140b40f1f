//! Drive service — the hexagonal core.
//!
//! [`DriveService`] owns the speed controller and the power stage and
//! exposes a clean, hardware-agnostic API.  All I/O flows through port
//! traits injected at call sites, making the entire service testable with
//! mock adapters.
//!
//! ```text
//!   SensorPort ──▶ ┌────────────────────────┐ ──▶ EventSink
//!                  │      DriveService       │
//!   OutputPort ◀── │  Speed · Power · Ramp   │ ──▶ pending FiringWindow
//!                  └────────────────────────┘
//! ```
//!
//! The fault register is passed in by the caller so the host tests can use
//! a private instance instead of the firmware-wide static.

use log::info;

use crate::config::SystemConfig;
use crate::control::power::PowerStage;
use crate::control::speed::SpeedController;
use crate::faults::FaultRegister;
use crate::sensors::tacho;

use super::commands::DriveCommand;
use super::events::{AppEvent, TelemetryData};
use super::ports::{EventSink, OutputPort, SensorPort};

/// The drive service orchestrates the main-loop side of the control core.
pub struct DriveService {
    config: SystemConfig,
    speed: SpeedController,
    power: PowerStage,
    tick_count: u64,
}

impl DriveService {
    pub fn new(config: SystemConfig) -> Self {
        Self {
            config,
            speed: SpeedController::new(),
            power: PowerStage::new(),
            tick_count: 0,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    pub fn start(&mut self, sink: &mut impl EventSink) {
        sink.emit(&AppEvent::Started);
        info!("DriveService started (auto control enabled, power 0)");
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one control cycle: snapshot the tachometer, derive RPM, let the
    /// speed controller steer the power stage.
    ///
    /// The `hw` parameter satisfies **both** [`SensorPort`] and
    /// [`OutputPort`] — the speed controller needs the output side for the
    /// direction-relay commit.
    pub fn tick(
        &mut self,
        hw: &mut (impl SensorPort + OutputPort),
        faults: &FaultRegister,
        sink: &mut impl EventSink,
    ) {
        self.tick_count += 1;

        let snap = hw.tacho();
        let rpm = tacho::rpm(snap.latest, self.config.rpm_calibration);

        let was_changing = self.speed.changing_direction();
        self.speed.adjust(rpm, &mut self.power, hw, faults);

        if was_changing && !self.speed.changing_direction() {
            let dir = self.speed.direction();
            info!("direction committed: {:?} at {} rpm", dir, rpm);
            sink.emit(&AppEvent::DirectionCommitted(dir));
        }
    }

    // ── Command handling ──────────────────────────────────────

    /// Process an external command (from the serial console).
    pub fn handle_command(
        &mut self,
        cmd: DriveCommand,
        hw: &mut impl OutputPort,
        faults: &FaultRegister,
        sink: &mut impl EventSink,
    ) {
        match cmd {
            DriveCommand::SetPower(level) => {
                // Manual override: automatic control off, ramp/fault gating
                // still applies.
                self.speed.enable(false);
                let realised = self.power.set(level, faults);
                info!("manual power override: requested {}, realised {}", level, realised);
            }
            DriveCommand::SetSpeed(rpm) => {
                self.speed.enable(true);
                self.speed.set_wanted_speed(rpm, &mut self.power, faults);
                info!("wanted speed set: {} rpm", rpm);
            }
            DriveCommand::Boost(on) => {
                hw.set_boost(on);
                info!("boost output: {}", on);
            }
        }
        sink.emit(&AppEvent::CommandAccepted);
    }

    // ── Queries ───────────────────────────────────────────────

    /// Build the periodic telemetry snapshot.  Re-snapshots both capture
    /// channels and **drains** the fault register — call once per
    /// reporting period.
    pub fn build_telemetry(
        &mut self,
        hw: &mut impl SensorPort,
        faults: &FaultRegister,
    ) -> TelemetryData {
        let tacho_snap = hw.tacho();
        let water_snap = hw.water_level();

        TelemetryData {
            power: self.power.level(),
            tacho_ticks: tacho_snap.latest,
            rpm: tacho::rpm(tacho_snap.latest, self.config.rpm_calibration),
            temperature_raw: hw.temperature_raw(),
            wanted_rpm: self.speed.wanted_rpm(),
            water_ticks: water_snap.latest,
            fault_flags: faults.drain(),
        }
    }

    /// Commanded power level (0–100).
    pub fn power_level(&self) -> u8 {
        self.power.level()
    }

    /// True while automatic speed control is active (no manual override).
    pub fn is_auto(&self) -> bool {
        self.speed.is_enabled()
    }

    /// Total control ticks executed since startup.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn config(&self) -> &SystemConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::speed::Direction;
    use crate::sensors::capture::CaptureSnapshot;

    struct StubHw {
        tacho_latest: u16,
    }

    impl SensorPort for StubHw {
        fn tacho(&mut self) -> CaptureSnapshot {
            CaptureSnapshot { latest: self.tacho_latest, min: 0, max: 0 }
        }
        fn water_level(&mut self) -> CaptureSnapshot {
            CaptureSnapshot { latest: 0, min: 0, max: 0 }
        }
        fn temperature_raw(&mut self) -> u16 {
            512
        }
    }

    impl OutputPort for StubHw {
        fn set_direction(&mut self, _dir: Direction) {}
        fn set_boost(&mut self, _on: bool) {}
        fn toggle_led(&mut self) {}
    }

    struct NullSink;
    impl EventSink for NullSink {
        fn emit(&mut self, _event: &AppEvent) {}
    }

    #[test]
    fn manual_override_disables_auto_control() {
        let faults = FaultRegister::new();
        let mut app = DriveService::new(SystemConfig::default());
        let mut hw = StubHw { tacho_latest: 0 };
        let mut sink = NullSink;

        assert!(app.is_auto());
        app.handle_command(DriveCommand::SetPower(25), &mut hw, &faults, &mut sink);
        assert!(!app.is_auto());
        assert_eq!(app.power_level(), 25);

        // Ticks no longer adjust power while overridden.
        for _ in 0..5 {
            app.tick(&mut hw, &faults, &mut sink);
        }
        assert_eq!(app.power_level(), 25);

        app.handle_command(DriveCommand::SetSpeed(60), &mut hw, &faults, &mut sink);
        assert!(app.is_auto());
    }

    #[test]
    fn telemetry_drains_fault_byte() {
        let faults = FaultRegister::new();
        let mut app = DriveService::new(SystemConfig::default());
        let mut hw = StubHw { tacho_latest: 15_000 };

        faults.raise(crate::error::Fault::WaterTimeout);
        let t = app.build_telemetry(&mut hw, &faults);
        assert_eq!(t.fault_flags, crate::error::Fault::WaterTimeout.mask());
        assert_eq!(t.rpm, 60);
        assert_eq!(t.temperature_raw, 512);

        let t = app.build_telemetry(&mut hw, &faults);
        assert_eq!(t.fault_flags, 0, "fault byte is read-then-clear");
    }
}
