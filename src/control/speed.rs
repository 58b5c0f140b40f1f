//! Closed-loop drum speed controller.
//!
//! Runs once per control cadence (~100 ms).  Compares tachometer RPM
//! against the signed wanted-speed setpoint and nudges the power stage:
//! slow, cadence-limited increases, immediate decreases.  Also sequences
//! direction reversal — the direction relay only ever switches with the
//! drum near standstill.
//!
//! All state here is main-loop-only; the ISR side is reached exclusively
//! through the power stage's window staging.

use crate::app::ports::OutputPort;
use crate::control::power::PowerStage;
use crate::faults::FaultRegister;

/// Hysteresis band half-width as a divisor: `wanted / 15` ≈ ±6.7 %.
const BAND_DIVISOR: u16 = 15;
/// Measured RPM under which a pending direction change may be committed.
const DIRECTION_COMMIT_RPM: u16 = 10;
/// Power floor that overcomes static friction from standstill.
const START_FLOOR: u8 = 25;
/// Below this power the drum cannot run; jump straight to the start floor.
const MIN_RUN_POWER: u8 = 20;
/// Stalled-rotor guard: cap power here while the drum shows no motion.
const STALL_GUARD_POWER: u8 = 45;
/// "No motion" threshold for the stalled-rotor guard.
const STALL_GUARD_RPM: u16 = 5;
/// Overspeed with less power than this: snap to zero instead of creeping.
const SNAP_OFF_POWER: u8 = 10;
/// Setpoints at or above this always correct at the fastest cadence.
const FAST_SETPOINT_RPM: u16 = 60;

/// Drum rotation direction.  `Forward` is the direction-relay idle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Forward,
    Reverse,
}

/// Correction cadence in control cycles: how many cycles between +1 power
/// steps.  Fast setpoints always correct quickly; otherwise correction
/// slows as the measured speed rises toward the band, which damps the
/// overshoot oscillation of the high-inertia drum.
fn correction_delay(wanted: u16, measured: u16) -> u8 {
    if wanted >= FAST_SETPOINT_RPM {
        2
    } else if measured < 20 {
        2
    } else if measured < 30 {
        18
    } else if measured < 50 {
        30
    } else {
        60
    }
}

/// Closed-loop speed controller state.
pub struct SpeedController {
    /// Signed setpoint; the sign encodes direction.
    wanted_rpm: i16,
    direction: Direction,
    /// Set when the setpoint sign flipped; held until the drum coasts to
    /// near-standstill and the relay commit happens.
    changing_direction: bool,
    /// False while a manual power override is active.
    enabled: bool,
    adjust_delay: u8,
    adjust_idx: u8,
}

impl SpeedController {
    pub const fn new() -> Self {
        Self {
            wanted_rpm: 0,
            direction: Direction::Forward,
            changing_direction: false,
            enabled: true,
            adjust_delay: 2,
            adjust_idx: 0,
        }
    }

    /// Enable/disable automatic control (manual power override disables).
    pub fn enable(&mut self, on: bool) {
        self.enabled = on;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn wanted_rpm(&self) -> i16 {
        self.wanted_rpm
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn changing_direction(&self) -> bool {
        self.changing_direction
    }

    /// Accept a new signed setpoint.
    ///
    /// A sign flip latches a direction change: power is cut immediately and
    /// the relay commit is deferred to [`adjust`](Self::adjust) once the
    /// drum has coasted down.
    pub fn set_wanted_speed(&mut self, rpm: i16, power: &mut PowerStage, faults: &FaultRegister) {
        if rpm == 0 {
            power.set(0, faults);
        } else if rpm < 0 {
            if self.direction == Direction::Forward {
                self.direction = Direction::Reverse;
                self.changing_direction = true;
                power.set(0, faults);
            }
        } else if self.direction == Direction::Reverse {
            self.direction = Direction::Forward;
            self.changing_direction = true;
            power.set(0, faults);
        }
        self.wanted_rpm = rpm;
    }

    /// One control cycle: compare measured RPM against the band and steer
    /// the power stage.  No-op while automatic control is disabled.
    pub fn adjust(
        &mut self,
        measured_rpm: u16,
        power: &mut PowerStage,
        outputs: &mut impl OutputPort,
        faults: &FaultRegister,
    ) {
        if !self.enabled {
            return;
        }

        let wanted = self.wanted_rpm.unsigned_abs();
        let upper = wanted + wanted / BAND_DIVISOR;
        let lower = wanted - wanted / BAND_DIVISOR;

        self.adjust_delay = correction_delay(wanted, measured_rpm);

        if self.changing_direction {
            // Coasting down; the relay must not switch against a spinning
            // drum.  Power was already cut when the change latched.
            if measured_rpm < DIRECTION_COMMIT_RPM {
                self.changing_direction = false;
                outputs.set_direction(self.direction);
                power.set(0, faults);
            }
        } else if wanted == 0 {
            power.set(0, faults);
        } else if measured_rpm < lower {
            if power.level() < MIN_RUN_POWER {
                power.set(START_FLOOR, faults);
            }
            if power.level() < 100 {
                if power.level() > STALL_GUARD_POWER && measured_rpm < STALL_GUARD_RPM {
                    // Rotor not turning despite substantial power: broken
                    // belt or jammed drum.  Hold power down.
                    power.clamp_to(STALL_GUARD_POWER);
                }
                if self.adjust_idx >= self.adjust_delay || power.level() < START_FLOOR {
                    power.set(power.level() + 1, faults);
                    self.adjust_idx = 0;
                }
                self.adjust_idx += 1;
            }
        } else if measured_rpm > upper {
            if power.level() < SNAP_OFF_POWER {
                power.set(0, faults);
            }
            if power.level() > 0 {
                power.set(power.level() - 1, faults);
            }
        }
    }
}

impl Default for SpeedController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records direction-relay switches; everything else is ignored.
    struct RecordedOutputs {
        direction_writes: Vec<Direction>,
    }

    impl RecordedOutputs {
        fn new() -> Self {
            Self {
                direction_writes: Vec::new(),
            }
        }
    }

    impl OutputPort for RecordedOutputs {
        fn set_direction(&mut self, dir: Direction) {
            self.direction_writes.push(dir);
        }
        fn set_boost(&mut self, _on: bool) {}
        fn toggle_led(&mut self) {}
    }

    fn rig() -> (SpeedController, PowerStage, RecordedOutputs, FaultRegister) {
        (
            SpeedController::new(),
            PowerStage::new(),
            RecordedOutputs::new(),
            FaultRegister::new(),
        )
    }

    #[test]
    fn startup_jumps_to_friction_floor_then_steps_by_one() {
        let (mut speed, mut power, mut out, faults) = rig();
        speed.set_wanted_speed(60, &mut power, &faults);

        speed.adjust(0, &mut power, &mut out, &faults);
        assert_eq!(power.level(), 25, "first correction jumps to the start floor");

        // Setpoint 60 → fastest cadence: +1 every 2 cycles.
        let mut levels = Vec::new();
        for _ in 0..8 {
            speed.adjust(0, &mut power, &mut out, &faults);
            levels.push(power.level());
        }
        assert_eq!(levels, vec![25, 26, 26, 27, 27, 28, 28, 29]);
    }

    #[test]
    fn within_band_holds_power() {
        let (mut speed, mut power, mut out, faults) = rig();
        speed.set_wanted_speed(60, &mut power, &faults);
        power.set(30, &faults);
        power.set(40, &faults);

        // Band is 60 ± 4 → [56, 64]; edges inclusive.
        for rpm in [56, 60, 64] {
            speed.adjust(rpm, &mut power, &mut out, &faults);
            assert_eq!(power.level(), 40, "rpm={rpm} must not move power");
        }
    }

    #[test]
    fn overspeed_decreases_immediately_every_cycle() {
        let (mut speed, mut power, mut out, faults) = rig();
        speed.set_wanted_speed(60, &mut power, &faults);
        power.set(30, &faults);
        power.set(40, &faults);

        speed.adjust(70, &mut power, &mut out, &faults);
        assert_eq!(power.level(), 39);
        speed.adjust(70, &mut power, &mut out, &faults);
        assert_eq!(power.level(), 38, "decreases have no cadence delay");
    }

    #[test]
    fn overspeed_at_negligible_power_snaps_to_zero() {
        let (mut speed, mut power, mut out, faults) = rig();
        speed.set_wanted_speed(20, &mut power, &faults);
        power.set(8, &faults);

        speed.adjust(40, &mut power, &mut out, &faults);
        assert_eq!(power.level(), 0, "creeping below 10% is cut outright");
    }

    #[test]
    fn stall_guard_caps_power_while_drum_shows_no_motion() {
        let (mut speed, mut power, mut out, faults) = rig();
        speed.set_wanted_speed(80, &mut power, &faults);
        power.set(30, &faults);
        power.set(40, &faults);
        power.set(50, &faults);

        for _ in 0..40 {
            speed.adjust(0, &mut power, &mut out, &faults);
            assert!(
                power.level() <= STALL_GUARD_POWER + 1,
                "stalled rotor must not accumulate power, got {}",
                power.level()
            );
        }

        // Drum actually turning: the guard releases and power climbs.
        for _ in 0..20 {
            speed.adjust(30, &mut power, &mut out, &faults);
        }
        assert!(power.level() > STALL_GUARD_POWER + 1);
    }

    #[test]
    fn wanted_zero_cuts_power() {
        let (mut speed, mut power, mut out, faults) = rig();
        speed.set_wanted_speed(60, &mut power, &faults);
        power.set(30, &faults);

        speed.set_wanted_speed(0, &mut power, &faults);
        speed.adjust(50, &mut power, &mut out, &faults);
        assert_eq!(power.level(), 0);
    }

    #[test]
    fn disabled_controller_is_inert() {
        let (mut speed, mut power, mut out, faults) = rig();
        speed.set_wanted_speed(60, &mut power, &faults);
        speed.enable(false);

        speed.adjust(0, &mut power, &mut out, &faults);
        assert_eq!(power.level(), 0);
        assert!(out.direction_writes.is_empty());
    }

    #[test]
    fn direction_reversal_waits_for_standstill() {
        let (mut speed, mut power, mut out, faults) = rig();
        speed.set_wanted_speed(60, &mut power, &faults);
        power.set(30, &faults);
        power.set(40, &faults);

        speed.set_wanted_speed(-60, &mut power, &faults);
        assert_eq!(power.level(), 0, "power cut the moment the change latches");
        assert!(speed.changing_direction());

        // Still coasting: the relay must not switch.
        for rpm in [55, 40, 25, 12, 10] {
            speed.adjust(rpm, &mut power, &mut out, &faults);
            assert!(out.direction_writes.is_empty(), "rpm={rpm}");
            assert_eq!(power.level(), 0);
        }

        // Below the commit threshold: relay switches, latch clears.
        speed.adjust(9, &mut power, &mut out, &faults);
        assert_eq!(out.direction_writes, vec![Direction::Reverse]);
        assert!(!speed.changing_direction());

        // Next cycle resumes normal control in the new direction.
        speed.adjust(0, &mut power, &mut out, &faults);
        assert_eq!(power.level(), 25);
    }

    #[test]
    fn same_sign_setpoint_does_not_latch_a_change() {
        let (mut speed, mut power, mut out, faults) = rig();
        speed.set_wanted_speed(60, &mut power, &faults);
        power.set(30, &faults);

        speed.set_wanted_speed(80, &mut power, &faults);
        assert!(!speed.changing_direction());
        assert_eq!(power.level(), 30, "no power cut on a same-direction change");

        // In band for the new setpoint: nothing moves, relay untouched.
        speed.adjust(80, &mut power, &mut out, &faults);
        assert_eq!(power.level(), 30);
        assert!(out.direction_writes.is_empty());
    }

    #[test]
    fn correction_delay_bands() {
        // Fast setpoints always correct at the fastest cadence.
        for measured in [0, 25, 45, 70] {
            assert_eq!(correction_delay(60, measured), 2);
        }
        // Slow setpoints: cadence stretches as measured speed approaches
        // the band.  There is deliberately no tier between 2 and 18.
        assert_eq!(correction_delay(40, 10), 2);
        assert_eq!(correction_delay(40, 19), 2);
        assert_eq!(correction_delay(40, 20), 18);
        assert_eq!(correction_delay(40, 29), 18);
        assert_eq!(correction_delay(40, 30), 30);
        assert_eq!(correction_delay(40, 49), 30);
        assert_eq!(correction_delay(40, 50), 60);
    }
}
