//! Property tests for the control-core invariants.
//!
//! Runs on host (x86_64) only — proptest is not available for ESP32
//! targets.  On ESP32, these tests are compiled out.

#![cfg(not(target_os = "espidf"))]

use drumdrive::control::power::PowerStage;
use drumdrive::control::window::{power_to_window, FiringWindow, NEVER};
use drumdrive::faults::FaultRegister;
use drumdrive::sensors::tacho;
use proptest::prelude::*;

// ── Power-demand mapper ───────────────────────────────────────

proptest! {
    /// For every power level, the window is either a sentinel (dead-band)
    /// or an ordered pair exactly 6 ticks wide inside the half-cycle.
    #[test]
    fn window_is_sentinel_or_six_ticks_wide(power in 0u8..=100) {
        let w = power_to_window(power);
        let center = 100 - power;

        if center >= 95 {
            prop_assert_eq!(w, FiringWindow::OFF);
        } else if center < 3 {
            prop_assert_eq!(w.turn_on, 0);
            prop_assert_eq!(w.turn_off, NEVER);
        } else {
            prop_assert_eq!(w.turn_off - w.turn_on, 6);
            prop_assert!(w.turn_on < 100, "turn-on must fall inside the half-cycle");
        }
    }

    /// More power never fires later.
    #[test]
    fn mapper_is_monotonic(a in 0u8..=100, b in 0u8..=100) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let (w_lo, w_hi) = (power_to_window(lo), power_to_window(hi));
        prop_assert!(
            w_hi.turn_on <= w_lo.turn_on,
            "power {} fires at {} but power {} fires at {}",
            lo, w_lo.turn_on, hi, w_hi.turn_on
        );
    }
}

// ── Ramp limiter ──────────────────────────────────────────────

proptest! {
    /// Over any request sequence, one step never gains more than +30 from
    /// standstill or +10 otherwise, and the level stays within 0–100.
    #[test]
    fn ramp_envelope_holds_for_any_sequence(
        requests in proptest::collection::vec(0u8..=255u8, 1..=64),
    ) {
        let faults = FaultRegister::new();
        let mut power = PowerStage::new();
        let mut prev = 0u8;

        for req in requests {
            let realised = power.set(req, &faults);
            let bound = if prev == 0 { 30 } else { prev.saturating_add(10) };
            prop_assert!(realised <= bound, "{prev} → {realised} beats the envelope");
            prop_assert!(realised <= 100);
            prev = realised;
        }
    }

    /// While zero-crossing loss is active the realised level is always 0,
    /// no matter the request history.
    #[test]
    fn faulted_stage_never_powers(
        warmup in proptest::collection::vec(0u8..=100u8, 0..=8),
        requests in proptest::collection::vec(1u8..=100u8, 1..=8),
    ) {
        let faults = FaultRegister::new();
        let mut power = PowerStage::new();
        for req in warmup {
            power.set(req, &faults);
        }

        faults.raise(drumdrive::error::Fault::ZeroCrossingLoss);
        for req in requests {
            prop_assert_eq!(power.set(req, &faults), 0);
            prop_assert_eq!(power.level(), 0);
        }
    }
}

// ── RPM derivation ────────────────────────────────────────────

proptest! {
    /// rpm(0) == 0 and rpm is monotonically decreasing in the interval.
    #[test]
    fn rpm_is_monotone_decreasing(a in 1u16..=u16::MAX, b in 1u16..=u16::MAX) {
        prop_assert_eq!(tacho::rpm(0, 900_000), 0);

        let (short, long) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(
            tacho::rpm(short, 900_000) >= tacho::rpm(long, 900_000),
            "shorter intervals must not read slower"
        );
    }
}

// ── Console parser robustness ─────────────────────────────────

proptest! {
    /// The parser never panics and never yields an out-of-range power.
    #[test]
    fn parser_total_over_arbitrary_lines(line in "\\PC*") {
        use drumdrive::app::commands::DriveCommand;
        if let Ok(DriveCommand::SetPower(p)) = drumdrive::console::parse_command(&line) {
            prop_assert!(p <= 100);
        }
    }
}
