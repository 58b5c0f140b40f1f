//! Zero-crossing-synchronised triac firing controller.
//!
//! Runs entirely in the high-priority interrupt context: the zero-crossing
//! edge ISR and the 10 kHz phase tick ISR both drive one [`TriacFiring`]
//! state machine.  The main loop never touches it directly — it stages a
//! *pending* firing window through [`stage_window`], and the pending window
//! is copied into the *armed* window only at a zero-crossing, so a window
//! change can never corrupt a half-cycle already in progress.
//!
//! ## Gate ownership
//!
//! The triac gate pin is written from this module only.  The logical gate
//! state is mirrored into an atomic so the main loop and host tests can
//! observe it without touching hardware.
//!
//! ## Loss of mains sync
//!
//! The phase counter saturates into an `INVALID` sentinel when no crossing
//! arrives for a full count-up (≈ 2.5 expected half-cycles).  While invalid,
//! every phase tick forces the gate off and raises the zero-crossing-loss
//! fault; the fault self-clears on the first tick after crossings resume.

use core::cell::RefCell;
use core::sync::atomic::{AtomicBool, AtomicU16, Ordering};

use embassy_sync::blocking_mutex::CriticalSectionMutex;

use crate::control::window::{FiringWindow, NEVER};
use crate::error::Fault;
use crate::faults::{FaultRegister, FAULTS};

/// Phase counter sentinel: no zero-crossing observed since counting began.
const INVALID_PHASE: u8 = 0xFF;

/// Pending firing window, written by the power stage (main loop), consumed
/// by the zero-crossing ISR.  Packed so the hand-over is a single atomic.
static PENDING: AtomicU16 = AtomicU16::new(FiringWindow::OFF.pack());

/// Logical gate state mirror (true = conducting).
static GATE_ON: AtomicBool = AtomicBool::new(false);

/// True while the armed window fires at all this half-cycle.  Feeds the
/// tachometer stall condition: a stopped drum is only a fault when drive
/// power is actually commanded.
static DRIVE_ACTIVE: AtomicBool = AtomicBool::new(false);

/// The firing state machine, owned by the interrupt context.
static FIRING: CriticalSectionMutex<RefCell<TriacFiring>> =
    CriticalSectionMutex::new(RefCell::new(TriacFiring::new()));

// ── Main-loop API ─────────────────────────────────────────────

/// Stage the window to be armed at the next zero-crossing.
pub fn stage_window(window: FiringWindow) {
    PENDING.store(window.pack(), Ordering::Release);
}

/// The currently staged (not yet armed) window.
pub fn pending_window() -> FiringWindow {
    FiringWindow::unpack(PENDING.load(Ordering::Acquire))
}

/// Logical gate state (true = conducting).
pub fn gate_is_on() -> bool {
    GATE_ON.load(Ordering::Relaxed)
}

/// True if the armed window commands any conduction this half-cycle.
pub fn drive_active() -> bool {
    DRIVE_ACTIVE.load(Ordering::Relaxed)
}

// ── Interrupt entry points ────────────────────────────────────

/// Zero-crossing edge ISR: resync the phase counter, arm the pending
/// window, force the gate off for the top of the half-cycle.
pub fn zero_crossing_isr() {
    FIRING.lock(|cell| {
        let mut firing = cell.borrow_mut();
        let gate = firing.on_zero_crossing(pending_window());
        DRIVE_ACTIVE.store(firing.armed.is_active(), Ordering::Relaxed);
        write_gate(gate);
    });
}

/// Phase tick ISR (every 1/100 of the expected half-cycle).
pub fn phase_tick_isr() {
    FIRING.lock(|cell| {
        let gate = cell.borrow_mut().on_phase_tick(&FAULTS);
        write_gate(gate);
    });
}

fn write_gate(on: bool) {
    GATE_ON.store(on, Ordering::Relaxed);
    // Gate is active-low at the opto-triac.
    #[cfg(target_os = "espidf")]
    crate::drivers::hw_init::gpio_write(crate::pins::TRIAC_GATE_GPIO, !on);
}

// ── State machine ─────────────────────────────────────────────

/// Firing state for one triac: the armed window, the position within the
/// current half-cycle, and the commanded gate level.
pub struct TriacFiring {
    /// Window in effect for the current half-cycle.
    armed: FiringWindow,
    /// Phase ticks since the last zero-crossing; [`INVALID_PHASE`] once the
    /// count saturates with no crossing.
    phase: u8,
    gate_on: bool,
}

impl TriacFiring {
    pub const fn new() -> Self {
        Self {
            armed: FiringWindow::OFF,
            phase: 0,
            gate_on: false,
        }
    }

    /// Handle a zero-crossing: phase restarts, pending becomes armed, and
    /// the gate is off at the top of every half-cycle.  Returns the gate.
    pub fn on_zero_crossing(&mut self, pending: FiringWindow) -> bool {
        self.phase = 0;
        self.armed = pending;
        self.gate_on = false;
        self.gate_on
    }

    /// Handle one phase tick (1/100 of the expected half-cycle).
    /// Returns the gate level to drive.
    pub fn on_phase_tick(&mut self, faults: &FaultRegister) -> bool {
        if self.phase == INVALID_PHASE {
            // Counter saturated with no crossing: mains sync is gone and
            // the triac must not stay energised.
            faults.raise(Fault::ZeroCrossingLoss);
            self.gate_on = false;
            return self.gate_on;
        }

        if self.phase == self.armed.turn_on {
            self.gate_on = true;
        } else if self.armed.turn_off != NEVER && self.phase >= self.armed.turn_off {
            self.gate_on = false;
        }
        faults.clear(Fault::ZeroCrossingLoss);
        self.phase += 1; // saturates into INVALID_PHASE at 0xFF
        self.gate_on
    }

    pub fn gate_on(&self) -> bool {
        self.gate_on
    }

    pub fn armed(&self) -> FiringWindow {
        self.armed
    }
}

impl Default for TriacFiring {
    fn default() -> Self {
        Self::new()
    }
}
