//! Sticky fault register.
//!
//! A small set of independent fault flags shared between the capture/firing
//! interrupt paths (writers) and the telemetry reporter (reader).  Lock-free:
//! the whole register is one `AtomicU8`, so raising a flag from an ISR never
//! masks interrupts and never blocks.
//!
//! ## Fault lifecycle
//!
//! 1. The owning component raises its flag (e.g. the phase tick ISR on a
//!    missing zero-crossing).
//! 2. The flag stays set until the telemetry consumer calls [`drain`], which
//!    reads and clears the whole byte in one atomic swap — the read-then-clear
//!    contract from the reporting side.
//! 3. The core never clears a fault on its own, with one exception:
//!    zero-crossing loss is cleared by the firing controller on every valid
//!    phase tick, so it self-heals as soon as mains sync returns.
//!
//! Each flag has exactly one raising component; see [`Fault`] for ownership.
//!
//! [`drain`]: FaultRegister::drain

use core::sync::atomic::{AtomicU8, Ordering};

use crate::error::Fault;

/// Global fault register shared by the interrupt paths and the main loop.
pub static FAULTS: FaultRegister = FaultRegister::new();

/// Lock-free register of sticky [`Fault`] flags.
pub struct FaultRegister {
    bits: AtomicU8,
}

impl FaultRegister {
    pub const fn new() -> Self {
        Self {
            bits: AtomicU8::new(0),
        }
    }

    /// Raise a fault flag.  Safe to call from interrupt context.
    pub fn raise(&self, fault: Fault) {
        self.bits.fetch_or(fault.mask(), Ordering::Relaxed);
    }

    /// Clear a single fault flag.  Safe to call from interrupt context.
    pub fn clear(&self, fault: Fault) {
        self.bits.fetch_and(!fault.mask(), Ordering::Relaxed);
    }

    /// Check if a specific fault is active.
    pub fn is_set(&self, fault: Fault) -> bool {
        self.bits.load(Ordering::Relaxed) & fault.mask() != 0
    }

    /// Current fault bitmask without clearing (0 = no faults).
    pub fn active(&self) -> u8 {
        self.bits.load(Ordering::Relaxed)
    }

    /// True if **any** fault is active.
    pub fn has_any(&self) -> bool {
        self.active() != 0
    }

    /// Read-then-clear the whole register.
    ///
    /// Reserved for the telemetry consumer — one call per reporting period.
    /// A fault raised between the swap and the report lands in the next
    /// period's byte.
    pub fn drain(&self) -> u8 {
        self.bits.swap(0, Ordering::Relaxed)
    }
}

impl Default for FaultRegister {
    fn default() -> Self {
        Self::new()
    }
}
