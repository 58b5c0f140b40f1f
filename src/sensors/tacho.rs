//! Tachometer capture channel.
//!
//! The tacho coil's comparator output is timestamped per rising edge by
//! the capture ISR; the interval between consecutive edges (in 1.5 MHz
//! timer ticks) is the raw speed measurement.  If no edge arrives before
//! the capture deadline the drum is effectively stopped: the reading is
//! forced to 0 and — only while drive power is commanded — the stall
//! fault is raised.  A stopped drum at zero power is not a fault.
//!
//! ## Dual-target design
//!
//! The ISR entry points here are plain functions over a critical-section
//! mutex, so the same code runs from the GPIO ISR on the target and from
//! test drivers on the host.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::CriticalSectionMutex;

use crate::control::triac;
use crate::error::Fault;
use crate::faults::FAULTS;
use crate::sensors::capture::{CaptureChannel, CaptureSnapshot};

static CHANNEL: CriticalSectionMutex<RefCell<CaptureChannel>> =
    CriticalSectionMutex::new(RefCell::new(CaptureChannel::new()));

/// Called from the capture ISR on each rising tacho edge.
/// `interval_ticks`: time since the previous edge, 1.5 MHz timebase.
pub fn capture_isr(interval_ticks: u16) {
    CHANNEL.lock(|ch| ch.borrow_mut().on_capture(interval_ticks));
    FAULTS.clear(Fault::TachoStall);
}

/// Called when the capture deadline expires with no edge.
pub fn overflow_isr() {
    CHANNEL.lock(|ch| ch.borrow_mut().on_overflow());
    if triac::drive_active() {
        FAULTS.raise(Fault::TachoStall);
    }
}

/// Main-loop snapshot (read-then-clear of the publish window).
pub fn snapshot() -> CaptureSnapshot {
    CHANNEL.lock(|ch| ch.borrow_mut().snapshot())
}

/// Derive drum RPM from a capture interval.
///
/// `calibration` is fixed by the tacho coil geometry and the capture timer
/// rate (see [`SystemConfig::rpm_calibration`]).  An interval of 0 means
/// "stopped or not yet measured" and reads as 0 RPM.
///
/// [`SystemConfig::rpm_calibration`]: crate::config::SystemConfig::rpm_calibration
pub fn rpm(interval_ticks: u16, calibration: u32) -> u16 {
    if interval_ticks == 0 {
        return 0;
    }
    (calibration / u32::from(interval_ticks)).min(u32::from(u16::MAX)) as u16
}
