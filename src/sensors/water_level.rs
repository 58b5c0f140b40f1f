//! Water-level capture channel.
//!
//! The pressure-chamber sensor outputs a frequency in the 22–24 kHz range
//! that shifts with water column height.  Single-edge timing at that
//! frequency would be all noise, so the capture hardware counts
//! [`EDGES_PER_CAPTURE`] rising edges and the ISR reports the elapsed time
//! for the whole group.  The reading is the raw group interval in 1.5 MHz
//! timer ticks; interpretation is left to the console consumer.
//!
//! No capture before the deadline raises the water-timeout fault and zeroes
//! the reading; the next successful capture clears it.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::CriticalSectionMutex;

use crate::error::Fault;
use crate::faults::FAULTS;
use crate::sensors::capture::{CaptureChannel, CaptureSnapshot};

/// Rising edges per capture group.
pub const EDGES_PER_CAPTURE: u16 = 16;

static CHANNEL: CriticalSectionMutex<RefCell<CaptureChannel>> =
    CriticalSectionMutex::new(RefCell::new(CaptureChannel::new()));

/// Called from the capture ISR once per completed edge group.
/// `group_ticks`: elapsed time for [`EDGES_PER_CAPTURE`] edges.
pub fn capture_isr(group_ticks: u16) {
    CHANNEL.lock(|ch| ch.borrow_mut().on_capture(group_ticks));
    FAULTS.clear(Fault::WaterTimeout);
}

/// Called when the capture deadline expires with no completed group.
pub fn overflow_isr() {
    CHANNEL.lock(|ch| ch.borrow_mut().on_overflow());
    FAULTS.raise(Fault::WaterTimeout);
}

/// Main-loop snapshot (read-then-clear of the publish window).
pub fn snapshot() -> CaptureSnapshot {
    CHANNEL.lock(|ch| ch.borrow_mut().snapshot())
}
