//! Generic frequency-capture channel.
//!
//! Turns a stream of externally-timed edge captures into a
//! time-between-pulses value plus rolling min/max.  The interrupt side
//! calls [`on_capture`]/[`on_overflow`]; the main loop takes an atomic
//! [`snapshot`] (the caller wraps the channel in a critical-section mutex —
//! the values are multi-byte and written from a different priority context
//! than they are read).
//!
//! A `latest` of 0 means "no capture this period": the overflow deadline is
//! the system's only timeout mechanism, and it is what distinguishes a
//! stopped input from one that simply has not been measured yet.
//!
//! [`on_capture`]: CaptureChannel::on_capture
//! [`on_overflow`]: CaptureChannel::on_overflow
//! [`snapshot`]: CaptureChannel::snapshot

/// A published view of one capture channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureSnapshot {
    /// Ticks between the most recent edges; 0 = nothing captured.
    pub latest: u16,
    /// Smallest interval captured during the last publish window.
    pub min: u16,
    /// Largest interval captured during the last publish window.
    pub max: u16,
}

/// Capture state for one input.  Running extrema accumulate between
/// snapshots; published extrema are frozen at each snapshot.
pub struct CaptureChannel {
    latest: u16,
    running_min: u16,
    running_max: u16,
    captured: bool,
    published_min: u16,
    published_max: u16,
}

impl CaptureChannel {
    pub const fn new() -> Self {
        Self {
            latest: 0,
            running_min: u16::MAX,
            running_max: 0,
            captured: false,
            published_min: 0,
            published_max: 0,
        }
    }

    /// Record a completed capture (interrupt path).
    pub fn on_capture(&mut self, interval_ticks: u16) {
        self.latest = interval_ticks;
        self.running_min = self.running_min.min(interval_ticks);
        self.running_max = self.running_max.max(interval_ticks);
        self.captured = true;
    }

    /// The capture deadline expired with no edge (interrupt path): the
    /// input is stopped.  Extrema keep tracking real captures only.
    pub fn on_overflow(&mut self) {
        self.latest = 0;
        self.captured = true;
    }

    /// True if anything was captured since the last snapshot.
    pub fn has_captured(&self) -> bool {
        self.captured
    }

    /// Publish: freeze the running extrema, reset them for the next window,
    /// clear the captured flag, and return the published view.
    ///
    /// An empty window (no captures since the last snapshot) publishes
    /// zeroed extrema.
    pub fn snapshot(&mut self) -> CaptureSnapshot {
        let (min, max) = if self.running_min <= self.running_max {
            (self.running_min, self.running_max)
        } else {
            (0, 0)
        };
        self.published_min = min;
        self.published_max = max;
        self.running_min = u16::MAX;
        self.running_max = 0;
        self.captured = false;

        CaptureSnapshot {
            latest: self.latest,
            min: self.published_min,
            max: self.published_max,
        }
    }
}

impl Default for CaptureChannel {
    fn default() -> Self {
        Self::new()
    }
}
