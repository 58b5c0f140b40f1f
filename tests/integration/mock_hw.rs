//! Mock hardware adapter for integration tests.
//!
//! Records every output call and serves injectable sensor values so tests
//! can assert on the full command history without touching real GPIO.

use drumdrive::app::events::AppEvent;
use drumdrive::app::ports::{EventSink, OutputPort, SensorPort};
use drumdrive::control::speed::Direction;
use drumdrive::sensors::capture::CaptureSnapshot;

// ── Output call record ────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputCall {
    SetDirection(Direction),
    SetBoost(bool),
    ToggleLed,
}

// ── MockDrive ─────────────────────────────────────────────────

pub struct MockDrive {
    pub tacho: CaptureSnapshot,
    pub water: CaptureSnapshot,
    pub temperature: u16,
    pub calls: Vec<OutputCall>,
}

#[allow(dead_code)]
impl MockDrive {
    pub fn new() -> Self {
        Self {
            tacho: CaptureSnapshot { latest: 0, min: 0, max: 0 },
            water: CaptureSnapshot { latest: 0, min: 0, max: 0 },
            temperature: 0,
            calls: Vec::new(),
        }
    }

    /// Inject a measured drum speed by synthesising the tacho interval for
    /// the default calibration (900 000 / rpm).  0 = stopped.
    pub fn set_measured_rpm(&mut self, rpm: u16) {
        self.tacho.latest = if rpm == 0 {
            0
        } else {
            (900_000 / u32::from(rpm)).min(u32::from(u16::MAX)) as u16
        };
    }

    pub fn last_direction(&self) -> Option<Direction> {
        self.calls.iter().rev().find_map(|c| match c {
            OutputCall::SetDirection(d) => Some(*d),
            _ => None,
        })
    }

    pub fn direction_switch_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, OutputCall::SetDirection(_)))
            .count()
    }

    pub fn boost_on(&self) -> bool {
        self.calls
            .iter()
            .rev()
            .find_map(|c| match c {
                OutputCall::SetBoost(on) => Some(*on),
                _ => None,
            })
            .unwrap_or(false)
    }
}

impl Default for MockDrive {
    fn default() -> Self {
        Self::new()
    }
}

impl SensorPort for MockDrive {
    fn tacho(&mut self) -> CaptureSnapshot {
        self.tacho
    }

    fn water_level(&mut self) -> CaptureSnapshot {
        self.water
    }

    fn temperature_raw(&mut self) -> u16 {
        self.temperature
    }
}

impl OutputPort for MockDrive {
    fn set_direction(&mut self, dir: Direction) {
        self.calls.push(OutputCall::SetDirection(dir));
    }

    fn set_boost(&mut self, on: bool) {
        self.calls.push(OutputCall::SetBoost(on));
    }

    fn toggle_led(&mut self) {
        self.calls.push(OutputCall::ToggleLed);
    }
}

// ── Recording event sink ──────────────────────────────────────

pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn accepted_count(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, AppEvent::CommandAccepted))
            .count()
    }

    pub fn committed_directions(&self) -> Vec<Direction> {
        self.events
            .iter()
            .filter_map(|e| match e {
                AppEvent::DirectionCommitted(d) => Some(*d),
                _ => None,
            })
            .collect()
    }
}

impl Default for RecordingSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}
