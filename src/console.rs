//! Serial console: command-line intake and telemetry formatting.
//!
//! The transport is a plain UART.  Reception accumulates bytes into a
//! fixed 32-byte line buffer (carriage returns ignored, newline terminates);
//! a completed line raises [`Event::CommandReceived`] and the main loop
//! collects it with [`take_line`] and parses it with [`parse_command`].
//!
//! Command grammar, one command per line:
//!
//! ```text
//! P=<0..100>    manual power override (disables automatic control)
//! S=<rpm>       signed wanted speed (re-enables automatic control)
//! B=1 | B=0     auxiliary boost output
//! ```
//!
//! Telemetry goes out once per second as a single line:
//!
//! ```text
//! {pwr:30,tacho:15000,rpm:60,temp:512,spd:60,water:23000,err:0}
//! ```

use core::cell::RefCell;
use core::fmt::Write as _;

use embassy_sync::blocking_mutex::CriticalSectionMutex;
use heapless::String;

use crate::app::commands::DriveCommand;
use crate::app::events::TelemetryData;
use crate::error::{CommandError, Result};
use crate::events::{push_event, Event};

/// Line buffer capacity, matching the classic 32-byte console buffer.
pub const LINE_CAP: usize = 32;

static LINE: CriticalSectionMutex<RefCell<LineBuffer>> =
    CriticalSectionMutex::new(RefCell::new(LineBuffer::new()));

/// Feed one received byte.  Safe to call from the UART reception context.
pub fn rx_byte(byte: u8) {
    let completed = LINE.lock(|cell| cell.borrow_mut().push(byte));
    if completed {
        push_event(Event::CommandReceived);
    }
}

/// Take the pending completed line, if any (main loop).
pub fn take_line() -> Option<String<LINE_CAP>> {
    LINE.lock(|cell| cell.borrow_mut().take())
}

// ── Line accumulation ─────────────────────────────────────────

/// Fixed-capacity line accumulator shared between the reception context
/// and the main loop (hence behind the critical-section mutex above).
struct LineBuffer {
    buf: heapless::Vec<u8, LINE_CAP>,
    complete: bool,
}

impl LineBuffer {
    const fn new() -> Self {
        Self {
            buf: heapless::Vec::new(),
            complete: false,
        }
    }

    /// Returns true when the byte completed a line.
    fn push(&mut self, byte: u8) -> bool {
        if byte == b'\r' {
            return false;
        }
        if byte == b'\n' {
            self.complete = true;
            return true;
        }
        if self.complete {
            // A finished line is still waiting; bytes for the next command
            // are dropped rather than corrupting it.
            return false;
        }
        if self.buf.push(byte).is_err() {
            // Overrun: start the line over, keeping the newest byte.
            self.buf.clear();
            let _ = self.buf.push(byte);
        }
        false
    }

    fn take(&mut self) -> Option<String<LINE_CAP>> {
        if !self.complete {
            return None;
        }
        let mut line = String::new();
        for &b in &self.buf {
            // Non-ASCII input cannot form a valid command anyway.
            let _ = line.push(b as char);
        }
        self.buf.clear();
        self.complete = false;
        Some(line)
    }
}

// ── Command parsing ───────────────────────────────────────────

/// Parse one console line into a [`DriveCommand`].
pub fn parse_command(line: &str) -> Result<DriveCommand> {
    match line {
        "B=1" => return Ok(DriveCommand::Boost(true)),
        "B=0" => return Ok(DriveCommand::Boost(false)),
        _ => {}
    }

    if let Some(arg) = line.strip_prefix("P=") {
        let value = parse_int(arg)?;
        if !(0..=100).contains(&value) {
            return Err(CommandError::OutOfRange.into());
        }
        return Ok(DriveCommand::SetPower(value as u8));
    }

    if let Some(arg) = line.strip_prefix("S=") {
        return Ok(DriveCommand::SetSpeed(parse_int(arg)?));
    }

    Err(CommandError::Unknown.into())
}

/// Strict integer: optional leading minus, then digits only.
fn parse_int(s: &str) -> core::result::Result<i16, CommandError> {
    let digits = s.strip_prefix('-').unwrap_or(s);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CommandError::BadInteger);
    }
    s.parse::<i16>().map_err(|_| CommandError::OutOfRange)
}

// ── Telemetry formatting ──────────────────────────────────────

/// Render one telemetry line in the established console format.
pub fn format_telemetry(t: &TelemetryData) -> String<96> {
    let mut line = String::new();
    // Infallible: worst-case field widths total well under capacity.
    let _ = write!(
        line,
        "{{pwr:{},tacho:{},rpm:{},temp:{},spd:{},water:{},err:{}}}",
        t.power, t.tacho_ticks, t.rpm, t.temperature_raw, t.wanted_rpm, t.water_ticks, t.fault_flags
    );
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_the_three_command_forms() {
        assert_eq!(parse_command("B=1"), Ok(DriveCommand::Boost(true)));
        assert_eq!(parse_command("B=0"), Ok(DriveCommand::Boost(false)));
        assert_eq!(parse_command("P=55"), Ok(DriveCommand::SetPower(55)));
        assert_eq!(parse_command("S=60"), Ok(DriveCommand::SetSpeed(60)));
        assert_eq!(parse_command("S=-60"), Ok(DriveCommand::SetSpeed(-60)));
        assert_eq!(parse_command("S=0"), Ok(DriveCommand::SetSpeed(0)));
    }

    #[test]
    fn rejects_malformed_lines() {
        use crate::error::Error;
        for line in ["", "X=1", "B=2", "P=", "P=abc", "S=--5", "S=1 2", "p=10"] {
            assert!(
                matches!(parse_command(line), Err(Error::Command(_))),
                "{line:?} must be rejected"
            );
        }
    }

    #[test]
    fn rejects_out_of_range_power() {
        use crate::error::{CommandError, Error};
        assert_eq!(
            parse_command("P=101"),
            Err(Error::Command(CommandError::OutOfRange))
        );
        assert_eq!(
            parse_command("P=-1"),
            Err(Error::Command(CommandError::OutOfRange))
        );
    }

    #[test]
    fn line_buffer_accumulates_until_newline() {
        let mut lb = LineBuffer::new();
        for &b in b"S=42\r" {
            assert!(!lb.push(b));
        }
        assert!(lb.take().is_none(), "no line before the terminator");

        assert!(lb.push(b'\n'));
        let line = lb.take().unwrap();
        assert_eq!(line.as_str(), "S=42");
        assert!(lb.take().is_none(), "line is consumed exactly once");
    }

    #[test]
    fn line_buffer_overrun_restarts_the_line() {
        let mut lb = LineBuffer::new();
        for _ in 0..40 {
            lb.push(b'A');
        }
        lb.push(b'\n');
        let line = lb.take().unwrap();
        assert!(line.len() <= LINE_CAP);
        // Whatever survived the wrap cannot parse as a command — that is
        // the same contract the 8-bit board had.
        assert!(parse_command(&line).is_err());
    }

    #[test]
    fn pending_line_is_not_corrupted_by_new_bytes() {
        let mut lb = LineBuffer::new();
        for &b in b"B=1\n" {
            lb.push(b);
        }
        for &b in b"P=9" {
            lb.push(b);
        }
        assert_eq!(lb.take().unwrap().as_str(), "B=1");
    }

    #[test]
    fn telemetry_line_matches_console_format() {
        let t = TelemetryData {
            power: 30,
            tacho_ticks: 15_000,
            rpm: 60,
            temperature_raw: 512,
            wanted_rpm: -60,
            water_ticks: 23_000,
            fault_flags: 6,
        };
        assert_eq!(
            format_telemetry(&t).as_str(),
            "{pwr:30,tacho:15000,rpm:60,temp:512,spd:-60,water:23000,err:6}"
        );
    }
}
