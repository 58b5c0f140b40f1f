//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to the
//! logger and telemetry lines to the console UART in the established
//! one-line format.

use log::info;

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;
use crate::console;
use crate::drivers::hw_init;

/// Adapter that puts every [`AppEvent`] on the serial console.
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Telemetry(t) => {
                hw_init::uart_write_line(&console::format_telemetry(t));
            }
            AppEvent::DirectionCommitted(dir) => {
                info!("DIR | committed {:?}", dir);
            }
            AppEvent::CommandAccepted => {
                hw_init::uart_write_line("OK");
            }
            AppEvent::Started => {
                info!("START | drive service up");
            }
        }
    }
}
