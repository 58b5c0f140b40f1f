//! Drumdrive Firmware — Main Entry Point
//!
//! Hexagonal architecture with event-driven execution.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                    Interrupt contexts                          │
//! │                                                                │
//! │  zero-cross ISR ──▶ TriacFiring ◀── phase timer (100 µs, ISR)  │
//! │  tacho ISR ──▶ CaptureChannel    water ISR ──▶ CaptureChannel  │
//! │                                                                │
//! │  ─────────────── publish boundaries (atomics/CS) ────────────  │
//! │                                                                │
//! │  control timer ──▶ Event Queue ──▶ main loop (this file)       │
//! │  UART RX ────────▶ line buffer ──┘                             │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │           DriveService (pure logic)                    │    │
//! │  │  SpeedController · PowerStage · telemetry              │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use log::{info, warn};

use drumdrive::adapters::hardware::HardwareAdapter;
use drumdrive::adapters::log_sink::LogEventSink;
use drumdrive::app::events::AppEvent;
use drumdrive::app::ports::{EventSink, OutputPort};
use drumdrive::app::service::DriveService;
use drumdrive::config::SystemConfig;
use drumdrive::console;
use drumdrive::drivers::outputs::DriveOutputs;
use drumdrive::drivers::watchdog::Watchdog;
use drumdrive::drivers::{hw_init, hw_timer};
use drumdrive::events::{self, Event};
use drumdrive::faults::FAULTS;
use drumdrive::sensors::temperature::TemperatureSensor;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("drumdrive v{}", env!("CARGO_PKG_VERSION"));

    // ── 2. Configuration (volatile; defaults at every reset) ──
    let config = SystemConfig::default();
    config.validate().map_err(|e| anyhow::anyhow!("{e}"))?;

    // ── 3. Peripherals, ISRs, timers ──────────────────────────
    if let Err(e) = hw_init::init_peripherals() {
        // Peripheral init failure is critical — log and halt; the
        // watchdog will reset us out of here.
        log::error!("HAL init failed: {} — halting", e);
        #[allow(clippy::empty_loop)]
        loop {}
    }
    if let Err(e) = hw_init::init_isr_service() {
        log::error!("ISR service init failed: {} — drive stays unpowered", e);
    }
    hw_timer::start_timers(config.phase_tick_us, config.control_loop_interval_ms);
    let watchdog = Watchdog::new();

    // ── 4. Adapters and service ───────────────────────────────
    let mut hw = HardwareAdapter::new(
        DriveOutputs::new(),
        TemperatureSensor::new(drumdrive::pins::TEMP_ADC_GPIO),
    );
    let mut sink = LogEventSink::new();
    let mut app = DriveService::new(config.clone());
    app.start(&mut sink);

    // Boot banner: distinguish a clean power-on from a watchdog recovery.
    if Watchdog::reset_was_abnormal() {
        hw_init::uart_write_line("wad!");
    } else {
        hw_init::uart_write_line("start");
    }

    info!("System ready. Entering event loop.");

    // ── 5. Event loop ─────────────────────────────────────────
    let mut telemetry_counter: u32 = 0;

    loop {
        // Drain console bytes; a completed line pushes CommandReceived.
        hw_init::poll_uart_rx();

        events::drain_events(|event| match event {
            Event::ControlTick => {
                app.tick(&mut hw, &FAULTS, &mut sink);

                telemetry_counter += 1;
                if telemetry_counter >= config.telemetry_interval_ticks {
                    telemetry_counter = 0;
                    events::push_event(Event::TelemetryTick);
                }
            }

            Event::TelemetryTick => {
                let t = app.build_telemetry(&mut hw, &FAULTS);
                sink.emit(&AppEvent::Telemetry(t));
                hw.toggle_led();
            }

            Event::CommandReceived => {
                if let Some(line) = console::take_line() {
                    match console::parse_command(&line) {
                        Ok(cmd) => app.handle_command(cmd, &mut hw, &FAULTS, &mut sink),
                        Err(e) => warn!("console: {} ({:?})", e, line.as_str()),
                    }
                }
            }
        });

        // Feed watchdog on every iteration; this caps acceptable loop latency.
        watchdog.feed();

        // Yield to the idle task between event bursts.
        #[cfg(target_os = "espidf")]
        unsafe {
            esp_idf_svc::sys::vTaskDelay(1);
        }
        #[cfg(not(target_os = "espidf"))]
        std::thread::sleep(std::time::Duration::from_millis(1));
    }
}
