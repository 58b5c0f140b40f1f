//! One-shot hardware peripheral initialization and interrupt glue.
//!
//! Configures the ADC channel, GPIO directions, and the UART console using
//! raw ESP-IDF sys calls, then registers the edge ISRs that feed the firing
//! controller and the capture channels.  Called once from `main()` before
//! the event loop starts.
//!
//! The edge ISRs here are deliberately thin: timestamp the edge, convert to
//! capture ticks, and hand off to the corresponding core module.  Anything
//! heavier belongs on the other side of a publish boundary.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot peripheral initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    AdcInitFailed(i32),
    GpioConfigFailed(i32),
    UartInitFailed(i32),
    IsrInstallFailed(i32),
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::AdcInitFailed(rc) => write!(f, "ADC1 init failed (rc={})", rc),
            Self::GpioConfigFailed(rc) => write!(f, "GPIO config failed (rc={})", rc),
            Self::UartInitFailed(rc) => write!(f, "UART init failed (rc={})", rc),
            Self::IsrInstallFailed(rc) => write!(f, "GPIO ISR service install failed (rc={})", rc),
        }
    }
}

#[cfg(target_os = "espidf")]
use log::info;

#[cfg(target_os = "espidf")]
use crate::pins;

#[cfg(target_os = "espidf")]
pub fn init_peripherals() -> Result<(), HwInitError> {
    // SAFETY: Called once from main() before event loop; single-threaded.
    unsafe {
        init_adc()?;
        init_gpio_inputs()?;
        init_gpio_outputs()?;
        init_uart()?;
    }
    info!("hw_init: all peripherals configured");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_peripherals() -> Result<(), HwInitError> {
    log::info!("hw_init(sim): peripheral init skipped");
    Ok(())
}

// ── ADC (oneshot) ─────────────────────────────────────────────

pub const ADC1_CH_TEMP: u32 = 0;

#[cfg(target_os = "espidf")]
static mut ADC1_HANDLE: adc_oneshot_unit_handle_t = core::ptr::null_mut();

/// SAFETY: Written once during init, then only read from the main-loop
/// ADC path.  No concurrent access is possible because `init_adc()`
/// completes before the event loop starts.
#[cfg(target_os = "espidf")]
unsafe fn adc1_handle() -> adc_oneshot_unit_handle_t {
    unsafe { ADC1_HANDLE }
}

#[cfg(target_os = "espidf")]
unsafe fn init_adc() -> Result<(), HwInitError> {
    let init_cfg = adc_oneshot_unit_init_cfg_t {
        unit_id: adc_unit_t_ADC_UNIT_1,
        ulp_mode: adc_ulp_mode_t_ADC_ULP_MODE_DISABLE,
        ..Default::default()
    };
    // SAFETY: ADC1_HANDLE is only written here, once at boot.
    let ret = unsafe { adc_oneshot_new_unit(&init_cfg, &raw mut ADC1_HANDLE) };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::AdcInitFailed(ret));
    }

    let chan_cfg = adc_oneshot_chan_cfg_t {
        atten: adc_atten_t_ADC_ATTEN_DB_12,
        bitwidth: adc_bitwidth_t_ADC_BITWIDTH_12,
    };
    let ret = unsafe { adc_oneshot_config_channel(adc1_handle(), ADC1_CH_TEMP, &chan_cfg) };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::AdcInitFailed(ret));
    }

    info!("hw_init: ADC1 configured (CH{}=temp)", ADC1_CH_TEMP);
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn adc1_read(channel: u32) -> u16 {
    let mut raw: i32 = 0;
    // SAFETY: adc1_handle() contract — single-threaded main-loop access only.
    let ret = unsafe { adc_oneshot_read(adc1_handle(), channel, &mut raw) };
    if ret != ESP_OK as i32 {
        return 0;
    }
    raw.max(0) as u16
}

#[cfg(not(target_os = "espidf"))]
pub fn adc1_read(_channel: u32) -> u16 {
    0
}

// ── GPIO ──────────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_gpio_inputs() -> Result<(), HwInitError> {
    let input_pins = [
        pins::ZERO_CROSS_GPIO,
        pins::TACHO_GPIO,
        pins::WATER_LEVEL_GPIO,
    ];

    for &pin in &input_pins {
        let cfg = gpio_config_t {
            pin_bit_mask: 1u64 << pin,
            mode: gpio_mode_t_GPIO_MODE_INPUT,
            pull_up_en: gpio_pullup_t_GPIO_PULLUP_ENABLE,
            pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
            intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
        };
        let ret = unsafe { gpio_config(&cfg) };
        if ret != ESP_OK as i32 {
            return Err(HwInitError::GpioConfigFailed(ret));
        }
    }

    info!("hw_init: GPIO inputs configured");
    Ok(())
}

#[cfg(target_os = "espidf")]
unsafe fn init_gpio_outputs() -> Result<(), HwInitError> {
    let output_pins = [
        pins::TRIAC_GATE_GPIO,
        pins::DIRECTION_GPIO,
        pins::BOOST_GPIO,
        pins::LED_GPIO,
    ];

    for &pin in &output_pins {
        let cfg = gpio_config_t {
            pin_bit_mask: 1u64 << pin,
            mode: gpio_mode_t_GPIO_MODE_OUTPUT,
            pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
            pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
            intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
        };
        let ret = unsafe { gpio_config(&cfg) };
        if ret != ESP_OK as i32 {
            return Err(HwInitError::GpioConfigFailed(ret));
        }
    }

    // Gate idles HIGH (active-low opto-triac): never power the motor on boot.
    unsafe {
        gpio_set_level(pins::TRIAC_GATE_GPIO, 1);
        gpio_set_level(pins::DIRECTION_GPIO, 0);
        gpio_set_level(pins::BOOST_GPIO, 0);
        gpio_set_level(pins::LED_GPIO, 1);
    }

    info!("hw_init: GPIO outputs configured (gate idle OFF)");
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn gpio_write(pin: i32, high: bool) {
    // SAFETY: gpio_set_level writes to an already-configured output pin;
    // pin was validated during init_gpio_outputs().
    unsafe {
        gpio_set_level(pin, if high { 1 } else { 0 });
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_write(_pin: i32, _high: bool) {}

// ── UART console ──────────────────────────────────────────────

#[cfg(target_os = "espidf")]
const UART_PORT: u32 = 1;

#[cfg(target_os = "espidf")]
unsafe fn init_uart() -> Result<(), HwInitError> {
    let cfg = uart_config_t {
        baud_rate: 115_200,
        data_bits: uart_word_length_t_UART_DATA_8_BITS,
        parity: uart_parity_t_UART_PARITY_DISABLE,
        stop_bits: uart_stop_bits_t_UART_STOP_BITS_1,
        flow_ctrl: uart_hw_flowcontrol_t_UART_HW_FLOWCTRL_DISABLE,
        ..Default::default()
    };
    // SAFETY: one-shot driver install on an otherwise unused port.
    unsafe {
        let ret = uart_driver_install(UART_PORT as i32, 256, 256, 0, core::ptr::null_mut(), 0);
        if ret != ESP_OK as i32 {
            return Err(HwInitError::UartInitFailed(ret));
        }
        let ret = uart_param_config(UART_PORT as i32, &cfg);
        if ret != ESP_OK as i32 {
            return Err(HwInitError::UartInitFailed(ret));
        }
        uart_set_pin(
            UART_PORT as i32,
            pins::UART_TX_GPIO,
            pins::UART_RX_GPIO,
            -1,
            -1,
        );
    }
    info!("hw_init: UART{} console at 115200", UART_PORT);
    Ok(())
}

/// Non-blocking drain of received console bytes into the line buffer.
/// Called once per main-loop iteration.
#[cfg(target_os = "espidf")]
pub fn poll_uart_rx() {
    let mut buf = [0u8; 32];
    // SAFETY: driver installed in init_uart(); zero timeout = non-blocking.
    let n = unsafe {
        uart_read_bytes(
            UART_PORT as i32,
            buf.as_mut_ptr().cast(),
            buf.len() as u32,
            0,
        )
    };
    if n > 0 {
        for &b in &buf[..n as usize] {
            crate::console::rx_byte(b);
        }
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn poll_uart_rx() {}

/// Write a line (plus newline) to the console UART.
#[cfg(target_os = "espidf")]
pub fn uart_write_line(line: &str) {
    // SAFETY: driver installed in init_uart(); uart_write_bytes copies the
    // buffer before returning.
    unsafe {
        uart_write_bytes(UART_PORT as i32, line.as_ptr().cast(), line.len());
        uart_write_bytes(UART_PORT as i32, c"\n".as_ptr().cast(), 1);
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn uart_write_line(line: &str) {
    log::info!("console> {line}");
}

// ── Edge ISRs and capture timestamping ────────────────────────

#[cfg(target_os = "espidf")]
mod isr_glue {
    use core::sync::atomic::{AtomicI64, AtomicU16, Ordering};

    use super::*;
    use crate::sensors::water_level::EDGES_PER_CAPTURE;
    use crate::sensors::{tacho, water_level};

    /// Capture timebase: 1.5 ticks per microsecond (1.5 MHz equivalent).
    fn us_to_capture_ticks(delta_us: i64) -> u16 {
        (delta_us.saturating_mul(3) / 2).clamp(0, i64::from(u16::MAX)) as u16
    }

    static LAST_TACHO_US: AtomicI64 = AtomicI64::new(0);
    static WATER_EDGES: AtomicU16 = AtomicU16::new(0);
    static WATER_GROUP_START_US: AtomicI64 = AtomicI64::new(0);

    pub unsafe extern "C" fn zero_cross_gpio_isr(_arg: *mut core::ffi::c_void) {
        crate::control::triac::zero_crossing_isr();
    }

    pub unsafe extern "C" fn tacho_gpio_isr(_arg: *mut core::ffi::c_void) {
        // SAFETY: esp_timer_get_time is an RTC counter read; ISR-safe.
        let now = unsafe { esp_timer_get_time() };
        let prev = LAST_TACHO_US.swap(now, Ordering::Relaxed);
        super::deadline::note_tacho_edge();
        if prev != 0 {
            tacho::capture_isr(us_to_capture_ticks(now - prev));
        }
    }

    pub unsafe extern "C" fn water_gpio_isr(_arg: *mut core::ffi::c_void) {
        let edges = WATER_EDGES.fetch_add(1, Ordering::Relaxed) + 1;
        if edges >= EDGES_PER_CAPTURE {
            WATER_EDGES.store(0, Ordering::Relaxed);
            // SAFETY: esp_timer_get_time is an RTC counter read; ISR-safe.
            let now = unsafe { esp_timer_get_time() };
            let start = WATER_GROUP_START_US.swap(now, Ordering::Relaxed);
            super::deadline::note_water_edge();
            if start != 0 {
                water_level::capture_isr(us_to_capture_ticks(now - start));
            }
        }
    }
}

/// Capture deadline bookkeeping, advanced from the phase tick.
///
/// Plays the role of a dedicated 16-bit capture timer's overflow interrupt:
/// if a channel sees no edge for the configured deadline, its overflow path
/// fires and keeps firing once per deadline until edges return.
#[cfg(target_os = "espidf")]
pub(crate) mod deadline {
    use core::sync::atomic::{AtomicU32, Ordering};

    use crate::sensors::{tacho, water_level};

    /// Deadline in phase ticks: capture_timeout_ms × 1000 / phase_tick_us
    /// for the default `SystemConfig` (44 ms at 100 µs ticks).
    const CAPTURE_TIMEOUT_TICKS: u32 = 440;

    static TACHO_IDLE: AtomicU32 = AtomicU32::new(0);
    static WATER_IDLE: AtomicU32 = AtomicU32::new(0);

    pub fn note_tacho_edge() {
        TACHO_IDLE.store(0, Ordering::Relaxed);
    }

    pub fn note_water_edge() {
        WATER_IDLE.store(0, Ordering::Relaxed);
    }

    /// Advance both deadline counters by one phase tick.
    pub fn phase_tick() {
        if TACHO_IDLE.fetch_add(1, Ordering::Relaxed) + 1 >= CAPTURE_TIMEOUT_TICKS {
            TACHO_IDLE.store(0, Ordering::Relaxed);
            tacho::overflow_isr();
        }
        if WATER_IDLE.fetch_add(1, Ordering::Relaxed) + 1 >= CAPTURE_TIMEOUT_TICKS {
            WATER_IDLE.store(0, Ordering::Relaxed);
            water_level::overflow_isr();
        }
    }
}

/// Install the per-pin GPIO ISR service and register interrupt handlers.
/// Call after init_peripherals() and before the timers start.
#[cfg(target_os = "espidf")]
pub fn init_isr_service() -> Result<(), HwInitError> {
    // SAFETY: gpio_install_isr_service is idempotent; ESP_ERR_INVALID_STATE
    // means it was already installed (acceptable).  The handlers registered
    // below only touch atomics and critical-section cells.
    unsafe {
        let ret = gpio_install_isr_service(0);
        if ret != ESP_OK && ret != ESP_ERR_INVALID_STATE {
            return Err(HwInitError::IsrInstallFailed(ret));
        }

        // Zero-crossing: falling edge, twice per AC cycle.
        gpio_set_intr_type(pins::ZERO_CROSS_GPIO, gpio_int_type_t_GPIO_INTR_NEGEDGE);
        gpio_isr_handler_add(
            pins::ZERO_CROSS_GPIO,
            Some(isr_glue::zero_cross_gpio_isr),
            core::ptr::null_mut(),
        );
        gpio_intr_enable(pins::ZERO_CROSS_GPIO);

        // Tachometer: rising edge, timestamped per pulse.
        gpio_set_intr_type(pins::TACHO_GPIO, gpio_int_type_t_GPIO_INTR_POSEDGE);
        gpio_isr_handler_add(
            pins::TACHO_GPIO,
            Some(isr_glue::tacho_gpio_isr),
            core::ptr::null_mut(),
        );
        gpio_intr_enable(pins::TACHO_GPIO);

        // Water level: rising edge, grouped by 16 in the handler.
        gpio_set_intr_type(pins::WATER_LEVEL_GPIO, gpio_int_type_t_GPIO_INTR_POSEDGE);
        gpio_isr_handler_add(
            pins::WATER_LEVEL_GPIO,
            Some(isr_glue::water_gpio_isr),
            core::ptr::null_mut(),
        );
        gpio_intr_enable(pins::WATER_LEVEL_GPIO);

        info!("hw_init: ISR service installed (zero-cross, tacho, water)");
    }
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_isr_service() -> Result<(), HwInitError> {
    log::info!("hw_init(sim): ISR service skipped");
    Ok(())
}
