//! Hardware timer module using ESP-IDF's esp_timer API.
//!
//! Two periodic timers:
//!
//! - **Phase timer** (100 µs, ISR dispatch): drives the triac firing state
//!   machine and the capture deadline counters.  This is the fast path and
//!   must stay in the microsecond range.
//! - **Control timer** (100 ms, task dispatch): pushes `ControlTick` into
//!   the lock-free event queue for the cooperative main loop.
//!
//! On simulation targets, timing is approximated by the sleep loop in
//! `main` instead.

use crate::events::{push_event, Event};

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use log::info;

#[cfg(target_os = "espidf")]
static mut PHASE_TIMER: esp_timer_handle_t = core::ptr::null_mut();
#[cfg(target_os = "espidf")]
static mut CONTROL_TIMER: esp_timer_handle_t = core::ptr::null_mut();

#[cfg(target_os = "espidf")]
unsafe extern "C" fn phase_tick_cb(_arg: *mut core::ffi::c_void) {
    crate::control::triac::phase_tick_isr();
    crate::drivers::hw_init::deadline::phase_tick();
}

#[cfg(target_os = "espidf")]
unsafe extern "C" fn control_tick_cb(_arg: *mut core::ffi::c_void) {
    push_event(Event::ControlTick);
}

/// Start the hardware tick timers.
///
/// `phase_tick_us` and `control_interval_ms` come from `SystemConfig`.
#[cfg(target_os = "espidf")]
pub fn start_timers(phase_tick_us: u32, control_interval_ms: u32) {
    // SAFETY: PHASE_TIMER and CONTROL_TIMER are written here once at boot
    // from the single main-task context before any callbacks fire.
    unsafe {
        let phase_args = esp_timer_create_args_t {
            callback: Some(phase_tick_cb),
            arg: core::ptr::null_mut(),
            dispatch_method: esp_timer_dispatch_t_ESP_TIMER_ISR,
            name: c"phase".as_ptr(),
            skip_unhandled_events: true,
        };
        let ret = esp_timer_create(&phase_args, &raw mut PHASE_TIMER);
        if ret != ESP_OK {
            log::error!("hw_timer: phase timer create failed (rc={}) — drive stays off", ret);
            return;
        }
        let ret = esp_timer_start_periodic(PHASE_TIMER, u64::from(phase_tick_us));
        if ret != ESP_OK {
            log::error!("hw_timer: phase timer start failed (rc={})", ret);
            return;
        }

        let control_args = esp_timer_create_args_t {
            callback: Some(control_tick_cb),
            arg: core::ptr::null_mut(),
            dispatch_method: esp_timer_dispatch_t_ESP_TIMER_TASK,
            name: c"control".as_ptr(),
            skip_unhandled_events: false,
        };
        let ret = esp_timer_create(&control_args, &raw mut CONTROL_TIMER);
        if ret != ESP_OK {
            log::error!("hw_timer: control timer create failed (rc={})", ret);
            return;
        }
        let ret = esp_timer_start_periodic(CONTROL_TIMER, u64::from(control_interval_ms) * 1000);
        if ret != ESP_OK {
            log::error!("hw_timer: control timer start failed (rc={})", ret);
            return;
        }

        info!(
            "hw_timer: phase@{}µs (ISR) + control@{}ms started",
            phase_tick_us, control_interval_ms
        );
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn start_timers(_phase_tick_us: u32, _control_interval_ms: u32) {
    log::info!("hw_timer(sim): timers not started (events driven by sleep loop)");
}

/// Stop all hardware tick timers.
#[cfg(target_os = "espidf")]
pub fn stop_timers() {
    // SAFETY: handles are valid if start_timers() succeeded; null-check
    // prevents touching never-created timers.
    unsafe {
        let pt = PHASE_TIMER;
        if !pt.is_null() {
            esp_timer_stop(pt);
        }
        let ct = CONTROL_TIMER;
        if !ct.is_null() {
            esp_timer_stop(ct);
        }
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn stop_timers() {}
