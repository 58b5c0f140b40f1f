//! ESP-IDF runtime symbol providers for third-party crates.
//!
//! The `critical-section` 1.x API is satisfied here with a FreeRTOS
//! spinlock critical section, which masks interrupts on the local core —
//! required because the capture channels and the firing state machine are
//! locked from real ISR context.  Host tests get their implementation from
//! the `critical-section/std` dev-dependency instead.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::{portMUX_TYPE, vTaskEnterCritical, vTaskExitCritical};

/// `SPINLOCK_FREE` from esp-idf's spinlock.h.
#[cfg(target_os = "espidf")]
const SPINLOCK_FREE: u32 = 0xB33F_FFFF;

#[cfg(target_os = "espidf")]
static mut DRIVE_LOCK: portMUX_TYPE = portMUX_TYPE {
    owner: SPINLOCK_FREE,
    count: 0,
};

/// Runtime-backed critical-section acquire used by `critical-section` 1.x.
///
/// `vTaskEnterCritical` disables interrupts on the local core and takes the
/// spinlock with nesting tracked by FreeRTOS, so it is valid from both task
/// and ISR context on ESP-IDF 5.
#[cfg(target_os = "espidf")]
#[unsafe(no_mangle)]
pub extern "C" fn _critical_section_1_0_acquire() -> u8 {
    // SAFETY: DRIVE_LOCK is only accessed through the FreeRTOS critical
    // section API, which serialises all access to it.
    unsafe { vTaskEnterCritical(&raw mut DRIVE_LOCK) };
    0
}

/// Runtime-backed critical-section release used by `critical-section` 1.x.
#[cfg(target_os = "espidf")]
#[unsafe(no_mangle)]
pub extern "C" fn _critical_section_1_0_release(_token: u8) {
    // SAFETY: paired with the acquire above; FreeRTOS tracks nesting.
    unsafe { vTaskExitCritical(&raw mut DRIVE_LOCK) };
}
