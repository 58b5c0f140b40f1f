//! Task Watchdog Timer (TWDT) driver.
//!
//! Wraps the ESP-IDF TWDT API to reset the board if the main loop stalls.
//! The timeout caps the acceptable worst-case loop latency; the main loop
//! must call `feed()` on every iteration.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use log::info;

pub struct Watchdog {
    #[cfg(target_os = "espidf")]
    subscribed: bool,
}

impl Default for Watchdog {
    fn default() -> Self {
        Self::new()
    }
}

impl Watchdog {
    /// Initialise and subscribe the current task to the TWDT.
    pub fn new() -> Self {
        #[cfg(target_os = "espidf")]
        {
            unsafe {
                let cfg = esp_task_wdt_config_t {
                    timeout_ms: 5_000,
                    idle_core_mask: 0,
                    trigger_panic: true,
                };
                let ret = esp_task_wdt_reconfigure(&cfg);
                if ret != ESP_OK {
                    log::warn!(
                        "TWDT reconfigure returned {} (may already be configured)",
                        ret
                    );
                }

                let ret = esp_task_wdt_add(core::ptr::null_mut());
                let subscribed = ret == ESP_OK;
                if subscribed {
                    info!("Watchdog: subscribed (5s timeout, panic on trigger)");
                } else {
                    log::warn!("Watchdog: failed to subscribe ({})", ret);
                }

                Self { subscribed }
            }
        }

        #[cfg(not(target_os = "espidf"))]
        {
            log::info!("Watchdog(sim): no-op");
            Self {}
        }
    }

    /// Feed the watchdog.  Must be called at least every 5 seconds.
    pub fn feed(&self) {
        #[cfg(target_os = "espidf")]
        {
            if self.subscribed {
                unsafe {
                    esp_task_wdt_reset();
                }
            }
        }
    }

    /// True if this boot followed a watchdog/panic reset rather than a
    /// clean power-on.  Mirrors the classic `wad!` vs `start` banner.
    pub fn reset_was_abnormal() -> bool {
        #[cfg(target_os = "espidf")]
        {
            // SAFETY: esp_reset_reason is a plain register/RTC read.
            let reason = unsafe { esp_reset_reason() };
            matches!(
                reason,
                esp_reset_reason_t_ESP_RST_TASK_WDT
                    | esp_reset_reason_t_ESP_RST_INT_WDT
                    | esp_reset_reason_t_ESP_RST_WDT
                    | esp_reset_reason_t_ESP_RST_PANIC
            )
        }

        #[cfg(not(target_os = "espidf"))]
        {
            false
        }
    }
}
