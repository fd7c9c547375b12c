//! Task watchdog (TWDT) for the control thread.
//!
//! The control loop never blocks for long: the only bounded wait is the
//! MQTT handshake.  If an iteration stalls past the timeout the chip
//! resets.  `feed()` must be called once per iteration.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

use log::info;

/// Default stall budget; must exceed the MQTT handshake wait.
pub const DEFAULT_TIMEOUT_MS: u32 = 15_000;

pub struct Watchdog {
    subscribed: bool,
    feeds: u64,
}

impl Watchdog {
    /// Reconfigure the TWDT and subscribe the calling task.
    #[cfg(target_os = "espidf")]
    pub fn new(timeout_ms: u32) -> Self {
        let cfg = esp_task_wdt_config_t {
            timeout_ms,
            idle_core_mask: 0,
            trigger_panic: true,
        };
        // SAFETY: plain FFI calls with a valid, stack-owned config; the null
        // task handle means "current task".
        let subscribed = unsafe {
            let ret = esp_task_wdt_reconfigure(&cfg);
            if ret != ESP_OK as i32 {
                log::warn!("watchdog: reconfigure returned {}", ret);
            }
            esp_task_wdt_add(core::ptr::null_mut()) == ESP_OK as i32
        };
        if subscribed {
            info!("watchdog: subscribed ({} ms, panic on trigger)", timeout_ms);
        } else {
            log::warn!("watchdog: failed to subscribe, running unguarded");
        }
        Self {
            subscribed,
            feeds: 0,
        }
    }

    /// Simulation: nothing to subscribe to.
    #[cfg(not(target_os = "espidf"))]
    pub fn new(timeout_ms: u32) -> Self {
        info!("watchdog(sim): {} ms, no-op", timeout_ms);
        Self {
            subscribed: false,
            feeds: 0,
        }
    }

    pub fn feed(&mut self) {
        #[cfg(target_os = "espidf")]
        if self.subscribed {
            // SAFETY: task is subscribed; reset has no other preconditions.
            unsafe {
                esp_task_wdt_reset();
            }
        }
        self.feeds = self.feeds.wrapping_add(1);
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscribed
    }

    pub fn feeds(&self) -> u64 {
        self.feeds
    }
}
