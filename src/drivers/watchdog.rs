//! Control-loop supervision via the ESP-IDF task watchdog (TWDT).
//!
//! The timeout is derived from the control period: the loop may miss
//! [`MISSED_TICK_BUDGET`] consecutive ticks before the device resets, with
//! [`MIN_TIMEOUT_MS`] as a floor for very short periods.  After a reset
//! `AppService::start` parks every output again.
//!
//! On host builds the watchdog only counts feeds.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::{ESP_OK, esp_task_wdt_add, esp_task_wdt_config_t, esp_task_wdt_reconfigure, esp_task_wdt_reset};

use log::{info, warn};

/// Shortest timeout ever configured.
pub const MIN_TIMEOUT_MS: u32 = 2_000;
/// Consecutive control ticks the loop may miss before a reset.
pub const MISSED_TICK_BUDGET: u32 = 10;

/// Timeout for a loop running every `period_ms`.
pub const fn timeout_for_period(period_ms: u32) -> u32 {
    let budget = period_ms.saturating_mul(MISSED_TICK_BUDGET);
    if budget > MIN_TIMEOUT_MS { budget } else { MIN_TIMEOUT_MS }
}

pub struct Watchdog {
    timeout_ms: u32,
    armed: bool,
    #[cfg(not(target_os = "espidf"))]
    feeds: core::cell::Cell<u64>,
}

impl Watchdog {
    /// Subscribe the calling task with a timeout sized for `period_ms`.
    pub fn for_loop_period(period_ms: u32) -> Self {
        let timeout_ms = timeout_for_period(period_ms);
        let armed = Self::subscribe(timeout_ms);
        if armed {
            info!(
                "Watchdog: armed, {}ms timeout ({} missed ticks at {}ms)",
                timeout_ms, MISSED_TICK_BUDGET, period_ms
            );
        } else {
            warn!("Watchdog: not armed; a stalled loop will not reset the unit");
        }

        Self {
            timeout_ms,
            armed,
            #[cfg(not(target_os = "espidf"))]
            feeds: core::cell::Cell::new(0),
        }
    }

    #[cfg(target_os = "espidf")]
    fn subscribe(timeout_ms: u32) -> bool {
        let cfg = esp_task_wdt_config_t {
            timeout_ms,
            idle_core_mask: 0,
            trigger_panic: true,
        };
        // SAFETY: both calls act on the calling task only and run once,
        // from main, before the control loop starts.
        unsafe {
            let ret = esp_task_wdt_reconfigure(&cfg);
            if ret != ESP_OK as i32 {
                warn!("Watchdog: reconfigure returned {} (keeping boot config)", ret);
            }
            let ret = esp_task_wdt_add(core::ptr::null_mut());
            if ret != ESP_OK as i32 {
                warn!("Watchdog: subscribe failed ({})", ret);
            }
            ret == ESP_OK as i32
        }
    }

    #[cfg(not(target_os = "espidf"))]
    fn subscribe(_timeout_ms: u32) -> bool {
        true
    }

    /// Reset the countdown.  Called once per control tick.
    pub fn feed(&self) {
        if !self.armed {
            return;
        }
        #[cfg(target_os = "espidf")]
        {
            // SAFETY: resets the calling task's own TWDT entry.
            unsafe {
                esp_task_wdt_reset();
            }
        }
        #[cfg(not(target_os = "espidf"))]
        {
            self.feeds.set(self.feeds.get() + 1);
        }
    }

    pub fn timeout_ms(&self) -> u32 {
        self.timeout_ms
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Feeds since construction (host builds only).
    #[cfg(not(target_os = "espidf"))]
    pub fn feeds(&self) -> u64 {
        self.feeds.get()
    }
}
