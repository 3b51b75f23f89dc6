//! Alert indicators: red LED and a pair of piezo buzzers.
//!
//! While active the LED is lit steadily and the buzzers alternate once per
//! call to [`Alarm::set`], producing a two-tone warble at half the control
//! loop rate.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: drives three GPIOs via hw_init.
//! On host/test: tracks state in-memory only.

use crate::drivers::hw_init;
use crate::pins;

pub struct Alarm {
    active: bool,
    phase: bool,
}

impl Default for Alarm {
    fn default() -> Self {
        Self::new()
    }
}

impl Alarm {
    pub fn new() -> Self {
        Self {
            active: false,
            phase: false,
        }
    }

    /// Update the indicators for this tick.
    pub fn set(&mut self, active: bool) {
        if !active {
            if self.active {
                self.off();
            }
            return;
        }

        self.phase = !self.phase;
        hw_init::gpio_write(pins::ALERT_LED_GPIO, true);
        hw_init::gpio_write(pins::BUZZER1_GPIO, self.phase);
        hw_init::gpio_write(pins::BUZZER2_GPIO, !self.phase);
        self.active = true;
    }

    pub fn off(&mut self) {
        hw_init::gpio_write(pins::ALERT_LED_GPIO, false);
        hw_init::gpio_write(pins::BUZZER1_GPIO, false);
        hw_init::gpio_write(pins::BUZZER2_GPIO, false);
        self.active = false;
        self.phase = false;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Which buzzer sounds this tick: `true` = buzzer 1.
    pub fn phase(&self) -> bool {
        self.phase
    }
}
