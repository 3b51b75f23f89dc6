//! Vane servo driver.
//!
//! Standard hobby servo on a 50 Hz frame.  The commanded pulse width is
//! clamped to the mechanical travel and written as a 14-bit LEDC duty on
//! ch1.

use crate::drivers::hw_init;
use crate::pins;

/// One servo frame at 50 Hz (microseconds).
pub const SERVO_PERIOD_US: u32 = 20_000;
/// Mechanical travel limits of the vane linkage (microseconds).
pub const PULSE_MIN_US: u16 = 1000;
pub const PULSE_MAX_US: u16 = 1500;

const DUTY_FULL_SCALE: u32 = 1 << pins::SERVO_RESOLUTION_BITS;

/// Convert a pulse width to an LEDC duty count at the servo resolution.
pub const fn pulse_to_duty(pulse_us: u16) -> u32 {
    pulse_us as u32 * DUTY_FULL_SCALE / SERVO_PERIOD_US
}

pub struct ServoDriver {
    pulse_us: Option<u16>,
}

impl Default for ServoDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl ServoDriver {
    pub fn new() -> Self {
        Self { pulse_us: None }
    }

    /// Command a pulse width.  Out-of-travel values are clamped; repeat
    /// commands are not re-written to the peripheral.
    pub fn set_pulse(&mut self, pulse_us: u16) {
        let pulse_us = pulse_us.clamp(PULSE_MIN_US, PULSE_MAX_US);
        if self.pulse_us == Some(pulse_us) {
            return;
        }
        hw_init::ledc_set(hw_init::LEDC_CH_SERVO, pulse_to_duty(pulse_us));
        self.pulse_us = Some(pulse_us);
    }

    /// Last pulse width written, if any.
    pub fn pulse_us(&self) -> Option<u16> {
        self.pulse_us
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duty_matches_frame_fraction() {
        // 1500 / 20000 of 16384
        assert_eq!(pulse_to_duty(1500), 1228);
        assert_eq!(pulse_to_duty(1000), 819);
    }

    #[test]
    fn pulse_is_clamped_to_travel() {
        let mut s = ServoDriver::new();
        s.set_pulse(400);
        assert_eq!(s.pulse_us(), Some(PULSE_MIN_US));
        s.set_pulse(2400);
        assert_eq!(s.pulse_us(), Some(PULSE_MAX_US));
    }
}
