//! Fan motor driver (L298N H-bridge, channel B).
//!
//! Variable-speed forward/reverse control via LEDC PWM (ch0) on ENB and
//! two digital direction inputs.
//!
//! | Direction | IN3 | IN4 | ENB duty |
//! |-----------|-----|-----|----------|
//! | Forward   | H   | L   | speed    |
//! | Reverse   | L   | H   | speed    |
//! | Off       | L   | L   | 0        |
//!
//! ## Dual-target design
//!
//! On ESP-IDF: drives real PWM and GPIO via hw_init helpers.
//! On host/test: tracks state in-memory only.

use crate::drivers::hw_init;
use crate::fsm::context::FanDirection;
use crate::pins;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotorState {
    Stopped,
    Running { speed: u8, dir: FanDirection },
}

pub struct MotorDriver {
    state: MotorState,
}

impl Default for MotorDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl MotorDriver {
    pub fn new() -> Self {
        Self {
            state: MotorState::Stopped,
        }
    }

    /// Drive the fan.  Zero speed or `FanDirection::Off` stops it.
    pub fn set(&mut self, speed: u8, direction: FanDirection) {
        if speed == 0 || direction == FanDirection::Off {
            self.stop();
            return;
        }

        let next = MotorState::Running { speed, dir: direction };
        if self.state == next {
            return;
        }

        // Release the bridge before reversing so both legs never conduct.
        if let MotorState::Running { dir, .. } = self.state {
            if dir != direction {
                self.set_direction_hw(FanDirection::Off);
            }
        }

        self.set_direction_hw(direction);
        hw_init::ledc_set(hw_init::LEDC_CH_FAN, u32::from(speed));
        self.state = next;
    }

    pub fn stop(&mut self) {
        hw_init::ledc_set(hw_init::LEDC_CH_FAN, 0);
        self.set_direction_hw(FanDirection::Off);
        self.state = MotorState::Stopped;
    }

    fn set_direction_hw(&self, dir: FanDirection) {
        let (in3, in4) = match dir {
            FanDirection::Forward => (true, false),
            FanDirection::Reverse => (false, true),
            FanDirection::Off => (false, false),
        };
        hw_init::gpio_write(pins::FAN_IN3_GPIO, in3);
        hw_init::gpio_write(pins::FAN_IN4_GPIO, in4);
    }

    pub fn state(&self) -> MotorState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        !matches!(self.state, MotorState::Stopped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_speed_stops() {
        let mut m = MotorDriver::new();
        m.set(128, FanDirection::Forward);
        assert!(m.is_running());
        m.set(0, FanDirection::Forward);
        assert_eq!(m.state(), MotorState::Stopped);
    }

    #[test]
    fn off_direction_stops_regardless_of_speed() {
        let mut m = MotorDriver::new();
        m.set(200, FanDirection::Off);
        assert!(!m.is_running());
    }

    #[test]
    fn reversal_tracks_new_direction() {
        let mut m = MotorDriver::new();
        m.set(100, FanDirection::Forward);
        m.set(100, FanDirection::Reverse);
        assert_eq!(
            m.state(),
            MotorState::Running {
                speed: 100,
                dir: FanDirection::Reverse
            }
        );
    }
}
