//! Display frame rendering for the 16x2 character LCD.
//!
//! ```text
//!  ┌────────────────┐      ┌────────────────┐      ┌────────────────┐
//!  │COOL  SET:24C   │      │ECO   SET:24C   │      │ALERT: OVERHEAT │
//!  │TMP:27C FAN:ON  │      │TMP:24C FAN:OFF │      │TMP:47C FAN:ON  │
//!  └────────────────┘      └────────────────┘      └────────────────┘
//!     backlight on            backlight off           backlight on
//! ```

use core::fmt::Write;

use heapless::String;

use crate::config::ControlConfig;
use crate::error::SafetyFault;
use crate::fsm::Mode;
use crate::fsm::context::{ControllerState, TemperatureReading};

/// Characters per LCD row.
pub const LCD_COLS: usize = 16;
/// Rows on the LCD.
pub const LCD_ROWS: usize = 2;

/// Temperatures are shown with at most three characters ("-99" to "999").
/// Config validation keeps the sensor and comfort ranges inside this.
pub const DISPLAY_MIN_C: i16 = -99;
pub const DISPLAY_MAX_C: i16 = 999;

/// One full frame for the display adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayCommand {
    pub lines: [String<LCD_COLS>; LCD_ROWS],
    /// Backlight is dropped in Eco to save power.
    pub backlight: bool,
}

impl DisplayCommand {
    /// Render the frame for a settled controller state.
    pub fn render(state: &ControllerState, reading: TemperatureReading, config: &ControlConfig) -> Self {
        let mut top: String<LCD_COLS> = String::new();
        let mut bottom: String<LCD_COLS> = String::new();

        // With temperatures inside DISPLAY_MIN_C..=DISPLAY_MAX_C every row
        // below is at most LCD_COLS wide.
        match (state.mode, SafetyFault::first_in(state.faults)) {
            (Mode::Alert, Some(SafetyFault::SensorFault)) => {
                let _ = top.push_str("ALERT: SENSOR");
            }
            (Mode::Alert, _) => {
                let _ = top.push_str("ALERT: OVERHEAT");
            }
            (mode, _) => {
                let _ = write!(top, "{:<5} SET:{}C", mode.label(), state.setpoint);
            }
        }

        let fan = if state.fan_speed > 0 { "ON" } else { "OFF" };
        let celsius = reading.celsius();
        if config.reading_in_range(celsius) {
            let _ = write!(bottom, "TMP:{}C FAN:{}", celsius, fan);
        } else {
            let _ = write!(bottom, "TMP:ERR FAN:{}", fan);
        }

        Self {
            lines: [top, bottom],
            backlight: state.mode != Mode::Eco,
        }
    }

    pub fn line(&self, row: usize) -> &str {
        self.lines.get(row).map_or("", String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fsm::context::FanDirection;

    fn state(mode: Mode) -> ControllerState {
        let mut s = ControllerState::new(&ControlConfig::default());
        s.mode = mode;
        s
    }

    #[test]
    fn cooling_frame_shows_setpoint_and_temperature() {
        let mut s = state(Mode::Cooling);
        s.fan_speed = 96;
        s.fan_direction = FanDirection::Forward;
        let d = DisplayCommand::render(&s, TemperatureReading(27), &ControlConfig::default());
        assert_eq!(d.line(0), "COOL  SET:24C");
        assert_eq!(d.line(1), "TMP:27C FAN:ON");
        assert!(d.backlight);
    }

    #[test]
    fn eco_dims_backlight() {
        let d = DisplayCommand::render(&state(Mode::Eco), TemperatureReading(24), &ControlConfig::default());
        assert_eq!(d.line(0), "ECO   SET:24C");
        assert_eq!(d.line(1), "TMP:24C FAN:OFF");
        assert!(!d.backlight);
    }

    #[test]
    fn sensor_fault_frame() {
        let mut s = state(Mode::Alert);
        s.faults = SafetyFault::SensorFault.mask();
        s.fan_speed = 255;
        let d = DisplayCommand::render(&s, TemperatureReading(200), &ControlConfig::default());
        assert_eq!(d.line(0), "ALERT: SENSOR");
        assert_eq!(d.line(1), "TMP:ERR FAN:ON");
    }

    #[test]
    fn overheat_frame() {
        let mut s = state(Mode::Alert);
        s.faults = SafetyFault::OverTemperature.mask();
        let d = DisplayCommand::render(&s, TemperatureReading(47), &ControlConfig::default());
        assert_eq!(d.line(0), "ALERT: OVERHEAT");
        assert_eq!(d.line(1), "TMP:47C FAN:OFF");
    }

    #[test]
    fn widest_values_fit_the_row() {
        let d = DisplayCommand::render(&state(Mode::Off), TemperatureReading(-40), &ControlConfig::default());
        assert_eq!(d.line(1), "TMP:-40C FAN:OFF");
        assert_eq!(d.line(1).len(), LCD_COLS);
        assert_eq!(d.line(2), "");
    }

    #[test]
    fn display_limits_fit_both_rows() {
        let config = ControlConfig {
            sensor_min_c: DISPLAY_MIN_C,
            sensor_max_c: DISPLAY_MAX_C,
            comfort_min_c: DISPLAY_MIN_C,
            comfort_max_c: DISPLAY_MAX_C - 1,
            default_setpoint_c: DISPLAY_MIN_C,
            over_temperature_c: DISPLAY_MAX_C,
            ..ControlConfig::default()
        };
        assert_eq!(config.validate(), Ok(()));

        let mut s = ControllerState::new(&config);
        s.mode = Mode::Cooling;
        let d = DisplayCommand::render(&s, TemperatureReading(DISPLAY_MIN_C), &config);
        assert_eq!(d.line(0), "COOL  SET:-99C");
        assert_eq!(d.line(1), "TMP:-99C FAN:OFF");

        s.setpoint = DISPLAY_MAX_C - 1;
        let d = DisplayCommand::render(&s, TemperatureReading(DISPLAY_MAX_C), &config);
        assert_eq!(d.line(0), "COOL  SET:998C");
        assert_eq!(d.line(1), "TMP:999C FAN:OFF");
    }
}
