//! Controller data model and the per-tick blackboard threaded through
//! every FSM handler.
//!
//! `ControllerState` is the one persistent entity: it is passed into the
//! control loop by value and a new one comes back out.  `TickContext`
//! wraps a working copy of it together with this tick's reading and the
//! configuration, and is the only thing state handlers read from and write
//! to.

use crate::config::ControlConfig;

use super::Mode;

// ---------------------------------------------------------------------------
// Inputs (produced once per tick by the sensor / input adapters)
// ---------------------------------------------------------------------------

/// A temperature reading in whole degrees Celsius.
///
/// Values outside the configured sensor range are a sensor fault;
/// [`TemperatureReading::FAULT`] is the sentinel adapters return when the
/// sample itself could not be taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TemperatureReading(pub i16);

impl TemperatureReading {
    /// Sentinel for "no usable sample"; always out of range.
    pub const FAULT: Self = Self(i16::MIN);

    pub const fn celsius(self) -> i16 {
        self.0
    }
}

/// Debounced keypad event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum KeyEvent {
    #[default]
    None,
    Up,
    Down,
    Left,
    Right,
    Select,
}

// ---------------------------------------------------------------------------
// Outputs
// ---------------------------------------------------------------------------

/// Fan motor direction as seen by the H-bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FanDirection {
    Forward,
    Reverse,
    #[default]
    Off,
}

/// What the actuator adapter should apply this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActuatorCommand {
    /// Fan PWM duty (0-255).
    pub fan_speed: u8,
    pub fan_direction: FanDirection,
    /// Vane servo pulse width (microseconds).
    pub vane_angle: u16,
    /// Alert LED and buzzers.
    pub alarm: bool,
}

impl ActuatorCommand {
    /// Fan stopped, vane held, no alarm.
    pub fn idle(vane_angle: u16) -> Self {
        Self {
            fan_speed: 0,
            fan_direction: FanDirection::Off,
            vane_angle,
            alarm: false,
        }
    }
}

// ---------------------------------------------------------------------------
// ControllerState
// ---------------------------------------------------------------------------

/// The controller's persistent decision state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerState {
    pub mode: Mode,
    /// Target temperature (Celsius), always within the comfort range.
    pub setpoint: i16,
    /// Fan duty applied on the last tick.
    pub fan_speed: u8,
    /// Fan direction applied on the last tick.
    pub fan_direction: FanDirection,
    /// User-selected vane pulse width (microseconds).
    pub vane_angle: u16,
    /// Consecutive ticks without key activity or out-of-band temperature.
    pub idle_ticks: u32,
    /// A safety fault is latched.
    pub alert_active: bool,
    /// Latched [`SafetyFault`](crate::error::SafetyFault) bitmask.
    pub faults: u8,
    /// Consecutive safe readings while a fault is latched.
    pub recovery_ticks: u16,
}

impl ControllerState {
    /// Power-on state: Off, default setpoint, vane at home.
    pub fn new(config: &ControlConfig) -> Self {
        Self {
            mode: Mode::Off,
            setpoint: config.clamp_setpoint(config.default_setpoint_c),
            fan_speed: 0,
            fan_direction: FanDirection::Off,
            vane_angle: config.clamp_vane(config.vane_home_us),
            idle_ticks: 0,
            alert_active: false,
            faults: 0,
            recovery_ticks: 0,
        }
    }

    /// Pull setpoint and vane back inside the configured bounds.
    pub fn clamp_to(&mut self, config: &ControlConfig) {
        self.setpoint = config.clamp_setpoint(self.setpoint);
        self.vane_angle = config.clamp_vane(self.vane_angle);
    }
}

// ---------------------------------------------------------------------------
// TickContext
// ---------------------------------------------------------------------------

/// The shared context passed to every state handler function.
pub struct TickContext<'a> {
    /// Working copy of the controller state; becomes the tick's output.
    pub state: ControllerState,
    /// This tick's temperature reading.
    pub reading: TemperatureReading,
    /// Controller configuration.
    pub config: &'a ControlConfig,
}

impl<'a> TickContext<'a> {
    pub fn new(config: &'a ControlConfig, state: ControllerState, reading: TemperatureReading) -> Self {
        Self {
            state,
            reading,
            config,
        }
    }

    /// The reading, if it is physically plausible.
    pub fn temperature(&self) -> Option<i16> {
        let c = self.reading.celsius();
        self.config.reading_in_range(c).then_some(c)
    }

    /// Measured minus setpoint, for valid readings.
    pub fn deviation(&self) -> Option<i16> {
        self.temperature()
            .map(|t| t.saturating_sub(self.state.setpoint))
    }

    /// True if the reading sits within the eco band around the setpoint.
    pub fn in_band(&self) -> bool {
        self.deviation()
            .is_some_and(|d| d.abs() <= self.config.eco_band_c)
    }

    /// Returns `true` if a safety fault is latched.
    pub fn alert_latched(&self) -> bool {
        self.state.alert_active
    }
}
