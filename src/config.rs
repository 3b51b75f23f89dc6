//! System configuration parameters
//!
//! All tunable parameters for the ThermoGuard controller.  Defaults match
//! the reference board wiring; a deployment may override any subset via the
//! embedded `thermoguard.json` (missing fields keep their defaults).

use core::fmt;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::control::display::{DISPLAY_MAX_C, DISPLAY_MIN_C};
use crate::drivers::servo::{PULSE_MAX_US, PULSE_MIN_US};

/// What the fan does while the controller is in `Alert`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SafetyPolicy {
    /// Full-speed forward: purge hot air out of the enclosure.
    Purge,
    /// Stop the fan entirely.
    Stop,
}

/// Decision parameters consumed by the control loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlConfig {
    // --- Setpoint ---
    /// Lowest selectable setpoint (Celsius).
    pub comfort_min_c: i16,
    /// Highest selectable setpoint (Celsius).
    pub comfort_max_c: i16,
    /// Setpoint at power-on (Celsius).
    pub default_setpoint_c: i16,
    /// Setpoint change per Up/Down press (Celsius).
    pub setpoint_step_c: i16,

    // --- Sensor / safety ---
    /// Lowest physically valid reading; anything below is a sensor fault.
    pub sensor_min_c: i16,
    /// Highest physically valid reading; anything above is a sensor fault.
    pub sensor_max_c: i16,
    /// Readings strictly above this raise an over-temperature alert.
    pub over_temperature_c: i16,
    /// Consecutive safe ticks required before a latched alert clears.
    pub alert_debounce_ticks: u16,
    /// Fan posture while in Alert.
    pub safety_policy: SafetyPolicy,
    /// Vane pulse width held while in Alert (microseconds).
    pub safe_vane_us: u16,

    // --- Eco ---
    /// Ticks without activity before Cooling drops to Eco.
    pub idle_timeout_ticks: u32,
    /// Half-width of the "at setpoint" band (Celsius).
    pub eco_band_c: i16,
    /// Eco fan ceiling as a percentage of full duty.
    pub eco_ceiling_percent: u8,

    // --- Fan ---
    /// Fan duty added per degree above setpoint.
    pub fan_gain_per_c: u8,

    // --- Vane servo ---
    /// Left end of vane travel (pulse width, microseconds).
    pub vane_left_us: u16,
    /// Right end of vane travel (pulse width, microseconds).
    pub vane_right_us: u16,
    /// Vane position at power-on (microseconds).
    pub vane_home_us: u16,
    /// Pulse-width change per Left/Right press (microseconds).
    pub vane_step_us: u16,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            // Setpoint
            comfort_min_c: 16,
            comfort_max_c: 30,
            default_setpoint_c: 24,
            setpoint_step_c: 1,

            // Sensor / safety (LM35 rated range)
            sensor_min_c: -40,
            sensor_max_c: 125,
            over_temperature_c: 40,
            alert_debounce_ticks: 5,
            safety_policy: SafetyPolicy::Purge,
            safe_vane_us: 1500,

            // Eco
            idle_timeout_ticks: 50,
            eco_band_c: 1,
            eco_ceiling_percent: 40,

            // Fan
            fan_gain_per_c: 32,

            // Vane servo (SG90)
            vane_left_us: 1000,
            vane_right_us: 1500,
            vane_home_us: 1250,
            vane_step_us: 50,
        }
    }
}

impl ControlConfig {
    /// Eco fan ceiling as an absolute duty value (0-255).
    pub fn eco_ceiling_duty(&self) -> u8 {
        (u16::from(u8::MAX) * u16::from(self.eco_ceiling_percent.min(100)) / 100) as u8
    }

    /// Clamp a setpoint into the comfort range.
    pub fn clamp_setpoint(&self, celsius: i16) -> i16 {
        celsius.clamp(self.comfort_min_c, self.comfort_max_c)
    }

    /// Clamp a vane pulse width into the servo's travel.
    pub fn clamp_vane(&self, pulse_us: u16) -> u16 {
        pulse_us.clamp(self.vane_left_us, self.vane_right_us)
    }

    /// True if `celsius` is a physically plausible reading.
    pub fn reading_in_range(&self, celsius: i16) -> bool {
        (self.sensor_min_c..=self.sensor_max_c).contains(&celsius)
    }

    /// Check the control parameters on their own.  The control loop
    /// refuses to start on a config that fails here.
    pub fn validate(&self) -> Result<(), ConfigError> {
        use ConfigError::ValidationFailed as Invalid;

        if self.comfort_min_c > self.comfort_max_c {
            return Err(Invalid("comfort_min_c must be <= comfort_max_c"));
        }
        if !(self.comfort_min_c..=self.comfort_max_c).contains(&self.default_setpoint_c) {
            return Err(Invalid("default_setpoint_c outside comfort range"));
        }
        if self.setpoint_step_c <= 0 {
            return Err(Invalid("setpoint_step_c must be > 0"));
        }
        if self.sensor_min_c >= self.sensor_max_c {
            return Err(Invalid("sensor_min_c must be < sensor_max_c"));
        }
        if self.sensor_min_c < DISPLAY_MIN_C || self.sensor_max_c > DISPLAY_MAX_C {
            return Err(Invalid("sensor range must fit three display digits"));
        }
        if self.comfort_min_c < self.sensor_min_c {
            return Err(Invalid("comfort_min_c below sensor range"));
        }
        if self.over_temperature_c <= self.comfort_max_c || self.over_temperature_c > self.sensor_max_c {
            return Err(Invalid("over_temperature_c must lie between comfort_max_c and sensor_max_c"));
        }
        if self.alert_debounce_ticks == 0 {
            return Err(Invalid("alert_debounce_ticks must be > 0"));
        }
        if self.idle_timeout_ticks == 0 {
            return Err(Invalid("idle_timeout_ticks must be > 0"));
        }
        if self.eco_band_c < 0 {
            return Err(Invalid("eco_band_c must be >= 0"));
        }
        if self.eco_ceiling_percent == 0 || self.eco_ceiling_percent > 100 {
            return Err(Invalid("eco_ceiling_percent must be 1-100"));
        }
        if self.fan_gain_per_c == 0 {
            return Err(Invalid("fan_gain_per_c must be > 0"));
        }
        if self.vane_left_us >= self.vane_right_us {
            return Err(Invalid("vane_left_us must be < vane_right_us"));
        }
        if self.vane_left_us < PULSE_MIN_US || self.vane_right_us > PULSE_MAX_US {
            return Err(Invalid("vane travel exceeds the servo pulse range"));
        }
        if !(self.vane_left_us..=self.vane_right_us).contains(&self.vane_home_us) {
            return Err(Invalid("vane_home_us outside vane travel"));
        }
        if !(self.vane_left_us..=self.vane_right_us).contains(&self.safe_vane_us) {
            return Err(Invalid("safe_vane_us outside vane travel"));
        }
        if self.vane_step_us == 0 {
            return Err(Invalid("vane_step_us must be > 0"));
        }
        Ok(())
    }
}

/// Analog keypad thresholds (10-bit ADC scale) for the 5-button ladder.
///
/// A sample below `right_max` is Right, below `up_max` is Up, and so on;
/// anything at or above `select_max` means no key is pressed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeypadConfig {
    pub right_max: u16,
    pub up_max: u16,
    pub down_max: u16,
    pub left_max: u16,
    pub select_max: u16,
    /// Consecutive identical samples before a press is accepted.
    pub debounce_samples: u8,
}

impl Default for KeypadConfig {
    fn default() -> Self {
        Self {
            right_max: 60,
            up_max: 200,
            down_max: 400,
            left_max: 600,
            select_max: 800,
            debounce_samples: 2,
        }
    }
}

/// LM35 analog front-end calibration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorConfig {
    /// Full-scale ADC count.
    pub adc_max: u16,
    /// ADC reference voltage (millivolts).
    pub vref_mv: u32,
    /// Sensor slope (millivolts per degree Celsius).
    pub mv_per_c: u32,
    /// Fixed calibration offset added after conversion (Celsius).
    pub offset_c: i16,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            adc_max: 1023,
            vref_mv: 3300,
            mv_per_c: 10,
            offset_c: 0,
        }
    }
}

/// Deployment timing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Control loop period (milliseconds).
    pub control_loop_interval_ms: u32,
    /// Telemetry report interval (ticks).
    pub telemetry_interval_ticks: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            control_loop_interval_ms: 100, // 10 Hz
            telemetry_interval_ticks: 50,  // every 5 s
        }
    }
}

/// Core system configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    pub control: ControlConfig,
    pub keypad: KeypadConfig,
    pub sensor: SensorConfig,
    pub timing: TimingConfig,
}

impl SystemConfig {
    /// Parse a JSON document and validate it.
    ///
    /// Fields absent from the document keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json).map_err(|e| {
            warn!("config: JSON rejected: {}", e);
            ConfigError::Parse
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject parameter combinations that would break controller
    /// invariants.  Values are never silently clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        use ConfigError::ValidationFailed as Invalid;

        self.control.validate()?;

        let k = &self.keypad;
        if !(k.right_max < k.up_max
            && k.up_max < k.down_max
            && k.down_max < k.left_max
            && k.left_max < k.select_max)
        {
            return Err(Invalid("keypad thresholds must be strictly ascending"));
        }
        if k.select_max > self.sensor.adc_max {
            return Err(Invalid("keypad select_max exceeds ADC full scale"));
        }
        if k.debounce_samples == 0 {
            return Err(Invalid("keypad debounce_samples must be > 0"));
        }

        let s = &self.sensor;
        if s.adc_max == 0 || s.vref_mv == 0 || s.mv_per_c == 0 {
            return Err(Invalid("sensor calibration values must be > 0"));
        }

        let t = &self.timing;
        if t.control_loop_interval_ms == 0 {
            return Err(Invalid("control_loop_interval_ms must be > 0"));
        }
        if t.telemetry_interval_ticks == 0 {
            return Err(Invalid("telemetry_interval_ticks must be > 0"));
        }

        Ok(())
    }
}

/// Errors from loading or validating configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// The document is not valid JSON for [`SystemConfig`].
    Parse,
    /// A config field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse => write!(f, "malformed config document"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
        }
    }
}

impl core::error::Error for ConfigError {}
