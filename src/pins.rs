//! GPIO / peripheral pin assignments for the ThermoGuard controller board.
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding pin numbers.  Change a pin here and it propagates everywhere.

// ---------------------------------------------------------------------------
// Analog inputs (ADC1)
// ---------------------------------------------------------------------------

/// Resistor-ladder keypad.  ADC1 channel 0 (GPIO 1 on ESP32-S3).
pub const KEYPAD_ADC_CHANNEL: u32 = 0;
/// LM35 output.  ADC1 channel 1 (GPIO 2 on ESP32-S3).
pub const TEMP_ADC_CHANNEL: u32 = 1;

// ---------------------------------------------------------------------------
// Fan motor (L298N channel B)
// ---------------------------------------------------------------------------

/// LEDC PWM output to ENB.
pub const FAN_PWM_GPIO: i32 = 4;
/// IN3: HIGH with IN4 LOW = forward.
pub const FAN_IN3_GPIO: i32 = 5;
/// IN4: HIGH with IN3 LOW = reverse.
pub const FAN_IN4_GPIO: i32 = 6;

// ---------------------------------------------------------------------------
// Vane servo
// ---------------------------------------------------------------------------

/// LEDC PWM output, 50 Hz frame.
pub const SERVO_GPIO: i32 = 7;

// ---------------------------------------------------------------------------
// Alert indicators
// ---------------------------------------------------------------------------

/// Red alert LED (active HIGH).
pub const ALERT_LED_GPIO: i32 = 8;
/// Piezo buzzers, driven alternately while the alarm is on.
pub const BUZZER1_GPIO: i32 = 9;
pub const BUZZER2_GPIO: i32 = 10;

// ---------------------------------------------------------------------------
// Character LCD (HD44780, 4-bit bus)
// ---------------------------------------------------------------------------

/// Register select: LOW = command, HIGH = data.
pub const LCD_RS_GPIO: i32 = 15;
/// Enable strobe (latched on the falling edge).
pub const LCD_E_GPIO: i32 = 16;
/// Backlight transistor gate (active HIGH).
pub const LCD_BL_GPIO: i32 = 17;
/// Upper-nibble data lines D4..D7, in bit order.
pub const LCD_DATA_GPIOS: [i32; 4] = [18, 21, 38, 39];

// ---------------------------------------------------------------------------
// PWM configuration
// ---------------------------------------------------------------------------

/// LEDC base frequency for the fan (25 kHz, above audible range).
pub const FAN_PWM_FREQ_HZ: u32 = 25_000;
/// Servo frame rate.
pub const SERVO_PWM_FREQ_HZ: u32 = 50;
/// Servo LEDC timer resolution (bits).
pub const SERVO_RESOLUTION_BITS: u32 = 14;
