//! Input subsystem: the room temperature sensor and the analog keypad.
//!
//! Both share ADC1, configured once in
//! [`hw_init`](crate::drivers::hw_init).

pub mod keypad;
pub mod temperature;

pub use keypad::{Keypad, KeypadDecoder};
pub use temperature::TemperatureSensor;
