//! Actuator drivers, hardware initialisation, and peripheral helpers.

pub mod alarm;
pub mod hw_init;
pub mod lcd;
pub mod motor;
pub mod servo;
pub mod watchdog;
