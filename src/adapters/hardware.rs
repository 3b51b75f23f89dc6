//! Hardware adapter: bridges real peripherals to domain port traits.
//!
//! Owns the sensor, keypad, actuator drivers and LCD, exposing them
//! through every hardware port.  This is the only module in the system
//! that touches actual hardware.  On non-espidf targets, the underlying
//! drivers use cfg-gated simulation stubs.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use log::warn;

use crate::app::ports::{ActuatorPort, DisplayPort, InputPort, SensorPort};
use crate::control::DisplayCommand;
use crate::drivers::alarm::Alarm;
use crate::drivers::lcd::Lcd;
use crate::drivers::motor::MotorDriver;
use crate::drivers::servo::ServoDriver;
use crate::fsm::context::{ActuatorCommand, KeyEvent, TemperatureReading};
use crate::sensors::{Keypad, TemperatureSensor};

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter<P, D> {
    temperature: TemperatureSensor,
    keypad: Keypad,
    motor: MotorDriver,
    servo: ServoDriver,
    alarm: Alarm,
    lcd: Lcd<P, D>,
    lcd_failed: bool,
}

impl<P, D> HardwareAdapter<P, D>
where
    P: OutputPin,
    D: DelayNs,
{
    pub fn new(temperature: TemperatureSensor, keypad: Keypad, lcd: Lcd<P, D>) -> Self {
        Self {
            temperature,
            keypad,
            motor: MotorDriver::new(),
            servo: ServoDriver::new(),
            alarm: Alarm::new(),
            lcd,
            lcd_failed: false,
        }
    }

    pub fn motor(&self) -> &MotorDriver {
        &self.motor
    }

    pub fn servo(&self) -> &ServoDriver {
        &self.servo
    }

    pub fn alarm(&self) -> &Alarm {
        &self.alarm
    }
}

// ── Input ports ───────────────────────────────────────────────

impl<P, D> SensorPort for HardwareAdapter<P, D> {
    fn read_temperature(&mut self) -> TemperatureReading {
        self.temperature.read_or_fault()
    }
}

impl<P, D> InputPort for HardwareAdapter<P, D> {
    fn read_key(&mut self) -> KeyEvent {
        self.keypad.poll()
    }
}

// ── Output ports ──────────────────────────────────────────────

impl<P, D> ActuatorPort for HardwareAdapter<P, D> {
    fn apply(&mut self, cmd: &ActuatorCommand) {
        self.motor.set(cmd.fan_speed, cmd.fan_direction);
        self.servo.set_pulse(cmd.vane_angle);
        self.alarm.set(cmd.alarm);
    }

    fn all_off(&mut self) {
        self.motor.stop();
        self.alarm.off();
    }
}

impl<P, D> DisplayPort for HardwareAdapter<P, D>
where
    P: OutputPin,
    D: DelayNs,
{
    fn render(&mut self, frame: &DisplayCommand) {
        match self.lcd.render(frame) {
            Ok(()) => self.lcd_failed = false,
            Err(e) => {
                // Report once per outage; the control loop keeps running.
                if !self.lcd_failed {
                    warn!("LCD: write failed: {:?}", e);
                }
                self.lcd_failed = true;
            }
        }
    }
}
