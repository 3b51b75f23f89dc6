//! Mock hardware adapter for integration tests.
//!
//! Feeds scripted readings and key events, and records every actuator
//! and display call so tests can assert on the full output history
//! without touching real GPIO/PWM/ADC registers.

use std::collections::VecDeque;

use thermoguard::app::events::AppEvent;
use thermoguard::app::ports::{ActuatorPort, DisplayPort, EventSink, InputPort, SensorPort};
use thermoguard::control::DisplayCommand;
use thermoguard::fsm::context::{ActuatorCommand, KeyEvent, TemperatureReading};

// ── Output call record ────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum HwCall {
    Apply(ActuatorCommand),
    AllOff,
    Render(DisplayCommand),
}

// ── MockHardware ──────────────────────────────────────────────

pub struct MockHardware {
    /// Reading returned once the script runs dry.
    pub ambient: TemperatureReading,
    readings: VecDeque<TemperatureReading>,
    keys: VecDeque<KeyEvent>,
    pub calls: Vec<HwCall>,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new(ambient_c: i16) -> Self {
        Self {
            ambient: TemperatureReading(ambient_c),
            readings: VecDeque::new(),
            keys: VecDeque::new(),
            calls: Vec::new(),
        }
    }

    /// Script the next tick's inputs.
    pub fn queue(&mut self, reading_c: i16, key: KeyEvent) {
        self.readings.push_back(TemperatureReading(reading_c));
        self.keys.push_back(key);
    }

    pub fn queue_sensor_failure(&mut self) {
        self.readings.push_back(TemperatureReading::FAULT);
        self.keys.push_back(KeyEvent::None);
    }

    pub fn last_actuator(&self) -> Option<&ActuatorCommand> {
        self.calls.iter().rev().find_map(|c| match c {
            HwCall::Apply(cmd) => Some(cmd),
            _ => None,
        })
    }

    pub fn last_frame(&self) -> Option<&DisplayCommand> {
        self.calls.iter().rev().find_map(|c| match c {
            HwCall::Render(frame) => Some(frame),
            _ => None,
        })
    }

    pub fn fan_running(&self) -> bool {
        self.calls
            .iter()
            .rev()
            .find_map(|c| match c {
                HwCall::Apply(cmd) => Some(cmd.fan_speed > 0),
                HwCall::AllOff => Some(false),
                HwCall::Render(_) => None,
            })
            .unwrap_or(false)
    }

    pub fn alarm_on(&self) -> bool {
        self.last_actuator().is_some_and(|cmd| cmd.alarm)
    }
}

impl SensorPort for MockHardware {
    fn read_temperature(&mut self) -> TemperatureReading {
        self.readings.pop_front().unwrap_or(self.ambient)
    }
}

impl InputPort for MockHardware {
    fn read_key(&mut self) -> KeyEvent {
        self.keys.pop_front().unwrap_or(KeyEvent::None)
    }
}

impl ActuatorPort for MockHardware {
    fn apply(&mut self, cmd: &ActuatorCommand) {
        self.calls.push(HwCall::Apply(*cmd));
    }

    fn all_off(&mut self) {
        self.calls.push(HwCall::AllOff);
    }
}

impl DisplayPort for MockHardware {
    fn render(&mut self, frame: &DisplayCommand) {
        self.calls.push(HwCall::Render(frame.clone()));
    }
}

// ── LogSink ──────────────────────────────────────────────────

#[derive(Default)]
pub struct LogSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl LogSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl EventSink for LogSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}
