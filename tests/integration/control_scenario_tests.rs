//! Reference scenarios for a single `ControlLoop::tick`.

use thermoguard::config::ControlConfig;
use thermoguard::control::ControlLoop;
use thermoguard::fsm::Mode;
use thermoguard::fsm::context::{ControllerState, FanDirection, KeyEvent, TemperatureReading};

fn controller() -> ControlLoop {
    ControlLoop::new(ControlConfig::default()).expect("default config is valid")
}

fn state(cl: &ControlLoop, mode: Mode, setpoint: i16) -> ControllerState {
    let mut s = cl.initial_state();
    s.mode = mode;
    s.setpoint = setpoint;
    s
}

#[test]
fn select_from_off_starts_cooling() {
    let cl = controller();
    let out = cl.tick(&state(&cl, Mode::Off, 24), TemperatureReading(24), KeyEvent::Select);
    assert_eq!(out.state.mode, Mode::Cooling);
    assert_eq!(out.state.idle_ticks, 0);
}

#[test]
fn warm_room_runs_fan_forward_without_mode_change() {
    let cl = controller();
    let out = cl.tick(&state(&cl, Mode::Cooling, 24), TemperatureReading(30), KeyEvent::None);
    assert_eq!(out.state.mode, Mode::Cooling);
    assert!(out.state.fan_speed > 0);
    assert_eq!(out.state.fan_direction, FanDirection::Forward);
}

#[test]
fn implausible_reading_raises_alert() {
    let cl = controller();
    let out = cl.tick(&state(&cl, Mode::Cooling, 24), TemperatureReading(200), KeyEvent::None);
    assert_eq!(out.state.mode, Mode::Alert);
    assert!(out.state.alert_active);
}

#[test]
fn last_idle_tick_enters_eco() {
    let cl = controller();
    let mut s = state(&cl, Mode::Cooling, 24);
    s.idle_ticks = cl.config().idle_timeout_ticks - 1;
    let out = cl.tick(&s, TemperatureReading(24), KeyEvent::None);
    assert_eq!(out.state.mode, Mode::Eco);
}

#[test]
fn up_in_eco_returns_to_cooling_one_degree_higher() {
    let cl = controller();
    let mut s = state(&cl, Mode::Eco, 24);
    s.idle_ticks = 77;
    let out = cl.tick(&s, TemperatureReading(24), KeyEvent::Up);
    assert_eq!(out.state.mode, Mode::Cooling);
    assert_eq!(out.state.setpoint, 25);
    assert_eq!(out.state.idle_ticks, 0);
}

#[test]
fn tick_is_pure() {
    let cl = controller();
    let s = state(&cl, Mode::Cooling, 24);
    let a = cl.tick(&s, TemperatureReading(28), KeyEvent::Left);
    let b = cl.tick(&s, TemperatureReading(28), KeyEvent::Left);
    assert_eq!(a, b);
}
