//! Integration tests for the AppService → ControlLoop → ports pipeline.
//!
//! These run on the host (x86_64) and drive the service through scripted
//! sensor and keypad input, asserting on what reaches the actuator and
//! display ports and on the emitted events.

use super::mock_hw::{HwCall, LogSink, MockHardware};

use thermoguard::app::events::AppEvent;
use thermoguard::app::service::AppService;
use thermoguard::config::{SafetyPolicy, SystemConfig};
use thermoguard::error::SafetyFault;
use thermoguard::fsm::Mode;
use thermoguard::fsm::context::{FanDirection, KeyEvent};

fn make_app() -> (AppService, MockHardware, LogSink) {
    make_app_with(SystemConfig::default())
}

fn make_app_with(config: SystemConfig) -> (AppService, MockHardware, LogSink) {
    let mut app = AppService::new(config).expect("test config is valid");
    let mut hw = MockHardware::new(24);
    let mut sink = LogSink::new();
    app.start(&mut hw, &mut sink);
    (app, hw, sink)
}

fn run(app: &mut AppService, hw: &mut MockHardware, sink: &mut LogSink, ticks: usize) {
    for _ in 0..ticks {
        app.tick(hw, sink);
    }
}

// ── Startup ───────────────────────────────────────────────────

#[test]
fn start_parks_actuators_and_shows_off_frame() {
    let (app, hw, sink) = make_app();

    assert_eq!(app.mode(), Mode::Off);
    assert_eq!(hw.calls[0], HwCall::AllOff);
    let frame = hw.last_frame().expect("start renders a frame");
    assert_eq!(frame.lines[0].as_str(), "OFF   SET:24C");
    assert!(frame.backlight);
    assert_eq!(sink.events, vec![AppEvent::Started(Mode::Off)]);
}

// ── Normal cooling ────────────────────────────────────────────

#[test]
fn select_then_warm_room_runs_fan() {
    let (mut app, mut hw, mut sink) = make_app();

    hw.queue(24, KeyEvent::Select);
    hw.queue(30, KeyEvent::None);
    run(&mut app, &mut hw, &mut sink, 2);

    assert_eq!(app.mode(), Mode::Cooling);
    assert!(hw.fan_running());
    let cmd = hw.last_actuator().unwrap();
    assert_eq!(cmd.fan_direction, FanDirection::Forward);
    assert!(!cmd.alarm);

    let frame = hw.last_frame().unwrap();
    assert_eq!(frame.lines[0].as_str(), "COOL  SET:24C");
    assert_eq!(frame.lines[1].as_str(), "TMP:30C FAN:ON");
    assert!(sink.events.contains(&AppEvent::ModeChanged {
        from: Mode::Off,
        to: Mode::Cooling
    }));
}

#[test]
fn setpoint_keys_are_reported_and_clamped() {
    let (mut app, mut hw, mut sink) = make_app();

    for _ in 0..10 {
        hw.queue(24, KeyEvent::Up);
    }
    run(&mut app, &mut hw, &mut sink, 10);

    assert_eq!(app.state().setpoint, 30);
    let changes = sink.count(|e| matches!(e, AppEvent::SetpointChanged { .. }));
    assert_eq!(changes, 6, "24 -> 30 in six steps, then pinned");
}

// ── Safety ────────────────────────────────────────────────────

#[test]
fn overheat_latches_alert_with_purge_and_alarm() {
    let (mut app, mut hw, mut sink) = make_app();

    hw.queue(24, KeyEvent::Select);
    hw.queue(45, KeyEvent::None);
    run(&mut app, &mut hw, &mut sink, 2);

    assert_eq!(app.mode(), Mode::Alert);
    assert!(app.state().alert_active);
    assert!(hw.alarm_on());
    assert_eq!(hw.last_actuator().unwrap().fan_speed, u8::MAX);
    assert_eq!(hw.last_frame().unwrap().lines[0].as_str(), "ALERT: OVERHEAT");
    assert!(sink.events.contains(&AppEvent::AlertRaised(SafetyFault::OverTemperature.mask())));
    assert!(sink.events.contains(&AppEvent::ModeChanged {
        from: Mode::Cooling,
        to: Mode::Alert
    }));
}

#[test]
fn alert_clears_after_debounce_window() {
    let (mut app, mut hw, mut sink) = make_app();
    let debounce = SystemConfig::default().control.alert_debounce_ticks as usize;

    hw.queue(45, KeyEvent::None);
    run(&mut app, &mut hw, &mut sink, 1);
    assert_eq!(app.mode(), Mode::Alert);

    run(&mut app, &mut hw, &mut sink, debounce - 1);
    assert_eq!(app.mode(), Mode::Alert, "must hold for the full window");

    run(&mut app, &mut hw, &mut sink, 1);
    assert_eq!(app.mode(), Mode::Cooling);
    assert!(!hw.alarm_on());
    assert_eq!(sink.count(|e| *e == AppEvent::AlertCleared), 1);
}

#[test]
fn sensor_failure_ignores_keys_and_shows_error() {
    let (mut app, mut hw, mut sink) = make_app();

    hw.queue(200, KeyEvent::Up);
    hw.queue_sensor_failure();
    run(&mut app, &mut hw, &mut sink, 2);

    assert_eq!(app.mode(), Mode::Alert);
    assert_eq!(app.state().setpoint, 24);
    let frame = hw.last_frame().unwrap();
    assert_eq!(frame.lines[0].as_str(), "ALERT: SENSOR");
    assert_eq!(frame.lines[1].as_str(), "TMP:ERR FAN:ON");
    assert_eq!(app.build_telemetry().temperature_c, None);
}

#[test]
fn stop_policy_silences_fan_but_not_alarm() {
    let mut config = SystemConfig::default();
    config.control.safety_policy = SafetyPolicy::Stop;
    let (mut app, mut hw, mut sink) = make_app_with(config);

    hw.queue(24, KeyEvent::Select);
    hw.queue(30, KeyEvent::None);
    hw.queue(45, KeyEvent::None);
    run(&mut app, &mut hw, &mut sink, 3);

    assert_eq!(app.mode(), Mode::Alert);
    assert!(!hw.fan_running());
    assert!(hw.alarm_on());
}

// ── Eco ───────────────────────────────────────────────────────

#[test]
fn idle_cooling_settles_into_eco_and_dims_backlight() {
    let (mut app, mut hw, mut sink) = make_app();
    let timeout = SystemConfig::default().control.idle_timeout_ticks as usize;

    hw.queue(24, KeyEvent::Select);
    run(&mut app, &mut hw, &mut sink, 1);
    run(&mut app, &mut hw, &mut sink, timeout - 1);
    assert_eq!(app.mode(), Mode::Cooling);

    run(&mut app, &mut hw, &mut sink, 1);
    assert_eq!(app.mode(), Mode::Eco);
    assert!(!hw.last_frame().unwrap().backlight);

    // Any key brings full cooling back.
    hw.queue(24, KeyEvent::Right);
    run(&mut app, &mut hw, &mut sink, 1);
    assert_eq!(app.mode(), Mode::Cooling);
    assert!(hw.last_frame().unwrap().backlight);
}

// ── Telemetry ─────────────────────────────────────────────────

#[test]
fn telemetry_is_emitted_on_configured_interval() {
    let (mut app, mut hw, mut sink) = make_app();
    let interval = SystemConfig::default().timing.telemetry_interval_ticks as usize;

    run(&mut app, &mut hw, &mut sink, interval * 2);

    let ticks: Vec<u64> = sink
        .events
        .iter()
        .filter_map(|e| match e {
            AppEvent::Telemetry(t) => Some(t.tick),
            _ => None,
        })
        .collect();
    assert_eq!(ticks, vec![interval as u64, 2 * interval as u64]);
    assert_eq!(app.tick_count(), 2 * interval as u64);
}
