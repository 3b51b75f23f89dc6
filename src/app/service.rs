//! Application service, the hexagonal core.
//!
//! [`AppService`] owns the control loop and the live controller state.
//! It exposes a clean, hardware-agnostic API.  All I/O flows through
//! port traits injected at call sites, making the entire service
//! testable with mock adapters.
//!
//! ```text
//!   SensorPort ──▶ ┌────────────────────────┐ ──▶ ActuatorPort
//!    InputPort ──▶ │       AppService       │ ──▶ DisplayPort
//!                  │  ControlLoop · State   │ ──▶ EventSink
//!                  └────────────────────────┘
//! ```

use log::info;

use crate::config::{ConfigError, SystemConfig};
use crate::control::{ControlLoop, DisplayCommand, TickOutput};
use crate::fsm::Mode;
use crate::fsm::context::{ControllerState, KeyEvent, TemperatureReading};

use super::events::{AppEvent, TelemetryData};
use super::ports::{ActuatorPort, DisplayPort, EventSink, InputPort, SensorPort};

// ───────────────────────────────────────────────────────────────
// AppService
// ───────────────────────────────────────────────────────────────

/// The application service orchestrates all domain logic.
pub struct AppService {
    control: ControlLoop,
    state: ControllerState,
    last_reading: TemperatureReading,
    telemetry_interval_ticks: u32,
    tick_count: u64,
}

impl AppService {
    /// Construct the service from configuration.
    ///
    /// Does **not** touch hardware; call [`start`](Self::start) next.
    /// Fails if `config` does not validate.
    pub fn new(config: SystemConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let control = ControlLoop::new(config.control)?;
        let state = control.initial_state();
        Ok(Self {
            control,
            state,
            last_reading: TemperatureReading::FAULT,
            telemetry_interval_ticks: config.timing.telemetry_interval_ticks,
            tick_count: 0,
        })
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Put the outputs in a known state and announce the initial mode.
    pub fn start(&mut self, hw: &mut (impl ActuatorPort + DisplayPort), sink: &mut impl EventSink) {
        hw.all_off();
        hw.render(&DisplayCommand::render(
            &self.state,
            self.last_reading,
            self.control.config(),
        ));
        sink.emit(&AppEvent::Started(self.state.mode));
        info!("AppService started in {}", self.state.mode);
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one full control cycle: read inputs → control loop → outputs.
    ///
    /// The `hw` parameter satisfies every hardware port; this avoids a
    /// double mutable borrow while keeping the port boundary explicit.
    pub fn tick(
        &mut self,
        hw: &mut (impl SensorPort + InputPort + ActuatorPort + DisplayPort),
        sink: &mut impl EventSink,
    ) -> TickOutput {
        let reading = hw.read_temperature();
        let key = hw.read_key();
        self.step(reading, key, hw, sink)
    }

    /// Run one control cycle on inputs obtained by the caller.
    pub fn step(
        &mut self,
        reading: TemperatureReading,
        key: KeyEvent,
        hw: &mut (impl ActuatorPort + DisplayPort),
        sink: &mut impl EventSink,
    ) -> TickOutput {
        self.tick_count += 1;
        let prev = self.state;

        let out = self.control.tick(&prev, reading, key);
        hw.apply(&out.actuator);
        hw.render(&out.display);

        self.state = out.state;
        self.last_reading = reading;
        self.emit_changes(&prev, sink);

        if self.tick_count % u64::from(self.telemetry_interval_ticks) == 0 {
            sink.emit(&AppEvent::Telemetry(self.build_telemetry()));
        }

        out
    }

    // ── Queries ───────────────────────────────────────────────

    /// Build a telemetry snapshot from the current state.
    pub fn build_telemetry(&self) -> TelemetryData {
        let c = self.last_reading.celsius();
        TelemetryData {
            tick: self.tick_count,
            mode: self.state.mode,
            temperature_c: self.control.config().reading_in_range(c).then_some(c),
            setpoint_c: self.state.setpoint,
            fan_speed: self.state.fan_speed,
            fan_direction: self.state.fan_direction,
            vane_angle: self.state.vane_angle,
            fault_flags: self.state.faults,
        }
    }

    /// Current controller mode.
    pub fn mode(&self) -> Mode {
        self.state.mode
    }

    /// Snapshot of the live controller state.
    pub fn state(&self) -> &ControllerState {
        &self.state
    }

    /// Total control ticks executed since startup.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn control(&self) -> &ControlLoop {
        &self.control
    }

    // ── Internal ──────────────────────────────────────────────

    fn emit_changes(&self, prev: &ControllerState, sink: &mut impl EventSink) {
        let now = &self.state;

        if now.alert_active && !prev.alert_active {
            sink.emit(&AppEvent::AlertRaised(now.faults));
        }
        if now.mode != prev.mode {
            sink.emit(&AppEvent::ModeChanged {
                from: prev.mode,
                to: now.mode,
            });
        }
        if prev.alert_active && !now.alert_active {
            sink.emit(&AppEvent::AlertCleared);
        }
        if now.setpoint != prev.setpoint {
            sink.emit(&AppEvent::SetpointChanged {
                from: prev.setpoint,
                to: now.setpoint,
            });
        }
    }
}
