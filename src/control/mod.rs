//! The control loop: one pure state transition per tick.
//!
//! ```text
//!   (ControllerState, TemperatureReading, KeyEvent)
//!                      │
//!          1. sensor fault? ──yes──▶ force Alert ─────────┐
//!                      │ no                               │
//!          2. key handling (setpoint / vane / Select)     │
//!          3. safety supervisor (latch / debounce)        │
//!          4. FSM update (idle → Eco, Alert ⇄ Cooling)    │
//!                      │◀─────────────────────────────────┘
//!          5. actuation for the settled mode
//!          6. display render
//!                      │
//!   (ControllerState, ActuatorCommand, DisplayCommand)
//! ```
//!
//! Nothing here touches hardware; adapters call [`ControlLoop::tick`]
//! between reading their inputs and driving their outputs.

pub mod display;

use log::debug;

use crate::config::{ConfigError, ControlConfig};
use crate::fsm::context::{ActuatorCommand, ControllerState, KeyEvent, TemperatureReading, TickContext};
use crate::fsm::{Fsm, Mode};
use crate::safety::SafetySupervisor;

pub use display::DisplayCommand;

/// Everything one tick produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickOutput {
    pub state: ControllerState,
    pub actuator: ActuatorCommand,
    pub display: DisplayCommand,
}

/// Fixed-period controller.  Holds configuration and the state table
/// only; all decision state is passed in and returned.
pub struct ControlLoop {
    config: ControlConfig,
    fsm: Fsm,
    safety: SafetySupervisor,
}

impl ControlLoop {
    /// Build a controller over `config`.  An invalid config is rejected
    /// here so that `tick` only ever sees consistent bounds.
    pub fn new(config: ControlConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            fsm: Fsm::default(),
            safety: SafetySupervisor::new(),
        })
    }

    pub fn config(&self) -> &ControlConfig {
        &self.config
    }

    /// Power-on controller state for this configuration.
    pub fn initial_state(&self) -> ControllerState {
        ControllerState::new(&self.config)
    }

    /// Execute one control cycle.
    pub fn tick(&self, state: &ControllerState, reading: TemperatureReading, key: KeyEvent) -> TickOutput {
        let mut ctx = TickContext::new(&self.config, *state, reading);
        ctx.state.clamp_to(&self.config);

        if ctx.temperature().is_none() {
            // Sensor fault: latch, ignore the keypad this tick.
            self.safety.evaluate(&mut ctx);
            self.fsm.force_transition(Mode::Alert, &mut ctx);
            if key != KeyEvent::None {
                debug!("key {:?} ignored during sensor fault", key);
            }
        } else {
            self.handle_key(key, &mut ctx);
            self.safety.evaluate(&mut ctx);
            self.fsm.update(&mut ctx);
        }

        let actuator = self.fsm.actuate(&ctx);
        ctx.state.fan_speed = actuator.fan_speed;
        ctx.state.fan_direction = actuator.fan_direction;

        let display = DisplayCommand::render(&ctx.state, reading, &self.config);

        TickOutput {
            state: ctx.state,
            actuator,
            display,
        }
    }

    // ── Internal ──────────────────────────────────────────────

    fn handle_key(&self, key: KeyEvent, ctx: &mut TickContext<'_>) {
        let state = &mut ctx.state;

        match key {
            KeyEvent::None => {
                state.idle_ticks = state.idle_ticks.saturating_add(1);
                return;
            }
            KeyEvent::Up => {
                state.setpoint = self
                    .config
                    .clamp_setpoint(state.setpoint.saturating_add(self.config.setpoint_step_c));
            }
            KeyEvent::Down => {
                state.setpoint = self
                    .config
                    .clamp_setpoint(state.setpoint.saturating_sub(self.config.setpoint_step_c));
            }
            KeyEvent::Left => {
                state.vane_angle = self
                    .config
                    .clamp_vane(state.vane_angle.saturating_sub(self.config.vane_step_us));
            }
            KeyEvent::Right => {
                state.vane_angle = self
                    .config
                    .clamp_vane(state.vane_angle.saturating_add(self.config.vane_step_us));
            }
            KeyEvent::Select => {}
        }

        state.idle_ticks = 0;

        match (key, ctx.state.mode) {
            (KeyEvent::Select, Mode::Off) => self.fsm.force_transition(Mode::Cooling, ctx),
            (KeyEvent::Select, Mode::Cooling | Mode::Eco) => self.fsm.force_transition(Mode::Off, ctx),
            (KeyEvent::Select, Mode::Alert) => debug!("Select ignored while alert is latched"),
            (_, Mode::Eco) => self.fsm.force_transition(Mode::Cooling, ctx),
            _ => {}
        }
    }
}
