//! Safety supervisor.
//!
//! The supervisor runs **every tick before the FSM update** and maintains
//! the fault bitmask in `ControllerState.faults`.  The FSM update handlers
//! check `alert_active` to decide whether to transition to `Alert`.
//!
//! ## Fault lifecycle
//!
//! 1. A reading is out of the sensor's physical range (sensor fault) or
//!    above the over-temperature bound.
//! 2. The supervisor sets the corresponding bit, zeroes the recovery
//!    counter and raises `alert_active`.
//! 3. The FSM transitions to `Alert`; its actuation forces the fan to
//!    the configured safety posture.
//! 4. Each subsequent tick with a safe reading bumps the recovery counter.
//!    Any unsafe reading in between restarts it.
//! 5. Once the counter reaches `alert_debounce_ticks`, every fault bit is
//!    cleared together and `alert_active` drops; `alert_update` then
//!    returns `Some(Mode::Cooling)`.
//!
//! Faults latch as a set: the controller does not leave `Alert` until
//! *every* condition has been absent for the whole debounce window.

use crate::config::ControlConfig;
use crate::error::SafetyFault;
use crate::fsm::context::{TemperatureReading, TickContext};
use log::{error, info};

/// Safety supervisor.  Stateless: the latch lives in `ControllerState`.
#[derive(Debug, Clone, Copy)]
pub struct SafetySupervisor;

impl SafetySupervisor {
    pub fn new() -> Self {
        Self
    }

    /// Classify a reading against the configured bounds.
    pub fn classify(&self, config: &ControlConfig, reading: TemperatureReading) -> Option<SafetyFault> {
        let c = reading.celsius();
        if !config.reading_in_range(c) {
            Some(SafetyFault::SensorFault)
        } else if c > config.over_temperature_c {
            Some(SafetyFault::OverTemperature)
        } else {
            None
        }
    }

    /// Evaluate this tick's reading, updating the latched fault set.
    /// Returns the updated fault bitmask.
    pub fn evaluate(&self, ctx: &mut TickContext<'_>) -> u8 {
        let state = &mut ctx.state;

        match self.classify(ctx.config, ctx.reading) {
            Some(fault) => {
                if state.faults & fault.mask() == 0 {
                    error!("SAFETY FAULT SET: {} (reading {})", fault, ctx.reading.celsius());
                }
                state.faults |= fault.mask();
                state.recovery_ticks = 0;
            }
            None if state.faults != 0 => {
                state.recovery_ticks = state.recovery_ticks.saturating_add(1);
                if state.recovery_ticks >= ctx.config.alert_debounce_ticks {
                    info!(
                        "SAFETY FAULT CLEARED: 0b{:08b} after {} safe ticks",
                        state.faults, state.recovery_ticks
                    );
                    state.faults = 0;
                    state.recovery_ticks = 0;
                }
            }
            None => {}
        }

        state.alert_active = state.faults != 0;
        state.faults
    }
}

impl Default for SafetySupervisor {
    fn default() -> Self {
        Self::new()
    }
}
