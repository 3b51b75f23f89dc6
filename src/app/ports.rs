//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ AppService (domain)
//! ```
//!
//! Driven adapters (sensor, keypad, fan/vane/alarm, LCD, event sinks)
//! implement these traits.  The [`AppService`](super::service::AppService)
//! consumes them via generics, so the domain core never touches hardware
//! directly.

use crate::control::DisplayCommand;
use crate::fsm::context::{ActuatorCommand, KeyEvent, TemperatureReading};

// ───────────────────────────────────────────────────────────────
// Input ports (driven adapters: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port for the room temperature sensor.
pub trait SensorPort {
    /// Take one sample.  Adapters return [`TemperatureReading::FAULT`]
    /// when the sample could not be taken at all.
    fn read_temperature(&mut self) -> TemperatureReading;
}

/// Read-side port for the keypad.
pub trait InputPort {
    /// Return the debounced key event for this tick, at most one.
    fn read_key(&mut self) -> KeyEvent;
}

// ───────────────────────────────────────────────────────────────
// Output ports (driven adapters: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port for the fan, vane servo and alarm.
pub trait ActuatorPort {
    /// Apply one tick's actuator command.
    fn apply(&mut self, cmd: &ActuatorCommand);

    /// Kill all actuators (fan, alarm) for a safe shutdown.
    fn all_off(&mut self);
}

/// Write-side port for the character display.
pub trait DisplayPort {
    /// Show a full frame.
    fn render(&mut self, frame: &DisplayCommand);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
