//! Outbound application events.
//!
//! The [`AppService`](super::service::AppService) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them.

use crate::fsm::Mode;
use crate::fsm::context::FanDirection;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// Periodic telemetry snapshot.
    Telemetry(TelemetryData),

    /// The controller changed mode.
    ModeChanged { from: Mode, to: Mode },

    /// A safety alert latched (carries the fault bitmask).
    AlertRaised(u8),

    /// The latched alert was cleared after the recovery window.
    AlertCleared,

    /// The user moved the setpoint.
    SetpointChanged { from: i16, to: i16 },

    /// The application service has started (carries initial mode).
    Started(Mode),
}

/// A point-in-time telemetry snapshot suitable for logging or transmission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryData {
    pub tick: u64,
    pub mode: Mode,
    /// `None` while the sensor reading is invalid.
    pub temperature_c: Option<i16>,
    pub setpoint_c: i16,
    pub fan_speed: u8,
    pub fan_direction: FanDirection,
    pub vane_angle: u16,
    pub fault_flags: u8,
}
