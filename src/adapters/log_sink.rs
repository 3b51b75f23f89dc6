//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (which goes to UART / USB-CDC in production).

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LogEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Telemetry(t) => match t.temperature_c {
                Some(c) => info!(
                    "TELEM | tick={} | mode={} | T={}C set={}C | fan={}/255 {:?} | vane={}us | faults=0b{:08b}",
                    t.tick, t.mode, c, t.setpoint_c, t.fan_speed, t.fan_direction, t.vane_angle, t.fault_flags,
                ),
                None => info!(
                    "TELEM | tick={} | mode={} | T=ERR set={}C | fan={}/255 {:?} | vane={}us | faults=0b{:08b}",
                    t.tick, t.mode, t.setpoint_c, t.fan_speed, t.fan_direction, t.vane_angle, t.fault_flags,
                ),
            },
            AppEvent::ModeChanged { from, to } => {
                info!("MODE | {} -> {}", from, to);
            }
            AppEvent::AlertRaised(flags) => {
                warn!("ALERT | raised, faults=0b{:08b}", flags);
            }
            AppEvent::AlertCleared => {
                info!("ALERT | cleared");
            }
            AppEvent::SetpointChanged { from, to } => {
                info!("SETPOINT | {}C -> {}C", from, to);
            }
            AppEvent::Started(mode) => {
                info!("START | initial_mode={}", mode);
            }
        }
    }
}
