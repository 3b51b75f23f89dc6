//! Concrete mode handler functions and table builder.
//!
//! Each mode is defined by plain `fn` pointers: no closures, no dynamic
//! dispatch, no heap.
//!
//! ```text
//!   OFF ──[Select]──▶ COOLING ──[idle ≥ timeout, in band]──▶ ECO
//!    ▲                 │   ▲                                  │
//!    └────[Select]─────┘   └───[key / out of band]────────────┘
//!
//!  Any mode ──[fault latched]──▶ ALERT ──[safe for debounce window]──▶ COOLING
//! ```

use super::context::{ActuatorCommand, FanDirection, TickContext};
use super::{Mode, StateDescriptor};
use crate::config::SafetyPolicy;
use crate::error::SafetyFault;
use log::{info, warn};

// ═══════════════════════════════════════════════════════════════════════════
//  Table builder
// ═══════════════════════════════════════════════════════════════════════════

/// Build the static state table.  Called once at startup.
pub fn build_state_table() -> [StateDescriptor; Mode::COUNT] {
    [
        // Index 0: Off
        StateDescriptor {
            mode: Mode::Off,
            name: "Off",
            on_enter: Some(off_enter),
            on_exit: None,
            on_update: off_update,
            actuate: off_actuate,
        },
        // Index 1: Cooling
        StateDescriptor {
            mode: Mode::Cooling,
            name: "Cooling",
            on_enter: Some(cooling_enter),
            on_exit: None,
            on_update: cooling_update,
            actuate: cooling_actuate,
        },
        // Index 2: Eco
        StateDescriptor {
            mode: Mode::Eco,
            name: "Eco",
            on_enter: Some(eco_enter),
            on_exit: Some(eco_exit),
            on_update: eco_update,
            actuate: eco_actuate,
        },
        // Index 3: Alert
        StateDescriptor {
            mode: Mode::Alert,
            name: "Alert",
            on_enter: Some(alert_enter),
            on_exit: Some(alert_exit),
            on_update: alert_update,
            actuate: alert_actuate,
        },
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
//  Shared actuation
// ═══════════════════════════════════════════════════════════════════════════

/// Fan duty proportional to how far the room is above setpoint, capped at
/// `ceiling`.  At or below setpoint the fan is off.
fn proportional_fan(ctx: &TickContext<'_>, ceiling: u8) -> ActuatorCommand {
    match ctx.deviation() {
        Some(above) if above > 0 => {
            let duty = (above as u32 * u32::from(ctx.config.fan_gain_per_c))
                .min(u32::from(ceiling)) as u8;
            ActuatorCommand {
                fan_speed: duty,
                fan_direction: FanDirection::Forward,
                vane_angle: ctx.state.vane_angle,
                alarm: false,
            }
        }
        _ => ActuatorCommand::idle(ctx.state.vane_angle),
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  OFF
// ═══════════════════════════════════════════════════════════════════════════

fn off_enter(_ctx: &mut TickContext<'_>) {
    info!("OFF: fan stopped");
}

fn off_update(ctx: &mut TickContext<'_>) -> Option<Mode> {
    if ctx.alert_latched() {
        return Some(Mode::Alert);
    }
    None
}

fn off_actuate(ctx: &TickContext<'_>) -> ActuatorCommand {
    ActuatorCommand::idle(ctx.state.vane_angle)
}

// ═══════════════════════════════════════════════════════════════════════════
//  COOLING: tracking the setpoint at full authority
// ═══════════════════════════════════════════════════════════════════════════

fn cooling_enter(ctx: &mut TickContext<'_>) {
    ctx.state.idle_ticks = 0;
    info!("COOLING: tracking setpoint {}C", ctx.state.setpoint);
}

fn cooling_update(ctx: &mut TickContext<'_>) -> Option<Mode> {
    if ctx.alert_latched() {
        return Some(Mode::Alert);
    }

    // Out of band means the fan has work to do; that is not idleness.
    if !ctx.in_band() {
        ctx.state.idle_ticks = 0;
        return None;
    }

    if ctx.state.idle_ticks >= ctx.config.idle_timeout_ticks {
        info!(
            "COOLING: {} idle ticks at setpoint {}C → eco",
            ctx.state.idle_ticks, ctx.state.setpoint
        );
        return Some(Mode::Eco);
    }

    None
}

fn cooling_actuate(ctx: &TickContext<'_>) -> ActuatorCommand {
    proportional_fan(ctx, u8::MAX)
}

// ═══════════════════════════════════════════════════════════════════════════
//  ECO: same tracking, capped fan, display dimmed
// ═══════════════════════════════════════════════════════════════════════════

fn eco_enter(ctx: &mut TickContext<'_>) {
    info!(
        "ECO: fan capped at {}/255",
        ctx.config.eco_ceiling_duty()
    );
}

fn eco_exit(_ctx: &mut TickContext<'_>) {
    info!("ECO: leaving low-power posture");
}

fn eco_update(ctx: &mut TickContext<'_>) -> Option<Mode> {
    if ctx.alert_latched() {
        return Some(Mode::Alert);
    }

    if !ctx.in_band() {
        info!(
            "ECO: reading {:?} left the band around {}C → cooling",
            ctx.temperature(),
            ctx.state.setpoint
        );
        return Some(Mode::Cooling);
    }

    None
}

fn eco_actuate(ctx: &TickContext<'_>) -> ActuatorCommand {
    proportional_fan(ctx, ctx.config.eco_ceiling_duty())
}

// ═══════════════════════════════════════════════════════════════════════════
//  ALERT: safety fault latched, fan at safety posture
// ═══════════════════════════════════════════════════════════════════════════

fn alert_enter(ctx: &mut TickContext<'_>) {
    ctx.state.alert_active = true;
    match SafetyFault::first_in(ctx.state.faults) {
        Some(fault) => warn!(
            "ALERT: {}, fan policy {:?}, faults=0b{:08b}",
            fault, ctx.config.safety_policy, ctx.state.faults
        ),
        None => warn!("ALERT: forced, fan policy {:?}", ctx.config.safety_policy),
    }
}

fn alert_exit(ctx: &mut TickContext<'_>) {
    ctx.state.alert_active = false;
    info!("ALERT: faults cleared, resuming cooling");
}

fn alert_update(ctx: &mut TickContext<'_>) -> Option<Mode> {
    // Stay until the safety supervisor has seen a full debounce window
    // of safe readings.
    if !ctx.alert_latched() {
        return Some(Mode::Cooling);
    }
    None
}

fn alert_actuate(ctx: &TickContext<'_>) -> ActuatorCommand {
    let (fan_speed, fan_direction) = match ctx.config.safety_policy {
        SafetyPolicy::Purge => (u8::MAX, FanDirection::Forward),
        SafetyPolicy::Stop => (0, FanDirection::Off),
    };
    ActuatorCommand {
        fan_speed,
        fan_direction,
        vane_angle: ctx.config.safe_vane_us,
        alarm: true,
    }
}
