//! Function-pointer finite state machine engine.
//!
//! Classic embedded FSM pattern ported to Rust:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │  StateTable                                                      │
//! │  ┌─────────┬──────────┬──────────┬───────────────┬─────────────┐ │
//! │  │ Mode    │ on_enter │ on_exit  │ on_update     │ actuate     │ │
//! │  ├─────────┼──────────┼──────────┼───────────────┼─────────────┤ │
//! │  │ Off     │ fn(ctx)  │ -        │ fn(ctx)->Opt  │ fn(ctx)->Cmd│ │
//! │  │ Cooling │ fn(ctx)  │ -        │ fn(ctx)->Opt  │ fn(ctx)->Cmd│ │
//! │  │ Eco     │ fn(ctx)  │ fn(ctx)  │ fn(ctx)->Opt  │ fn(ctx)->Cmd│ │
//! │  │ Alert   │ fn(ctx)  │ fn(ctx)  │ fn(ctx)->Opt  │ fn(ctx)->Cmd│ │
//! │  └─────────┴──────────┴──────────┴───────────────┴─────────────┘ │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The engine itself holds no mutable state: the current mode lives in
//! `ControllerState`, which the control loop threads through a
//! [`TickContext`].  `update` calls `on_update` for the current mode; if
//! it returns `Some(next)`, the engine runs `on_exit` for the current
//! mode, switches `ctx.state.mode`, then runs `on_enter` for the next.

pub mod context;
pub mod states;

use core::fmt;

use context::{ActuatorCommand, TickContext};
use log::info;

// ---------------------------------------------------------------------------
// State identity
// ---------------------------------------------------------------------------

/// Controller operating mode.
/// Must stay in sync with the state table built in [`states::build_state_table`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Mode {
    Off = 0,
    Cooling = 1,
    Eco = 2,
    Alert = 3,
}

impl Mode {
    /// Total number of modes, used to size the table array.
    pub const COUNT: usize = 4;

    /// Convert a `u8` index back to `Mode`.  Panics on out-of-range in
    /// debug builds; returns `Alert` in release (safe fallback).
    pub fn from_index(idx: usize) -> Self {
        match idx {
            0 => Self::Off,
            1 => Self::Cooling,
            2 => Self::Eco,
            3 => Self::Alert,
            _ => {
                debug_assert!(false, "invalid mode index: {idx}");
                Self::Alert
            }
        }
    }

    /// Upper-case label used on the display.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Off => "OFF",
            Self::Cooling => "COOL",
            Self::Eco => "ECO",
            Self::Alert => "ALERT",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Function-pointer type aliases
// ---------------------------------------------------------------------------

/// Signature for `on_enter` and `on_exit` actions.
/// These run exactly once on each mode transition.
pub type StateActionFn = fn(&mut TickContext<'_>);

/// Signature for the per-tick update handler.
/// Returns `Some(next)` to trigger a transition, or `None` to stay.
pub type StateUpdateFn = fn(&mut TickContext<'_>) -> Option<Mode>;

/// Signature for the actuation handler: derives this tick's actuator
/// command from the settled context.
pub type StateActuateFn = fn(&TickContext<'_>) -> ActuatorCommand;

// ---------------------------------------------------------------------------
// State descriptor (one row in the table)
// ---------------------------------------------------------------------------

/// Static descriptor for a single mode.
/// Stored in a fixed-size array: no heap, no `dyn`.
pub struct StateDescriptor {
    pub mode: Mode,
    pub name: &'static str,
    pub on_enter: Option<StateActionFn>,
    pub on_exit: Option<StateActionFn>,
    pub on_update: StateUpdateFn,
    pub actuate: StateActuateFn,
}

// ---------------------------------------------------------------------------
// FSM engine
// ---------------------------------------------------------------------------

/// The finite state machine engine.
///
/// Owns the state table (array of [`StateDescriptor`]) indexed by
/// `Mode as usize`.
pub struct Fsm {
    table: [StateDescriptor; Mode::COUNT],
}

impl Default for Fsm {
    fn default() -> Self {
        Self::new(states::build_state_table())
    }
}

impl Fsm {
    /// Construct an FSM over the given state table.
    pub fn new(table: [StateDescriptor; Mode::COUNT]) -> Self {
        debug_assert!(
            table.iter().enumerate().all(|(i, d)| d.mode as usize == i),
            "state table out of order"
        );
        Self { table }
    }

    /// Run `on_update` for the current mode and follow the transition it
    /// requests, if any.  Returns the mode after the update.
    pub fn update(&self, ctx: &mut TickContext<'_>) -> Mode {
        let next = (self.row(ctx.state.mode).on_update)(ctx);
        if let Some(next_mode) = next {
            self.force_transition(next_mode, ctx);
        }
        ctx.state.mode
    }

    /// Transition to `next` immediately, running exit/enter actions.
    /// A no-op if already in `next`.
    pub fn force_transition(&self, next: Mode, ctx: &mut TickContext<'_>) {
        if next != ctx.state.mode {
            self.transition(next, ctx);
        }
    }

    /// Derive the actuator command for the current mode.
    pub fn actuate(&self, ctx: &TickContext<'_>) -> ActuatorCommand {
        (self.row(ctx.state.mode).actuate)(ctx)
    }

    /// Human-readable name of `mode`.
    pub fn name(&self, mode: Mode) -> &'static str {
        self.row(mode).name
    }

    // -----------------------------------------------------------------------
    // Internal
    // -----------------------------------------------------------------------

    fn row(&self, mode: Mode) -> &StateDescriptor {
        &self.table[mode as usize]
    }

    fn transition(&self, next: Mode, ctx: &mut TickContext<'_>) {
        let current = ctx.state.mode;
        info!(
            "FSM transition: {} -> {}",
            self.row(current).name,
            self.row(next).name
        );

        if let Some(exit) = self.row(current).on_exit {
            exit(ctx);
        }

        ctx.state.mode = next;

        if let Some(enter) = self.row(next).on_enter {
            enter(ctx);
        }
    }
}
