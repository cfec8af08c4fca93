//! Decision making for delve
//!
//! Two state machines sit between extracted facts and the single key that
//! goes back to the game. The menu machine steers character creation; the
//! decision engine owns gameplay with a strict priority order. Both are
//! deterministic functions of the latest snapshot plus a small carried
//! context — no search, no learning, no look-ahead.

pub mod context;
pub mod decision;
pub mod menu;

pub use context::{Phase, SessionContext};
pub use decision::{Action, Engine, EngineConfig, Outcome};
pub use menu::{MenuInputs, MenuMachine, MenuState};

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum EngineError {
    /// The creation-flow machine was fed a snapshot after reporting
    /// `Done`. That flow is one-way and never re-entered; observing it
    /// again is a caller lifecycle bug, surfaced loudly.
    #[error("creation flow already complete")]
    CreationFlowComplete,

    /// The engine was asked for a decision after the session ended
    /// (game over or stuck escalation already reported).
    #[error("session is over; no further decisions")]
    SessionOver,
}
