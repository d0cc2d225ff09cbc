//! The round-resolution engine: the authoritative state for one game and
//! the state machine that advances it one action cycle at a time.
//!
//! A game runs up to five rounds. Within a round, play proceeds in action
//! cycles: every exploring player picks `Continue` or `Return` (idle players
//! default to `Continue`), one card is drawn, and its effect is applied to
//! everyone simultaneously. A round ends when everyone has returned, when
//! the same danger appears twice, or when the action cap trips. Moving to
//! the next round is always an explicit, separate call — nothing here
//! advances the round on its own.
//!
//! This crate is transport-free and render-free; the room layer owns the
//! clock and the presentation boundary.
//!
//! # Key types
//!
//! - [`GameState`] — per-room authoritative state, one action cycle per
//!   [`GameState::resolve_cycle`] call
//! - [`Action`] — a player's per-cycle choice
//! - [`Outcome`] — what a resolved cycle produced
//! - [`RoundTransition`] — the result of an explicit round advance
//! - [`GameConfig`] — tunables (timer, timeout, rounds, action cap)

mod config;
mod error;
mod outcome;
mod state;

pub use config::GameConfig;
pub use error::GameError;
pub use outcome::{Outcome, RoundTransition, TreasureClaim};
pub use state::{Action, GameState};
