//! Unified error type for the Eldorado engine.

use eldorado_deck::DeckError;
use eldorado_game::GameError;
use eldorado_room::RoomError;

/// Top-level error that wraps all crate-specific errors.
///
/// When using the `eldorado` meta-crate, callers deal with this single
/// type instead of importing errors from each sub-crate. The `#[from]`
/// attribute on each variant auto-generates `From` impls, so the `?`
/// operator converts sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum EldoradoError {
    /// A deck-level error (empty deck).
    #[error(transparent)]
    Deck(#[from] DeckError),

    /// A game-level error (unknown player, returned lock, settled round).
    #[error(transparent)]
    Game(#[from] GameError),

    /// A room-level error (not found, full, wrong lifecycle state).
    #[error(transparent)]
    Room(#[from] RoomError),
}
