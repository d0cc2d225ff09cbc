//! Error types for the game engine.

use eldorado_deck::DeckError;
use eldorado_protocol::PlayerId;

/// Errors from game-state operations.
///
/// These are validation results, not faults: callers surface them to the
/// acting player and the game state is untouched when one is returned.
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    /// The player is not part of this game.
    #[error("player {0} is not in this game")]
    UnknownPlayer(PlayerId),

    /// The player already returned to camp this round; `Return` is a
    /// one-way lock until the next round resets postures.
    #[error("player {0} has already returned to camp this round")]
    AlreadyReturned(PlayerId),

    /// The round has already settled; the room is waiting on an explicit
    /// next-round trigger.
    #[error("round is already settled")]
    RoundClosed,

    /// A deck fault. Not expected in practice — the resolver rebuilds an
    /// exhausted deck before drawing.
    #[error(transparent)]
    Deck(#[from] DeckError),
}
