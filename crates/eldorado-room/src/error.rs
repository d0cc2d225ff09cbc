//! Error types for the room layer.

use eldorado_protocol::{PlayerId, RoomId};

/// Errors from room operations.
///
/// All of these are validation results returned to the caller; the
/// presentation layer decides the user-facing wording. None of them leave
/// room or game state partially mutated.
#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    /// The room does not exist (or was disbanded mid-operation).
    #[error("room {0} not found")]
    NotFound(RoomId),

    /// The room is past `Waiting` and no longer accepts this operation.
    #[error("room {0} is not accepting players")]
    NotWaiting(RoomId),

    /// No player slots left.
    #[error("room {0} is full")]
    RoomFull(RoomId),

    /// The player is already in a room — a player can be in at most one
    /// room at a time, system-wide.
    #[error("player {0} is already in a room")]
    AlreadyInRoom(PlayerId),

    /// The player is not a member of this room.
    #[error("player {0} is not in room {1}")]
    NotInRoom(PlayerId, RoomId),

    /// The player is not in any room.
    #[error("player {0} is not in any room")]
    NotInAnyRoom(PlayerId),

    /// The game has not started or is already over.
    #[error("game in room {0} is not in progress")]
    GameNotPlaying(RoomId),

    /// The player already returned to camp this round.
    #[error("player {0} has already returned to camp this round")]
    AlreadyReturned(PlayerId),

    /// The round has settled; the room is waiting on the next-round trigger.
    #[error("round in room {0} is already settled")]
    RoundClosed(RoomId),

    /// A next-round trigger arrived while the round was still open.
    #[error("round in room {0} is still in progress")]
    RoundInProgress(RoomId),

    /// Only the host may do this.
    #[error("player {0} is not the host of room {1}")]
    NotHost(PlayerId, RoomId),

    /// Starting needs more players.
    #[error("room {0} needs at least {1} players to start")]
    NotEnoughPlayers(RoomId, usize),

    /// The room's command channel is closed or full.
    #[error("room {0} is unavailable")]
    Unavailable(RoomId),
}
