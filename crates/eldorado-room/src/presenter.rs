//! The presentation/transport boundary.
//!
//! The engine never renders or sends anything itself. A room actor calls
//! through this trait with plain snapshots; the embedder (a chat bot, a
//! test harness, a terminal demo) decides what a "message" even is.

use eldorado_game::Outcome;
use eldorado_protocol::{EventTag, PlayerId, PlayerView, RankingEntry, RoomId};
use serde::{Deserialize, Serialize};

use crate::RoomStatus;

/// A full snapshot of a room's visible state, built fresh for every
/// notification so the presentation layer never reaches into live state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomSnapshot {
    pub room_id: RoomId,
    pub host: PlayerId,
    pub status: RoomStatus,
    /// Current round, 1-indexed; 0 before the game starts.
    pub round: u32,
    pub max_rounds: u32,
    /// Cards drawn this round.
    pub actions_in_round: u32,
    /// True while the room is parked on a settled round, waiting for the
    /// explicit next-round trigger.
    pub round_over: bool,
    /// An unclaimed treasure sitting in the open round, if any.
    pub treasure_in_play: Option<u32>,
    /// Rows in join order.
    pub players: Vec<PlayerView>,
    /// This round's event log, oldest first.
    pub events: Vec<EventTag>,
}

/// What the embedder implements to receive room output.
///
/// Calls are made from inside the room's actor task, so implementations
/// should hand work off (queue a message edit, send on a channel) rather
/// than block.
pub trait Presenter: Send + Sync + 'static {
    /// The room's state changed mid-round: a cycle resolved (`outcome` is
    /// `Some`), a fresh round opened, or a player's pending choice was
    /// recorded (`outcome` is `None`).
    fn round_state(&self, room: &RoomSnapshot, outcome: Option<&Outcome>);

    /// A terminal outcome settled the round. The room now waits for an
    /// explicit next-round trigger.
    fn round_end(&self, room: &RoomSnapshot, outcome: &Outcome);

    /// All rounds played; `ranking` is the final scoreboard, best first.
    fn game_end(&self, room: &RoomSnapshot, ranking: &[RankingEntry]);

    /// Countdown heartbeat for the current action cycle. Default: ignored.
    fn countdown(&self, _room: RoomId, _remaining_secs: u64) {}
}
