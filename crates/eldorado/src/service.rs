//! The `ExpeditionService` facade.
//!
//! One service object is built at process start and passed by reference to
//! every call site — the explicit replacement for the module-level
//! singleton managers the original implementation grew around. It owns the
//! [`RoomManager`] behind a `Mutex` and layers on the one cross-room
//! behavior the manager doesn't have: disbanding a finished room after a
//! grace period, so the final scoreboard lingers long enough to be read.

use std::sync::Arc;
use std::time::Duration;

use eldorado_game::{Action, GameConfig};
use eldorado_protocol::{PlayerId, RoomId};
use eldorado_room::{AdvanceReport, Presenter, RoomConfig, RoomError, RoomManager, RoomSnapshot};
use tokio::sync::Mutex;

/// Default time a finished room's scoreboard stays up before the room is
/// disbanded.
const DEFAULT_DISBAND_GRACE: Duration = Duration::from_secs(60);

/// The engine's front door: inbound lifecycle and action calls from the
/// presentation layer.
///
/// Cheap to clone; clones share the same room manager.
pub struct ExpeditionService<P: Presenter> {
    rooms: Arc<Mutex<RoomManager<P>>>,
    disband_grace: Duration,
}

impl<P: Presenter> Clone for ExpeditionService<P> {
    fn clone(&self) -> Self {
        Self {
            rooms: Arc::clone(&self.rooms),
            disband_grace: self.disband_grace,
        }
    }
}

impl<P: Presenter> ExpeditionService<P> {
    /// Builds the service. The presenter is shared by every room.
    pub fn new(config: RoomConfig, game_config: GameConfig, presenter: Arc<P>) -> Self {
        Self {
            rooms: Arc::new(Mutex::new(RoomManager::new(config, game_config, presenter))),
            disband_grace: DEFAULT_DISBAND_GRACE,
        }
    }

    /// Overrides how long a finished room lingers before disbanding.
    pub fn with_disband_grace(mut self, grace: Duration) -> Self {
        self.disband_grace = grace;
        self
    }

    /// Creates a room with `host` as its first player.
    pub async fn create_room(&self, host: PlayerId) -> Result<RoomId, RoomError> {
        self.rooms.lock().await.create_room(host)
    }

    /// Adds a player to a waiting room.
    pub async fn join_room(&self, room_id: RoomId, player: PlayerId) -> Result<(), RoomError> {
        self.rooms.lock().await.join_room(room_id, player).await
    }

    /// Removes a player from their room; a leaving host disbands it.
    pub async fn leave_room(&self, player: PlayerId) -> Result<(), RoomError> {
        self.rooms.lock().await.leave_room(player).await
    }

    /// Starts the game (host only, enough players, still waiting).
    pub async fn start_game(&self, room_id: RoomId, requester: PlayerId) -> Result<(), RoomError> {
        self.rooms.lock().await.start_game(room_id, requester).await
    }

    /// Records a player's choice for the current action cycle.
    pub async fn submit_action(&self, player: PlayerId, action: Action) -> Result<(), RoomError> {
        self.rooms.lock().await.submit_action(player, action).await
    }

    /// Fires the explicit next-round trigger. When this ends the game, a
    /// background task disbands the room after the grace period.
    pub async fn advance_round(
        &self,
        room_id: RoomId,
        requester: PlayerId,
    ) -> Result<AdvanceReport, RoomError> {
        let report = {
            self.rooms
                .lock()
                .await
                .advance_round(room_id, requester)
                .await?
        };

        if report == AdvanceReport::GameOver {
            let rooms = Arc::clone(&self.rooms);
            let grace = self.disband_grace;
            tokio::spawn(async move {
                tokio::time::sleep(grace).await;
                // The room may already be gone (e.g. host left); either way
                // this cleanup is best-effort.
                if let Err(e) = rooms.lock().await.disband_room(room_id).await {
                    tracing::debug!(%room_id, error = %e, "post-game disband skipped");
                }
            });
        }
        Ok(report)
    }

    /// Snapshot of one room.
    pub async fn room_snapshot(&self, room_id: RoomId) -> Result<RoomSnapshot, RoomError> {
        self.rooms.lock().await.room_snapshot(room_id).await
    }

    /// Rooms still accepting players.
    pub async fn waiting_rooms(&self) -> Vec<RoomSnapshot> {
        self.rooms.lock().await.waiting_rooms().await
    }

    /// The room a player is currently in, if any.
    pub async fn player_room(&self, player: PlayerId) -> Option<RoomId> {
        self.rooms.lock().await.player_room(&player)
    }

    /// Number of active rooms.
    pub async fn room_count(&self) -> usize {
        self.rooms.lock().await.room_count()
    }
}
