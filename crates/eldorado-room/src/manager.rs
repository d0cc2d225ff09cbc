//! Room manager: creates, tracks, and routes players to rooms.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use eldorado_game::{Action, GameConfig};
use eldorado_protocol::{PlayerId, RoomId};

use crate::room::spawn_room;
use crate::{AdvanceReport, Presenter, RoomConfig, RoomError, RoomHandle, RoomSnapshot};

/// Counter for generating unique room IDs.
static NEXT_ROOM_ID: AtomicU64 = AtomicU64::new(1);

/// Default command channel size for room actors.
const DEFAULT_CHANNEL_SIZE: usize = 64;

/// Manages all active rooms and tracks which player is in which room.
///
/// This is the entry point for room operations from higher layers. It
/// enforces the "one room per player, system-wide" invariant; everything
/// inside a single room is the room actor's business.
pub struct RoomManager<P: Presenter> {
    /// Active rooms, keyed by room ID.
    rooms: HashMap<RoomId, RoomHandle>,

    /// Maps each player to the room they're currently in.
    player_rooms: HashMap<PlayerId, RoomId>,

    config: RoomConfig,
    game_config: GameConfig,
    presenter: Arc<P>,
}

impl<P: Presenter> RoomManager<P> {
    /// Creates an empty manager. The presenter is shared by every room
    /// this manager spawns.
    pub fn new(config: RoomConfig, game_config: GameConfig, presenter: Arc<P>) -> Self {
        Self {
            rooms: HashMap::new(),
            player_rooms: HashMap::new(),
            config,
            game_config,
            presenter,
        }
    }

    /// Creates a new room with `host` as its first player and returns the
    /// room ID.
    pub fn create_room(&mut self, host: PlayerId) -> Result<RoomId, RoomError> {
        if self.player_rooms.contains_key(&host) {
            return Err(RoomError::AlreadyInRoom(host));
        }

        let room_id = RoomId(NEXT_ROOM_ID.fetch_add(1, Ordering::Relaxed));
        let handle = spawn_room(
            room_id,
            host,
            self.config.clone(),
            self.game_config.clone(),
            Arc::clone(&self.presenter),
            DEFAULT_CHANNEL_SIZE,
        );
        self.rooms.insert(room_id, handle);
        self.player_rooms.insert(host, room_id);
        tracing::info!(%room_id, %host, "room created");
        Ok(room_id)
    }

    /// Adds a player to a waiting room.
    pub async fn join_room(&mut self, room_id: RoomId, player: PlayerId) -> Result<(), RoomError> {
        if self.player_rooms.contains_key(&player) {
            return Err(RoomError::AlreadyInRoom(player));
        }

        let handle = self
            .rooms
            .get(&room_id)
            .ok_or(RoomError::NotFound(room_id))?;

        handle.join(player).await?;
        self.player_rooms.insert(player, room_id);
        Ok(())
    }

    /// Removes a player from their current room.
    ///
    /// A leaving host disbands the whole room, as in the original game:
    /// the expedition doesn't go on without its organizer.
    pub async fn leave_room(&mut self, player: PlayerId) -> Result<(), RoomError> {
        let room_id = self
            .player_rooms
            .get(&player)
            .copied()
            .ok_or(RoomError::NotInAnyRoom(player))?;

        let handle = self
            .rooms
            .get(&room_id)
            .ok_or(RoomError::NotFound(room_id))?;

        let snapshot = handle.snapshot().await?;
        if snapshot.host == player {
            tracing::info!(%room_id, %player, "host left, disbanding room");
            return self.disband_room(room_id).await;
        }

        handle.leave(player).await?;
        self.player_rooms.remove(&player);
        Ok(())
    }

    /// Starts the game in a room. Only the host may do this.
    pub async fn start_game(
        &self,
        room_id: RoomId,
        requester: PlayerId,
    ) -> Result<(), RoomError> {
        let handle = self
            .rooms
            .get(&room_id)
            .ok_or(RoomError::NotFound(room_id))?;
        handle.start(requester).await
    }

    /// Routes a player's per-cycle choice to their current room.
    pub async fn submit_action(&self, player: PlayerId, action: Action) -> Result<(), RoomError> {
        let room_id = self
            .player_rooms
            .get(&player)
            .ok_or(RoomError::NotInAnyRoom(player))?;

        let handle = self
            .rooms
            .get(room_id)
            .ok_or(RoomError::NotFound(*room_id))?;

        handle.submit_action(player, action).await
    }

    /// Fires the explicit next-round trigger for a room.
    ///
    /// Returns [`AdvanceReport::GameOver`] when this was the last round,
    /// so the caller can schedule the room's disbanding.
    pub async fn advance_round(
        &self,
        room_id: RoomId,
        requester: PlayerId,
    ) -> Result<AdvanceReport, RoomError> {
        let handle = self
            .rooms
            .get(&room_id)
            .ok_or(RoomError::NotFound(room_id))?;
        handle.advance_round(requester).await
    }

    /// Returns a snapshot of a specific room.
    pub async fn room_snapshot(&self, room_id: RoomId) -> Result<RoomSnapshot, RoomError> {
        let handle = self
            .rooms
            .get(&room_id)
            .ok_or(RoomError::NotFound(room_id))?;
        handle.snapshot().await
    }

    /// Lists the rooms still accepting players.
    ///
    /// Queries each room actor; rooms that fail to respond (e.g. shutting
    /// down) are silently skipped.
    pub async fn waiting_rooms(&self) -> Vec<RoomSnapshot> {
        let mut snapshots = Vec::new();
        for handle in self.rooms.values() {
            if let Ok(snapshot) = handle.snapshot().await {
                if snapshot.status.is_joinable() {
                    snapshots.push(snapshot);
                }
            }
        }
        snapshots
    }

    /// Shuts a room down and removes all its players from the index.
    pub async fn disband_room(&mut self, room_id: RoomId) -> Result<(), RoomError> {
        let handle = self
            .rooms
            .remove(&room_id)
            .ok_or(RoomError::NotFound(room_id))?;

        let _ = handle.shutdown().await;
        self.player_rooms.retain(|_, rid| *rid != room_id);

        tracing::info!(%room_id, "room disbanded");
        Ok(())
    }

    /// Returns the room a player is currently in, if any.
    pub fn player_room(&self, player: &PlayerId) -> Option<RoomId> {
        self.player_rooms.get(player).copied()
    }

    /// Number of active rooms.
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    /// All active room IDs.
    pub fn room_ids(&self) -> Vec<RoomId> {
        self.rooms.keys().copied().collect()
    }
}
