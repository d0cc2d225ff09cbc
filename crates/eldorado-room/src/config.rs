//! Room configuration and lifecycle state machine.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// RoomConfig
// ---------------------------------------------------------------------------

/// Player-count limits for a room.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomConfig {
    /// Minimum players required before the host may start.
    ///
    /// Proper games need two; dropping this to 1 enables the solo mode
    /// used by tests and practice runs.
    pub min_players: usize,

    /// Maximum players allowed in the room.
    pub max_players: usize,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            min_players: 2,
            max_players: 8,
        }
    }
}

// ---------------------------------------------------------------------------
// RoomStatus
// ---------------------------------------------------------------------------

/// The lifecycle state of a room.
///
/// Transitions only move forward:
///
/// ```text
/// Waiting → Playing → Finished
/// ```
///
/// - **Waiting**: room exists, host can add players, game not started.
/// - **Playing**: rounds in progress; joins are rejected.
/// - **Finished**: final scoreboard shown; the room is disbanded after a
///   grace period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomStatus {
    Waiting,
    Playing,
    Finished,
}

impl RoomStatus {
    /// Returns `true` if the room is accepting new players.
    pub fn is_joinable(&self) -> bool {
        matches!(self, Self::Waiting)
    }

    /// Attempts to transition to the next state.
    ///
    /// Returns `Some(next)` if a forward transition exists, `None` at the
    /// end of the line. This is what makes "back to Waiting" unrepresentable.
    pub fn next(self) -> Option<Self> {
        match self {
            Self::Waiting => Some(Self::Playing),
            Self::Playing => Some(Self::Finished),
            Self::Finished => None,
        }
    }

    /// Returns `true` if transitioning to `target` is valid.
    pub fn can_transition_to(self, target: Self) -> bool {
        self.next() == Some(target)
    }
}

impl std::fmt::Display for RoomStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Waiting => write!(f, "Waiting"),
            Self::Playing => write!(f, "Playing"),
            Self::Finished => write!(f, "Finished"),
        }
    }
}
