//! Core shared types.
//!
//! Identity newtypes follow the usual pattern: a `u64` wrapped in a named
//! struct so a `RoomId` can never be passed where a `PlayerId` is expected.
//! `#[serde(transparent)]` keeps the JSON representation a plain number.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// A unique identifier for a player.
///
/// The embedding layer maps its own user ids (e.g. chat-platform snowflakes)
/// onto these; the engine only ever compares and hashes them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P-{}", self.0)
    }
}

/// A unique identifier for a room (one multiplayer game instance).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(pub u64);

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R-{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Danger kinds
// ---------------------------------------------------------------------------

/// The five hazard types a round deck can contain.
///
/// Drawing the same kind twice in one round ends the round and wipes the
/// unsecured gold of everyone still exploring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DangerKind {
    Snake,
    Spider,
    Mummy,
    Fire,
    Rockfall,
}

impl DangerKind {
    /// All kinds, in deck-building order.
    pub const ALL: [DangerKind; 5] = [
        DangerKind::Snake,
        DangerKind::Spider,
        DangerKind::Mummy,
        DangerKind::Fire,
        DangerKind::Rockfall,
    ];
}

impl fmt::Display for DangerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DangerKind::Snake => "snake",
            DangerKind::Spider => "spider",
            DangerKind::Mummy => "mummy",
            DangerKind::Fire => "fire",
            DangerKind::Rockfall => "rockfall",
        };
        f.write_str(name)
    }
}

// ---------------------------------------------------------------------------
// Posture
// ---------------------------------------------------------------------------

/// A player's posture within the current round.
///
/// `Returned` is a one-way lock: once a player heads back to camp they
/// cannot act again until the next round resets everyone to `Exploring`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Posture {
    Exploring,
    Returned,
}

impl Posture {
    /// Returns `true` if the player can still act this round.
    pub fn is_exploring(&self) -> bool {
        matches!(self, Posture::Exploring)
    }
}

// ---------------------------------------------------------------------------
// Event tags
// ---------------------------------------------------------------------------

/// One entry in a round's event log.
///
/// Tags render as `gold:9`, `danger:fire`, `treasure:8` — the compact form
/// the presentation layer joins into a history line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum EventTag {
    Gold(u32),
    Danger(DangerKind),
    Treasure(u32),
}

impl fmt::Display for EventTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventTag::Gold(v) => write!(f, "gold:{v}"),
            EventTag::Danger(k) => write!(f, "danger:{k}"),
            EventTag::Treasure(v) => write!(f, "treasure:{v}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Report rows
// ---------------------------------------------------------------------------

/// One row of the final scoreboard.
///
/// `score = secured_gold + treasure_total`. Rows are produced already
/// sorted: score descending, ties broken by join order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingEntry {
    pub player: PlayerId,
    pub secured_gold: u32,
    pub treasure_total: u32,
    pub score: u32,
}

/// Per-player snapshot row handed across the presentation boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerView {
    pub player: PlayerId,
    /// Unsecured gold, at risk until the player returns.
    pub gold: u32,
    /// Gold banked across rounds, immune to danger.
    pub secured_gold: u32,
    /// Treasure values permanently won, in claim order.
    pub treasures: Vec<u32>,
    pub posture: Posture,
    /// Whether the player has submitted a choice this action cycle.
    pub has_chosen: bool,
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    //! Pins the JSON shapes of boundary types. An embedding bot parses
    //! these on its side of the fence, so a serde-attribute regression
    //! here breaks renderers silently.

    use super::*;

    #[test]
    fn test_player_id_serializes_as_plain_number() {
        let json = serde_json::to_string(&PlayerId(42)).unwrap();
        assert_eq!(json, "42");
    }

    #[test]
    fn test_player_id_deserializes_from_plain_number() {
        let pid: PlayerId = serde_json::from_str("42").unwrap();
        assert_eq!(pid, PlayerId(42));
    }

    #[test]
    fn test_id_display() {
        assert_eq!(PlayerId(7).to_string(), "P-7");
        assert_eq!(RoomId(3).to_string(), "R-3");
    }

    #[test]
    fn test_danger_kind_serializes_lowercase() {
        let json = serde_json::to_string(&DangerKind::Rockfall).unwrap();
        assert_eq!(json, "\"rockfall\"");
    }

    #[test]
    fn test_danger_kind_all_has_five_distinct_kinds() {
        let mut kinds = DangerKind::ALL.to_vec();
        kinds.dedup();
        assert_eq!(kinds.len(), 5);
    }

    #[test]
    fn test_posture_is_exploring() {
        assert!(Posture::Exploring.is_exploring());
        assert!(!Posture::Returned.is_exploring());
    }

    #[test]
    fn test_event_tag_display() {
        assert_eq!(EventTag::Gold(9).to_string(), "gold:9");
        assert_eq!(EventTag::Danger(DangerKind::Fire).to_string(), "danger:fire");
        assert_eq!(EventTag::Treasure(8).to_string(), "treasure:8");
    }

    #[test]
    fn test_event_tag_json_format() {
        let json: serde_json::Value =
            serde_json::to_value(EventTag::Danger(DangerKind::Snake)).unwrap();
        assert_eq!(json["kind"], "danger");
        assert_eq!(json["value"], "snake");
    }

    #[test]
    fn test_event_tag_round_trip() {
        for tag in [
            EventTag::Gold(17),
            EventTag::Danger(DangerKind::Mummy),
            EventTag::Treasure(12),
        ] {
            let bytes = serde_json::to_vec(&tag).unwrap();
            let decoded: EventTag = serde_json::from_slice(&bytes).unwrap();
            assert_eq!(tag, decoded);
        }
    }

    #[test]
    fn test_ranking_entry_json_shape() {
        let row = RankingEntry {
            player: PlayerId(1),
            secured_gold: 24,
            treasure_total: 12,
            score: 36,
        };
        let json: serde_json::Value = serde_json::to_value(&row).unwrap();
        assert_eq!(json["player"], 1);
        assert_eq!(json["secured_gold"], 24);
        assert_eq!(json["treasure_total"], 12);
        assert_eq!(json["score"], 36);
    }

    #[test]
    fn test_player_view_round_trip() {
        let view = PlayerView {
            player: PlayerId(5),
            gold: 3,
            secured_gold: 11,
            treasures: vec![5, 10],
            posture: Posture::Returned,
            has_chosen: false,
        };
        let bytes = serde_json::to_vec(&view).unwrap();
        let decoded: PlayerView = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(view, decoded);
    }
}
