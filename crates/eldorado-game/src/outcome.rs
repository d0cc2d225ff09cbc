//! What a resolved action cycle produced.

use eldorado_protocol::{DangerKind, PlayerId, RankingEntry};
use serde::{Deserialize, Serialize};

/// A treasure awarded to the lone player who returned this cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreasureClaim {
    pub player: PlayerId,
    pub value: u32,
}

/// The effect of one resolved action cycle.
///
/// The first four variants carry `claimed` because a treasure left in play
/// by an earlier cycle is awarded at whichever later settlement has exactly
/// one returning player — not only on the cycle its card was drawn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Outcome {
    /// Gold split evenly (floor division, remainder discarded) among the
    /// players who kept exploring.
    Gold {
        value: u32,
        share: u32,
        claimed: Option<TreasureClaim>,
    },

    /// A hazard. `is_duplicate` means the round ended and every player
    /// still exploring lost their unsecured gold.
    Danger {
        kind: DangerKind,
        is_duplicate: bool,
        claimed: Option<TreasureClaim>,
    },

    /// A treasure card entered play (and was immediately claimed if
    /// exactly one player returned this cycle).
    Treasure {
        value: u32,
        claimed: Option<TreasureClaim>,
    },

    /// Every player has returned to camp; the round settled.
    AllReturned { claimed: Option<TreasureClaim> },

    /// The per-round action cap tripped; everyone's gold was secured and
    /// the round settled.
    ActionCapReached,
}

impl Outcome {
    /// Whether this outcome closed the round. A closed round sits parked
    /// until the explicit next-round trigger.
    pub fn ends_round(&self) -> bool {
        matches!(
            self,
            Outcome::Danger {
                is_duplicate: true,
                ..
            } | Outcome::AllReturned { .. }
                | Outcome::ActionCapReached
        )
    }

    /// The treasure claim carried by this outcome, if any.
    pub fn claimed(&self) -> Option<TreasureClaim> {
        match self {
            Outcome::Gold { claimed, .. }
            | Outcome::Danger { claimed, .. }
            | Outcome::Treasure { claimed, .. }
            | Outcome::AllReturned { claimed } => *claimed,
            Outcome::ActionCapReached => None,
        }
    }
}

/// The result of an explicit round advance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoundTransition {
    /// A fresh round began.
    Next { round: u32 },
    /// All rounds are played; the final scoreboard, best first.
    GameOver { ranking: Vec<RankingEntry> },
}
