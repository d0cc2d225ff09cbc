//! Building and drawing the per-round deck.

use eldorado_protocol::DangerKind;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::Card;

/// Total cards in a freshly built round deck.
pub const DECK_SIZE: usize = 30;

/// Copies of each danger kind per deck (5 kinds × 3 = 15 danger cards).
pub const DANGER_COPIES: usize = 3;

/// The discrete gold values, sampled with replacement when filling the deck.
pub const GOLD_VALUES: [u32; 9] = [5, 7, 8, 9, 10, 11, 12, 15, 17];

/// Treasure values in ascending order; round *r* (1-indexed) puts the
/// *r*-th value into its deck. Rounds past the schedule get no treasure.
pub const TREASURE_SCHEDULE: [u32; 5] = [5, 7, 8, 10, 12];

/// Errors from deck operations.
#[derive(Debug, thiserror::Error)]
pub enum DeckError {
    /// Drawing from an exhausted deck. Callers rebuild and retry; the
    /// action cap normally ends the round before this can happen.
    #[error("round deck is empty")]
    Empty,
}

/// The ordered stack of cards remaining for the current round.
///
/// Cards are drawn from the back. Exactly one deck is active per room per
/// round; the resolver replaces it on every round start.
#[derive(Debug, Clone)]
pub struct RoundDeck {
    cards: Vec<Card>,
}

impl RoundDeck {
    /// Builds and shuffles a fresh deck for the given round (1-indexed).
    pub fn build(round: u32, rng: &mut impl Rng) -> Self {
        let mut cards = Vec::with_capacity(DECK_SIZE);

        // One scheduled treasure card, if the round has one.
        if let Some(value) = treasure_for_round(round) {
            cards.push(Card::Treasure(value));
        } else {
            tracing::debug!(round, "no scheduled treasure for this round");
        }

        for kind in DangerKind::ALL {
            for _ in 0..DANGER_COPIES {
                cards.push(Card::Danger(kind));
            }
        }

        while cards.len() < DECK_SIZE {
            let value = GOLD_VALUES[rng.random_range(0..GOLD_VALUES.len())];
            cards.push(Card::Gold(value));
        }

        cards.shuffle(rng);

        tracing::debug!(round, size = cards.len(), "round deck built");
        Self { cards }
    }

    /// Builds a deck from an explicit card sequence. Cards are drawn from
    /// the back, so the last element is the first draw.
    pub fn from_cards(cards: Vec<Card>) -> Self {
        Self { cards }
    }

    /// Draws the next card.
    pub fn draw(&mut self) -> Result<Card, DeckError> {
        self.cards.pop().ok_or(DeckError::Empty)
    }

    /// Remaining cards.
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

/// The scheduled treasure value for a round, or `None` past the schedule.
fn treasure_for_round(round: u32) -> Option<u32> {
    let index = round.checked_sub(1)? as usize;
    TREASURE_SCHEDULE.get(index).copied()
}
