//! Round deck construction and drawing.
//!
//! Every round plays against a fresh 30-card deck: one treasure card picked
//! by a fixed per-round schedule, fifteen danger cards (three copies of each
//! of the five kinds), and gold cards filling the rest. The deck is shuffled
//! once at build time and consumed one card per action cycle.
//!
//! Deck construction takes the RNG as a parameter so tests can seed a
//! [`rand::rngs::StdRng`] and get reproducible decks; production callers
//! pass [`rand::rng()`].

mod card;
mod deck;

pub use card::Card;
pub use deck::{DeckError, RoundDeck, DANGER_COPIES, DECK_SIZE, GOLD_VALUES, TREASURE_SCHEDULE};
