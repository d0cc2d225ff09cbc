//! The outcome card type.

use std::fmt;

use eldorado_protocol::{DangerKind, EventTag};

/// A single outcome card. Immutable once drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Card {
    /// Gold to split among everyone still exploring.
    Gold(u32),
    /// A hazard; a repeat of the same kind ends the round.
    Danger(DangerKind),
    /// A treasure claimable only by a lone returning player.
    Treasure(u32),
}

impl Card {
    /// The event-log tag this card produces when drawn.
    pub fn tag(&self) -> EventTag {
        match *self {
            Card::Gold(v) => EventTag::Gold(v),
            Card::Danger(k) => EventTag::Danger(k),
            Card::Treasure(v) => EventTag::Treasure(v),
        }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.tag().fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_tag_matches_variant() {
        assert_eq!(Card::Gold(9).tag(), EventTag::Gold(9));
        assert_eq!(
            Card::Danger(DangerKind::Spider).tag(),
            EventTag::Danger(DangerKind::Spider)
        );
        assert_eq!(Card::Treasure(12).tag(), EventTag::Treasure(12));
    }

    #[test]
    fn test_card_display_uses_tag_form() {
        assert_eq!(Card::Danger(DangerKind::Fire).to_string(), "danger:fire");
    }
}
