//! Game configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Tunables for one game. Injected at room creation; the engine itself
/// carries no ambient globals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    /// Whether rooms arm a per-cycle deadline. With the timer off, cycles
    /// resolve only once every exploring player has chosen.
    pub timer_enabled: bool,

    /// How long players get to choose before idle defaults kick in.
    pub round_timeout: Duration,

    /// Rounds per game.
    pub max_rounds: u32,

    /// Hard cap on cards drawn per round. Fires before a well-formed deck
    /// can run dry (deck size equals the cap).
    pub action_cap: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            timer_enabled: true,
            round_timeout: Duration::from_secs(20),
            max_rounds: 5,
            action_cap: 30,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GameConfig::default();
        assert!(config.timer_enabled);
        assert_eq!(config.round_timeout, Duration::from_secs(20));
        assert_eq!(config.max_rounds, 5);
        assert_eq!(config.action_cap, 30);
    }
}
