//! The authoritative game state and the action-cycle resolver.

use std::collections::{HashMap, HashSet};

use eldorado_deck::{Card, RoundDeck};
use eldorado_protocol::{DangerKind, EventTag, PlayerId, PlayerView, Posture, RankingEntry};

use crate::{GameConfig, GameError, Outcome, RoundTransition, TreasureClaim};

/// A player's per-cycle choice.
///
/// `Continue` can be overwritten until the cycle resolves; `Return` locks
/// the player's posture for the rest of the round the moment it is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Continue,
    Return,
}

/// Everything the game tracks about one player, bundled so the fields
/// can't drift apart.
#[derive(Debug, Clone)]
struct PlayerRoundState {
    /// Unsecured gold, at risk until the player returns.
    gold: u32,
    /// Banked gold, carried across rounds.
    secured_gold: u32,
    /// Treasure values permanently won. Append-only.
    treasures: Vec<u32>,
    /// This cycle's choice, if submitted.
    action: Option<Action>,
    posture: Posture,
}

impl PlayerRoundState {
    fn new() -> Self {
        Self {
            gold: 0,
            secured_gold: 0,
            treasures: Vec::new(),
            action: None,
            posture: Posture::Exploring,
        }
    }
}

/// The authoritative state of one game.
///
/// Owned exclusively by its room; all mutation happens through the room's
/// actor task, so no interior locking is needed here.
#[derive(Debug, Clone)]
pub struct GameState {
    config: GameConfig,
    /// Join order. Drives iteration order and ranking tie-breaks.
    players: Vec<PlayerId>,
    roster: HashMap<PlayerId, PlayerRoundState>,
    /// 1-indexed; advances only through [`GameState::advance_round`].
    current_round: u32,
    /// Cards drawn this round; capped by `config.action_cap`.
    actions_in_round: u32,
    dangers_encountered: HashSet<DangerKind>,
    event_log: Vec<EventTag>,
    last_outcome: Option<Outcome>,
    deck: RoundDeck,
    /// An unclaimed treasure sitting in the open round.
    treasure_in_play: Option<u32>,
    /// Set when a terminal outcome settles the round. Cleared only by the
    /// explicit round advance.
    round_over: bool,
}

impl GameState {
    /// Creates the state for a starting game: round 1, fresh deck, every
    /// player exploring with empty pockets.
    pub fn new(config: &GameConfig, players: &[PlayerId]) -> Self {
        let roster = players
            .iter()
            .map(|p| (*p, PlayerRoundState::new()))
            .collect();
        let deck = RoundDeck::build(1, &mut rand::rng());
        Self {
            config: config.clone(),
            players: players.to_vec(),
            roster,
            current_round: 1,
            actions_in_round: 0,
            dangers_encountered: HashSet::new(),
            event_log: Vec::new(),
            last_outcome: None,
            deck,
            treasure_in_play: None,
            round_over: false,
        }
    }

    /// Replaces the current round's deck with a prepared one.
    ///
    /// Used by embedders and tests that need scripted draws; a normal game
    /// never calls this.
    pub fn load_deck(&mut self, deck: RoundDeck) {
        self.deck = deck;
    }

    // -----------------------------------------------------------------
    // Action collection
    // -----------------------------------------------------------------

    /// Records a player's choice for the current cycle.
    ///
    /// `Return` is permanent for the round; `Continue` may be overwritten
    /// until the cycle resolves. No state changes on error.
    pub fn set_action(&mut self, player: PlayerId, action: Action) -> Result<(), GameError> {
        let state = self
            .roster
            .get_mut(&player)
            .ok_or(GameError::UnknownPlayer(player))?;
        if !state.posture.is_exploring() {
            return Err(GameError::AlreadyReturned(player));
        }
        if self.round_over {
            return Err(GameError::RoundClosed);
        }

        state.action = Some(action);
        if action == Action::Return {
            state.posture = Posture::Returned;
        }
        tracing::debug!(%player, ?action, "action recorded");
        Ok(())
    }

    /// Whether every player still exploring has chosen. Vacuously true
    /// once everyone has returned.
    pub fn all_players_acted(&self) -> bool {
        self.players.iter().all(|p| {
            let state = &self.roster[p];
            !state.posture.is_exploring() || state.action.is_some()
        })
    }

    // -----------------------------------------------------------------
    // Cycle resolution
    // -----------------------------------------------------------------

    /// Resolves one action cycle: defaults idle players to `Continue`,
    /// checks the terminal conditions, draws a card, and applies it.
    ///
    /// Fails with [`GameError::RoundClosed`] once a terminal outcome has
    /// settled the round — a stale trigger can never double-settle.
    pub fn resolve_cycle(&mut self) -> Result<Outcome, GameError> {
        if self.round_over {
            return Err(GameError::RoundClosed);
        }

        // Idle default: the deadline ran out on these players.
        for state in self.roster.values_mut() {
            if state.posture.is_exploring() && state.action.is_none() {
                state.action = Some(Action::Continue);
            }
        }

        self.actions_in_round += 1;

        // Terminal check: everyone is headed back to camp. Settles without
        // drawing a card.
        if self.players.iter().all(|p| !self.roster[p].posture.is_exploring()) {
            let claimed = self.settle_returners();
            self.close_round();
            let outcome = Outcome::AllReturned { claimed };
            self.last_outcome = Some(outcome.clone());
            tracing::info!(round = self.current_round, "all players returned");
            return Ok(outcome);
        }

        // Safety valve: the round has gone on long enough. Everyone still
        // out is assumed to make it back safely.
        if self.actions_in_round >= self.config.action_cap {
            let _ = self.settle_returners();
            for state in self.roster.values_mut() {
                if state.posture.is_exploring() {
                    state.secured_gold += state.gold;
                    state.gold = 0;
                }
            }
            self.close_round();
            let outcome = Outcome::ActionCapReached;
            self.last_outcome = Some(outcome.clone());
            tracing::info!(
                round = self.current_round,
                cap = self.config.action_cap,
                "action cap reached"
            );
            return Ok(outcome);
        }

        let card = self.draw_card()?;
        self.event_log.push(card.tag());

        let outcome = match card {
            Card::Gold(value) => self.apply_gold(value),
            Card::Danger(kind) => self.apply_danger(kind),
            Card::Treasure(value) => self.apply_treasure(value),
        };

        self.last_outcome = Some(outcome.clone());
        tracing::debug!(
            round = self.current_round,
            cycle = self.actions_in_round,
            ?outcome,
            "cycle resolved"
        );
        Ok(outcome)
    }

    fn draw_card(&mut self) -> Result<Card, GameError> {
        match self.deck.draw() {
            Ok(card) => Ok(card),
            Err(_) => {
                // Fallback only: the action cap normally ends the round
                // before a 30-card deck runs dry.
                tracing::warn!(round = self.current_round, "deck exhausted, rebuilding");
                self.deck = RoundDeck::build(self.current_round, &mut rand::rng());
                Ok(self.deck.draw()?)
            }
        }
    }

    fn apply_gold(&mut self, value: u32) -> Outcome {
        let is_continuing = |state: &PlayerRoundState| {
            state.posture.is_exploring() && state.action == Some(Action::Continue)
        };
        let continuing = self.roster.values().filter(|s| is_continuing(s)).count() as u32;

        // Floor split; the remainder stays on the temple floor.
        let share = if continuing == 0 { 0 } else { value / continuing };
        for state in self.roster.values_mut() {
            if is_continuing(state) {
                state.gold += share;
            }
        }

        let claimed = self.settle_returners();
        self.finish_open_cycle();
        Outcome::Gold {
            value,
            share,
            claimed,
        }
    }

    fn apply_danger(&mut self, kind: DangerKind) -> Outcome {
        let is_duplicate = !self.dangers_encountered.insert(kind);
        let claimed = self.settle_returners();

        if is_duplicate {
            // Everyone still exploring loses their unsecured gold and the
            // round is over. Players who returned this very cycle got out
            // in time and were settled above.
            for state in self.roster.values_mut() {
                if state.posture.is_exploring() {
                    state.gold = 0;
                }
            }
            self.close_round();
            tracing::info!(round = self.current_round, %kind, "repeated danger ended the round");
        } else {
            self.finish_open_cycle();
        }

        Outcome::Danger {
            kind,
            is_duplicate,
            claimed,
        }
    }

    fn apply_treasure(&mut self, value: u32) -> Outcome {
        self.treasure_in_play = Some(value);
        let claimed = self.settle_returners();
        self.finish_open_cycle();
        Outcome::Treasure { value, claimed }
    }

    /// Settles every player who chose `Return` this cycle: awards the
    /// in-play treasure if exactly one of them is leaving, then banks
    /// their unsecured gold.
    fn settle_returners(&mut self) -> Option<TreasureClaim> {
        let mut returners = self
            .roster
            .iter()
            .filter(|(_, s)| s.action == Some(Action::Return))
            .map(|(p, _)| *p);
        let lone = match (returners.next(), returners.next()) {
            (Some(only), None) => Some(only),
            _ => None,
        };

        let mut claimed = None;
        if let Some(lucky) = lone {
            if let Some(value) = self.treasure_in_play.take() {
                if let Some(state) = self.roster.get_mut(&lucky) {
                    state.gold += value;
                    state.treasures.push(value);
                    claimed = Some(TreasureClaim {
                        player: lucky,
                        value,
                    });
                    tracing::info!(player = %lucky, value, "lone returner claimed the treasure");
                }
            }
        }

        for state in self.roster.values_mut() {
            if state.action == Some(Action::Return) {
                state.secured_gold += state.gold;
                state.gold = 0;
                state.action = None;
            }
        }
        claimed
    }

    /// Clears the cycle's choices so the next card waits on fresh input.
    fn finish_open_cycle(&mut self) {
        for state in self.roster.values_mut() {
            if state.posture.is_exploring() {
                state.action = None;
            }
        }
    }

    /// Parks the round: no actions, no cycles, until the explicit advance.
    fn close_round(&mut self) {
        for state in self.roster.values_mut() {
            state.action = None;
        }
        self.round_over = true;
    }

    // -----------------------------------------------------------------
    // Round and game transitions
    // -----------------------------------------------------------------

    /// Advances to the next round, or ends the game after the last one.
    ///
    /// Only ever called from an explicit next-round trigger; terminal
    /// outcomes park the round rather than advancing it.
    pub fn advance_round(&mut self) -> RoundTransition {
        self.current_round += 1;
        if self.current_round > self.config.max_rounds {
            tracing::info!("all rounds played, game over");
            return RoundTransition::GameOver {
                ranking: self.final_ranking(),
            };
        }

        self.start_round();
        RoundTransition::Next {
            round: self.current_round,
        }
    }

    /// Resets round-scoped state and deals a fresh deck. An unclaimed
    /// treasure from the previous round is forfeited here.
    fn start_round(&mut self) {
        self.actions_in_round = 0;
        self.dangers_encountered.clear();
        self.event_log.clear();
        self.last_outcome = None;
        self.treasure_in_play = None;
        self.round_over = false;
        for state in self.roster.values_mut() {
            state.action = None;
            state.posture = Posture::Exploring;
        }
        self.deck = RoundDeck::build(self.current_round, &mut rand::rng());
        tracing::info!(round = self.current_round, "round started");
    }

    /// The final scoreboard: `secured_gold + Σ treasures` descending,
    /// ties broken by join order (stable sort).
    pub fn final_ranking(&self) -> Vec<RankingEntry> {
        let mut rows: Vec<RankingEntry> = self
            .players
            .iter()
            .map(|p| {
                let state = &self.roster[p];
                let treasure_total: u32 = state.treasures.iter().sum();
                RankingEntry {
                    player: *p,
                    secured_gold: state.secured_gold,
                    treasure_total,
                    score: state.secured_gold + treasure_total,
                }
            })
            .collect();
        rows.sort_by_key(|row| std::cmp::Reverse(row.score));
        rows
    }

    /// Drops a player from the game (they left the room mid-game).
    /// Returns `false` if they weren't part of it.
    pub fn remove_player(&mut self, player: PlayerId) -> bool {
        if self.roster.remove(&player).is_none() {
            return false;
        }
        self.players.retain(|p| *p != player);
        true
    }

    // -----------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------

    pub fn current_round(&self) -> u32 {
        self.current_round
    }

    pub fn max_rounds(&self) -> u32 {
        self.config.max_rounds
    }

    pub fn actions_in_round(&self) -> u32 {
        self.actions_in_round
    }

    pub fn round_over(&self) -> bool {
        self.round_over
    }

    pub fn event_log(&self) -> &[EventTag] {
        &self.event_log
    }

    pub fn last_outcome(&self) -> Option<&Outcome> {
        self.last_outcome.as_ref()
    }

    pub fn treasure_in_play(&self) -> Option<u32> {
        self.treasure_in_play
    }

    pub fn contains_player(&self, player: PlayerId) -> bool {
        self.roster.contains_key(&player)
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    /// A player's unsecured gold. `None` for unknown players.
    pub fn gold(&self, player: PlayerId) -> Option<u32> {
        self.roster.get(&player).map(|s| s.gold)
    }

    /// A player's banked gold.
    pub fn secured_gold(&self, player: PlayerId) -> Option<u32> {
        self.roster.get(&player).map(|s| s.secured_gold)
    }

    /// Treasure values a player has carried out, in claim order.
    pub fn treasures(&self, player: PlayerId) -> Option<&[u32]> {
        self.roster.get(&player).map(|s| s.treasures.as_slice())
    }

    pub fn posture(&self, player: PlayerId) -> Option<Posture> {
        self.roster.get(&player).map(|s| s.posture)
    }

    /// Snapshot rows in join order, for the presentation boundary.
    pub fn players_view(&self) -> Vec<PlayerView> {
        self.players
            .iter()
            .map(|p| {
                let state = &self.roster[p];
                PlayerView {
                    player: *p,
                    gold: state.gold,
                    secured_gold: state.secured_gold,
                    treasures: state.treasures.clone(),
                    posture: state.posture,
                    has_chosen: state.action.is_some(),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pid(id: u64) -> PlayerId {
        PlayerId(id)
    }

    fn two_player_game() -> GameState {
        GameState::new(&GameConfig::default(), &[pid(1), pid(2)])
    }

    #[test]
    fn test_new_game_starts_at_round_one() {
        let game = two_player_game();
        assert_eq!(game.current_round(), 1);
        assert_eq!(game.actions_in_round(), 0);
        assert!(!game.round_over());
        assert_eq!(game.player_count(), 2);
        assert_eq!(game.gold(pid(1)), Some(0));
        assert_eq!(game.secured_gold(pid(1)), Some(0));
    }

    #[test]
    fn test_set_action_unknown_player() {
        let mut game = two_player_game();
        let err = game.set_action(pid(99), Action::Continue).unwrap_err();
        assert!(matches!(err, GameError::UnknownPlayer(p) if p == pid(99)));
    }

    #[test]
    fn test_continue_can_be_overwritten_by_return() {
        let mut game = two_player_game();
        game.set_action(pid(1), Action::Continue).unwrap();
        game.set_action(pid(1), Action::Return).unwrap();
        assert_eq!(game.posture(pid(1)), Some(Posture::Returned));
    }

    #[test]
    fn test_return_locks_posture_immediately() {
        let mut game = two_player_game();
        game.set_action(pid(1), Action::Return).unwrap();
        let err = game.set_action(pid(1), Action::Continue).unwrap_err();
        assert!(matches!(err, GameError::AlreadyReturned(p) if p == pid(1)));
        // And the lock holds for repeated attempts.
        let err = game.set_action(pid(1), Action::Return).unwrap_err();
        assert!(matches!(err, GameError::AlreadyReturned(_)));
    }

    #[test]
    fn test_all_players_acted() {
        let mut game = two_player_game();
        assert!(!game.all_players_acted());
        game.set_action(pid(1), Action::Continue).unwrap();
        assert!(!game.all_players_acted());
        game.set_action(pid(2), Action::Return).unwrap();
        assert!(game.all_players_acted());
    }

    #[test]
    fn test_all_players_acted_vacuous_when_everyone_returned() {
        let mut game = two_player_game();
        game.set_action(pid(1), Action::Return).unwrap();
        game.set_action(pid(2), Action::Return).unwrap();
        assert!(game.all_players_acted());
    }

    #[test]
    fn test_gold_split_floor_division() {
        let mut game = GameState::new(&GameConfig::default(), &[pid(1), pid(2), pid(3)]);
        game.load_deck(RoundDeck::from_cards(vec![Card::Gold(10)]));

        for p in [pid(1), pid(2), pid(3)] {
            game.set_action(p, Action::Continue).unwrap();
        }
        let outcome = game.resolve_cycle().unwrap();

        assert_eq!(
            outcome,
            Outcome::Gold {
                value: 10,
                share: 3,
                claimed: None
            }
        );
        // floor(10/3) = 3 each; total distributed 9 <= 10.
        for p in [pid(1), pid(2), pid(3)] {
            assert_eq!(game.gold(p), Some(3));
        }
    }

    #[test]
    fn test_no_continuing_players_resolves_as_all_returned() {
        // A cycle where everyone heads back never reaches the draw: the
        // all-returned terminal settles first and no card is consumed.
        let mut game = two_player_game();
        game.load_deck(RoundDeck::from_cards(vec![Card::Gold(9)]));
        game.set_action(pid(1), Action::Return).unwrap();
        game.set_action(pid(2), Action::Return).unwrap();
        let outcome = game.resolve_cycle().unwrap();
        assert!(matches!(outcome, Outcome::AllReturned { .. }));
        assert!(game.event_log().is_empty());
    }

    #[test]
    fn test_returning_player_settles_immediately_on_gold() {
        let mut game = two_player_game();
        game.load_deck(RoundDeck::from_cards(vec![Card::Gold(8), Card::Gold(10)]));

        // Cycle 1: both continue, 5 each.
        game.set_action(pid(1), Action::Continue).unwrap();
        game.set_action(pid(2), Action::Continue).unwrap();
        game.resolve_cycle().unwrap();
        assert_eq!(game.gold(pid(1)), Some(5));

        // Cycle 2: player 1 returns and banks, player 2 keeps the risk.
        game.set_action(pid(1), Action::Return).unwrap();
        game.set_action(pid(2), Action::Continue).unwrap();
        game.resolve_cycle().unwrap();

        assert_eq!(game.gold(pid(1)), Some(0));
        assert_eq!(game.secured_gold(pid(1)), Some(5));
        assert_eq!(game.gold(pid(2)), Some(5 + 8));
        assert_eq!(game.secured_gold(pid(2)), Some(0));
    }

    #[test]
    fn test_idle_players_default_to_continue() {
        let mut game = two_player_game();
        game.load_deck(RoundDeck::from_cards(vec![Card::Gold(10)]));
        // Nobody chose; the deadline fired. Both default to Continue.
        let outcome = game.resolve_cycle().unwrap();
        assert_eq!(
            outcome,
            Outcome::Gold {
                value: 10,
                share: 5,
                claimed: None
            }
        );
        assert_eq!(game.gold(pid(1)), Some(5));
        assert_eq!(game.gold(pid(2)), Some(5));
    }

    #[test]
    fn test_first_danger_does_not_end_round() {
        let mut game = two_player_game();
        game.load_deck(RoundDeck::from_cards(vec![Card::Danger(DangerKind::Fire)]));
        let outcome = game.resolve_cycle().unwrap();
        assert_eq!(
            outcome,
            Outcome::Danger {
                kind: DangerKind::Fire,
                is_duplicate: false,
                claimed: None
            }
        );
        assert!(!game.round_over());
    }

    #[test]
    fn test_repeated_danger_wipes_unsecured_gold_and_ends_round() {
        let mut game = two_player_game();
        // Drawn back-to-front: gold 9, fire, fire.
        game.load_deck(RoundDeck::from_cards(vec![
            Card::Danger(DangerKind::Fire),
            Card::Danger(DangerKind::Fire),
            Card::Gold(9),
        ]));

        game.resolve_cycle().unwrap(); // gold: 4 each
        assert_eq!(game.gold(pid(1)), Some(4));
        game.resolve_cycle().unwrap(); // first fire
        assert_eq!(game.gold(pid(1)), Some(4));

        let outcome = game.resolve_cycle().unwrap(); // second fire
        assert_eq!(
            outcome,
            Outcome::Danger {
                kind: DangerKind::Fire,
                is_duplicate: true,
                claimed: None
            }
        );
        assert!(outcome.ends_round());
        assert_eq!(game.gold(pid(1)), Some(0));
        assert_eq!(game.gold(pid(2)), Some(0));
        assert_eq!(game.secured_gold(pid(1)), Some(0));
        // The round parked, the game did not move on by itself.
        assert_eq!(game.current_round(), 1);
        assert!(game.round_over());
    }

    #[test]
    fn test_repeated_danger_spares_player_returning_that_cycle() {
        let mut game = two_player_game();
        game.load_deck(RoundDeck::from_cards(vec![
            Card::Danger(DangerKind::Snake),
            Card::Danger(DangerKind::Snake),
            Card::Gold(10),
        ]));

        game.resolve_cycle().unwrap(); // 5 gold each
        game.resolve_cycle().unwrap(); // first snake

        // Player 1 bails exactly as the second snake hits.
        game.set_action(pid(1), Action::Return).unwrap();
        game.set_action(pid(2), Action::Continue).unwrap();
        let outcome = game.resolve_cycle().unwrap();

        assert!(matches!(
            outcome,
            Outcome::Danger {
                is_duplicate: true,
                ..
            }
        ));
        assert_eq!(game.secured_gold(pid(1)), Some(5));
        assert_eq!(game.gold(pid(2)), Some(0));
        assert_eq!(game.secured_gold(pid(2)), Some(0));
    }

    #[test]
    fn test_treasure_claimed_by_lone_returner() {
        let mut game = two_player_game();
        game.load_deck(RoundDeck::from_cards(vec![Card::Treasure(8)]));

        game.set_action(pid(1), Action::Return).unwrap();
        game.set_action(pid(2), Action::Continue).unwrap();
        let outcome = game.resolve_cycle().unwrap();

        let claim = TreasureClaim {
            player: pid(1),
            value: 8,
        };
        assert_eq!(
            outcome,
            Outcome::Treasure {
                value: 8,
                claimed: Some(claim)
            }
        );
        assert_eq!(game.treasures(pid(1)), Some(&[8][..]));
        // Claimed treasure flows through gold into the bank on return.
        assert_eq!(game.secured_gold(pid(1)), Some(8));
        assert_eq!(game.treasure_in_play(), None);
        assert_eq!(game.treasures(pid(2)), Some(&[][..]));
    }

    #[test]
    fn test_treasure_stays_in_play_when_no_one_returns() {
        let mut game = two_player_game();
        game.load_deck(RoundDeck::from_cards(vec![Card::Treasure(8)]));
        let outcome = game.resolve_cycle().unwrap();
        assert_eq!(
            outcome,
            Outcome::Treasure {
                value: 8,
                claimed: None
            }
        );
        assert_eq!(game.treasure_in_play(), Some(8));
        assert_eq!(game.treasures(pid(1)), Some(&[][..]));
        assert_eq!(game.treasures(pid(2)), Some(&[][..]));
    }

    #[test]
    fn test_treasure_stays_in_play_when_both_return() {
        let mut game = two_player_game();
        game.load_deck(RoundDeck::from_cards(vec![Card::Treasure(8)]));
        game.set_action(pid(1), Action::Return).unwrap();
        game.set_action(pid(2), Action::Return).unwrap();
        // Everyone returned: resolves as AllReturned, two claimants, no award.
        let outcome = game.resolve_cycle().unwrap();
        assert_eq!(outcome, Outcome::AllReturned { claimed: None });
        assert_eq!(game.treasures(pid(1)), Some(&[][..]));
        assert_eq!(game.treasures(pid(2)), Some(&[][..]));
    }

    #[test]
    fn test_lingering_treasure_claimed_on_later_cycle() {
        let mut game = two_player_game();
        game.load_deck(RoundDeck::from_cards(vec![
            Card::Gold(10),
            Card::Treasure(12),
        ]));

        // Treasure drawn, nobody returns: stays in play.
        game.resolve_cycle().unwrap();
        assert_eq!(game.treasure_in_play(), Some(12));

        // Next cycle player 2 returns alone and scoops it up.
        game.set_action(pid(1), Action::Continue).unwrap();
        game.set_action(pid(2), Action::Return).unwrap();
        let outcome = game.resolve_cycle().unwrap();
        assert_eq!(
            outcome.claimed(),
            Some(TreasureClaim {
                player: pid(2),
                value: 12
            })
        );
        assert_eq!(game.treasures(pid(2)), Some(&[12][..]));
        assert_eq!(game.treasure_in_play(), None);
    }

    #[test]
    fn test_solo_player_claims_treasure_on_return() {
        let mut game = GameState::new(&GameConfig::default(), &[pid(7)]);
        game.load_deck(RoundDeck::from_cards(vec![Card::Treasure(12)]));

        game.set_action(pid(7), Action::Return).unwrap();
        let outcome = game.resolve_cycle().unwrap();

        // Sole player returning is the lone claimant, even at the
        // all-returned terminal.
        assert_eq!(
            outcome,
            Outcome::AllReturned {
                claimed: None // treasure card never drawn: returned before the draw
            }
        );
        assert_eq!(game.treasures(pid(7)), Some(&[][..]));
    }

    #[test]
    fn test_solo_player_claims_lingering_treasure_at_all_returned() {
        let mut game = GameState::new(&GameConfig::default(), &[pid(7)]);
        game.load_deck(RoundDeck::from_cards(vec![Card::Treasure(12)]));

        // Cycle 1: solo player keeps going, treasure enters play unclaimed.
        game.set_action(pid(7), Action::Continue).unwrap();
        game.resolve_cycle().unwrap();
        assert_eq!(game.treasure_in_play(), Some(12));

        // Cycle 2: they return; lone claimant at the all-returned settle.
        game.set_action(pid(7), Action::Return).unwrap();
        let outcome = game.resolve_cycle().unwrap();
        assert_eq!(
            outcome,
            Outcome::AllReturned {
                claimed: Some(TreasureClaim {
                    player: pid(7),
                    value: 12
                })
            }
        );
        assert_eq!(game.treasures(pid(7)), Some(&[12][..]));
        assert_eq!(game.secured_gold(pid(7)), Some(12));
        assert_eq!(game.treasure_in_play(), None);
    }

    #[test]
    fn test_all_returned_settles_gold_without_advancing_round() {
        let mut game = two_player_game();
        game.load_deck(RoundDeck::from_cards(vec![Card::Gold(10)]));
        game.resolve_cycle().unwrap(); // 5 each

        game.set_action(pid(1), Action::Return).unwrap();
        game.set_action(pid(2), Action::Return).unwrap();
        let outcome = game.resolve_cycle().unwrap();

        assert_eq!(outcome, Outcome::AllReturned { claimed: None });
        assert_eq!(game.secured_gold(pid(1)), Some(5));
        assert_eq!(game.secured_gold(pid(2)), Some(5));
        assert_eq!(game.gold(pid(1)), Some(0));
        assert_eq!(game.current_round(), 1);
        assert!(game.round_over());
    }

    #[test]
    fn test_resolve_after_settlement_fails_without_double_settle() {
        let mut game = two_player_game();
        game.load_deck(RoundDeck::from_cards(vec![Card::Gold(10)]));
        game.resolve_cycle().unwrap();
        game.set_action(pid(1), Action::Return).unwrap();
        game.set_action(pid(2), Action::Return).unwrap();
        game.resolve_cycle().unwrap();

        let before = game.secured_gold(pid(1));
        let err = game.resolve_cycle().unwrap_err();
        assert!(matches!(err, GameError::RoundClosed));
        assert_eq!(game.secured_gold(pid(1)), before);
    }

    #[test]
    fn test_action_cap_secures_gold_and_parks_round() {
        let mut game = two_player_game();
        // All gold so nothing else can end the round first.
        game.load_deck(RoundDeck::from_cards(vec![Card::Gold(10); 40]));

        for _ in 0..29 {
            game.resolve_cycle().unwrap();
        }
        assert!(!game.round_over());
        let banked_so_far = game.gold(pid(1)).unwrap();

        // Cycle 30 trips the cap before drawing a card.
        let outcome = game.resolve_cycle().unwrap();
        assert_eq!(outcome, Outcome::ActionCapReached);
        assert_eq!(game.gold(pid(1)), Some(0));
        assert_eq!(game.secured_gold(pid(1)), Some(banked_so_far));
        assert_eq!(game.current_round(), 1);
        assert!(game.round_over());
    }

    #[test]
    fn test_advance_round_resets_round_scoped_state() {
        let mut game = two_player_game();
        game.load_deck(RoundDeck::from_cards(vec![
            Card::Danger(DangerKind::Mummy),
            Card::Danger(DangerKind::Mummy),
        ]));
        game.resolve_cycle().unwrap();
        game.resolve_cycle().unwrap();
        assert!(game.round_over());
        assert!(!game.event_log().is_empty());

        let transition = game.advance_round();
        assert_eq!(transition, RoundTransition::Next { round: 2 });
        assert_eq!(game.current_round(), 2);
        assert_eq!(game.actions_in_round(), 0);
        assert!(game.event_log().is_empty());
        assert!(!game.round_over());
        assert_eq!(game.posture(pid(1)), Some(Posture::Exploring));
        assert_eq!(game.last_outcome(), None);
    }

    #[test]
    fn test_unclaimed_treasure_forfeited_on_round_start() {
        let mut game = two_player_game();
        game.load_deck(RoundDeck::from_cards(vec![Card::Treasure(8)]));
        game.resolve_cycle().unwrap();
        assert_eq!(game.treasure_in_play(), Some(8));

        game.set_action(pid(1), Action::Return).unwrap();
        game.set_action(pid(2), Action::Return).unwrap();
        // Two claimants — no award; the treasure is still in play when
        // the round parks, and gone once the next one starts.
        game.resolve_cycle().unwrap();
        game.advance_round();
        assert_eq!(game.treasure_in_play(), None);
    }

    #[test]
    fn test_game_over_after_max_rounds() {
        let mut config = GameConfig::default();
        config.max_rounds = 1;
        let mut game = GameState::new(&config, &[pid(1), pid(2)]);
        game.load_deck(RoundDeck::from_cards(vec![Card::Gold(10)]));
        game.resolve_cycle().unwrap();
        game.set_action(pid(1), Action::Return).unwrap();
        game.set_action(pid(2), Action::Return).unwrap();
        game.resolve_cycle().unwrap();

        match game.advance_round() {
            RoundTransition::GameOver { ranking } => {
                assert_eq!(ranking.len(), 2);
                assert_eq!(ranking[0].score, 5);
            }
            other => panic!("expected GameOver, got {other:?}"),
        }
    }

    #[test]
    fn test_final_ranking_orders_by_score_then_join_order() {
        let mut game = GameState::new(&GameConfig::default(), &[pid(1), pid(2), pid(3)]);
        game.roster.get_mut(&pid(1)).unwrap().secured_gold = 10;
        game.roster.get_mut(&pid(2)).unwrap().secured_gold = 4;
        game.roster.get_mut(&pid(2)).unwrap().treasures = vec![5, 7];
        game.roster.get_mut(&pid(3)).unwrap().secured_gold = 16;

        let ranking = game.final_ranking();
        // p2 and p3 both score 16; p2 joined earlier and keeps the lead.
        assert_eq!(ranking[0].player, pid(2));
        assert_eq!(ranking[0].score, 16);
        assert_eq!(ranking[1].player, pid(3));
        assert_eq!(ranking[1].score, 16);
        assert_eq!(ranking[2].player, pid(1));
        assert_eq!(ranking[2].score, 10);
    }

    #[test]
    fn test_balances_never_go_negative() {
        // u32 makes negatives unrepresentable; this exercises the wipe
        // path to show the zeroing is a plain reset, not a subtraction.
        let mut game = two_player_game();
        game.load_deck(RoundDeck::from_cards(vec![
            Card::Danger(DangerKind::Rockfall),
            Card::Danger(DangerKind::Rockfall),
        ]));
        game.resolve_cycle().unwrap();
        game.resolve_cycle().unwrap();
        assert_eq!(game.gold(pid(1)), Some(0));
        assert_eq!(game.secured_gold(pid(1)), Some(0));
    }

    #[test]
    fn test_remove_player_drops_state() {
        let mut game = two_player_game();
        assert!(game.remove_player(pid(2)));
        assert!(!game.contains_player(pid(2)));
        assert_eq!(game.player_count(), 1);
        assert!(!game.remove_player(pid(2)));
    }

    #[test]
    fn test_deck_rebuild_when_exhausted() {
        let mut game = two_player_game();
        game.load_deck(RoundDeck::from_cards(Vec::new()));
        // Empty deck gets rebuilt and a card is still drawn.
        let outcome = game.resolve_cycle().unwrap();
        assert!(!matches!(outcome, Outcome::AllReturned { .. }));
        assert_eq!(game.event_log().len(), 1);
    }
}
