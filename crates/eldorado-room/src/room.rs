//! Room actor: an isolated Tokio task that owns one game.
//!
//! Each room runs in its own task, communicating with the outside world
//! through an mpsc channel. Commands are processed strictly in arrival
//! order, so all mutation of a room's game state is serialized without
//! locks; the turn timer lives inside the actor's `select!` loop and is
//! the only asynchronous wake-up.

use std::sync::Arc;

use eldorado_game::{Action, GameConfig, GameError, GameState, RoundTransition};
use eldorado_protocol::{PlayerId, PlayerView, Posture, RoomId};
use eldorado_timer::{TimerConfig, TimerEvent, TimerEventKind, TurnTimer};
use tokio::sync::{mpsc, oneshot};

use crate::{Presenter, RoomConfig, RoomError, RoomSnapshot, RoomStatus};

/// What an explicit round advance produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvanceReport {
    /// A fresh round began.
    NextRound(u32),
    /// The final scoreboard went out; the room is `Finished` and should
    /// be disbanded once the grace period passes.
    GameOver,
}

/// Commands sent to a room actor through its channel. The `oneshot`
/// senders are reply channels.
pub(crate) enum RoomCommand {
    Join {
        player: PlayerId,
        reply: oneshot::Sender<Result<(), RoomError>>,
    },
    Leave {
        player: PlayerId,
        reply: oneshot::Sender<Result<(), RoomError>>,
    },
    Start {
        requester: PlayerId,
        reply: oneshot::Sender<Result<(), RoomError>>,
    },
    Action {
        player: PlayerId,
        action: Action,
        reply: oneshot::Sender<Result<(), RoomError>>,
    },
    AdvanceRound {
        requester: PlayerId,
        reply: oneshot::Sender<Result<AdvanceReport, RoomError>>,
    },
    Snapshot {
        reply: oneshot::Sender<RoomSnapshot>,
    },
    Shutdown,
}

/// Handle to a running room actor. Cheap to clone — it's just an
/// `mpsc::Sender` wrapper. The `RoomManager` holds one per room.
#[derive(Clone)]
pub struct RoomHandle {
    room_id: RoomId,
    sender: mpsc::Sender<RoomCommand>,
}

impl RoomHandle {
    pub fn room_id(&self) -> RoomId {
        self.room_id
    }

    pub async fn join(&self, player: PlayerId) -> Result<(), RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(RoomCommand::Join {
            player,
            reply: reply_tx,
        })
        .await?;
        reply_rx
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id))?
    }

    pub async fn leave(&self, player: PlayerId) -> Result<(), RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(RoomCommand::Leave {
            player,
            reply: reply_tx,
        })
        .await?;
        reply_rx
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id))?
    }

    pub async fn start(&self, requester: PlayerId) -> Result<(), RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(RoomCommand::Start {
            requester,
            reply: reply_tx,
        })
        .await?;
        reply_rx
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id))?
    }

    pub async fn submit_action(&self, player: PlayerId, action: Action) -> Result<(), RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(RoomCommand::Action {
            player,
            action,
            reply: reply_tx,
        })
        .await?;
        reply_rx
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id))?
    }

    pub async fn advance_round(&self, requester: PlayerId) -> Result<AdvanceReport, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(RoomCommand::AdvanceRound {
            requester,
            reply: reply_tx,
        })
        .await?;
        reply_rx
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id))?
    }

    pub async fn snapshot(&self) -> Result<RoomSnapshot, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(RoomCommand::Snapshot { reply: reply_tx }).await?;
        reply_rx
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id))
    }

    /// Tells the room to shut down.
    pub async fn shutdown(&self) -> Result<(), RoomError> {
        self.send(RoomCommand::Shutdown).await
    }

    async fn send(&self, cmd: RoomCommand) -> Result<(), RoomError> {
        self.sender
            .send(cmd)
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id))
    }
}

/// The internal room actor state. Runs inside a Tokio task.
struct RoomActor<P: Presenter> {
    room_id: RoomId,
    host: PlayerId,
    status: RoomStatus,
    config: RoomConfig,
    game_config: GameConfig,
    /// Join order; the host is always first.
    players: Vec<PlayerId>,
    game: Option<GameState>,
    timer: TurnTimer,
    presenter: Arc<P>,
    receiver: mpsc::Receiver<RoomCommand>,
}

impl<P: Presenter> RoomActor<P> {
    /// Runs the actor loop, processing commands and timer events until
    /// shutdown.
    async fn run(mut self) {
        tracing::info!(room_id = %self.room_id, host = %self.host, "room actor started");

        loop {
            tokio::select! {
                cmd = self.receiver.recv() => {
                    match cmd {
                        Some(RoomCommand::Shutdown) | None => break,
                        Some(cmd) => self.handle_command(cmd),
                    }
                }
                event = self.timer.wait() => {
                    self.handle_timer(event);
                }
            }
        }

        tracing::info!(room_id = %self.room_id, "room actor stopped");
    }

    fn handle_command(&mut self, cmd: RoomCommand) {
        match cmd {
            RoomCommand::Join { player, reply } => {
                let _ = reply.send(self.handle_join(player));
            }
            RoomCommand::Leave { player, reply } => {
                let _ = reply.send(self.handle_leave(player));
            }
            RoomCommand::Start { requester, reply } => {
                let _ = reply.send(self.handle_start(requester));
            }
            RoomCommand::Action {
                player,
                action,
                reply,
            } => {
                let _ = reply.send(self.handle_action(player, action));
            }
            RoomCommand::AdvanceRound { requester, reply } => {
                let _ = reply.send(self.handle_advance(requester));
            }
            RoomCommand::Snapshot { reply } => {
                let _ = reply.send(self.snapshot());
            }
            RoomCommand::Shutdown => unreachable!("handled in run()"),
        }
    }

    fn handle_timer(&mut self, event: TimerEvent) {
        // Stale-wakeup guard: an event minted under an earlier arming
        // means the cycle already resolved by other means.
        if event.generation != self.timer.generation() {
            tracing::trace!(room_id = %self.room_id, "dropping stale timer event");
            return;
        }
        match event.kind {
            TimerEventKind::Tick { remaining_secs } => {
                self.presenter.countdown(self.room_id, remaining_secs);
            }
            TimerEventKind::Expired => {
                tracing::debug!(room_id = %self.room_id, "turn deadline expired");
                self.resolve_now();
            }
        }
    }

    fn handle_join(&mut self, player: PlayerId) -> Result<(), RoomError> {
        if !self.status.is_joinable() {
            return Err(RoomError::NotWaiting(self.room_id));
        }
        if self.players.contains(&player) {
            return Err(RoomError::AlreadyInRoom(player));
        }
        if self.players.len() >= self.config.max_players {
            return Err(RoomError::RoomFull(self.room_id));
        }

        self.players.push(player);
        tracing::info!(
            room_id = %self.room_id,
            %player,
            players = self.players.len(),
            "player joined"
        );
        Ok(())
    }

    fn handle_leave(&mut self, player: PlayerId) -> Result<(), RoomError> {
        let Some(index) = self.players.iter().position(|p| *p == player) else {
            return Err(RoomError::NotInRoom(player, self.room_id));
        };
        self.players.remove(index);

        tracing::info!(
            room_id = %self.room_id,
            %player,
            players = self.players.len(),
            "player left"
        );

        if let Some(game) = &mut self.game {
            game.remove_player(player);
            // The leaver may have been the one everybody was waiting on.
            if self.status == RoomStatus::Playing
                && !game.round_over()
                && game.player_count() > 0
                && game.all_players_acted()
            {
                self.timer.cancel();
                self.resolve_now();
            }
        }
        Ok(())
    }

    fn handle_start(&mut self, requester: PlayerId) -> Result<(), RoomError> {
        if self.status != RoomStatus::Waiting {
            return Err(RoomError::NotWaiting(self.room_id));
        }
        if requester != self.host {
            return Err(RoomError::NotHost(requester, self.room_id));
        }
        if self.players.len() < self.config.min_players {
            return Err(RoomError::NotEnoughPlayers(
                self.room_id,
                self.config.min_players,
            ));
        }

        self.status = RoomStatus::Playing;
        self.game = Some(GameState::new(&self.game_config, &self.players));
        tracing::info!(
            room_id = %self.room_id,
            players = self.players.len(),
            "game started"
        );

        self.presenter.round_state(&self.snapshot(), None);
        self.timer.arm();
        Ok(())
    }

    fn handle_action(&mut self, player: PlayerId, action: Action) -> Result<(), RoomError> {
        if !self.players.contains(&player) {
            return Err(RoomError::NotInRoom(player, self.room_id));
        }
        if self.status != RoomStatus::Playing {
            return Err(RoomError::GameNotPlaying(self.room_id));
        }
        let room_id = self.room_id;
        let game = self
            .game
            .as_mut()
            .ok_or(RoomError::GameNotPlaying(room_id))?;

        game.set_action(player, action)
            .map_err(|e| map_game_error(room_id, e))?;
        let cycle_complete = game.all_players_acted();

        // Show who has locked a choice in, then resolve if the table is set.
        self.presenter.round_state(&self.snapshot(), None);
        if cycle_complete {
            self.timer.cancel();
            self.resolve_now();
        }
        Ok(())
    }

    fn handle_advance(&mut self, requester: PlayerId) -> Result<AdvanceReport, RoomError> {
        if !self.players.contains(&requester) {
            return Err(RoomError::NotInRoom(requester, self.room_id));
        }
        if self.status != RoomStatus::Playing {
            return Err(RoomError::GameNotPlaying(self.room_id));
        }
        let room_id = self.room_id;
        let game = self
            .game
            .as_mut()
            .ok_or(RoomError::GameNotPlaying(room_id))?;
        if !game.round_over() {
            return Err(RoomError::RoundInProgress(room_id));
        }

        match game.advance_round() {
            RoundTransition::Next { round } => {
                tracing::info!(room_id = %room_id, round, "next round started");
                self.presenter.round_state(&self.snapshot(), None);
                self.timer.arm();
                Ok(AdvanceReport::NextRound(round))
            }
            RoundTransition::GameOver { ranking } => {
                self.status = RoomStatus::Finished;
                self.timer.cancel();
                tracing::info!(room_id = %room_id, "game finished");
                self.presenter.game_end(&self.snapshot(), &ranking);
                Ok(AdvanceReport::GameOver)
            }
        }
    }

    /// Resolves the current action cycle and pushes the result across the
    /// presentation boundary. Safe against double resolution: a settled
    /// round answers `RoundClosed`, which is dropped here.
    fn resolve_now(&mut self) {
        let Some(game) = &mut self.game else {
            return;
        };
        match game.resolve_cycle() {
            Ok(outcome) => {
                if outcome.ends_round() {
                    self.timer.cancel();
                    self.presenter.round_end(&self.snapshot(), &outcome);
                } else {
                    self.presenter.round_state(&self.snapshot(), Some(&outcome));
                    self.timer.arm();
                }
            }
            Err(GameError::RoundClosed) => {
                tracing::trace!(room_id = %self.room_id, "resolution raced a settled round");
            }
            Err(e) => {
                tracing::warn!(room_id = %self.room_id, error = %e, "cycle resolution failed");
            }
        }
    }

    fn snapshot(&self) -> RoomSnapshot {
        match &self.game {
            Some(game) => RoomSnapshot {
                room_id: self.room_id,
                host: self.host,
                status: self.status,
                round: game.current_round(),
                max_rounds: game.max_rounds(),
                actions_in_round: game.actions_in_round(),
                round_over: game.round_over(),
                treasure_in_play: game.treasure_in_play(),
                players: game.players_view(),
                events: game.event_log().to_vec(),
            },
            None => RoomSnapshot {
                room_id: self.room_id,
                host: self.host,
                status: self.status,
                round: 0,
                max_rounds: self.game_config.max_rounds,
                actions_in_round: 0,
                round_over: false,
                treasure_in_play: None,
                players: self
                    .players
                    .iter()
                    .map(|p| PlayerView {
                        player: *p,
                        gold: 0,
                        secured_gold: 0,
                        treasures: Vec::new(),
                        posture: Posture::Exploring,
                        has_chosen: false,
                    })
                    .collect(),
                events: Vec::new(),
            },
        }
    }
}

fn map_game_error(room_id: RoomId, err: GameError) -> RoomError {
    match err {
        GameError::UnknownPlayer(p) => RoomError::NotInRoom(p, room_id),
        GameError::AlreadyReturned(p) => RoomError::AlreadyReturned(p),
        GameError::RoundClosed => RoomError::RoundClosed(room_id),
        GameError::Deck(_) => RoomError::Unavailable(room_id),
    }
}

/// Spawns a new room actor task with the host as its first player and
/// returns a handle to communicate with it.
pub(crate) fn spawn_room<P: Presenter>(
    room_id: RoomId,
    host: PlayerId,
    config: RoomConfig,
    game_config: GameConfig,
    presenter: Arc<P>,
    channel_size: usize,
) -> RoomHandle {
    let (tx, rx) = mpsc::channel(channel_size);

    let timer = TurnTimer::new(TimerConfig {
        enabled: game_config.timer_enabled,
        timeout: game_config.round_timeout,
        ..TimerConfig::default()
    });

    let actor = RoomActor {
        room_id,
        host,
        status: RoomStatus::Waiting,
        config,
        game_config,
        players: vec![host],
        game: None,
        timer,
        presenter,
        receiver: rx,
    };

    tokio::spawn(actor.run());

    RoomHandle {
        room_id,
        sender: tx,
    }
}
