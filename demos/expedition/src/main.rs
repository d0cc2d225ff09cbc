//! Scripted two-player expedition, rendered through `tracing`.
//!
//! Executable documentation of the embedding contract: build a service
//! with a `Presenter`, create and start a room, feed it actions, and fire
//! the next-round trigger whenever a round parks. The "players" here push
//! their luck for three cards each round, then head home.

use std::sync::Arc;
use std::time::Duration;

use eldorado::prelude::*;
use tracing_subscriber::EnvFilter;

/// Renders engine notifications as log lines. A chat bot would edit
/// embeds here instead.
struct TracePresenter;

impl Presenter for TracePresenter {
    fn round_state(&self, room: &RoomSnapshot, outcome: Option<&Outcome>) {
        match outcome {
            Some(Outcome::Gold { value, share, .. }) => {
                tracing::info!(round = room.round, value, share, "gold found");
            }
            Some(Outcome::Danger { kind, .. }) => {
                tracing::info!(round = room.round, %kind, "danger spotted");
            }
            Some(Outcome::Treasure { value, claimed }) => {
                tracing::info!(round = room.round, value, claimed = ?claimed, "treasure revealed");
            }
            _ => {}
        }
        for view in &room.players {
            tracing::debug!(
                player = %view.player,
                gold = view.gold,
                secured = view.secured_gold,
                posture = ?view.posture,
                "standing"
            );
        }
    }

    fn round_end(&self, room: &RoomSnapshot, outcome: &Outcome) {
        let history: Vec<String> = room.events.iter().map(|e| e.to_string()).collect();
        tracing::info!(
            round = room.round,
            ?outcome,
            history = history.join(" -> "),
            "round over"
        );
    }

    fn game_end(&self, _room: &RoomSnapshot, ranking: &[RankingEntry]) {
        for (place, row) in ranking.iter().enumerate() {
            tracing::info!(
                place = place + 1,
                player = %row.player,
                gold = row.secured_gold,
                treasure = row.treasure_total,
                score = row.score,
                "final standing"
            );
        }
    }

    fn countdown(&self, room: RoomId, remaining_secs: u64) {
        tracing::trace!(%room, remaining_secs, "tick");
    }
}

#[tokio::main]
async fn main() -> Result<(), EldoradoError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let host = PlayerId(1);
    let guest = PlayerId(2);

    // Timer off: the demo submits for everyone, so there is no one to
    // wait on.
    let game_config = GameConfig {
        timer_enabled: false,
        ..GameConfig::default()
    };
    let service = ExpeditionService::new(
        RoomConfig::default(),
        game_config,
        Arc::new(TracePresenter),
    )
    .with_disband_grace(Duration::from_secs(1));

    let room = service.create_room(host).await?;
    service.join_room(room, guest).await?;
    service.start_game(room, host).await?;
    tracing::info!(%room, "expedition underway");

    loop {
        let snapshot = service.room_snapshot(room).await?;
        if snapshot.status == RoomStatus::Finished {
            break;
        }
        if snapshot.round_over {
            match service.advance_round(room, host).await? {
                AdvanceReport::GameOver => break,
                AdvanceReport::NextRound(round) => {
                    tracing::info!(round, "pressing on");
                    continue;
                }
            }
        }

        // Push the luck for three cards, then walk the loot home.
        let action = if snapshot.actions_in_round < 3 {
            Action::Continue
        } else {
            Action::Return
        };
        for player in [host, guest] {
            if let Err(e) = service.submit_action(player, action).await {
                // A duplicate danger may have parked the round mid-pass.
                tracing::debug!(error = %e, "choice rejected");
            }
        }
    }

    tracing::info!("expedition complete");
    Ok(())
}
