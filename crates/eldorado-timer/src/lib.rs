//! Cancelable turn deadline for Eldorado room actors.
//!
//! Each room owns one [`TurnTimer`]. Arming it starts a deadline; while the
//! deadline runs, [`TurnTimer::wait`] yields a countdown [`TimerEvent`] once
//! per tick interval (for the UI's remaining-seconds display) and a single
//! `Expired` event when the duration elapses. Unarmed, disabled, or
//! canceled, `wait` pends forever — the correct shape for a `tokio::select!`
//! branch in an actor loop that otherwise only reacts to commands.
//!
//! # Stale events
//!
//! Every arm and cancel bumps a generation counter, and every event carries
//! the generation it was minted under. Consumers must drop events whose
//! generation no longer matches [`TurnTimer::generation`]; that guard is
//! what makes a deadline raced by a just-resolved cycle a no-op instead of
//! a double resolution.
//!
//! # Integration
//!
//! ```ignore
//! loop {
//!     tokio::select! {
//!         Some(cmd) = cmd_rx.recv() => { /* may arm or cancel the timer */ }
//!         event = timer.wait() => {
//!             if event.generation != timer.generation() { continue; }
//!             match event.kind {
//!                 TimerEventKind::Tick { remaining_secs } => { /* countdown */ }
//!                 TimerEventKind::Expired => { /* resolve with idle defaults */ }
//!             }
//!         }
//!     }
//! }
//! ```

use std::time::Duration;

use tokio::time::{self, Instant as TokioInstant};
use tracing::{debug, warn};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Configuration for a room's turn timer.
#[derive(Debug, Clone)]
pub struct TimerConfig {
    /// Whether the timer fires at all. Disabled timers never produce
    /// events; rooms then resolve only when every player has chosen.
    pub enabled: bool,
    /// The full deadline for one action cycle.
    pub timeout: Duration,
    /// Countdown cadence. One `Tick` per interval.
    pub tick_interval: Duration,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            timeout: Duration::from_secs(20),
            tick_interval: Duration::from_secs(1),
        }
    }
}

impl TimerConfig {
    /// Clamp nonsense values so the config is safe to use: a zero tick
    /// interval would spin, so it is forced up to one second.
    pub fn validated(mut self) -> Self {
        if self.tick_interval.is_zero() {
            warn!("tick_interval of zero — clamping to 1s");
            self.tick_interval = Duration::from_secs(1);
        }
        self
    }
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// What a timer wait produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEventKind {
    /// Countdown heartbeat with whole seconds left until the deadline.
    Tick { remaining_secs: u64 },
    /// The deadline elapsed. The timer disarms itself after this.
    Expired,
}

/// A timer event stamped with the generation it was minted under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerEvent {
    pub generation: u64,
    pub kind: TimerEventKind,
}

// ---------------------------------------------------------------------------
// Timer
// ---------------------------------------------------------------------------

/// One cancelable deadline. One `TurnTimer` per room actor.
///
/// Re-arming implicitly cancels the previous deadline (the generation
/// moves on), and canceling an idle timer is a no-op.
#[derive(Debug)]
pub struct TurnTimer {
    config: TimerConfig,
    generation: u64,
    deadline: Option<TokioInstant>,
    next_tick: Option<TokioInstant>,
}

impl TurnTimer {
    pub fn new(config: TimerConfig) -> Self {
        let config = config.validated();
        if !config.enabled {
            debug!("turn timer created disabled — cycles resolve on input only");
        }
        Self {
            config,
            generation: 0,
            deadline: None,
            next_tick: None,
        }
    }

    /// Starts (or restarts) the deadline and returns the new generation.
    ///
    /// With the timer disabled this still bumps the generation — so stale
    /// events from an earlier enabled configuration can never match — but
    /// arms nothing.
    pub fn arm(&mut self) -> u64 {
        self.generation += 1;
        if self.config.enabled {
            let now = TokioInstant::now();
            self.deadline = Some(now + self.config.timeout);
            self.next_tick = Some(now + self.config.tick_interval);
            debug!(
                generation = self.generation,
                timeout_ms = self.config.timeout.as_millis() as u64,
                "turn timer armed"
            );
        }
        self.generation
    }

    /// Stops the deadline. Idempotent: canceling an idle timer does
    /// nothing at all.
    pub fn cancel(&mut self) {
        if self.deadline.is_some() {
            self.generation += 1;
            self.deadline = None;
            self.next_tick = None;
            debug!(generation = self.generation, "turn timer canceled");
        }
    }

    /// Whether a deadline is currently running.
    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// The current generation. Events stamped with anything older are
    /// stale and must be dropped.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Time left until the deadline, if one is running.
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|d| d.saturating_duration_since(TokioInstant::now()))
    }

    /// Waits for the next timer event.
    ///
    /// Pends forever while unarmed (or disabled) — `tokio::select!` keeps
    /// servicing its other branches. After `Expired` the timer is unarmed
    /// until the next [`arm`](Self::arm).
    pub async fn wait(&mut self) -> TimerEvent {
        let (deadline, next_tick) = match (self.deadline, self.next_tick) {
            (Some(d), Some(t)) => (d, t),
            _ => {
                // Never completes; the actor's other select! branches run.
                std::future::pending::<()>().await;
                unreachable!()
            }
        };

        if next_tick < deadline {
            time::sleep_until(next_tick).await;
            self.next_tick = Some(next_tick + self.config.tick_interval);
            let remaining = deadline.saturating_duration_since(TokioInstant::now());
            TimerEvent {
                generation: self.generation,
                kind: TimerEventKind::Tick {
                    remaining_secs: remaining.as_secs_f64().ceil() as u64,
                },
            }
        } else {
            time::sleep_until(deadline).await;
            self.deadline = None;
            self.next_tick = None;
            debug!(generation = self.generation, "turn timer expired");
            TimerEvent {
                generation: self.generation,
                kind: TimerEventKind::Expired,
            }
        }
    }
}
