//! Integration tests for the turn timer.
//!
//! Uses `tokio::time::pause()` (via `start_paused`) so sleeps resolve
//! deterministically when the test clock advances.

use std::time::Duration;

use eldorado_timer::{TimerConfig, TimerEventKind, TurnTimer};

fn short_config() -> TimerConfig {
    TimerConfig {
        enabled: true,
        timeout: Duration::from_secs(3),
        tick_interval: Duration::from_secs(1),
    }
}

// =========================================================================
// Config
// =========================================================================

#[test]
fn test_default_config() {
    let cfg = TimerConfig::default();
    assert!(cfg.enabled);
    assert_eq!(cfg.timeout, Duration::from_secs(20));
    assert_eq!(cfg.tick_interval, Duration::from_secs(1));
}

#[test]
fn test_zero_tick_interval_is_clamped() {
    let cfg = TimerConfig {
        tick_interval: Duration::ZERO,
        ..TimerConfig::default()
    }
    .validated();
    assert_eq!(cfg.tick_interval, Duration::from_secs(1));
}

// =========================================================================
// Arm / cancel / generation
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_new_timer_is_unarmed() {
    let timer = TurnTimer::new(short_config());
    assert!(!timer.is_armed());
    assert_eq!(timer.generation(), 0);
    assert_eq!(timer.remaining(), None);
}

#[tokio::test(start_paused = true)]
async fn test_arm_bumps_generation_and_sets_deadline() {
    let mut timer = TurnTimer::new(short_config());
    let generation = timer.arm();
    assert_eq!(generation, 1);
    assert!(timer.is_armed());
    assert_eq!(timer.remaining(), Some(Duration::from_secs(3)));
}

#[tokio::test(start_paused = true)]
async fn test_rearm_implicitly_cancels_previous() {
    let mut timer = TurnTimer::new(short_config());
    let first = timer.arm();
    let second = timer.arm();
    assert!(second > first, "each arm gets its own generation");
    assert!(timer.is_armed());
}

#[tokio::test(start_paused = true)]
async fn test_cancel_disarms_and_invalidates() {
    let mut timer = TurnTimer::new(short_config());
    let armed_generation = timer.arm();
    timer.cancel();
    assert!(!timer.is_armed());
    assert!(
        timer.generation() > armed_generation,
        "events minted before cancel must be stale"
    );
}

#[tokio::test(start_paused = true)]
async fn test_cancel_is_idempotent() {
    let mut timer = TurnTimer::new(short_config());
    let generation = timer.generation();
    timer.cancel();
    timer.cancel();
    assert_eq!(timer.generation(), generation, "no-op cancels don't churn");
}

// =========================================================================
// Events
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_ticks_count_down_then_expire() {
    let mut timer = TurnTimer::new(short_config());
    timer.arm();

    // 3-second deadline at 1 Hz: two countdown ticks, then expiry.
    let e1 = timer.wait().await;
    assert_eq!(e1.kind, TimerEventKind::Tick { remaining_secs: 2 });
    let e2 = timer.wait().await;
    assert_eq!(e2.kind, TimerEventKind::Tick { remaining_secs: 1 });
    let e3 = timer.wait().await;
    assert_eq!(e3.kind, TimerEventKind::Expired);
    assert!(!timer.is_armed());
}

#[tokio::test(start_paused = true)]
async fn test_events_carry_arming_generation() {
    let mut timer = TurnTimer::new(short_config());
    let generation = timer.arm();
    let event = timer.wait().await;
    assert_eq!(event.generation, generation);
    assert_eq!(event.generation, timer.generation());
}

#[tokio::test(start_paused = true)]
async fn test_unarmed_wait_pends_forever() {
    let mut timer = TurnTimer::new(short_config());
    // With the clock paused and auto-advancing, a pending future makes
    // the timeout fire; a spurious event would win the race instead.
    let raced = tokio::time::timeout(Duration::from_secs(60), timer.wait()).await;
    assert!(raced.is_err(), "unarmed timer must not produce events");
}

#[tokio::test(start_paused = true)]
async fn test_disabled_timer_never_fires() {
    let mut timer = TurnTimer::new(TimerConfig {
        enabled: false,
        ..short_config()
    });
    timer.arm();
    assert!(!timer.is_armed());
    let raced = tokio::time::timeout(Duration::from_secs(60), timer.wait()).await;
    assert!(raced.is_err());
}

#[tokio::test(start_paused = true)]
async fn test_no_events_after_expiry_until_rearm() {
    let mut timer = TurnTimer::new(short_config());
    timer.arm();
    loop {
        if timer.wait().await.kind == TimerEventKind::Expired {
            break;
        }
    }
    let raced = tokio::time::timeout(Duration::from_secs(60), timer.wait()).await;
    assert!(raced.is_err(), "expired timer is unarmed");

    // A fresh arm brings it back.
    timer.arm();
    let event = timer.wait().await;
    assert!(matches!(event.kind, TimerEventKind::Tick { .. }));
}

#[tokio::test(start_paused = true)]
async fn test_stale_generation_detectable_after_cancel_rearm() {
    let mut timer = TurnTimer::new(short_config());
    timer.arm();
    let stale = timer.wait().await;
    // The room resolves by other means: cancel, then a new cycle arms.
    timer.cancel();
    timer.arm();
    assert_ne!(
        stale.generation,
        timer.generation(),
        "consumer must be able to drop the stale event"
    );
}
