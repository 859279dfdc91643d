//! Controller tests on tokio's paused clock.
//!
//! With `start_paused`, the runtime jumps straight to the next timer deadline
//! whenever every task is idle, so minutes of countdown run instantly.

use std::sync::Arc;
use std::time::Duration;

use deepwork_core::storage::StorageBackend;
use deepwork_core::{
    Config, Event, KeyValueStore, MemoryStore, ResetPolicy, SettingsProvider, TimerController,
    TimerMode, TimerSettings, TimerUpdate,
};
use tokio::sync::broadcast;

fn one_minute_settings() -> TimerSettings {
    TimerSettings {
        work_duration: 1,
        break_duration: 1,
        long_break_duration: 1,
        sessions_until_long_break: 2,
    }
}

fn controller_with(config: &Config) -> (TimerController, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    SettingsProvider::new(store.clone())
        .save(&one_minute_settings())
        .unwrap();
    (TimerController::from_config(config, store.clone()), store)
}

async fn next_completion(rx: &mut broadcast::Receiver<TimerUpdate>) -> TimerUpdate {
    loop {
        let update = rx.recv().await.unwrap();
        if update.event.is_completion() {
            return update;
        }
    }
}

#[tokio::test(start_paused = true)]
async fn test_countdown_completes_work_interval() {
    let (controller, store) = controller_with(&Config::default());
    let mut rx = controller.subscribe();

    controller.start().await;
    let update = next_completion(&mut rx).await;

    assert_eq!(update.state.mode, TimerMode::Break);
    assert_eq!(update.state.time_left, 60);
    assert_eq!(update.state.sessions_completed, 1);
    assert!(!update.state.is_running);
    assert_eq!(controller.sessions().await.len(), 1);
    assert!(store.get(deepwork_core::SESSIONS_KEY).unwrap().is_some());
}

#[tokio::test(start_paused = true)]
async fn test_every_tick_is_published() {
    let (controller, _store) = controller_with(&Config::default());
    let mut rx = controller.subscribe();

    controller.start().await;
    let first = rx.recv().await.unwrap();
    assert!(matches!(first.event, Event::TimerStarted { resumed: false, .. }));

    let mut expected = 59;
    loop {
        let update = rx.recv().await.unwrap();
        match update.event {
            Event::Ticked { time_left } => {
                assert_eq!(time_left, expected);
                assert_eq!(update.state.time_left, expected);
                expected -= 1;
            }
            Event::IntervalCompleted { .. } => break,
            other => panic!("unexpected event {other:?}"),
        }
    }
    assert_eq!(expected, 0);
}

#[tokio::test(start_paused = true)]
async fn test_pause_cancels_ticker() {
    let (controller, _store) = controller_with(&Config::default());

    controller.start().await;
    tokio::time::sleep(Duration::from_millis(10_500)).await;
    let paused = controller.pause().await;
    assert!(paused.is_paused);
    assert_eq!(paused.time_left, 50);

    tokio::time::sleep(Duration::from_secs(300)).await;
    assert_eq!(controller.state().await, paused);

    controller.start().await;
    tokio::time::sleep(Duration::from_millis(5_500)).await;
    assert_eq!(controller.state().await.time_left, 45);
}

#[tokio::test(start_paused = true)]
async fn test_reset_discards_running_work() {
    let mut config = Config::default();
    config.engine.reset_policy = ResetPolicy::ClearSessionCount;
    let (controller, _store) = controller_with(&config);

    controller.start().await;
    tokio::time::sleep(Duration::from_millis(59_500)).await;
    let state = controller.reset().await;
    assert_eq!(state.time_left, 60);
    assert!(state.is_ready());

    tokio::time::sleep(Duration::from_secs(120)).await;
    assert!(controller.sessions().await.is_empty());
    assert_eq!(controller.state().await.time_left, 60);
}

#[tokio::test(start_paused = true)]
async fn test_double_start_does_not_double_count() {
    let (controller, _store) = controller_with(&Config::default());
    controller.start().await;
    controller.start().await;
    tokio::time::sleep(Duration::from_millis(10_500)).await;
    assert_eq!(controller.state().await.time_left, 50);
}

#[tokio::test(start_paused = true)]
async fn test_drop_stops_ticking() {
    let (controller, store) = controller_with(&Config::default());
    let mut rx = controller.subscribe();
    controller.start().await;
    tokio::time::sleep(Duration::from_millis(30_500)).await;
    drop(controller);

    tokio::time::sleep(Duration::from_secs(120)).await;
    // Drain what was published before the drop; the channel then closes.
    loop {
        match rx.recv().await {
            Ok(update) => assert!(!update.event.is_completion()),
            Err(broadcast::error::RecvError::Closed) => break,
            Err(broadcast::error::RecvError::Lagged(_)) => continue,
        }
    }
    assert!(store.get(deepwork_core::SESSIONS_KEY).unwrap().is_none());
}

#[tokio::test(start_paused = true)]
async fn test_tick_interval_from_config() {
    let mut config = Config::default();
    config.engine.tick_interval_ms = 10;
    config.storage.backend = StorageBackend::Memory;
    let (controller, _store) = controller_with(&config);
    let mut rx = controller.subscribe();

    let started = tokio::time::Instant::now();
    controller.start().await;
    next_completion(&mut rx).await;
    assert_eq!(started.elapsed(), Duration::from_millis(600));
}

#[tokio::test(start_paused = true)]
async fn test_set_settings_while_ready() {
    let (controller, _store) = controller_with(&Config::default());
    let state = controller
        .set_settings(TimerSettings {
            work_duration: 3,
            ..one_minute_settings()
        })
        .await
        .unwrap();
    assert_eq!(state.time_left, 180);
    assert_eq!(controller.settings().await.work_duration, 3);
    assert!((controller.progress().await - 0.0).abs() < f64::EPSILON);
}
