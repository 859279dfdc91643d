//! Async driver for [`TimerEngine`].
//!
//! Owns the engine behind a mutex, runs the one-second ticker as a tokio task,
//! and broadcasts a [`TimerUpdate`] after every tick or transition.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::{broadcast, Mutex};
use tokio::task::JoinHandle;
use tokio::time;
use tracing::debug;

use super::{SystemClock, TimerEngine, TimerState};
use crate::error::ConfigError;
use crate::events::Event;
use crate::session::{DeepWorkSession, SessionLog};
use crate::settings::{SettingsProvider, TimerSettings};
use crate::storage::{Config, KeyValueStore};

const UPDATE_CHANNEL_CAPACITY: usize = 256;

/// State after a change, with the event that caused it.
#[derive(Debug, Clone, Serialize)]
pub struct TimerUpdate {
    pub state: TimerState,
    pub event: Event,
}

/// Running ticker task. Aborted when dropped.
struct Ticker {
    handle: JoinHandle<()>,
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

pub struct TimerController {
    engine: Arc<Mutex<TimerEngine>>,
    updates: broadcast::Sender<TimerUpdate>,
    // Lock order: `ticker` before `engine`.
    ticker: Mutex<Option<Ticker>>,
    tick_interval: Duration,
}

impl TimerController {
    pub fn new(engine: TimerEngine) -> Self {
        let (updates, _) = broadcast::channel(UPDATE_CHANNEL_CAPACITY);
        Self {
            engine: Arc::new(Mutex::new(engine)),
            updates,
            ticker: Mutex::new(None),
            tick_interval: Duration::from_secs(1),
        }
    }

    pub fn with_tick_interval(mut self, tick_interval: Duration) -> Self {
        self.tick_interval = tick_interval;
        self
    }

    /// Build a controller over `store` using the engine section of `config`.
    pub fn from_config(config: &Config, store: Arc<dyn KeyValueStore>) -> Self {
        let settings = SettingsProvider::new(Arc::clone(&store)).load();
        let engine = TimerEngine::new(settings, SessionLog::new(store), Arc::new(SystemClock))
            .with_options(config.engine_options());
        Self::new(engine).with_tick_interval(config.tick_interval())
    }

    pub fn subscribe(&self) -> broadcast::Receiver<TimerUpdate> {
        self.updates.subscribe()
    }

    pub async fn state(&self) -> TimerState {
        self.engine.lock().await.state()
    }

    pub async fn settings(&self) -> TimerSettings {
        self.engine.lock().await.settings()
    }

    pub async fn progress(&self) -> f64 {
        self.engine.lock().await.progress()
    }

    pub async fn sessions(&self) -> Vec<DeepWorkSession> {
        self.engine.lock().await.session_log().all()
    }

    pub async fn start(&self) -> TimerState {
        let mut ticker = self.ticker.lock().await;
        let mut engine = self.engine.lock().await;
        if let Some(event) = engine.start() {
            self.publish(engine.state(), event);
            *ticker = Some(self.spawn_ticker());
        }
        engine.state()
    }

    pub async fn pause(&self) -> TimerState {
        let mut ticker = self.ticker.lock().await;
        let mut engine = self.engine.lock().await;
        if let Some(event) = engine.pause() {
            self.publish(engine.state(), event);
        }
        ticker.take();
        engine.state()
    }

    pub async fn reset(&self) -> TimerState {
        let mut ticker = self.ticker.lock().await;
        let mut engine = self.engine.lock().await;
        ticker.take();
        if let Some(event) = engine.reset() {
            self.publish(engine.state(), event);
        }
        engine.state()
    }

    /// # Errors
    /// Rejects invalid settings; the engine keeps its current ones.
    pub async fn set_settings(&self, settings: TimerSettings) -> Result<TimerState, ConfigError> {
        let mut engine = self.engine.lock().await;
        let event = engine.set_settings(settings)?;
        self.publish(engine.state(), event);
        Ok(engine.state())
    }

    fn publish(&self, state: TimerState, event: Event) {
        // No subscribers is fine.
        let _ = self.updates.send(TimerUpdate { state, event });
    }

    fn spawn_ticker(&self) -> Ticker {
        let engine = Arc::clone(&self.engine);
        let updates = self.updates.clone();
        let period = self.tick_interval;

        let handle = tokio::spawn(async move {
            let mut interval = time::interval_at(time::Instant::now() + period, period);
            loop {
                interval.tick().await;

                let mut guard = engine.lock().await;
                // Only the final tick of a work interval touches the store: one
                // small key-value write. It runs inline under the lock so the
                // session is appended before any later start() can open the next
                // interval. `block_in_place` is not usable here since it panics
                // on current-thread runtimes.
                let Some(event) = guard.tick() else {
                    break;
                };
                let state = guard.state();
                // Sent under the lock so updates stay ordered with commands.
                let _ = updates.send(TimerUpdate { state, event });
                if !state.is_running {
                    debug!("ticker finished");
                    break;
                }
            }
        });

        Ticker { handle }
    }
}
