//! Polling loop for a shared controller.
//!
//! The controller itself has no timer. [`PollingLoop`] spawns one tokio task
//! that calls `tick()` on a fixed interval until watching ends. Ticks are
//! strictly sequential: each one holds the controller lock for its whole
//! duration and missed ticks are skipped, never bunched up.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::debug;

use crate::clock::Clock;
use crate::controller::LearningController;
use crate::events::Event;
use crate::player::VideoPlayer;

pub type SharedController<P, C> = Arc<Mutex<LearningController<P, C>>>;

/// Owns at most one running poll task.
#[derive(Debug, Default)]
pub struct PollingLoop {
    handle: Option<JoinHandle<()>>,
}

impl PollingLoop {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start polling `controller` every `period`, cancelling any loop this
    /// instance was already running. Events produced by ticks are sent to
    /// `events` when given.
    pub fn start<P, C>(
        &mut self,
        controller: SharedController<P, C>,
        period: Duration,
        events: Option<mpsc::UnboundedSender<Event>>,
    ) where
        P: VideoPlayer + Send + 'static,
        C: Clock + Send + 'static,
    {
        self.stop();
        let handle = tokio::spawn(async move {
            let mut interval = time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                let mut guard = controller.lock().await;
                if !guard.is_watching() {
                    debug!("controller no longer watching, polling loop exits");
                    break;
                }
                let produced = guard.tick();
                drop(guard);
                if let Some(tx) = &events {
                    for event in produced {
                        if tx.send(event).is_err() {
                            return;
                        }
                    }
                }
            }
        });
        self.handle = Some(handle);
    }

    /// Cancel the running loop, if any. Idempotent.
    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            debug!("polling loop cancelled");
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for PollingLoop {
    fn drop(&mut self) {
        self.stop();
    }
}
