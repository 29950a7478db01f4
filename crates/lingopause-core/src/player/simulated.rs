//! Deterministic in-memory widget.
//!
//! Backs the `simulate` CLI command and the scheduler tests. Clones share
//! one widget, so a test can keep a handle while the adapter owns another.

use std::sync::{Arc, Mutex, MutexGuard};

use super::{PlayerError, PlayerState, VideoPlayer};

#[derive(Debug)]
struct Inner {
    time: f64,
    state: PlayerState,
    duration: Option<f64>,
    stale: bool,
    ignore_play: bool,
    play_calls: u32,
    pause_calls: u32,
    seeks: Vec<f64>,
}

#[derive(Debug, Clone)]
pub struct SimulatedPlayer {
    inner: Arc<Mutex<Inner>>,
}

impl Default for SimulatedPlayer {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedPlayer {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                time: 0.0,
                state: PlayerState::Unstarted,
                duration: None,
                stale: false,
                ignore_play: false,
                play_calls: 0,
                pause_calls: 0,
                seeks: Vec::new(),
            })),
        }
    }

    /// Playback ends (state `Ended`) once time reaches `duration`.
    pub fn with_duration(self, duration: f64) -> Self {
        self.lock().duration = Some(duration);
        self
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Move video time forward when playing.
    pub fn advance(&self, seconds: f64) {
        let mut inner = self.lock();
        if inner.state != PlayerState::Playing {
            return;
        }
        inner.time += seconds;
        if let Some(duration) = inner.duration {
            if inner.time >= duration {
                inner.time = duration;
                inner.state = PlayerState::Ended;
            }
        }
    }

    pub fn time(&self) -> f64 {
        self.lock().time
    }

    pub fn set_time(&self, time: f64) {
        self.lock().time = time;
    }

    pub fn state(&self) -> PlayerState {
        self.lock().state
    }

    pub fn set_state(&self, state: PlayerState) {
        self.lock().state = state;
    }

    /// A stale widget fails every call, like a torn-down iframe.
    pub fn set_stale(&self, stale: bool) {
        self.lock().stale = stale;
    }

    /// Accept `play_video` without actually starting playback.
    pub fn set_ignore_play(&self, ignore: bool) {
        self.lock().ignore_play = ignore;
    }

    pub fn play_calls(&self) -> u32 {
        self.lock().play_calls
    }

    pub fn pause_calls(&self) -> u32 {
        self.lock().pause_calls
    }

    pub fn seeks(&self) -> Vec<f64> {
        self.lock().seeks.clone()
    }

    fn check(inner: &Inner, operation: &'static str) -> Result<(), PlayerError> {
        if inner.stale {
            return Err(PlayerError::Command {
                operation,
                message: "widget is no longer attached".into(),
            });
        }
        Ok(())
    }
}

impl VideoPlayer for SimulatedPlayer {
    fn seek_to(&mut self, seconds: f64) -> Result<(), PlayerError> {
        let mut inner = self.lock();
        Self::check(&inner, "seek_to")?;
        inner.time = seconds.max(0.0);
        inner.seeks.push(seconds);
        Ok(())
    }

    fn player_state(&self) -> Result<PlayerState, PlayerError> {
        let inner = self.lock();
        Self::check(&inner, "get_player_state")?;
        Ok(inner.state)
    }

    fn current_time(&self) -> Result<f64, PlayerError> {
        let inner = self.lock();
        Self::check(&inner, "get_current_time")?;
        Ok(inner.time)
    }

    fn pause_video(&mut self) -> Result<(), PlayerError> {
        let mut inner = self.lock();
        Self::check(&inner, "pause_video")?;
        inner.pause_calls += 1;
        inner.state = PlayerState::Paused;
        Ok(())
    }

    fn play_video(&mut self) -> Result<(), PlayerError> {
        let mut inner = self.lock();
        Self::check(&inner, "play_video")?;
        inner.play_calls += 1;
        if !inner.ignore_play {
            inner.state = PlayerState::Playing;
        }
        Ok(())
    }
}
