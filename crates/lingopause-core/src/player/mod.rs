//! Player adapter.
//!
//! [`VideoPlayer`] is the exact capability set the scheduler needs from an
//! embedded video widget. [`PlayerAdapter`] wraps a (possibly missing)
//! widget handle and never lets a widget failure escape: failures are logged,
//! counted, and after repeated failures reported as corruption so the host
//! can tear the widget down and build a fresh one.

mod simulated;

pub use simulated::SimulatedPlayer;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

/// Playback state as reported by the widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerState {
    Unstarted,
    Ended,
    Playing,
    Paused,
    Buffering,
    Cued,
    Unknown(i32),
}

impl PlayerState {
    /// Map the widget's numeric state code.
    pub fn from_code(code: i32) -> Self {
        match code {
            -1 => Self::Unstarted,
            0 => Self::Ended,
            1 => Self::Playing,
            2 => Self::Paused,
            3 => Self::Buffering,
            5 => Self::Cued,
            other => Self::Unknown(other),
        }
    }

    pub fn code(&self) -> i32 {
        match self {
            Self::Unstarted => -1,
            Self::Ended => 0,
            Self::Playing => 1,
            Self::Paused => 2,
            Self::Buffering => 3,
            Self::Cued => 5,
            Self::Unknown(code) => *code,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlayerError {
    /// No widget handle is attached.
    #[error("no player attached")]
    Detached,

    /// The widget rejected or failed a command.
    #[error("player {operation} failed: {message}")]
    Command {
        operation: &'static str,
        message: String,
    },

    /// The widget reported a time that is not a usable number.
    #[error("player reported invalid time {0}")]
    InvalidTime(f64),
}

/// The five capabilities of an embeddable video widget.
pub trait VideoPlayer {
    fn seek_to(&mut self, seconds: f64) -> Result<(), PlayerError>;
    fn player_state(&self) -> Result<PlayerState, PlayerError>;
    fn current_time(&self) -> Result<f64, PlayerError>;
    fn pause_video(&mut self) -> Result<(), PlayerError>;
    fn play_video(&mut self) -> Result<(), PlayerError>;
}

pub const DEFAULT_CORRUPTION_THRESHOLD: u32 = 3;

/// Validated, failure-absorbing view over a [`VideoPlayer`].
#[derive(Debug)]
pub struct PlayerAdapter<P> {
    player: Option<P>,
    consecutive_failures: u32,
    corruption_threshold: u32,
    /// Raised once per corruption episode, cleared by `take_corruption`.
    corruption: Option<PlayerError>,
    reported: bool,
}

impl<P: VideoPlayer> PlayerAdapter<P> {
    pub fn new(player: P) -> Self {
        Self::with_threshold(Some(player), DEFAULT_CORRUPTION_THRESHOLD)
    }

    /// An adapter with no widget yet; every readiness check fails.
    pub fn detached() -> Self {
        Self::with_threshold(None, DEFAULT_CORRUPTION_THRESHOLD)
    }

    pub fn with_threshold(player: Option<P>, corruption_threshold: u32) -> Self {
        Self {
            player,
            consecutive_failures: 0,
            corruption_threshold: corruption_threshold.max(1),
            corruption: None,
            reported: false,
        }
    }

    pub fn player(&self) -> Option<&P> {
        self.player.as_ref()
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    /// Install a recreated widget and forget earlier failures.
    pub fn replace_player(&mut self, player: P) {
        self.player = Some(player);
        self.consecutive_failures = 0;
        self.corruption = None;
        self.reported = false;
    }

    /// Drop the widget handle, returning it.
    pub fn detach(&mut self) -> Option<P> {
        self.player.take()
    }

    /// Corruption raised since the last call, if any.
    pub fn take_corruption(&mut self) -> Option<PlayerError> {
        self.corruption.take()
    }

    /// True when a widget is attached and answers a live probe with a
    /// finite time and a state.
    pub fn is_ready(&mut self) -> bool {
        let result = match self.player.as_ref() {
            None => Err(PlayerError::Detached),
            Some(player) => probe(player),
        };
        match result {
            Ok(()) => {
                self.record_success();
                true
            }
            Err(PlayerError::Detached) => false,
            Err(err) => {
                self.record_failure("probe", err);
                false
            }
        }
    }

    /// Current time and state, read together for one scheduler tick.
    pub fn snapshot(&mut self) -> Option<(f64, PlayerState)> {
        let read = self.player.as_ref().ok_or(PlayerError::Detached).and_then(|p| {
            let time = p.current_time()?;
            if !time.is_finite() {
                return Err(PlayerError::InvalidTime(time));
            }
            Ok((time, p.player_state()?))
        });
        match read {
            Ok(snapshot) => {
                self.record_success();
                Some(snapshot)
            }
            Err(err) => {
                self.record_failure("snapshot", err);
                None
            }
        }
    }

    pub fn state(&mut self) -> Option<PlayerState> {
        let read = self
            .player
            .as_ref()
            .ok_or(PlayerError::Detached)
            .and_then(|p| p.player_state());
        match read {
            Ok(state) => {
                self.record_success();
                Some(state)
            }
            Err(err) => {
                self.record_failure("state", err);
                None
            }
        }
    }

    /// Seek, then play. Returns whether both commands were accepted; it does
    /// not mean playback actually started.
    pub fn seek_and_play(&mut self, seconds: f64) -> bool {
        let result = self.player.as_mut().ok_or(PlayerError::Detached).and_then(|p| {
            p.seek_to(seconds)?;
            p.play_video()
        });
        self.settle("seek_and_play", result)
    }

    /// Pause only when the widget reports it is playing, so an already
    /// paused widget is never toggled back into playback.
    pub fn pause_if_playing(&mut self) -> bool {
        let result = self.player.as_mut().ok_or(PlayerError::Detached).and_then(|p| {
            if p.player_state()? == PlayerState::Playing {
                p.pause_video()?;
                Ok(true)
            } else {
                Ok(false)
            }
        });
        match result {
            Ok(paused) => {
                self.record_success();
                paused
            }
            Err(err) => {
                self.record_failure("pause", err);
                false
            }
        }
    }

    /// Play unless the widget already reports playing.
    pub fn resume(&mut self) -> bool {
        let result = self.player.as_mut().ok_or(PlayerError::Detached).and_then(|p| {
            if p.player_state()? != PlayerState::Playing {
                p.play_video()?;
            }
            Ok(())
        });
        self.settle("resume", result)
    }

    fn settle(&mut self, operation: &'static str, result: Result<(), PlayerError>) -> bool {
        match result {
            Ok(()) => {
                self.record_success();
                true
            }
            Err(err) => {
                self.record_failure(operation, err);
                false
            }
        }
    }

    fn record_success(&mut self) {
        if self.consecutive_failures > 0 {
            debug!(
                failures = self.consecutive_failures,
                "player recovered after failures"
            );
        }
        self.consecutive_failures = 0;
        self.reported = false;
    }

    fn record_failure(&mut self, operation: &'static str, err: PlayerError) {
        self.consecutive_failures = self.consecutive_failures.saturating_add(1);
        warn!(
            operation,
            failures = self.consecutive_failures,
            error = %err,
            "player call failed"
        );
        if self.consecutive_failures >= self.corruption_threshold && !self.reported {
            self.reported = true;
            self.corruption = Some(err);
        }
    }
}

fn probe<P: VideoPlayer>(player: &P) -> Result<(), PlayerError> {
    let time = player.current_time()?;
    if !time.is_finite() {
        return Err(PlayerError::InvalidTime(time));
    }
    player.player_state()?;
    Ok(())
}
