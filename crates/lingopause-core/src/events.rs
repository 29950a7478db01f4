use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::panel::PanelState;
use crate::player::PlayerState;
use crate::words::FocusWord;

/// Everything the scheduler does is reported as an Event.
/// The panel reacts to them; the host receives them through listener
/// callbacks or by reading the controller's return values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    WatchingStarted {
        session_number: u32,
        word_count: usize,
        /// Video time playback was seeked to.
        start_at: f64,
        first_trigger_at: f64,
        at: DateTime<Utc>,
    },
    /// Playback reached a focus word's end time and was paused.
    WordEncountered {
        index: usize,
        word: FocusWord,
        video_time: f64,
        at: DateTime<Utc>,
    },
    /// The scheduler asks the panel to move to `state`.
    StateChange {
        state: PanelState,
        at: DateTime<Utc>,
    },
    /// The next pause point is set; `skipped` words sat too close to the last one.
    NextWordArmed {
        index: usize,
        trigger_at: f64,
        skipped: usize,
        at: DateTime<Utc>,
    },
    SessionCompleted {
        session_number: u32,
        skipped: usize,
        at: DateTime<Utc>,
    },
    WatchingStopped {
        at: DateTime<Utc>,
    },
    /// The widget kept failing; the host should recreate it.
    PlayerCorrupted {
        reason: String,
        at: DateTime<Utc>,
    },
    /// Playback was asked to resume but the widget still is not playing.
    ResumeUnverified {
        state: Option<PlayerState>,
        at: DateTime<Utc>,
    },
}

impl Event {
    pub fn state_change(state: PanelState) -> Self {
        Event::StateChange {
            state,
            at: Utc::now(),
        }
    }

    /// Short machine name for log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            Event::WatchingStarted { .. } => "watching_started",
            Event::WordEncountered { .. } => "word_encountered",
            Event::StateChange { .. } => "state_change",
            Event::NextWordArmed { .. } => "next_word_armed",
            Event::SessionCompleted { .. } => "session_completed",
            Event::WatchingStopped { .. } => "watching_stopped",
            Event::PlayerCorrupted { .. } => "player_corrupted",
            Event::ResumeUnverified { .. } => "resume_unverified",
        }
    }
}
