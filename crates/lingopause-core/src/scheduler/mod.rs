//! Micro-pause scheduler.
//!
//! Pauses playback once per focus word, at the word's *end* time so the
//! whole caption sentence is heard before the interruption. Like the rest of
//! the core it owns no timer: the host (or [`crate::driver::PollingLoop`])
//! calls [`MicroPauseScheduler::tick`] at most a second apart.
//!
//! ## States
//!
//! ```text
//! Idle --start_watching--> Armed --tick reaches trigger--> Triggered (paused)
//!   ^                        ^                                  |
//!   |                        +------ continue_to_next_word -----+
//!   +---- stop_watching / no further word (summary) ------------+
//! ```


use std::time::Duration;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::clock::{Clock, SystemClock};
use crate::config::PlaybackConfig;
use crate::events::Event;
use crate::panel::PanelState;
use crate::player::{PlayerAdapter, PlayerState, VideoPlayer};
use crate::session::LearningSession;
use crate::words::ScheduledWord;

/// Minimum distance between the end of the current word and the start of
/// the next word that gets its own pause.
pub const MIN_GAP_SECONDS: f64 = 8.0;

/// A trigger fires this far ahead of the end time so a coarse poll does not
/// overshoot it.
pub const TRIGGER_BUFFER_SECONDS: f64 = 0.3;

/// Ticks closer than this in video time to the last checked tick are dropped.
pub const DEDUP_WINDOW_SECONDS: f64 = 0.5;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchedulerState {
    pub is_watching: bool,
    /// Index into the schedulable word list, not the session's word list.
    pub current_word_index: usize,
    pub next_trigger_timestamp: Option<f64>,
    /// Video time of the last tick that passed the dedup guard.
    pub last_checked_time: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum PendingResume {
    /// Waiting for the widget to finish its pause transition.
    Settling { due: Duration },
    /// Playback was requested; check it took effect.
    Verifying { due: Duration },
}

/// Index of the next word far enough after the word at `index`, plus how
/// many words were passed over to reach it (or to reach the end).
pub fn find_next_trigger(words: &[ScheduledWord], index: usize) -> (Option<usize>, usize) {
    let Some(current) = words.get(index) else {
        return (None, 0);
    };
    let current_end = current.end_time;
    let mut skipped = 0;
    for (candidate, word) in words.iter().enumerate().skip(index + 1) {
        if word.start_time - current_end < MIN_GAP_SECONDS {
            skipped += 1;
            continue;
        }
        return (Some(candidate), skipped);
    }
    (None, skipped)
}

pub struct MicroPauseScheduler<P, C = SystemClock> {
    adapter: PlayerAdapter<P>,
    clock: C,
    config: PlaybackConfig,
    words: Vec<ScheduledWord>,
    session_number: u32,
    state: SchedulerState,
    pending_resume: Option<PendingResume>,
}

impl<P: VideoPlayer, C: Clock> MicroPauseScheduler<P, C> {
    pub fn new(player: P, clock: C, config: PlaybackConfig) -> Self {
        let adapter = PlayerAdapter::with_threshold(Some(player), config.corruption_threshold);
        Self::with_adapter(adapter, clock, config)
    }

    pub fn with_adapter(adapter: PlayerAdapter<P>, clock: C, config: PlaybackConfig) -> Self {
        Self {
            adapter,
            clock,
            config,
            words: Vec::new(),
            session_number: 0,
            state: SchedulerState::default(),
            pending_resume: None,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> &SchedulerState {
        &self.state
    }

    pub fn is_watching(&self) -> bool {
        self.state.is_watching
    }

    pub fn current_word_index(&self) -> usize {
        self.state.current_word_index
    }

    pub fn next_trigger_timestamp(&self) -> Option<f64> {
        self.state.next_trigger_timestamp
    }

    pub fn eligible_words(&self) -> &[ScheduledWord] {
        &self.words
    }

    /// The word at the current index while watching.
    pub fn current_word(&self) -> Option<&ScheduledWord> {
        if !self.state.is_watching {
            return None;
        }
        self.words.get(self.state.current_word_index)
    }

    /// The word the scheduler is waiting to pause on, if any.
    pub fn upcoming_word(&self) -> Option<&ScheduledWord> {
        self.state.next_trigger_timestamp?;
        self.current_word()
    }

    pub fn adapter(&self) -> &PlayerAdapter<P> {
        &self.adapter
    }

    pub fn config(&self) -> &PlaybackConfig {
        &self.config
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Install a recreated widget after corruption.
    pub fn replace_player(&mut self, player: P) {
        info!("player replaced");
        self.adapter.replace_player(player);
    }

    /// Seek to the session start, play, and arm the first word.
    ///
    /// No-ops (with a warning) when the session has no schedulable words or
    /// the player is not ready. Any previous watch is discarded first.
    pub fn start_watching(&mut self, session: &LearningSession) -> Vec<Event> {
        let mut events = Vec::new();
        self.reset();

        let words = session.schedulable_words();
        let Some(first) = words.first() else {
            warn!(
                session = session.session_number,
                "no schedulable words in session, not watching"
            );
            return events;
        };
        let first_trigger = first.end_time;

        if !self.adapter.is_ready() {
            warn!(
                session = session.session_number,
                "player not ready, not watching"
            );
            self.collect_corruption(&mut events);
            return events;
        }

        let start_at = session.session_start_time.max(0.0);
        if !self.adapter.seek_and_play(start_at) {
            warn!(start_at, "could not start playback, watching anyway");
            self.collect_corruption(&mut events);
        }

        let word_count = words.len();
        self.words = words;
        self.session_number = session.session_number;
        self.state = SchedulerState {
            is_watching: true,
            current_word_index: 0,
            next_trigger_timestamp: Some(first_trigger),
            last_checked_time: None,
        };

        info!(
            session = session.session_number,
            words = word_count,
            start_at,
            first_trigger,
            "watching started"
        );
        events.push(Event::WatchingStarted {
            session_number: session.session_number,
            word_count,
            start_at,
            first_trigger_at: first_trigger,
            at: Utc::now(),
        });
        events
    }

    /// Cancel watching. Safe to call any number of times.
    pub fn stop_watching(&mut self) -> Vec<Event> {
        let was_watching = self.state.is_watching;
        self.reset();
        if !was_watching {
            return Vec::new();
        }
        info!(session = self.session_number, "watching stopped");
        vec![Event::WatchingStopped { at: Utc::now() }]
    }

    /// One poll. Call at least once per second while watching.
    pub fn tick(&mut self) -> Vec<Event> {
        let mut events = Vec::new();
        if !self.state.is_watching {
            return events;
        }

        self.run_pending_resume(&mut events);

        let Some(trigger) = self.state.next_trigger_timestamp else {
            return events;
        };

        if !self.adapter.is_ready() {
            self.collect_corruption(&mut events);
            return events;
        }
        let Some((time, player_state)) = self.adapter.snapshot() else {
            self.collect_corruption(&mut events);
            return events;
        };
        if player_state != PlayerState::Playing {
            return events;
        }

        // Keyed on video time, so poll jitter never checks the same moment twice.
        if let Some(last) = self.state.last_checked_time {
            if (time - last).abs() < DEDUP_WINDOW_SECONDS {
                return events;
            }
        }
        self.state.last_checked_time = Some(time);

        if time < trigger - TRIGGER_BUFFER_SECONDS {
            return events;
        }

        self.adapter.pause_if_playing();
        self.collect_corruption(&mut events);
        self.state.next_trigger_timestamp = None;

        let index = self.state.current_word_index;
        if let Some(scheduled) = self.words.get(index) {
            info!(
                index,
                word = %scheduled.word.text,
                video_time = time,
                trigger,
                "micro-pause"
            );
            events.push(Event::WordEncountered {
                index,
                word: scheduled.word.clone(),
                video_time: time,
                at: Utc::now(),
            });
            events.push(Event::state_change(PanelState::Focus));
        }
        events
    }

    /// Arm the next word far enough after the current one and resume
    /// playback, or finish the session when none is left.
    pub fn continue_to_next_word(&mut self) -> Vec<Event> {
        let mut events = Vec::new();
        if !self.state.is_watching {
            warn!("continue requested while not watching");
            return events;
        }

        let (next, skipped) = find_next_trigger(&self.words, self.state.current_word_index);
        let Some((index, trigger_at)) = next.and_then(|i| self.words.get(i).map(|w| (i, w.end_time)))
        else {
            self.state.is_watching = false;
            self.state.next_trigger_timestamp = None;
            self.pending_resume = None;
            info!(session = self.session_number, skipped, "session complete");
            events.push(Event::SessionCompleted {
                session_number: self.session_number,
                skipped,
                at: Utc::now(),
            });
            events.push(Event::state_change(PanelState::Summary));
            return events;
        };

        self.state.current_word_index = index;
        self.state.next_trigger_timestamp = Some(trigger_at);
        debug!(index, trigger_at, skipped, "next word armed");
        events.push(Event::NextWordArmed {
            index,
            trigger_at,
            skipped,
            at: Utc::now(),
        });
        events.push(Event::state_change(PanelState::Cruising));

        let now = self.clock.now();
        let settle = self.config.settle_delay();
        if settle.is_zero() {
            self.resume_playback(now);
        } else {
            self.pending_resume = Some(PendingResume::Settling { due: now + settle });
        }
        self.collect_corruption(&mut events);
        events
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn reset(&mut self) {
        self.state = SchedulerState::default();
        self.pending_resume = None;
        self.words.clear();
    }

    fn resume_playback(&mut self, now: Duration) {
        if !self.adapter.resume() {
            warn!("resume command failed");
        }
        self.pending_resume = Some(PendingResume::Verifying {
            due: now + self.config.resume_verify_delay(),
        });
    }

    fn run_pending_resume(&mut self, events: &mut Vec<Event>) {
        let Some(pending) = self.pending_resume else {
            return;
        };
        let now = self.clock.now();
        match pending {
            PendingResume::Settling { due } if now >= due => {
                self.resume_playback(now);
                self.collect_corruption(events);
            }
            PendingResume::Verifying { due } if now >= due => {
                self.pending_resume = None;
                let state = self.adapter.state();
                if state != Some(PlayerState::Playing) {
                    // Best effort: report, never retry.
                    warn!(?state, "playback did not resume after practice");
                    events.push(Event::ResumeUnverified {
                        state,
                        at: Utc::now(),
                    });
                }
                self.collect_corruption(events);
            }
            _ => {}
        }
    }

    fn collect_corruption(&mut self, events: &mut Vec<Event>) {
        if let Some(err) = self.adapter.take_corruption() {
            warn!(error = %err, "player reported corrupted");
            events.push(Event::PlayerCorrupted {
                reason: err.to_string(),
                at: Utc::now(),
            });
        }
    }
}
