//! Wires the scheduler, the learning panel and session stats together.
//!
//! Scheduler events are applied to the panel and the stats first, then
//! forwarded to the host's [`PanelListener`]. The panel never touches the
//! player; only the scheduler commands it through its adapter.

use tracing::{debug, info, warn};

use crate::clock::{Clock, SystemClock};
use crate::config::PlaybackConfig;
use crate::error::{TransitionError, ValidationError};
use crate::events::Event;
use crate::panel::{LearningPanel, PanelState, PanelView};
use crate::player::VideoPlayer;
use crate::scheduler::MicroPauseScheduler;
use crate::session::{LearningSession, SessionStats};
use crate::words::FocusWord;

/// Host callbacks. All methods default to no-ops.
pub trait PanelListener {
    fn on_word_encountered(&mut self, _word: &FocusWord) {}
    fn on_state_change(&mut self, _state: PanelState) {}
    fn on_player_corrupted(&mut self) {}
}

impl PanelListener for () {}

pub struct LearningController<P, C = SystemClock> {
    session: LearningSession,
    scheduler: MicroPauseScheduler<P, C>,
    panel: LearningPanel,
    stats: SessionStats,
    listener: Box<dyn PanelListener + Send>,
}

impl<P: VideoPlayer, C: Clock> LearningController<P, C> {
    pub fn new(session: LearningSession, player: P, clock: C, config: PlaybackConfig) -> Self {
        let stats = SessionStats::for_session(&session);
        Self {
            session,
            scheduler: MicroPauseScheduler::new(player, clock, config),
            panel: LearningPanel::new(),
            stats,
            listener: Box::new(()),
        }
    }

    pub fn with_listener(mut self, listener: impl PanelListener + Send + 'static) -> Self {
        self.listener = Box::new(listener);
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn session(&self) -> &LearningSession {
        &self.session
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    pub fn panel(&self) -> &LearningPanel {
        &self.panel
    }

    pub fn panel_state(&self) -> PanelState {
        self.panel.state()
    }

    pub fn scheduler(&self) -> &MicroPauseScheduler<P, C> {
        &self.scheduler
    }

    pub fn is_watching(&self) -> bool {
        self.scheduler.is_watching()
    }

    pub fn current_word_index(&self) -> usize {
        self.scheduler.current_word_index()
    }

    pub fn next_trigger_timestamp(&self) -> Option<f64> {
        self.scheduler.next_trigger_timestamp()
    }

    pub fn view(&self) -> PanelView {
        let upcoming = self.scheduler.upcoming_word().map(|s| &s.word);
        self.panel.view(&self.session, upcoming, &self.stats)
    }

    // ── User actions ─────────────────────────────────────────────────

    /// "Start watching" from the preview.
    pub fn start_watching(&mut self) -> Result<Vec<Event>, TransitionError> {
        let state = self.panel.begin_watching()?;
        self.listener.on_state_change(state);
        let events = self.scheduler.start_watching(&self.session);
        if !self.scheduler.is_watching() {
            warn!("scheduler did not start; no automatic pauses this session");
        }
        Ok(self.dispatch(events))
    }

    /// The learner finished the practice for the current word.
    ///
    /// When watching was stopped while the learner practiced, there is no
    /// next word to resume to; the panel closes to summary and the practice
    /// is not counted.
    pub fn complete_practice(&mut self) -> Result<Vec<Event>, TransitionError> {
        self.panel.ensure_practicing()?;
        if !self.scheduler.is_watching() {
            warn!("practice completed after watching stopped, closing session");
            let events = vec![Event::state_change(PanelState::Summary)];
            return Ok(self.dispatch(events));
        }
        self.stats.practiced += 1;
        let events = self.scheduler.continue_to_next_word();
        Ok(self.dispatch(events))
    }

    /// Substitute a mastered word with its replacement. The session is
    /// swapped wholesale; only allowed while not watching.
    pub fn master_word(
        &mut self,
        index: usize,
        replacement: FocusWord,
    ) -> Result<(), ValidationError> {
        if self.scheduler.is_watching() {
            return Err(ValidationError::InvalidValue {
                field: "session".into(),
                message: "cannot replace words while watching".into(),
            });
        }
        let mastered = self
            .session
            .focus_words
            .get(index)
            .map(|w| w.text.clone())
            .unwrap_or_default();
        let next = self.session.with_replacement(index, replacement)?;
        info!(word = %mastered, "word mastered and replaced");
        let mastered_count = self.stats.mastered + 1;
        self.install_session(next);
        self.stats.mastered = mastered_count;
        Ok(())
    }

    // ── Host controls ────────────────────────────────────────────────

    pub fn tick(&mut self) -> Vec<Event> {
        let events = self.scheduler.tick();
        self.dispatch(events)
    }

    pub fn stop_watching(&mut self) -> Vec<Event> {
        let events = self.scheduler.stop_watching();
        self.dispatch(events)
    }

    /// Swap in an updated session. A running watch restarts against it.
    pub fn replace_session(&mut self, session: LearningSession) -> Vec<Event> {
        let was_watching = self.scheduler.is_watching();
        let mastered = self.stats.mastered;
        self.install_session(session);
        self.stats.mastered = mastered;
        if !was_watching {
            return Vec::new();
        }
        let events = self.scheduler.start_watching(&self.session);
        self.dispatch(events)
    }

    /// Move on to the next session: stop watching and show its preview.
    pub fn advance_session(&mut self, next: LearningSession) -> Vec<Event> {
        let mut events = self.stop_watching();
        self.install_session(next);
        self.panel.reset();
        self.listener.on_state_change(PanelState::Preview);
        events.push(Event::state_change(PanelState::Preview));
        events
    }

    /// Host escape hatch onto the panel. Closing the panel to preview or
    /// summary also stops the scheduler.
    pub fn request_state(&mut self, state: PanelState) -> Vec<Event> {
        let events = match state {
            PanelState::Preview | PanelState::Summary => self.stop_watching(),
            PanelState::Cruising | PanelState::Focus => Vec::new(),
        };
        if let Some(changed) = self.panel.request_state(state) {
            self.listener.on_state_change(changed);
        }
        events
    }

    /// Install a recreated widget after `on_player_corrupted`.
    pub fn replace_player(&mut self, player: P) {
        self.scheduler.replace_player(player);
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn install_session(&mut self, session: LearningSession) {
        self.stats = SessionStats::for_session(&session);
        self.session = session;
    }

    fn dispatch(&mut self, events: Vec<Event>) -> Vec<Event> {
        for event in &events {
            debug!(event = event.kind(), "dispatching event");
            let changed = self.panel.apply(event);
            match event {
                Event::WordEncountered { word, .. } => {
                    self.stats.encountered += 1;
                    self.listener.on_word_encountered(word);
                }
                Event::NextWordArmed { skipped, .. } | Event::SessionCompleted { skipped, .. } => {
                    self.stats.skipped += skipped;
                }
                Event::PlayerCorrupted { .. } => self.listener.on_player_corrupted(),
                _ => {}
            }
            if let Some(state) = changed {
                self.listener.on_state_change(state);
            }
        }
        events
    }
}
