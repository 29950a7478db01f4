//! Learning panel state machine.
//!
//! ## State Transitions
//!
//! ```text
//! Preview --start watching--> Cruising --word encountered--> Focus
//!                                ^                             |
//!                                +---- practice, next word ----+
//!                                                              |
//!                           Summary <--- practice, no word ----+
//! ```
//!
//! The panel is purely reactive: it never moves on its own. Scheduler
//! events and user actions drive it, plus [`LearningPanel::request_state`]
//! as an escape hatch for the host application.

mod view;

pub use view::{PanelAction, PanelView, WordCard};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::TransitionError;
use crate::events::Event;
use crate::words::FocusWord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PanelState {
    #[default]
    Preview,
    Cruising,
    Focus,
    Summary,
}

impl PanelState {
    /// Whether a scheduler-driven move from `self` to `to` is legal.
    pub fn accepts(self, to: PanelState) -> bool {
        matches!(
            (self, to),
            (PanelState::Preview, PanelState::Cruising)
                | (PanelState::Cruising, PanelState::Focus)
                | (PanelState::Focus, PanelState::Cruising)
                | (PanelState::Focus, PanelState::Summary)
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LearningPanel {
    state: PanelState,
    current_word: Option<FocusWord>,
    previous_word: Option<FocusWord>,
}

impl LearningPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> PanelState {
        self.state
    }

    pub fn current_word(&self) -> Option<&FocusWord> {
        self.current_word.as_ref()
    }

    pub fn previous_word(&self) -> Option<&FocusWord> {
        self.previous_word.as_ref()
    }

    /// User clicked "start watching".
    pub fn begin_watching(&mut self) -> Result<PanelState, TransitionError> {
        self.require(PanelState::Preview, "start watching")?;
        self.state = PanelState::Cruising;
        Ok(self.state)
    }

    /// Check that a practice completion is acceptable right now.
    pub fn ensure_practicing(&self) -> Result<(), TransitionError> {
        self.require(PanelState::Focus, "complete practice")
    }

    /// React to a scheduler event. Returns the new state when it changed.
    pub fn apply(&mut self, event: &Event) -> Option<PanelState> {
        match event {
            Event::WordEncountered { word, .. } => {
                if self.state != PanelState::Cruising {
                    warn!(state = ?self.state, word = %word.text, "word encountered outside cruising, ignored");
                    return None;
                }
                self.previous_word = self.current_word.take();
                self.current_word = Some(word.clone());
                None
            }
            Event::StateChange { state, .. } => self.transition(*state),
            _ => None,
        }
    }

    /// Host escape hatch: move to any state.
    pub fn request_state(&mut self, state: PanelState) -> Option<PanelState> {
        if state == self.state {
            return None;
        }
        debug!(from = ?self.state, to = ?state, "panel state requested by host");
        self.state = state;
        Some(state)
    }

    /// Back to a fresh preview for a new session.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    fn transition(&mut self, to: PanelState) -> Option<PanelState> {
        if to == self.state {
            return None;
        }
        if !self.state.accepts(to) {
            warn!(from = ?self.state, to = ?to, "illegal panel transition ignored");
            return None;
        }
        debug!(from = ?self.state, to = ?to, "panel transition");
        self.state = to;
        Some(to)
    }

    fn require(&self, expected: PanelState, action: &'static str) -> Result<(), TransitionError> {
        if self.state != expected {
            return Err(TransitionError {
                action,
                state: self.state,
            });
        }
        Ok(())
    }
}
