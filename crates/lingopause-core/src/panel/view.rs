//! What each panel state exposes to the UI layer.

use serde::{Deserialize, Serialize};

use super::{LearningPanel, PanelState};
use crate::session::{LearningSession, SessionStats};
use crate::words::{CefrLevel, FocusWord};

/// User intents a view can offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum PanelAction {
    StartWatching,
    /// Mark the word at this position of the session's word list as known.
    MasterWord { index: usize },
    CompletePractice,
    NextSession,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordCard {
    pub index: usize,
    pub text: String,
    pub level: CefrLevel,
    pub schedulable: bool,
    pub action: PanelAction,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum PanelView {
    Preview {
        session_number: u32,
        total_sessions: u32,
        words: Vec<WordCard>,
        actions: Vec<PanelAction>,
    },
    /// Playback runs uninterrupted; no pause controls.
    Cruising {
        previous_word: Option<FocusWord>,
        next_word: Option<FocusWord>,
    },
    Focus {
        word: Option<FocusWord>,
        actions: Vec<PanelAction>,
    },
    Summary {
        session_number: u32,
        stats: SessionStats,
        completion_ratio: f64,
        has_next_session: bool,
        actions: Vec<PanelAction>,
    },
}

impl LearningPanel {
    /// Build the view for the current state. `upcoming` is the word the
    /// scheduler is waiting to pause on.
    pub fn view(
        &self,
        session: &LearningSession,
        upcoming: Option<&FocusWord>,
        stats: &SessionStats,
    ) -> PanelView {
        match self.state() {
            PanelState::Preview => PanelView::Preview {
                session_number: session.session_number,
                total_sessions: session.total_sessions,
                words: session
                    .focus_words
                    .iter()
                    .enumerate()
                    .map(|(index, word)| WordCard {
                        index,
                        text: word.text.clone(),
                        level: word.level,
                        schedulable: word.is_schedulable(),
                        action: PanelAction::MasterWord { index },
                    })
                    .collect(),
                actions: vec![PanelAction::StartWatching],
            },
            PanelState::Cruising => PanelView::Cruising {
                previous_word: self.current_word().cloned(),
                next_word: upcoming.cloned(),
            },
            PanelState::Focus => PanelView::Focus {
                word: self.current_word().cloned(),
                actions: vec![PanelAction::CompletePractice],
            },
            PanelState::Summary => {
                let has_next_session = session.has_next_session();
                PanelView::Summary {
                    session_number: session.session_number,
                    stats: stats.clone(),
                    completion_ratio: stats.completion_ratio(),
                    has_next_session,
                    actions: if has_next_session {
                        vec![PanelAction::NextSession]
                    } else {
                        Vec::new()
                    },
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::Event;

    fn session(number: u32, total: u32) -> LearningSession {
        LearningSession::new(
            number,
            total,
            vec![
                FocusWord::new("go", 2.0, 3.0),
                FocusWord::new("run", 20.0, 21.0),
            ],
            0.0,
        )
    }

    #[test]
    fn preview_lists_words_with_mastery_actions() {
        let panel = LearningPanel::new();
        let view = panel.view(&session(1, 2), None, &SessionStats::default());
        let PanelView::Preview { words, actions, .. } = view else {
            panic!("Expected Preview");
        };
        assert_eq!(words.len(), 2);
        assert_eq!(words[1].action, PanelAction::MasterWord { index: 1 });
        assert_eq!(actions, vec![PanelAction::StartWatching]);
    }

    #[test]
    fn cruising_shows_last_word_and_upcoming_preview() {
        let mut panel = LearningPanel::new();
        panel.begin_watching().unwrap();
        panel.apply(&Event::WordEncountered {
            index: 0,
            word: FocusWord::new("go", 2.0, 3.0),
            video_time: 3.0,
            at: chrono::Utc::now(),
        });

        let next = FocusWord::new("run", 20.0, 21.0);
        let view = panel.view(&session(1, 2), Some(&next), &SessionStats::default());
        match view {
            PanelView::Cruising {
                previous_word,
                next_word,
            } => {
                assert_eq!(previous_word.map(|w| w.text), Some("go".to_string()));
                assert_eq!(next_word.map(|w| w.text), Some("run".to_string()));
            }
            other => panic!("Expected Cruising, got {other:?}"),
        }
    }

    #[test]
    fn summary_offers_next_session_only_when_one_remains() {
        let mut panel = LearningPanel::new();
        panel.request_state(PanelState::Summary);

        let stats = SessionStats {
            schedulable_words: 2,
            practiced: 1,
            ..SessionStats::default()
        };
        let PanelView::Summary {
            actions,
            completion_ratio,
            ..
        } = panel.view(&session(1, 2), None, &stats)
        else {
            panic!("Expected Summary");
        };
        assert_eq!(actions, vec![PanelAction::NextSession]);
        assert_eq!(completion_ratio, 0.5);

        let PanelView::Summary {
            has_next_session, ..
        } = panel.view(&session(2, 2), None, &stats)
        else {
            panic!("Expected Summary");
        };
        assert!(!has_next_session);
    }
}
