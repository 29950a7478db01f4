//! Learning sessions.
//!
//! A session is a batch of focus words presented together before a summary
//! checkpoint. Sessions are values: mastering and substituting a word
//! produces a new session, never an in-place edit of one being scheduled.

mod plan;
mod stats;

pub use plan::plan_sessions;
pub use stats::SessionStats;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::words::{compare_by_start, schedulable_words, FocusWord, ScheduledWord};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "SessionRecord")]
pub struct LearningSession {
    pub session_number: u32,
    pub total_sessions: u32,
    /// Ascending by start time; words without a start time come last.
    pub focus_words: Vec<FocusWord>,
    /// Where playback is seeked to when watching starts.
    pub session_start_time: f64,
    /// Latest end time among the session's words.
    pub session_end_time: f64,
}

/// Wire shape of a session. The stored end time is not trusted; it is
/// derived again from the words.
#[derive(Deserialize)]
struct SessionRecord {
    session_number: u32,
    total_sessions: u32,
    #[serde(default)]
    focus_words: Vec<FocusWord>,
    #[serde(default)]
    session_start_time: f64,
}

impl From<SessionRecord> for LearningSession {
    fn from(record: SessionRecord) -> Self {
        Self::new(
            record.session_number,
            record.total_sessions,
            record.focus_words,
            record.session_start_time,
        )
    }
}

impl LearningSession {
    /// Build a session, sorting the words and deriving the end time.
    pub fn new(
        session_number: u32,
        total_sessions: u32,
        mut focus_words: Vec<FocusWord>,
        session_start_time: f64,
    ) -> Self {
        focus_words.sort_by(compare_by_start);
        let session_end_time = end_time_of(&focus_words);
        Self {
            session_number,
            total_sessions,
            focus_words,
            session_start_time,
            session_end_time,
        }
    }

    /// Words the scheduler can pause on.
    pub fn schedulable_words(&self) -> Vec<ScheduledWord> {
        schedulable_words(&self.focus_words)
    }

    pub fn has_next_session(&self) -> bool {
        self.session_number < self.total_sessions
    }

    pub fn is_empty(&self) -> bool {
        self.focus_words.is_empty()
    }

    /// A new session with the word at `index` substituted by `replacement`.
    ///
    /// Ordering and the end time are recomputed; `self` is left untouched.
    pub fn with_replacement(
        &self,
        index: usize,
        replacement: FocusWord,
    ) -> Result<Self, ValidationError> {
        if index >= self.focus_words.len() {
            return Err(ValidationError::OutOfBounds {
                collection: "focus_words".into(),
                index,
                len: self.focus_words.len(),
            });
        }
        let mut words = self.focus_words.clone();
        words[index] = replacement;
        Ok(Self::new(
            self.session_number,
            self.total_sessions,
            words,
            self.session_start_time,
        ))
    }
}

fn end_time_of(words: &[FocusWord]) -> f64 {
    words
        .iter()
        .filter_map(|w| w.end_time)
        .filter(|t| t.is_finite())
        .fold(0.0, f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_sorts_words_and_derives_end() {
        let session = LearningSession::new(
            1,
            3,
            vec![
                FocusWord::new("run", 20.0, 21.0),
                FocusWord::new("go", 2.0, 3.0),
            ],
            0.0,
        );
        assert_eq!(session.focus_words[0].text, "go");
        assert_eq!(session.focus_words[1].text, "run");
        assert_eq!(session.session_end_time, 21.0);
        assert!(session.has_next_session());
    }

    #[test]
    fn replacement_creates_new_session() {
        let session = LearningSession::new(
            1,
            1,
            vec![
                FocusWord::new("go", 2.0, 3.0),
                FocusWord::new("run", 20.0, 21.0),
            ],
            0.0,
        );

        let replaced = session
            .with_replacement(0, FocusWord::new("walk", 40.0, 42.0))
            .unwrap();

        assert_eq!(session.focus_words[0].text, "go");
        assert_eq!(replaced.focus_words[0].text, "run");
        assert_eq!(replaced.focus_words[1].text, "walk");
        assert_eq!(replaced.session_end_time, 42.0);
        assert!(!replaced.has_next_session());
    }

    #[test]
    fn replacement_rejects_out_of_range_index() {
        let session = LearningSession::new(1, 1, vec![FocusWord::new("go", 2.0, 3.0)], 0.0);
        let err = session
            .with_replacement(4, FocusWord::new("walk", 1.0, 2.0))
            .unwrap_err();
        assert!(matches!(err, ValidationError::OutOfBounds { index: 4, len: 1, .. }));
    }

    #[test]
    fn deserialization_sorts_words_and_recomputes_end() {
        let json = r#"{
            "session_number": 1,
            "total_sessions": 1,
            "session_start_time": 0.0,
            "session_end_time": 0.0,
            "focus_words": [
                {"text": "run", "start_time": 20.0, "end_time": 21.0},
                {"text": "go", "start_time": 2.0, "end_time": 3.0}
            ]
        }"#;
        let session: LearningSession = serde_json::from_str(json).unwrap();
        let texts: Vec<_> = session.focus_words.iter().map(|w| w.text.as_str()).collect();
        assert_eq!(texts, vec!["go", "run"]);
        assert_eq!(session.session_end_time, 21.0);
    }

    #[test]
    fn serialized_session_reads_back_unchanged() {
        let session = LearningSession::new(
            2,
            3,
            vec![
                FocusWord::new("run", 20.0, 21.0),
                FocusWord::new("go", 2.0, 3.0),
            ],
            1.5,
        );
        let json = serde_json::to_string(&session).unwrap();
        assert_eq!(serde_json::from_str::<LearningSession>(&json).unwrap(), session);
    }

    #[test]
    fn nan_start_times_do_not_break_ordering() {
        let words = (0..40)
            .map(|i| {
                let mut word = FocusWord::new(format!("w{i}"), i as f64, i as f64 + 1.0);
                if i % 3 == 0 {
                    word.start_time = Some(f64::NAN);
                }
                word
            })
            .collect();

        let session = LearningSession::new(1, 1, words, 0.0);

        assert_eq!(session.focus_words[0].text, "w1");
        assert!(session.focus_words[39].start_time.is_some_and(f64::is_nan));
        assert_eq!(session.schedulable_words().len(), 26);
    }

    #[test]
    fn end_time_ignores_missing_bounds() {
        let mut open = FocusWord::new("open", 1.0, 99.0);
        open.end_time = None;
        let session = LearningSession::new(1, 1, vec![open, FocusWord::new("go", 2.0, 3.0)], 0.0);
        assert_eq!(session.session_end_time, 3.0);
        assert_eq!(session.schedulable_words().len(), 1);
    }
}
