use serde::{Deserialize, Serialize};

use super::LearningSession;

/// Aggregate counters shown on the summary checkpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStats {
    pub total_words: usize,
    pub schedulable_words: usize,
    /// Words the scheduler paused on.
    pub encountered: usize,
    /// Practice interactions the learner completed.
    pub practiced: usize,
    /// Words passed over because they sat too close to the previous pause.
    pub skipped: usize,
    pub mastered: usize,
}

impl SessionStats {
    pub fn for_session(session: &LearningSession) -> Self {
        Self {
            total_words: session.focus_words.len(),
            schedulable_words: session.schedulable_words().len(),
            ..Self::default()
        }
    }

    /// Share of schedulable words that got a practice interaction, 0.0 ..= 1.0.
    pub fn completion_ratio(&self) -> f64 {
        if self.schedulable_words == 0 {
            return 0.0;
        }
        (self.practiced as f64 / self.schedulable_words as f64).min(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::words::FocusWord;

    #[test]
    fn counts_session_words() {
        let mut open = FocusWord::new("open", 1.0, 2.0);
        open.start_time = None;
        let session = LearningSession::new(
            1,
            1,
            vec![FocusWord::new("go", 2.0, 3.0), open],
            0.0,
        );
        let stats = SessionStats::for_session(&session);
        assert_eq!(stats.total_words, 2);
        assert_eq!(stats.schedulable_words, 1);
        assert_eq!(stats.completion_ratio(), 0.0);
    }

    #[test]
    fn completion_ratio_is_capped() {
        let stats = SessionStats {
            schedulable_words: 2,
            practiced: 3,
            ..SessionStats::default()
        };
        assert_eq!(stats.completion_ratio(), 1.0);
    }
}
