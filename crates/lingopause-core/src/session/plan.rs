//! Splitting an extracted word list into consecutive sessions.

use tracing::debug;

use super::LearningSession;
use crate::error::ValidationError;
use crate::words::FocusWord;

/// Split `words` into sessions of `words_per_session` schedulable words.
///
/// Only schedulable words are planned; the rest are dropped here since a
/// session built from them could never pause. Sessions follow video order:
/// the first starts at 0 and each later one starts where the previous
/// session's last word ended. `max_sessions` of 0 means no cap.
pub fn plan_sessions(
    words: &[FocusWord],
    words_per_session: usize,
    max_sessions: usize,
) -> Result<Vec<LearningSession>, ValidationError> {
    if words_per_session == 0 {
        return Err(ValidationError::InvalidValue {
            field: "words_per_session".into(),
            message: "must be at least 1".into(),
        });
    }

    let ordered: Vec<FocusWord> = crate::words::schedulable_words(words)
        .into_iter()
        .map(|s| s.word)
        .collect();
    if ordered.is_empty() {
        return Err(ValidationError::EmptyCollection(
            "no words with a usable time window".into(),
        ));
    }

    let mut chunks: Vec<Vec<FocusWord>> = ordered
        .chunks(words_per_session)
        .map(|c| c.to_vec())
        .collect();
    if max_sessions > 0 {
        chunks.truncate(max_sessions);
    }

    let total = chunks.len() as u32;
    let mut start = 0.0;
    let mut sessions = Vec::with_capacity(chunks.len());
    for (i, chunk) in chunks.into_iter().enumerate() {
        let session = LearningSession::new(i as u32 + 1, total, chunk, start);
        start = session.session_end_time;
        sessions.push(session);
    }

    debug!(
        sessions = sessions.len(),
        words = ordered.len(),
        "planned learning sessions"
    );
    Ok(sessions)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words() -> Vec<FocusWord> {
        vec![
            FocusWord::new("e", 50.0, 51.0),
            FocusWord::new("a", 2.0, 3.0),
            FocusWord::new("c", 20.0, 22.0),
            FocusWord::new("b", 10.0, 11.0),
            FocusWord::new("d", 35.0, 36.0),
            FocusWord::new("bad", 40.0, 39.0),
        ]
    }

    #[test]
    fn splits_in_video_order() {
        let sessions = plan_sessions(&words(), 2, 0).unwrap();
        assert_eq!(sessions.len(), 3);

        let texts: Vec<Vec<&str>> = sessions
            .iter()
            .map(|s| s.focus_words.iter().map(|w| w.text.as_str()).collect())
            .collect();
        assert_eq!(texts, vec![vec!["a", "b"], vec!["c", "d"], vec!["e"]]);

        assert_eq!(sessions[0].session_number, 1);
        assert_eq!(sessions[2].total_sessions, 3);
    }

    #[test]
    fn sessions_chain_start_times() {
        let sessions = plan_sessions(&words(), 2, 0).unwrap();
        assert_eq!(sessions[0].session_start_time, 0.0);
        assert_eq!(sessions[1].session_start_time, sessions[0].session_end_time);
        assert_eq!(sessions[2].session_start_time, 36.0);
    }

    #[test]
    fn caps_session_count() {
        let sessions = plan_sessions(&words(), 2, 2).unwrap();
        assert_eq!(sessions.len(), 2);
        assert!(sessions.iter().all(|s| s.total_sessions == 2));
    }

    #[test]
    fn rejects_zero_per_session_and_empty_input() {
        assert!(plan_sessions(&words(), 0, 0).is_err());
        let err = plan_sessions(&[FocusWord::new("bad", 5.0, 1.0)], 3, 0).unwrap_err();
        assert!(matches!(err, ValidationError::EmptyCollection(_)));
    }
}
