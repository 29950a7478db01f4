use std::path::PathBuf;

use clap::Subcommand;
use lingopause_core::scheduler::find_next_trigger;
use lingopause_core::{plan_sessions, Config, FocusWord, LearningSession};
use serde::Serialize;

use super::read_json;

#[derive(Subcommand)]
pub enum SessionAction {
    /// Split an extracted word list (JSON array) into learning sessions
    Plan {
        /// Path to a JSON array of focus words
        words: PathBuf,
        /// Words per session (defaults to session.words_per_session)
        #[arg(long)]
        per_session: Option<usize>,
        /// Maximum number of sessions, 0 for no cap (defaults to session.total_sessions_cap)
        #[arg(long)]
        max_sessions: Option<usize>,
    },
    /// Show which words of a session get their own pause
    Inspect {
        /// Path to a session JSON file
        session: PathBuf,
    },
}

#[derive(Serialize)]
struct Trigger {
    index: usize,
    text: String,
    start_time: f64,
    trigger_at: f64,
}

#[derive(Serialize)]
struct Inspection {
    session_number: u32,
    total_sessions: u32,
    schedulable: usize,
    triggers: Vec<Trigger>,
    skipped: Vec<String>,
    unschedulable: Vec<String>,
}

fn inspect(session: &LearningSession) -> Inspection {
    let words = session.schedulable_words();
    let mut triggers = Vec::new();
    let mut skipped = Vec::new();

    let mut cursor = if words.is_empty() { None } else { Some(0) };
    while let Some(index) = cursor {
        let word = &words[index];
        triggers.push(Trigger {
            index,
            text: word.word.text.clone(),
            start_time: word.start_time,
            trigger_at: word.end_time,
        });
        let (next, passed) = find_next_trigger(&words, index);
        skipped.extend(
            words[index + 1..]
                .iter()
                .take(passed)
                .map(|w| w.word.text.clone()),
        );
        cursor = next;
    }

    Inspection {
        session_number: session.session_number,
        total_sessions: session.total_sessions,
        schedulable: words.len(),
        triggers,
        skipped,
        unschedulable: session
            .focus_words
            .iter()
            .filter(|w| !w.is_schedulable())
            .map(|w| w.text.clone())
            .collect(),
    }
}

pub fn run(action: SessionAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        SessionAction::Plan {
            words,
            per_session,
            max_sessions,
        } => {
            let words: Vec<FocusWord> = read_json(&words)?;
            let config = Config::load_or_default();
            let sessions = plan_sessions(
                &words,
                per_session.unwrap_or(config.session.words_per_session),
                max_sessions.unwrap_or(config.session.total_sessions_cap),
            )?;
            println!("{}", serde_json::to_string_pretty(&sessions)?);
        }
        SessionAction::Inspect { session } => {
            let session: LearningSession = read_json(&session)?;
            println!("{}", serde_json::to_string_pretty(&inspect(&session))?);
        }
    }
    Ok(())
}
