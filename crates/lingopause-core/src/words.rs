//! Timestamped focus words.
//!
//! A [`FocusWord`] carries the caption window (`start_time`..`end_time`, in
//! seconds of video time) in which the word is spoken. Words missing either
//! bound, or whose bounds are inverted, stay visible to the learner but are
//! never scheduled for a micro-pause.

use serde::{Deserialize, Deserializer, Serialize};
use std::cmp::Ordering;

/// CEFR proficiency tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Default)]
pub enum CefrLevel {
    A1,
    #[default]
    A2,
    B1,
    B2,
    C1,
    C2,
}

impl CefrLevel {
    /// 1 (A1) through 6 (C2).
    pub fn rank(&self) -> u8 {
        match self {
            Self::A1 => 1,
            Self::A2 => 2,
            Self::B1 => 3,
            Self::B2 => 4,
            Self::C1 => 5,
            Self::C2 => 6,
        }
    }

    /// Parse a tag case-insensitively. Returns `None` for anything that is not
    /// one of the six levels.
    pub fn parse(tag: &str) -> Option<Self> {
        match tag.trim().to_ascii_uppercase().as_str() {
            "A1" => Some(Self::A1),
            "A2" => Some(Self::A2),
            "B1" => Some(Self::B1),
            "B2" => Some(Self::B2),
            "C1" => Some(Self::C1),
            "C2" => Some(Self::C2),
            _ => None,
        }
    }
}

// The extraction backend tags unknown difficulty loosely; fall back to A2
// the same way it does instead of rejecting the whole word list.
impl<'de> Deserialize<'de> for CefrLevel {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let tag = String::deserialize(deserializer)?;
        Ok(Self::parse(&tag).unwrap_or_default())
    }
}

/// A vocabulary or grammar item with its caption time window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FocusWord {
    #[serde(alias = "word")]
    pub text: String,
    #[serde(default)]
    pub definition: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentence: Option<String>,
    /// Seconds into the video where the word's caption starts.
    #[serde(default)]
    pub start_time: Option<f64>,
    /// Seconds into the video where the word's caption ends.
    #[serde(default)]
    pub end_time: Option<f64>,
    #[serde(default)]
    pub level: CefrLevel,
}

impl FocusWord {
    pub fn new(text: impl Into<String>, start_time: f64, end_time: f64) -> Self {
        Self {
            text: text.into(),
            definition: String::new(),
            translation: None,
            sentence: None,
            start_time: Some(start_time),
            end_time: Some(end_time),
            level: CefrLevel::default(),
        }
    }

    pub fn with_definition(mut self, definition: impl Into<String>) -> Self {
        self.definition = definition.into();
        self
    }

    pub fn with_level(mut self, level: CefrLevel) -> Self {
        self.level = level;
        self
    }

    /// Both bounds present, finite, and ordered.
    pub fn is_schedulable(&self) -> bool {
        self.time_window().is_some()
    }

    /// `(start, end)` when the word can be scheduled.
    pub fn time_window(&self) -> Option<(f64, f64)> {
        match (self.start_time, self.end_time) {
            (Some(start), Some(end)) if start.is_finite() && end.is_finite() && start <= end => {
                Some((start, end))
            }
            _ => None,
        }
    }
}

/// A focus word that passed the eligibility filter, with its bounds unwrapped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledWord {
    /// Position of the word inside its session's `focus_words`.
    pub session_index: usize,
    pub start_time: f64,
    pub end_time: f64,
    pub word: FocusWord,
}

/// Order by start time; words without a finite start sort last.
pub(crate) fn compare_by_start(a: &FocusWord, b: &FocusWord) -> Ordering {
    let finite_start = |w: &FocusWord| w.start_time.filter(|t| t.is_finite());
    match (finite_start(a), finite_start(b)) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Filter `words` down to the schedulable ones, ascending by start time.
///
/// The sort is stable, so words sharing a start time keep their input order.
pub fn schedulable_words(words: &[FocusWord]) -> Vec<ScheduledWord> {
    let mut scheduled: Vec<ScheduledWord> = words
        .iter()
        .enumerate()
        .filter_map(|(session_index, word)| {
            let (start_time, end_time) = word.time_window()?;
            Some(ScheduledWord {
                session_index,
                start_time,
                end_time,
                word: word.clone(),
            })
        })
        .collect();
    scheduled.sort_by(|a, b| a.start_time.total_cmp(&b.start_time));
    scheduled
}
