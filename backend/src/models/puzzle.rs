use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One renderable emoji, possibly several code points forming a single grapheme.
/// Identity is the exact code point sequence; no normalization is applied.
pub type EmojiToken = String;

/// The puzzle for one calendar day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GamePuzzle {
    pub date: NaiveDate,
    pub options: Vec<EmojiToken>,
    pub answer: Vec<EmojiToken>,
    pub generated_at: DateTime<Utc>,
}

impl GamePuzzle {
    /// Number of answer tokens the player has to find
    pub fn required_count(&self) -> usize {
        self.answer.len()
    }

    /// Check the structural invariants: distinct options, distinct answer
    /// tokens, and every answer token present in the options.
    pub fn is_well_formed(&self) -> bool {
        let options: HashSet<&str> = self.options.iter().map(String::as_str).collect();
        if options.len() != self.options.len() || self.answer.is_empty() {
            return false;
        }

        let answer: HashSet<&str> = self.answer.iter().map(String::as_str).collect();
        answer.len() == self.answer.len() && answer.is_subset(&options)
    }
}

/// The persisted cache entry. Replaced wholesale when the date rolls over.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyGameRecord {
    pub date: NaiveDate,
    pub puzzle: GamePuzzle,
}

impl DailyGameRecord {
    pub fn new(puzzle: GamePuzzle) -> Self {
        Self {
            date: puzzle.date,
            puzzle,
        }
    }
}

/// Document uploaded to the distribution target.
///
/// `emojis` mirrors `options` because the web client reads that field.
#[derive(Debug, Serialize)]
pub struct PublishedGame<'a> {
    pub date: NaiveDate,
    pub options: &'a [EmojiToken],
    pub emojis: &'a [EmojiToken],
    pub answer: &'a [EmojiToken],
    pub required_count: usize,
    pub generated_at: DateTime<Utc>,
}

impl<'a> From<&'a GamePuzzle> for PublishedGame<'a> {
    fn from(puzzle: &'a GamePuzzle) -> Self {
        Self {
            date: puzzle.date,
            options: &puzzle.options,
            emojis: &puzzle.options,
            answer: &puzzle.answer,
            required_count: puzzle.required_count(),
            generated_at: puzzle.generated_at,
        }
    }
}
