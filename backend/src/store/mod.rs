use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use rand::Rng;
use thiserror::Error;

use crate::{
    corpus::EmojiCorpus,
    game::{SelectError, Selector},
    models::{DailyGameRecord, GamePuzzle},
};

pub mod file;
#[cfg(test)]
pub mod memory;

pub use file::FileRecordStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Daily game store unavailable while {operation}: {message}")]
    Unavailable {
        operation: &'static str,
        message: String,
    },
}

impl StoreError {
    pub fn unavailable(operation: &'static str, cause: impl std::fmt::Display) -> Self {
        Self::Unavailable {
            operation,
            message: cause.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum DailyGameError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Select(#[from] SelectError),
}

/// Durable home of the single current `DailyGameRecord`.
///
/// `load` returns `Ok(None)` for a missing or unreadable-as-record entry and
/// reserves `Err` for the backend itself being unreachable. `save` replaces the
/// whole record.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn load(&self) -> Result<Option<DailyGameRecord>, StoreError>;

    async fn save(&self, record: &DailyGameRecord) -> Result<(), StoreError>;
}

/// Date-keyed cache deciding between reusing today's puzzle and drawing a new one
pub struct DailyGameStore {
    records: Arc<dyn RecordStore>,
    selector: Selector,
}

impl DailyGameStore {
    pub fn new(records: Arc<dyn RecordStore>, selector: Selector) -> Self {
        Self { records, selector }
    }

    /// Return the puzzle for `today`, generating and persisting one if the
    /// stored record belongs to another date or is missing.
    ///
    /// A cache hit consumes no randomness.
    pub async fn get_or_create<R: Rng + Send>(
        &self,
        today: NaiveDate,
        corpus: &EmojiCorpus,
        rng: &mut R,
    ) -> Result<GamePuzzle, DailyGameError> {
        if let Some(record) = self.records.load().await? {
            if record.date == today {
                tracing::info!("Reusing cached daily game for {}", today);
                return Ok(record.puzzle);
            }
            tracing::info!(
                "Cached daily game is for {}, generating a new one for {}",
                record.date,
                today
            );
        } else {
            tracing::info!("No cached daily game, generating one for {}", today);
        }

        let selection = self.selector.select(corpus, rng)?;
        let puzzle = GamePuzzle {
            date: today,
            options: selection.options,
            answer: selection.answer,
            generated_at: Utc::now(),
        };
        tracing::debug!(
            "Generated daily game: options={:?} answer={:?}",
            puzzle.options,
            puzzle.answer
        );

        self.records.save(&DailyGameRecord::new(puzzle.clone())).await?;

        Ok(puzzle)
    }
}
