//! One pipeline run: select or reuse, subset the font, publish.
//!
//! Terminal states:
//! - `Success`: every attempted step worked
//! - `Partial`: game data is out, the font or the invalidation step failed
//! - `Failed`: no puzzle, or the game data upload failed

use std::path::PathBuf;
use std::sync::Arc;

use chrono::NaiveDate;
use rand::Rng;
use tracing::Instrument;
use uuid::Uuid;

use crate::{
    corpus::EmojiCorpus,
    font::{FontAsset, FontSubsetError, FontSubsetter},
    models::{GamePuzzle, PublishResult, RunReport, RunState, Stage, StageError},
    publish::Publisher,
    store::DailyGameStore,
};

pub mod schedule;

pub struct Orchestrator {
    corpus: Arc<EmojiCorpus>,
    store: DailyGameStore,
    source_font: Option<PathBuf>,
    publisher: Publisher,
}

impl Orchestrator {
    pub fn new(
        corpus: Arc<EmojiCorpus>,
        store: DailyGameStore,
        source_font: Option<PathBuf>,
        publisher: Publisher,
    ) -> Self {
        Self {
            corpus,
            store,
            source_font,
            publisher,
        }
    }

    /// Run the pipeline for `today`. Never returns an error: every failure is
    /// folded into the report's state and error list.
    ///
    /// Subsetting and publishing happen on every call, even when the puzzle
    /// came from the cache.
    pub async fn run<R: Rng + Send>(&self, today: NaiveDate, rng: &mut R) -> RunReport {
        let run_id = Uuid::new_v4();
        let span = tracing::info_span!("daily_game_run", %run_id, %today);
        self.run_stages(run_id, today, rng).instrument(span).await
    }

    async fn run_stages<R: Rng + Send>(
        &self,
        run_id: Uuid,
        today: NaiveDate,
        rng: &mut R,
    ) -> RunReport {
        tracing::info!("Starting daily game pipeline");
        let mut errors = Vec::new();

        let puzzle = match self.store.get_or_create(today, &self.corpus, rng).await {
            Ok(puzzle) => puzzle,
            Err(e) => {
                tracing::error!("Could not obtain a puzzle: {}", e);
                errors.push(StageError::new(Stage::SelectOrReuse, e.to_string()));
                return Self::finish(run_id, today, RunState::Failed, None, errors);
            }
        };

        let font = match self.subset_font(&puzzle).await {
            Ok(font) => font,
            Err(e) => {
                tracing::warn!("Font subsetting failed, publishing without a font: {}", e);
                errors.push(StageError::new(Stage::SubsetFont, e.to_string()));
                None
            }
        };

        let publish = self.publisher.publish(&puzzle, font.as_ref()).await;
        errors.extend(publish.errors.iter().cloned());

        let state = if !publish.game_data_published {
            RunState::Failed
        } else if errors.is_empty() {
            RunState::Success
        } else {
            RunState::Partial
        };

        Self::finish(run_id, today, state, Some(publish), errors)
    }

    async fn subset_font(&self, puzzle: &GamePuzzle) -> Result<Option<FontAsset>, FontSubsetError> {
        let Some(path) = &self.source_font else {
            tracing::debug!("No source font configured, skipping subsetting");
            return Ok(None);
        };

        let subsetter = FontSubsetter::load(path).await?;
        let options = puzzle.options.clone();
        tokio::task::spawn_blocking(move || subsetter.subset(&options))
            .await
            .map_err(|e| FontSubsetError::Subset(format!("Subsetting task failed: {}", e)))?
            .map(Some)
    }

    fn finish(
        run_id: Uuid,
        date: NaiveDate,
        state: RunState,
        publish: Option<PublishResult>,
        errors: Vec<StageError>,
    ) -> RunReport {
        let report = RunReport {
            run_id,
            date,
            state,
            publish,
            errors,
        };

        match serde_json::to_string(&report) {
            Ok(json) if report.is_failed() => tracing::error!("Pipeline finished: {}", json),
            Ok(json) if report.state == RunState::Partial => {
                tracing::warn!("Pipeline finished: {}", json)
            }
            Ok(json) => tracing::info!("Pipeline finished: {}", json),
            Err(e) => tracing::error!("Failed to serialize run report: {}", e),
        }

        report
    }
}
