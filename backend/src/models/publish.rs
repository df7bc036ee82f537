use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

/// Pipeline stage an error is attributed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    SelectOrReuse,
    SubsetFont,
    PublishGameData,
    PublishFont,
    InvalidateCache,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageError {
    pub stage: Stage,
    pub message: String,
}

impl StageError {
    pub fn new(stage: Stage, message: impl Into<String>) -> Self {
        Self {
            stage,
            message: message.into(),
        }
    }
}

/// Outcome of one publish attempt. Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PublishResult {
    pub game_data_published: bool,
    pub font_published: bool,
    pub cache_invalidated: bool,
    pub errors: Vec<StageError>,
}

impl PublishResult {
    pub fn record(&mut self, stage: Stage, message: impl Into<String>) {
        self.errors.push(StageError::new(stage, message));
    }
}

/// Terminal state of a pipeline run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunState {
    /// Everything that was attempted succeeded
    Success,
    /// Game data went out, but the font or the invalidation step failed
    Partial,
    /// Game data was not published
    Failed,
}

/// Everything a single invocation reports back to its caller
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub date: NaiveDate,
    pub state: RunState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publish: Option<PublishResult>,
    pub errors: Vec<StageError>,
}

impl RunReport {
    pub fn is_failed(&self) -> bool {
        self.state == RunState::Failed
    }
}
