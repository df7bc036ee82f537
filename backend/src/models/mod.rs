pub mod publish;
pub mod puzzle;

pub use publish::{PublishResult, RunReport, RunState, Stage, StageError};
pub use puzzle::{DailyGameRecord, EmojiToken, GamePuzzle, PublishedGame};
