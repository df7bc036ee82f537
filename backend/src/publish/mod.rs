use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::{
    font::FontAsset,
    models::{GamePuzzle, PublishResult, PublishedGame, Stage},
};

pub mod cdn;
#[cfg(test)]
pub mod fakes;
pub mod object_store;

pub use cdn::HttpInvalidator;
pub use object_store::{FsObjectStore, HttpObjectStore};

pub const GAME_DATA_CACHE_CONTROL: &str = "no-cache, no-store, must-revalidate";
pub const FONT_CACHE_CONTROL: &str = "public, max-age=31536000, immutable";

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("Upload of {key} failed: {message}")]
    ObjectStore { key: String, message: String },

    #[error("Cache invalidation failed: {0}")]
    Invalidation(String),

    #[error("Failed to serialize game data: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Headers an object is stored with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjectMetadata {
    pub content_type: &'static str,
    pub cache_control: &'static str,
}

/// Durable destination for published artifacts. `put_object` overwrites.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn put_object(
        &self,
        key: &str,
        body: Vec<u8>,
        metadata: ObjectMetadata,
    ) -> Result<(), PublishError>;
}

/// Edge cache in front of the object store
#[async_trait]
pub trait CdnInvalidator: Send + Sync {
    async fn invalidate(&self, paths: &[String]) -> Result<(), PublishError>;
}

/// Pushes a puzzle and, when present, its font to the distribution target,
/// then invalidates what was uploaded.
pub struct Publisher {
    store: Arc<dyn ObjectStore>,
    invalidator: Option<Arc<dyn CdnInvalidator>>,
    game_data_key: String,
    font_key: String,
}

impl Publisher {
    pub fn new(
        store: Arc<dyn ObjectStore>,
        invalidator: Option<Arc<dyn CdnInvalidator>>,
        game_data_key: impl Into<String>,
        font_key: impl Into<String>,
    ) -> Self {
        Self {
            store,
            invalidator,
            game_data_key: game_data_key.into(),
            font_key: font_key.into(),
        }
    }

    pub async fn publish(&self, puzzle: &GamePuzzle, font: Option<&FontAsset>) -> PublishResult {
        let mut result = PublishResult::default();
        let mut uploaded = Vec::new();

        // Step 1: game data. Nothing else runs if this fails.
        match self.upload_game_data(puzzle).await {
            Ok(()) => {
                tracing::info!("Published game data for {} to {}", puzzle.date, self.game_data_key);
                result.game_data_published = true;
                uploaded.push(cdn_path(&self.game_data_key));
            }
            Err(e) => {
                tracing::error!("Failed to publish game data: {}", e);
                result.record(Stage::PublishGameData, e.to_string());
                return result;
            }
        }

        // Step 2: font, best effort
        if let Some(font) = font {
            let metadata = ObjectMetadata {
                content_type: "font/ttf",
                cache_control: FONT_CACHE_CONTROL,
            };
            match self
                .store
                .put_object(&self.font_key, font.data.clone(), metadata)
                .await
            {
                Ok(()) => {
                    tracing::info!(
                        "Published subset font ({} code points, {} bytes) to {}",
                        font.code_points.len(),
                        font.data.len(),
                        self.font_key
                    );
                    result.font_published = true;
                    uploaded.push(cdn_path(&self.font_key));
                }
                Err(e) => {
                    tracing::warn!("Failed to publish subset font: {}", e);
                    result.record(Stage::PublishFont, e.to_string());
                }
            }
        }

        // Step 3: invalidate only what this run rewrote
        match &self.invalidator {
            Some(invalidator) => match invalidator.invalidate(&uploaded).await {
                Ok(()) => {
                    tracing::info!("Invalidated CDN paths {:?}", uploaded);
                    result.cache_invalidated = true;
                }
                Err(e) => {
                    tracing::warn!("CDN invalidation failed: {}", e);
                    result.record(Stage::InvalidateCache, e.to_string());
                }
            },
            None => tracing::debug!("No CDN configured, skipping invalidation"),
        }

        result
    }

    async fn upload_game_data(&self, puzzle: &GamePuzzle) -> Result<(), PublishError> {
        let body = serde_json::to_vec(&PublishedGame::from(puzzle))?;
        let metadata = ObjectMetadata {
            content_type: "application/json",
            cache_control: GAME_DATA_CACHE_CONTROL,
        };
        self.store
            .put_object(&self.game_data_key, body, metadata)
            .await
    }
}

fn cdn_path(key: &str) -> String {
    format!("/{}", key.trim_start_matches('/'))
}
