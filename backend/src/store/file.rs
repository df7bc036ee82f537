use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;
use uuid::Uuid;

use super::{RecordStore, StoreError};
use crate::models::DailyGameRecord;

/// Keeps the daily game record as a single JSON document on disk.
///
/// Writes go to a uniquely named sibling file which is then renamed over the
/// record, so readers only ever see a complete record and concurrent writers
/// resolve to last-writer-wins.
pub struct FileRecordStore {
    path: PathBuf,
}

impl FileRecordStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    fn temp_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "daily_game.json".to_string());
        self.path
            .with_file_name(format!(".{}.{}.tmp", name, Uuid::new_v4()))
    }
}

#[async_trait]
impl RecordStore for FileRecordStore {
    async fn load(&self) -> Result<Option<DailyGameRecord>, StoreError> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::unavailable("reading", e)),
        };

        match serde_json::from_str::<DailyGameRecord>(&content) {
            Ok(record) if record.date == record.puzzle.date && record.puzzle.is_well_formed() => {
                Ok(Some(record))
            }
            Ok(record) => {
                tracing::warn!(
                    "Ignoring malformed daily game record for {} at {}",
                    record.date,
                    self.path.display()
                );
                Ok(None)
            }
            Err(e) => {
                tracing::warn!(
                    "Ignoring unparseable daily game record at {}: {}",
                    self.path.display(),
                    e
                );
                Ok(None)
            }
        }
    }

    async fn save(&self, record: &DailyGameRecord) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::unavailable("creating record directory", e))?;
        }

        let body = serde_json::to_vec_pretty(record)
            .map_err(|e| StoreError::unavailable("serializing", e))?;

        let temp = self.temp_path();
        if let Err(e) = fs::write(&temp, &body).await {
            return Err(StoreError::unavailable("writing", e));
        }
        if let Err(e) = fs::rename(&temp, &self.path).await {
            let _ = fs::remove_file(&temp).await;
            return Err(StoreError::unavailable("replacing record", e));
        }

        tracing::debug!("Saved daily game record for {} to {}", record.date, self.path.display());
        Ok(())
    }
}
