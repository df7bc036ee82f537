use std::path::PathBuf;

use async_trait::async_trait;
use reqwest::header::{CACHE_CONTROL, CONTENT_TYPE};
use tokio::fs;
use uuid::Uuid;

use super::{ObjectMetadata, ObjectStore, PublishError};

/// Object storage endpoint that accepts `PUT {base_url}/{key}`
pub struct HttpObjectStore {
    client: reqwest::Client,
    base_url: String,
    auth_token: Option<String>,
}

impl HttpObjectStore {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>, auth_token: Option<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            auth_token,
        }
    }

    fn object_url(&self, key: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            key.trim_start_matches('/')
        )
    }
}

#[async_trait]
impl ObjectStore for HttpObjectStore {
    async fn put_object(
        &self,
        key: &str,
        body: Vec<u8>,
        metadata: ObjectMetadata,
    ) -> Result<(), PublishError> {
        let failed = |message: String| PublishError::ObjectStore {
            key: key.to_string(),
            message,
        };

        let mut request = self
            .client
            .put(self.object_url(key))
            .header(CONTENT_TYPE, metadata.content_type)
            .header(CACHE_CONTROL, metadata.cache_control)
            .body(body);
        if let Some(token) = &self.auth_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| failed(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(failed(format!("{} {}", status, detail.trim())));
        }

        tracing::debug!("PUT {} -> {}", key, status);
        Ok(())
    }
}

/// Publishes into a local directory, e.g. a static site's asset root
pub struct FsObjectStore {
    root: PathBuf,
}

impl FsObjectStore {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl ObjectStore for FsObjectStore {
    async fn put_object(
        &self,
        key: &str,
        body: Vec<u8>,
        metadata: ObjectMetadata,
    ) -> Result<(), PublishError> {
        let failed = |e: std::io::Error| PublishError::ObjectStore {
            key: key.to_string(),
            message: e.to_string(),
        };

        let target = self.root.join(key.trim_start_matches('/'));
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).await.map_err(failed)?;
        }

        // same-directory rename so readers never see a partial object
        let temp = target.with_file_name(format!(".{}.tmp", Uuid::new_v4()));
        fs::write(&temp, &body).await.map_err(failed)?;
        if let Err(e) = fs::rename(&temp, &target).await {
            let _ = fs::remove_file(&temp).await;
            return Err(failed(e));
        }

        tracing::debug!(
            "Wrote {} ({}, {} bytes) to {}",
            key,
            metadata.content_type,
            body.len(),
            target.display()
        );
        Ok(())
    }
}
