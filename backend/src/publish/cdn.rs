use async_trait::async_trait;
use serde::Serialize;
use uuid::Uuid;

use super::{CdnInvalidator, PublishError};

#[derive(Debug, Serialize)]
struct InvalidationRequest<'a> {
    distribution_id: &'a str,
    paths: &'a [String],
    caller_reference: String,
}

/// Requests path invalidation from a CDN through an HTTP endpoint
pub struct HttpInvalidator {
    client: reqwest::Client,
    endpoint: String,
    distribution_id: String,
    auth_token: Option<String>,
}

impl HttpInvalidator {
    pub fn new(
        client: reqwest::Client,
        endpoint: impl Into<String>,
        distribution_id: impl Into<String>,
        auth_token: Option<String>,
    ) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            distribution_id: distribution_id.into(),
            auth_token,
        }
    }
}

#[async_trait]
impl CdnInvalidator for HttpInvalidator {
    async fn invalidate(&self, paths: &[String]) -> Result<(), PublishError> {
        if paths.is_empty() {
            return Ok(());
        }

        let payload = InvalidationRequest {
            distribution_id: &self.distribution_id,
            paths,
            caller_reference: Uuid::new_v4().to_string(),
        };
        let mut request = self.client.post(&self.endpoint).json(&payload);
        if let Some(token) = &self.auth_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| PublishError::Invalidation(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(PublishError::Invalidation(format!("{} {}", status, detail.trim())));
        }

        tracing::debug!(
            "Invalidation {} accepted for distribution {}",
            payload.caller_reference,
            self.distribution_id
        );
        Ok(())
    }
}
