//! HTTP store client: `GET /store` and `PUT /store` with a bearer credential.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::{AuthContext, Store, StoreError, StoreSnapshot, parse_snapshot};
use crate::config::StoreTimeouts;

pub struct HttpStore {
    http: reqwest::Client,
    base_url: String,
    auth: Arc<dyn AuthContext>,
}

impl HttpStore {
    /// Build a client for the store at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ClientBuild`] if the HTTP client fails to build.
    pub fn new(base_url: &str, auth: Arc<dyn AuthContext>, timeouts: StoreTimeouts) -> Result<Self, StoreError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeouts.request_secs))
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .build()
            .map_err(|e| StoreError::ClientBuild(e.to_string()))?;
        Ok(Self { http, base_url: base_url.trim_end_matches('/').to_string(), auth })
    }

    fn url(&self) -> String {
        format!("{}/store", self.base_url)
    }

    fn token(&self) -> Result<String, StoreError> {
        self.auth.token().ok_or(StoreError::Unauthenticated)
    }

    /// Read the body, failing on any non-2xx status.
    async fn read_body(response: reqwest::Response) -> Result<String, StoreError> {
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| StoreError::Request(e.to_string()))?;
        if !status.is_success() {
            warn!(status = status.as_u16(), "store rejected request");
            return Err(StoreError::Status { status: status.as_u16(), body: text });
        }
        Ok(text)
    }
}

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(Serialize)]
struct ReplaceRequest<'a> {
    store: ReplaceFields<'a>,
}

#[derive(Serialize)]
struct ReplaceFields<'a> {
    presentations: &'a [Value],
}

#[async_trait::async_trait]
impl Store for HttpStore {
    async fn fetch(&self) -> Result<StoreSnapshot, StoreError> {
        let token = self.token()?;
        let response = self
            .http
            .get(self.url())
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| StoreError::Request(e.to_string()))?;
        let text = Self::read_body(response).await?;
        let snapshot = parse_snapshot(&text)?;
        debug!(presentations = snapshot.presentations.len(), "store fetched");
        Ok(snapshot)
    }

    async fn replace_presentations(&self, presentations: &[Value]) -> Result<(), StoreError> {
        let token = self.token()?;
        let body = ReplaceRequest { store: ReplaceFields { presentations } };
        let response = self
            .http
            .put(self.url())
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
            .map_err(|e| StoreError::Request(e.to_string()))?;
        Self::read_body(response).await?;
        debug!(presentations = presentations.len(), "store replaced");
        Ok(())
    }
}
