// Backend HTTP client
// Talks to the MarketGap backend's /api/workflow endpoints

use crate::poller::{PollError, StatusSource};
use async_trait::async_trait;
use marketgap_backend::status::WorkflowStatusSnapshot;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;

/// Timeout for a single status read
const STATUS_TIMEOUT: Duration = Duration::from_secs(30);

/// Response envelope used by every backend route
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: DeserializeOwned"))]
struct Envelope<T> {
    success: bool,
    #[serde(default)]
    data: Option<T>,
    #[serde(default)]
    error: Option<String>,
}

/// Client for the backend API
#[derive(Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    base_url: String,
}

impl BackendClient {
    /// Create a client for the backend at `base_url`
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn workflow_url(&self) -> String {
        format!("{}/api/workflow", self.base_url)
    }

    /// Create or reuse the remote agents
    pub async fn initialize(&self) -> Result<Value, PollError> {
        let request = self
            .http
            .post(self.workflow_url())
            .json(&json!({"action": "initialize"}));
        self.send(request).await
    }

    /// Run the whole workflow for `industry`. Returns when the backend does,
    /// which can take many minutes.
    pub async fn start_workflow(&self, industry: &str) -> Result<Value, PollError> {
        let request = self
            .http
            .post(self.workflow_url())
            .json(&json!({"action": "start", "industry": industry}));
        self.send(request).await
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, PollError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        let envelope: Envelope<T> = serde_json::from_str(&body)
            .map_err(|e| PollError::Decode(format!("{} - Response body: {}", e, body)))?;

        if !status.is_success() || !envelope.success {
            return Err(PollError::Backend {
                status: status.as_u16(),
                message: envelope
                    .error
                    .unwrap_or_else(|| "Unknown backend error".to_string()),
            });
        }

        envelope
            .data
            .ok_or_else(|| PollError::Decode("Response has no data".to_string()))
    }
}

#[async_trait]
impl StatusSource for BackendClient {
    async fn fetch_status(&self) -> Result<WorkflowStatusSnapshot, PollError> {
        let request = self
            .http
            .get(self.workflow_url())
            .query(&[("action", "status")])
            .timeout(STATUS_TIMEOUT);
        self.send(request).await
    }
}
