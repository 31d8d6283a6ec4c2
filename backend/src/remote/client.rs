//! Agent platform HTTP client
//!
//! Thin reqwest wrapper around the platform's v1 REST API. Every call is
//! classified into a [`RemoteError`] here, at the boundary.

use crate::config::RemoteConfig;
use crate::remote::error::RemoteError;
use crate::remote::types::{
    AgentReply, AgentSummary, Block, CreateAgentRequest, CreateBlockRequest, CreateToolRequest,
    ModifyBlockRequest, SendMessageRequest, Tool,
};
use crate::remote::AgentPlatform;
use async_trait::async_trait;
use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// HTTP client for a Letta-compatible agent platform
#[derive(Clone)]
pub struct LettaClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    request_timeout: Duration,
}

impl LettaClient {
    /// Create a client from configuration with a fresh connection pool
    pub fn new(config: &RemoteConfig) -> Self {
        Self::with_http_client(reqwest::Client::new(), config)
    }

    /// Create a client sharing an existing connection pool
    pub fn with_http_client(http: reqwest::Client, config: &RemoteConfig) -> Self {
        Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            request_timeout: config.request_timeout(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/v1{}", self.base_url, path)
    }

    fn authorized(&self, builder: RequestBuilder) -> Result<RequestBuilder, RemoteError> {
        let api_key = self.api_key.as_deref().ok_or(RemoteError::MissingApiKey)?;
        Ok(builder.bearer_auth(api_key))
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        timeout: Duration,
    ) -> Result<T, RemoteError> {
        let response = self
            .authorized(builder)?
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| RemoteError::from_reqwest(e, timeout))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error body".to_string());

            tracing::error!(
                status_code = status.as_u16(),
                error_body = %error_body,
                "Agent platform returned error status"
            );

            return Err(RemoteError::from_status(status, error_body));
        }

        let body = response
            .text()
            .await
            .map_err(|e| RemoteError::from_reqwest(e, timeout))?;

        serde_json::from_str(&body)
            .map_err(|e| RemoteError::Decode(format!("{} - Response body: {}", e, body)))
    }
}

#[async_trait]
impl AgentPlatform for LettaClient {
    async fn create_agent(&self, request: &CreateAgentRequest) -> Result<AgentSummary, RemoteError> {
        tracing::debug!(name = %request.name, blocks = request.block_ids.len(), "Creating agent");
        let builder = self.http.post(self.url("/agents")).json(request);
        self.execute(builder, self.request_timeout).await
    }

    async fn retrieve_agent(&self, agent_id: &str) -> Result<AgentSummary, RemoteError> {
        let builder = self.http.get(self.url(&format!("/agents/{}", agent_id)));
        self.execute(builder, self.request_timeout).await
    }

    async fn list_agents(&self) -> Result<Vec<AgentSummary>, RemoteError> {
        let builder = self.http.get(self.url("/agents"));
        self.execute(builder, self.request_timeout).await
    }

    async fn list_agent_blocks(&self, agent_id: &str) -> Result<Vec<Block>, RemoteError> {
        let builder = self
            .http
            .get(self.url(&format!("/agents/{}/core-memory/blocks", agent_id)));
        self.execute(builder, self.request_timeout).await
    }

    async fn attach_block(&self, agent_id: &str, block_id: &str) -> Result<(), RemoteError> {
        let builder = self.http.patch(self.url(&format!(
            "/agents/{}/core-memory/blocks/attach/{}",
            agent_id, block_id
        )));
        let _: serde_json::Value = self.execute(builder, self.request_timeout).await?;
        Ok(())
    }

    async fn create_block(&self, request: &CreateBlockRequest) -> Result<Block, RemoteError> {
        tracing::debug!(label = %request.label, limit = request.limit, "Creating block");
        let builder = self.http.post(self.url("/blocks")).json(request);
        self.execute(builder, self.request_timeout).await
    }

    async fn retrieve_block(&self, block_id: &str) -> Result<Block, RemoteError> {
        let builder = self.http.get(self.url(&format!("/blocks/{}", block_id)));
        self.execute(builder, self.request_timeout).await
    }

    async fn modify_block(&self, block_id: &str, value: &str) -> Result<Block, RemoteError> {
        let builder = self
            .http
            .patch(self.url(&format!("/blocks/{}", block_id)))
            .json(&ModifyBlockRequest { value });
        self.execute(builder, self.request_timeout).await
    }

    async fn list_tools(&self) -> Result<Vec<Tool>, RemoteError> {
        let builder = self.http.get(self.url("/tools"));
        self.execute(builder, self.request_timeout).await
    }

    async fn create_tool(&self, request: &CreateToolRequest) -> Result<Tool, RemoteError> {
        tracing::debug!(source_len = request.source_code.len(), "Registering tool");
        let builder = self.http.post(self.url("/tools")).json(request);
        self.execute(builder, self.request_timeout).await
    }

    async fn send_message(
        &self,
        agent_id: &str,
        content: &str,
        timeout: Duration,
    ) -> Result<AgentReply, RemoteError> {
        tracing::debug!(
            agent_id = %agent_id,
            prompt_len = content.len(),
            timeout_secs = timeout.as_secs(),
            "Sending message to agent"
        );
        let builder = self
            .http
            .post(self.url(&format!("/agents/{}/messages", agent_id)))
            .json(&SendMessageRequest::user(content));
        self.execute(builder, timeout).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};
    use serial_test::serial;

    fn client_for(base_url: &str) -> LettaClient {
        LettaClient::new(&RemoteConfig {
            base_url: base_url.to_string(),
            api_key: Some("test-key".to_string()),
            ..Default::default()
        })
    }

    #[tokio::test]
    async fn test_missing_api_key() {
        let client = LettaClient::new(&RemoteConfig::default());
        let result = client.retrieve_agent("agent-1").await;
        assert!(matches!(result, Err(RemoteError::MissingApiKey)));
    }

    #[tokio::test]
    #[serial]
    async fn test_create_agent_success() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/agents")
            .match_header("authorization", "Bearer test-key")
            .match_header("content-type", "application/json")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "name": "OrchestratorAgent",
                "block_ids": ["block-1"],
            })))
            .with_status(200)
            .with_body(r#"{"id": "agent-123", "name": "OrchestratorAgent", "tools": []}"#)
            .create_async()
            .await;

        let client = client_for(&server.url());
        let request = CreateAgentRequest {
            name: "OrchestratorAgent".to_string(),
            memory_blocks: vec![],
            block_ids: vec!["block-1".to_string()],
            model: "openai/gpt-4.1".to_string(),
            embedding: "openai/text-embedding-3-small".to_string(),
            context_window_limit: Some(16_000),
            tools: vec![],
            tool_ids: vec![],
            tags: vec![],
        };
        let agent = client.create_agent(&request).await.unwrap();

        mock.assert_async().await;
        assert_eq!(agent.id, "agent-123");
        assert_eq!(agent.name, "OrchestratorAgent");
    }

    #[tokio::test]
    #[serial]
    async fn test_create_tool_and_agent_with_tool_ids() {
        let mut server = Server::new_async().await;
        let tool_mock = server
            .mock("POST", "/v1/tools")
            .match_header("authorization", "Bearer test-key")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "source_code": "def fetch_and_extract_pdf(pdf_url: str) -> str:\n    return pdf_url\n",
                "tags": ["marketgap"],
            })))
            .with_status(200)
            .with_body(r#"{"id": "tool-7", "name": "fetch_and_extract_pdf", "tool_type": "custom"}"#)
            .create_async()
            .await;
        let agent_mock = server
            .mock("POST", "/v1/agents")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "name": "Worker",
                "tools": ["web_search"],
                "tool_ids": ["tool-7"],
            })))
            .with_status(200)
            .with_body(r#"{"id": "agent-9", "name": "Worker"}"#)
            .create_async()
            .await;

        let client = client_for(&server.url());
        let tool = client
            .create_tool(&CreateToolRequest {
                source_code: "def fetch_and_extract_pdf(pdf_url: str) -> str:\n    return pdf_url\n"
                    .to_string(),
                description: None,
                tags: vec!["marketgap".to_string()],
            })
            .await
            .unwrap();
        assert_eq!(tool.id, "tool-7");
        assert_eq!(tool.name, "fetch_and_extract_pdf");

        let request = CreateAgentRequest {
            name: "Worker".to_string(),
            memory_blocks: vec![],
            block_ids: vec![],
            model: "openai/gpt-4.1".to_string(),
            embedding: "openai/text-embedding-3-small".to_string(),
            context_window_limit: None,
            tools: vec!["web_search".to_string()],
            tool_ids: vec![tool.id],
            tags: vec![],
        };
        client.create_agent(&request).await.unwrap();

        tool_mock.assert_async().await;
        agent_mock.assert_async().await;
    }

    #[tokio::test]
    #[serial]
    async fn test_list_tools() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/v1/tools")
            .with_status(200)
            .with_body(r#"[{"id": "tool-1", "name": "web_search"}, {"id": "tool-2", "name": "fetch_and_extract_pdf"}]"#)
            .create_async()
            .await;

        let client = client_for(&server.url());
        let tools = client.list_tools().await.unwrap();

        mock.assert_async().await;
        let names: Vec<&str> = tools.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["web_search", "fetch_and_extract_pdf"]);
    }

    #[tokio::test]
    #[serial]
    async fn test_send_message_parses_reply() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/agents/agent-1/messages")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "messages": [{"role": "user", "content": "hello"}]
            })))
            .with_status(200)
            .with_body(
                r#"{"messages": [{"message_type": "assistant_message", "content": "hi there"}]}"#,
            )
            .create_async()
            .await;

        let client = client_for(&server.url());
        let reply = client
            .send_message("agent-1", "hello", Duration::from_secs(5))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(reply.assistant_text().as_deref(), Some("hi there"));
    }

    #[tokio::test]
    #[serial]
    async fn test_modify_block_sends_value() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("PATCH", "/v1/blocks/block-9")
            .match_body(Matcher::Json(serde_json::json!({"value": "[]"})))
            .with_status(200)
            .with_body(r#"{"id": "block-9", "label": "gap_list", "value": "[]", "limit": 10000}"#)
            .create_async()
            .await;

        let client = client_for(&server.url());
        let block = client.modify_block("block-9", "[]").await.unwrap();

        mock.assert_async().await;
        assert_eq!(block.label.as_deref(), Some("gap_list"));
        assert_eq!(block.limit, Some(10_000));
    }

    #[tokio::test]
    #[serial]
    async fn test_unauthorized_status() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/v1/agents/agent-1")
            .with_status(401)
            .with_body(r#"{"detail": "Invalid token"}"#)
            .create_async()
            .await;

        let client = client_for(&server.url());
        let result = client.retrieve_agent("agent-1").await;

        mock.assert_async().await;
        assert!(matches!(
            result,
            Err(RemoteError::Unauthorized { status: 401, .. })
        ));
    }

    #[tokio::test]
    #[serial]
    async fn test_quota_status() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/v1/blocks/block-1")
            .with_status(402)
            .with_body("billing required")
            .create_async()
            .await;

        let client = client_for(&server.url());
        let result = client.retrieve_block("block-1").await;

        mock.assert_async().await;
        assert!(matches!(
            result,
            Err(RemoteError::QuotaExceeded { status: 402, .. })
        ));
    }

    #[tokio::test]
    #[serial]
    async fn test_not_found_status() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/v1/agents/missing")
            .with_status(404)
            .with_body("Agent not found")
            .create_async()
            .await;

        let client = client_for(&server.url());
        let result = client.retrieve_agent("missing").await;

        mock.assert_async().await;
        assert!(result.unwrap_err().is_not_found());
    }

    #[tokio::test]
    #[serial]
    async fn test_invalid_json_body() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/v1/agents")
            .with_status(200)
            .with_body("This is not JSON")
            .create_async()
            .await;

        let client = client_for(&server.url());
        let result = client.list_agents().await;

        mock.assert_async().await;
        match result {
            Err(RemoteError::Decode(msg)) => assert!(msg.contains("This is not JSON")),
            other => panic!("Expected decode error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_connection_refused_is_network_error() {
        // Port 9 (discard) is not expected to accept HTTP connections
        let client = client_for("http://127.0.0.1:9");
        let result = client.list_agents().await;
        assert!(matches!(
            result,
            Err(RemoteError::Network(_)) | Err(RemoteError::Timeout(_))
        ));
    }

    #[test]
    fn test_url_trims_trailing_slash() {
        let client = client_for("https://api.letta.com/");
        assert_eq!(client.url("/agents"), "https://api.letta.com/v1/agents");
    }
}
