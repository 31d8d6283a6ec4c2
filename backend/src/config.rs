//! Application configuration
//!
//! Centralized configuration management with environment variable support
//! and sensible defaults.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Default base URL of the hosted agent platform
pub const DEFAULT_LETTA_BASE_URL: &str = "https://api.letta.com";

/// Application configuration
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Server configuration
    pub server: ServerConfig,
    /// Persistence configuration
    pub persistence: PersistenceConfig,
    /// Remote agent platform configuration
    pub remote: RemoteConfig,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port to bind the server to
    pub port: u16,
    /// Host address to bind to
    pub host: String,
}

/// Persistence configuration
#[derive(Debug, Clone)]
pub struct PersistenceConfig {
    /// File holding the orchestrator and market-research agent ids
    pub agent_ids_file: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            host: "0.0.0.0".to_string(),
        }
    }
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            agent_ids_file: PathBuf::from(".agent-ids.json"),
        }
    }
}

/// Remote agent platform configuration
#[derive(Clone)]
pub struct RemoteConfig {
    /// Base URL of the platform API (without the `/v1` suffix)
    pub base_url: String,
    /// Bearer token. `None` is only an error once a remote call is attempted.
    pub api_key: Option<String>,
    /// Model handle used when creating agents
    pub model: String,
    /// Embedding handle used when creating agents
    pub embedding: String,
    /// Context window passed on agent creation
    pub context_window_limit: u32,
    /// Timeout for ordinary remote calls (in seconds)
    pub request_timeout_secs: u64,
    /// Timeout for long-running instruction messages (in seconds)
    pub workflow_timeout_secs: u64,
}

// Hand-written so the API key never ends up in logs.
impl std::fmt::Debug for RemoteConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("embedding", &self.embedding)
            .field("context_window_limit", &self.context_window_limit)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("workflow_timeout_secs", &self.workflow_timeout_secs)
            .finish()
    }
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_LETTA_BASE_URL.to_string(),
            api_key: None,
            model: "openai/gpt-4.1".to_string(),
            embedding: "openai/text-embedding-3-small".to_string(),
            context_window_limit: 16_000,
            request_timeout_secs: 120,
            workflow_timeout_secs: 900, // 15 minutes
        }
    }
}

impl RemoteConfig {
    /// Timeout applied to ordinary remote calls
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Timeout applied to each workflow instruction
    pub fn workflow_timeout(&self) -> Duration {
        Duration::from_secs(self.workflow_timeout_secs)
    }
}

impl Config {
    /// Load configuration from environment variables with defaults
    pub fn from_env() -> Self {
        let defaults = Config::default();
        let remote_defaults = defaults.remote;
        Self {
            server: ServerConfig {
                port: env::var("PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(defaults.server.port),
                host: env::var("HOST").unwrap_or(defaults.server.host),
            },
            persistence: PersistenceConfig {
                agent_ids_file: env::var("AGENT_IDS_FILE")
                    .map(PathBuf::from)
                    .unwrap_or(defaults.persistence.agent_ids_file),
            },
            remote: RemoteConfig {
                base_url: env::var("LETTA_BASE_URL")
                    .ok()
                    .filter(|url| !url.trim().is_empty())
                    .unwrap_or(remote_defaults.base_url),
                api_key: env::var("LETTA_API_KEY")
                    .ok()
                    .filter(|key| !key.trim().is_empty()),
                model: env::var("LETTA_MODEL").unwrap_or(remote_defaults.model),
                embedding: env::var("LETTA_EMBEDDING").unwrap_or(remote_defaults.embedding),
                context_window_limit: remote_defaults.context_window_limit,
                request_timeout_secs: env::var("REQUEST_TIMEOUT_SECS")
                    .ok()
                    .and_then(|t| t.parse().ok())
                    .unwrap_or(remote_defaults.request_timeout_secs),
                workflow_timeout_secs: env::var("WORKFLOW_TIMEOUT_SECS")
                    .ok()
                    .and_then(|t| t.parse().ok())
                    .unwrap_or(remote_defaults.workflow_timeout_secs),
            },
        }
    }

    /// Get the server address as a string
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_defaults() {
        let config = Config::default();
        assert_eq!(config.server_addr(), "0.0.0.0:8080");
        assert_eq!(config.persistence.agent_ids_file, PathBuf::from(".agent-ids.json"));
    }

    #[test]
    fn test_remote_defaults() {
        let remote = RemoteConfig::default();
        assert_eq!(remote.base_url, "https://api.letta.com");
        assert!(remote.api_key.is_none());
        assert_eq!(remote.workflow_timeout(), Duration::from_secs(900));
        assert_eq!(remote.request_timeout(), Duration::from_secs(120));
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let remote = RemoteConfig {
            api_key: Some("sk-secret-value".to_string()),
            ..Default::default()
        };
        let printed = format!("{:?}", remote);
        assert!(!printed.contains("sk-secret-value"));
        assert!(printed.contains("<redacted>"));
    }
}
