// Application state
// Shared context handed to every request handler

use crate::config::Config;
use crate::coordinator::WorkflowCoordinator;
use crate::remote::{AgentPlatform, LettaClient};
use crate::state::persistence::AgentIdStore;
use std::sync::Arc;

/// Main application state
/// Holds the configuration and the one coordinator for this process
pub struct AppState {
    /// Loaded configuration
    pub config: Config,
    /// Workflow coordinator shared by all handlers
    pub coordinator: Arc<WorkflowCoordinator>,
}

impl AppState {
    /// Build state backed by the configured remote platform
    pub fn new(config: Config) -> Self {
        let client = LettaClient::new(&config.remote);
        Self::with_platform(config, Arc::new(client))
    }

    /// Build state around any platform implementation
    pub fn with_platform(config: Config, platform: Arc<dyn AgentPlatform>) -> Self {
        let store = AgentIdStore::new(&config.persistence.agent_ids_file);
        let coordinator = WorkflowCoordinator::new(platform, store, config.remote.clone());
        Self {
            config,
            coordinator: Arc::new(coordinator),
        }
    }
}
