//! Remote agent platform
//!
//! The hosted platform owns agents, memory blocks and tool execution. This
//! module is the only place that talks to it; the rest of the crate goes
//! through the [`AgentPlatform`] trait.

pub mod client;
pub mod error;
pub mod types;

pub use client::LettaClient;
pub use error::RemoteError;
pub use types::{
    AgentReply, AgentSummary, Block, CreateAgentRequest, CreateBlockRequest, CreateToolRequest, Tool,
};

use async_trait::async_trait;
use std::time::Duration;

/// Operations the coordinator needs from the agent platform
#[async_trait]
pub trait AgentPlatform: Send + Sync {
    /// Create an agent with the given blocks attached
    async fn create_agent(&self, request: &CreateAgentRequest) -> Result<AgentSummary, RemoteError>;

    /// Fetch one agent; `RemoteError::NotFound` if it no longer exists
    async fn retrieve_agent(&self, agent_id: &str) -> Result<AgentSummary, RemoteError>;

    /// List all agents visible to the API key
    async fn list_agents(&self) -> Result<Vec<AgentSummary>, RemoteError>;

    /// List the core-memory blocks attached to an agent
    async fn list_agent_blocks(&self, agent_id: &str) -> Result<Vec<Block>, RemoteError>;

    /// Attach an existing block to an agent's core memory
    async fn attach_block(&self, agent_id: &str, block_id: &str) -> Result<(), RemoteError>;

    /// Create a standalone (shareable) block
    async fn create_block(&self, request: &CreateBlockRequest) -> Result<Block, RemoteError>;

    /// Fetch one block by id
    async fn retrieve_block(&self, block_id: &str) -> Result<Block, RemoteError>;

    /// Overwrite a block's value
    async fn modify_block(&self, block_id: &str, value: &str) -> Result<Block, RemoteError>;

    /// List the tools registered on the platform
    async fn list_tools(&self) -> Result<Vec<Tool>, RemoteError>;

    /// Register a custom tool from its source
    async fn create_tool(&self, request: &CreateToolRequest) -> Result<Tool, RemoteError>;

    /// Send one user message and wait for the agent's reply
    async fn send_message(
        &self,
        agent_id: &str,
        content: &str,
        timeout: Duration,
    ) -> Result<AgentReply, RemoteError>;
}
