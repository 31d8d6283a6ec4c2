//! Agent initialization API handlers
//!
//! Create, inspect and forget the remote orchestrator and market-research
//! agents.

use crate::api::utils::{ok, ApiResponse};
use crate::coordinator::AgentIds;
use crate::error::AppError;
use crate::state::AppState;
use axum::{extract::State, response::Json};
use serde::Serialize;
use std::sync::Arc;

/// Response to a successful initialization
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeResponse {
    /// Human-readable message
    pub message: String,
    /// Ids of the agents now in use
    pub agent_ids: AgentIds,
    /// Number of agents in use
    pub total_agents: usize,
}

/// Initialization status
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializationStatus {
    /// Agents are cached in this process
    pub is_initialized: bool,
    /// Cached agent ids
    pub agent_ids: AgentIds,
    /// Number of cached agents
    pub agent_count: usize,
}

/// Response to a reset
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetResponse {
    /// Human-readable message
    pub message: String,
    /// Always `false` after a reset
    pub is_initialized: bool,
}

/// POST /api/agents/initialize - Create or reuse the remote agents
pub async fn initialize_agents(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<InitializeResponse>>, AppError> {
    let agent_ids = state.coordinator.initialize().await?;
    tracing::info!(agents = agent_ids.count(), "Agents initialized");

    Ok(ok(InitializeResponse {
        message: "Agents initialized successfully".to_string(),
        total_agents: agent_ids.count(),
        agent_ids,
    }))
}

/// GET /api/agents/initialize - Report whether agents are initialized
pub async fn initialization_status(
    State(state): State<Arc<AppState>>,
) -> Json<ApiResponse<InitializationStatus>> {
    let agent_ids = state.coordinator.agent_ids().await;
    ok(InitializationStatus {
        is_initialized: state.coordinator.is_initialized().await,
        agent_count: agent_ids.count(),
        agent_ids,
    })
}

/// DELETE /api/agents/initialize - Forget cached and stored agent ids
pub async fn reset_agents(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<ResetResponse>>, AppError> {
    state.coordinator.reset().await?;
    Ok(ok(ResetResponse {
        message: "Agent ids cleared".to_string(),
        is_initialized: false,
    }))
}
