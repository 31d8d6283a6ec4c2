//! Workflow API handlers
//!
//! One POST endpoint dispatching on `action`, plus a GET endpoint the
//! polling client reads status from.

use crate::api::agents::InitializeResponse;
use crate::api::utils::{ok, validate_industry, ApiResponse};
use crate::coordinator::WorkflowRun;
use crate::error::AppError;
use crate::state::AppState;
use crate::status::{BlockStatus, WorkflowProgress, WorkflowStatusSnapshot};
use axum::{
    extract::{Query, State},
    response::Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Actions accepted by the workflow endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowAction {
    /// Create or reuse the agents
    Initialize,
    /// Run the full workflow for an industry
    Start,
    /// Read all shared blocks
    Status,
    /// Per-phase wizard progress
    ResearchProgress,
    /// Overwrite one shared block
    UpdateBlock,
}

impl WorkflowAction {
    /// Parse an action name; `start_workflow` is accepted as an alias of `start`
    pub fn parse(action: &str) -> Result<Self, AppError> {
        match action {
            "initialize" => Ok(WorkflowAction::Initialize),
            "start" | "start_workflow" => Ok(WorkflowAction::Start),
            "status" => Ok(WorkflowAction::Status),
            "research-progress" => Ok(WorkflowAction::ResearchProgress),
            "update-block" => Ok(WorkflowAction::UpdateBlock),
            other => Err(AppError::BadRequest(format!("Invalid action: {}", other))),
        }
    }
}

/// POST body for /api/workflow
#[derive(Debug, Deserialize)]
pub struct WorkflowRequest {
    /// Action name
    pub action: String,
    /// Industry for `start`
    #[serde(default)]
    pub industry: Option<String>,
    /// Block label for `update-block`
    #[serde(default)]
    pub label: Option<String>,
    /// New block value for `update-block`
    #[serde(default)]
    pub value: Option<String>,
}

/// Query for GET /api/workflow
#[derive(Debug, Deserialize, Default)]
pub struct WorkflowQuery {
    /// `status` (default) or `research-progress`
    #[serde(default)]
    pub action: Option<String>,
}

/// Response to a finished workflow run
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StartResponse {
    /// Human-readable message
    pub message: String,
    /// Per-phase outcome
    #[serde(flatten)]
    pub run: WorkflowRun,
}

/// Response to a block update
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBlockResponse {
    /// Updated label
    pub label: String,
    /// New block status
    pub block: BlockStatus,
}

/// Payload of any workflow action
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum WorkflowData {
    /// Agents initialized
    Initialized(InitializeResponse),
    /// Workflow finished
    Started(StartResponse),
    /// Status snapshot
    Status(WorkflowStatusSnapshot),
    /// Wizard progress
    Progress(WorkflowProgress),
    /// Block updated
    Updated(UpdateBlockResponse),
}

/// POST /api/workflow - Dispatch a workflow action
///
/// Every action initializes the agents on first use.
pub async fn workflow_action(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<WorkflowRequest>,
) -> Result<Json<ApiResponse<WorkflowData>>, AppError> {
    let action = WorkflowAction::parse(&payload.action)?;
    let coordinator = &state.coordinator;

    let data = match action {
        WorkflowAction::Initialize => {
            let agent_ids = coordinator.initialize().await?;
            WorkflowData::Initialized(InitializeResponse {
                message: "Workflow agents initialized".to_string(),
                total_agents: agent_ids.count(),
                agent_ids,
            })
        }
        WorkflowAction::Start => {
            let industry = validate_industry(payload.industry.as_deref())?;
            let run = coordinator.execute_workflow(&industry).await?;
            WorkflowData::Started(StartResponse {
                message: format!("Workflow completed for {}", industry),
                run,
            })
        }
        WorkflowAction::Status => {
            coordinator.initialize().await?;
            WorkflowData::Status(coordinator.workflow_status().await?)
        }
        WorkflowAction::ResearchProgress => {
            coordinator.initialize().await?;
            WorkflowData::Progress(coordinator.research_progress().await?)
        }
        WorkflowAction::UpdateBlock => {
            let (Some(label), Some(value)) = (payload.label, payload.value) else {
                return Err(AppError::BadRequest(
                    "label and value are required for update-block".to_string(),
                ));
            };
            let block = coordinator.update_shared_block(&label, &value).await?;
            WorkflowData::Updated(UpdateBlockResponse { label, block })
        }
    };

    Ok(ok(data))
}

/// GET /api/workflow?action=status|research-progress
///
/// Read-only: never creates agents, so an uninitialized process answers 409.
pub async fn workflow_query(
    State(state): State<Arc<AppState>>,
    Query(query): Query<WorkflowQuery>,
) -> Result<Json<ApiResponse<WorkflowData>>, AppError> {
    let action = WorkflowAction::parse(query.action.as_deref().unwrap_or("status"))?;
    let coordinator = &state.coordinator;

    let data = match action {
        WorkflowAction::Status => WorkflowData::Status(coordinator.workflow_status().await?),
        WorkflowAction::ResearchProgress => {
            WorkflowData::Progress(coordinator.research_progress().await?)
        }
        other => {
            return Err(AppError::BadRequest(format!(
                "Action {:?} requires POST",
                other
            )))
        }
    };

    Ok(ok(data))
}
