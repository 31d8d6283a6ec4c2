//! Market-research API handlers
//!
//! Crawl requests and read-outs from the market-research worker.

use crate::api::utils::{ok, validate_firms, ApiResponse};
use crate::coordinator::AgentAnswer;
use crate::error::AppError;
use crate::remote::Block;
use crate::state::AppState;
use axum::{
    extract::{Query, State},
    response::Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// POST body for /api/agents/research
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResearchRequest {
    /// Requested action; only `crawl_pdfs` is supported
    pub action: String,
    /// Firms to crawl
    #[serde(default)]
    pub firm_names: Option<Vec<String>>,
}

/// Query for GET /api/agents/research
#[derive(Debug, Deserialize, Default)]
pub struct ResearchQuery {
    /// What to read; defaults to chunks
    #[serde(rename = "type", default)]
    pub kind: ResearchKind,
}

/// Read-outs available from the worker
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResearchKind {
    /// Stored PDF chunks
    #[default]
    Chunks,
    /// Crawl report
    Status,
    /// Research summary
    Summary,
    /// Raw core-memory blocks
    Memory,
}

/// Response to a crawl request
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawlResponse {
    /// Human-readable message
    pub message: String,
    /// Firms the crawl was started for
    pub firms: Vec<String>,
    /// Worker reply
    pub response: AgentAnswer,
}

/// Worker read-out
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ResearchData {
    /// Answer to a question
    Answer(AgentAnswer),
    /// Memory blocks of the worker
    Memory {
        /// Attached blocks
        blocks: Vec<Block>,
    },
}

/// POST /api/agents/research - Start a PDF crawl
pub async fn start_research(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ResearchRequest>,
) -> Result<Json<ApiResponse<CrawlResponse>>, AppError> {
    if payload.action != "crawl_pdfs" {
        return Err(AppError::BadRequest(format!(
            "Invalid action: {}",
            payload.action
        )));
    }
    let firms = validate_firms(payload.firm_names)?;

    let response = state.coordinator.crawl_pdfs(&firms).await?;
    Ok(ok(CrawlResponse {
        message: format!("PDF crawling started for {} firms", firms.len()),
        firms,
        response,
    }))
}

/// GET /api/agents/research?type=chunks|status|summary|memory
pub async fn research_data(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ResearchQuery>,
) -> Result<Json<ApiResponse<ResearchData>>, AppError> {
    let coordinator = &state.coordinator;
    let data = match query.kind {
        ResearchKind::Chunks => ResearchData::Answer(coordinator.pdf_chunks().await?),
        ResearchKind::Status => ResearchData::Answer(coordinator.crawling_status().await?),
        ResearchKind::Summary => ResearchData::Answer(coordinator.research_summary().await?),
        ResearchKind::Memory => ResearchData::Memory {
            blocks: coordinator.memory_state().await?,
        },
    };
    Ok(ok(data))
}
