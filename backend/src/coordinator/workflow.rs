//! Workflow coordinator
//!
//! Owns the remote orchestrator and market-research agents plus the
//! label → block-id map of the shared memory blocks. One instance is built at
//! startup and handed to request handlers through `AppState`.

use crate::catalog::CONSULTING_FIRMS;
use crate::config::RemoteConfig;
use crate::coordinator::blocks::{self, CONSULTING_DOCS, CONSULTING_GROUPS, SHARED_BLOCKS, WORKFLOW_STATE};
use crate::coordinator::prompts;
use crate::coordinator::tools::{
    CustomToolSpec, MARKET_RESEARCH_BUILTIN_TOOLS, MARKET_RESEARCH_TOOLS, ORCHESTRATOR_BUILTIN_TOOLS,
};
use crate::remote::{AgentPlatform, AgentReply, Block, CreateAgentRequest, CreateBlockRequest, RemoteError};
use crate::state::persistence::{AgentIdStore, StoredAgentIds};
use crate::status::{BlockStatus, WizardPhase, WorkflowProgress, WorkflowStatusSnapshot};
use chrono::Utc;
use futures_util::future::join_all;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Mutex;

/// Name of the orchestrator agent on the platform
pub const ORCHESTRATOR_NAME: &str = "MarketGapOrchestrator";
/// Name of the market-research worker on the platform
pub const MARKET_RESEARCH_NAME: &str = "MarketGapMarketResearch";

/// Shared blocks the market-research worker is attached to
const WORKER_BLOCKS: [&str; 2] = [CONSULTING_GROUPS, CONSULTING_DOCS];

/// Errors raised by the coordinator
#[derive(Error, Debug)]
pub enum CoordinatorError {
    /// The platform call failed
    #[error(transparent)]
    Remote(#[from] RemoteError),

    /// An operation needs agents that have not been initialized
    #[error("Agents not initialized. Call initialize first.")]
    NotInitialized,

    /// Caller input was rejected
    #[error("{0}")]
    InvalidInput(String),

    /// No shared block has this label
    #[error("Unknown memory block: {0}")]
    UnknownBlock(String),

    /// The agent id file could not be written or removed
    #[error("Persistence error: {0}")]
    Persistence(#[from] crate::state::PersistenceError),
}

/// Agent ids currently held by the coordinator
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentIds {
    /// Orchestrator agent id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orchestrator: Option<String>,
    /// Market-research worker agent id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market_research: Option<String>,
}

impl AgentIds {
    /// Number of ids present
    pub fn count(&self) -> usize {
        usize::from(self.orchestrator.is_some()) + usize::from(self.market_research.is_some())
    }
}

/// Phases recorded in the `workflow_state` block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowPhase {
    /// Nothing sent yet
    Initialization,
    /// Consulting research
    MarketResearch,
    /// Gap analysis
    GapAnalysis,
    /// Solution ideation
    Ideation,
    /// All phases done
    Completed,
    /// A phase failed
    Failed,
}

impl WorkflowPhase {
    /// Phases sent to the orchestrator, in order
    pub const SEQUENCE: [WorkflowPhase; 3] = [
        WorkflowPhase::MarketResearch,
        WorkflowPhase::GapAnalysis,
        WorkflowPhase::Ideation,
    ];

    fn instruction(self, industry: &str) -> Option<String> {
        match self {
            WorkflowPhase::MarketResearch => Some(prompts::research_instruction(industry, CONSULTING_FIRMS)),
            WorkflowPhase::GapAnalysis => Some(prompts::gap_analysis_instruction(industry)),
            WorkflowPhase::Ideation => Some(prompts::ideation_instruction(industry)),
            _ => None,
        }
    }
}

/// JSON record kept in the `workflow_state` block
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct WorkflowStateRecord {
    industry: String,
    current_phase: WorkflowPhase,
    completed_phases: Vec<WorkflowPhase>,
    failed_phases: Vec<WorkflowPhase>,
    last_updated: String,
}

/// Outcome of one workflow phase
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseOutcome {
    /// The phase
    pub phase: WorkflowPhase,
    /// Assistant reply, if the agent sent one
    pub reply: Option<String>,
    /// Tools the agent called
    pub tool_calls: Vec<String>,
}

/// Result of a completed workflow run
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowRun {
    /// Industry the workflow ran for
    pub industry: String,
    /// Orchestrator that ran it
    pub orchestrator_id: String,
    /// One entry per phase, in order
    pub phases: Vec<PhaseOutcome>,
}

/// Reply to a question put to the market-research worker
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentAnswer {
    /// Assistant text, or a fallback when the agent sent none
    pub text: String,
    /// Tools the agent called
    pub tool_calls: Vec<String>,
}

impl AgentAnswer {
    fn from_reply(reply: &AgentReply, fallback: &str) -> Self {
        Self {
            text: reply.assistant_text().unwrap_or_else(|| fallback.to_string()),
            tool_calls: reply.tool_calls(),
        }
    }
}

#[derive(Debug, Clone)]
struct Handles {
    orchestrator_id: String,
    market_research_id: String,
    block_ids: BTreeMap<String, String>,
}

impl Handles {
    fn agent_ids(&self) -> AgentIds {
        AgentIds {
            orchestrator: Some(self.orchestrator_id.clone()),
            market_research: Some(self.market_research_id.clone()),
        }
    }
}

/// Coordinates the remote agents for one process
pub struct WorkflowCoordinator {
    platform: Arc<dyn AgentPlatform>,
    store: AgentIdStore,
    remote: RemoteConfig,
    handles: Mutex<Option<Handles>>,
}

impl WorkflowCoordinator {
    /// Create a coordinator. No remote call is made until first use.
    pub fn new(platform: Arc<dyn AgentPlatform>, store: AgentIdStore, remote: RemoteConfig) -> Self {
        Self {
            platform,
            store,
            remote,
            handles: Mutex::new(None),
        }
    }

    /// True once agents are cached in this process
    pub async fn is_initialized(&self) -> bool {
        self.handles.lock().await.is_some()
    }

    /// Agent ids cached in this process (empty before initialization)
    pub async fn agent_ids(&self) -> AgentIds {
        self.handles
            .lock()
            .await
            .as_ref()
            .map(Handles::agent_ids)
            .unwrap_or_default()
    }

    /// Make sure both agents and all shared blocks exist.
    ///
    /// Within one process the cached handles are returned without any remote
    /// call. On a fresh process, stored ids are verified on the platform,
    /// then agents are searched by name, and only what is still missing is
    /// created.
    pub async fn initialize(&self) -> Result<AgentIds, CoordinatorError> {
        let handles = self.ensure_handles().await?;
        Ok(handles.agent_ids())
    }

    async fn ensure_handles(&self) -> Result<Handles, CoordinatorError> {
        let mut guard = self.handles.lock().await;
        if let Some(handles) = guard.as_ref() {
            return Ok(handles.clone());
        }

        let stored = match self.store.load() {
            Ok(ids) => ids,
            Err(e) => {
                tracing::warn!(path = %self.store.path().display(), "Failed to load agent ids: {}", e);
                StoredAgentIds::default()
            }
        };

        let mut orchestrator = self.verify_agent(stored.orchestrator.clone()).await?;
        let mut market_research = self.verify_agent(stored.market_research.clone()).await?;

        if orchestrator.is_none() || market_research.is_none() {
            let existing = self.platform.list_agents().await?;
            if orchestrator.is_none() {
                orchestrator = find_by_name(&existing, ORCHESTRATOR_NAME);
            }
            if market_research.is_none() {
                market_research = find_by_name(&existing, MARKET_RESEARCH_NAME);
            }
        }

        let mut created = false;
        let block_ids = match (&orchestrator, &market_research) {
            (Some(agent_id), _) => self.attached_shared_blocks(agent_id).await?,
            (None, Some(worker_id)) => self.blocks_shared_with_worker(worker_id).await?,
            (None, None) => self.create_shared_blocks().await?,
        };

        let orchestrator_id = match orchestrator {
            Some(id) => {
                tracing::info!(agent_id = %id, "Reusing existing orchestrator agent");
                id
            }
            None => {
                created = true;
                let ids: Vec<String> = block_ids.values().cloned().collect();
                self.create_agent(
                    ORCHESTRATOR_NAME,
                    prompts::ORCHESTRATOR_PERSONA,
                    ids,
                    ORCHESTRATOR_BUILTIN_TOOLS,
                    Vec::new(),
                )
                .await?
            }
        };

        let market_research_id = match market_research {
            Some(id) => {
                tracing::info!(agent_id = %id, "Reusing existing market-research agent");
                id
            }
            None => {
                created = true;
                let ids: Vec<String> = WORKER_BLOCKS
                    .iter()
                    .filter_map(|label| block_ids.get(*label).cloned())
                    .collect();
                let tool_ids = self.ensure_tools(MARKET_RESEARCH_TOOLS).await?;
                self.create_agent(
                    MARKET_RESEARCH_NAME,
                    prompts::MARKET_RESEARCH_PERSONA,
                    ids,
                    MARKET_RESEARCH_BUILTIN_TOOLS,
                    tool_ids,
                )
                .await?
            }
        };

        let handles = Handles {
            orchestrator_id,
            market_research_id,
            block_ids,
        };

        let to_store = StoredAgentIds {
            orchestrator: Some(handles.orchestrator_id.clone()),
            market_research: Some(handles.market_research_id.clone()),
            timestamp: None,
        };
        let changed = stored.orchestrator != to_store.orchestrator
            || stored.market_research != to_store.market_research;
        if created || changed {
            if let Err(e) = self.store.save(&to_store) {
                tracing::warn!(path = %self.store.path().display(), "Failed to save agent ids: {}", e);
            }
        }

        *guard = Some(handles.clone());
        Ok(handles)
    }

    /// `Some(id)` if the stored agent still exists, `None` if it is gone.
    /// Other failures propagate so a flaky network never causes duplicates.
    async fn verify_agent(&self, stored: Option<String>) -> Result<Option<String>, CoordinatorError> {
        let Some(agent_id) = stored else {
            return Ok(None);
        };
        match self.platform.retrieve_agent(&agent_id).await {
            Ok(agent) => Ok(Some(agent.id)),
            Err(e) if e.is_not_found() => {
                tracing::info!(agent_id = %agent_id, "Stored agent no longer exists");
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn create_shared_blocks(&self) -> Result<BTreeMap<String, String>, CoordinatorError> {
        let mut block_ids = BTreeMap::new();
        for spec in SHARED_BLOCKS {
            let block = self.platform.create_block(&spec.create_request()).await?;
            tracing::debug!(label = spec.label, block_id = %block.id, "Created shared block");
            block_ids.insert(spec.label.to_string(), block.id);
        }
        Ok(block_ids)
    }

    /// Shared block set for a new orchestrator next to a reused worker. The
    /// worker's own blocks are kept so both agents keep reading the same
    /// research; the rest are created fresh.
    async fn blocks_shared_with_worker(
        &self,
        worker_id: &str,
    ) -> Result<BTreeMap<String, String>, CoordinatorError> {
        let attached = self.platform.list_agent_blocks(worker_id).await?;
        let mut block_ids = BTreeMap::new();
        for spec in SHARED_BLOCKS {
            let worker_block = WORKER_BLOCKS.contains(&spec.label);
            let existing = attached
                .iter()
                .find(|block| worker_block && block.label.as_deref() == Some(spec.label));
            let block_id = match existing {
                Some(block) => {
                    tracing::info!(label = spec.label, block_id = %block.id, "Reusing worker block");
                    block.id.clone()
                }
                None => {
                    let block = self.platform.create_block(&spec.create_request()).await?;
                    if worker_block {
                        self.platform.attach_block(worker_id, &block.id).await?;
                        tracing::info!(label = spec.label, agent_id = %worker_id, "Attached missing shared block");
                    }
                    block.id
                }
            };
            block_ids.insert(spec.label.to_string(), block_id);
        }
        Ok(block_ids)
    }

    /// Map the shared blocks already attached to `agent_id`; create and
    /// attach any that are missing.
    async fn attached_shared_blocks(
        &self,
        agent_id: &str,
    ) -> Result<BTreeMap<String, String>, CoordinatorError> {
        let attached = self.platform.list_agent_blocks(agent_id).await?;
        let mut block_ids = BTreeMap::new();
        for spec in SHARED_BLOCKS {
            let existing = attached
                .iter()
                .find(|block| block.label.as_deref() == Some(spec.label));
            let block_id = match existing {
                Some(block) => block.id.clone(),
                None => {
                    let block = self.platform.create_block(&spec.create_request()).await?;
                    self.platform.attach_block(agent_id, &block.id).await?;
                    tracing::info!(label = spec.label, agent_id = %agent_id, "Attached missing shared block");
                    block.id
                }
            };
            block_ids.insert(spec.label.to_string(), block_id);
        }
        Ok(block_ids)
    }

    /// Ids of the given custom tools, registering those the platform does
    /// not know yet
    async fn ensure_tools(&self, specs: &[CustomToolSpec]) -> Result<Vec<String>, CoordinatorError> {
        if specs.is_empty() {
            return Ok(Vec::new());
        }
        let registered = self.platform.list_tools().await?;
        let mut tool_ids = Vec::with_capacity(specs.len());
        for spec in specs {
            match registered.iter().find(|tool| tool.name == spec.name) {
                Some(tool) => tool_ids.push(tool.id.clone()),
                None => {
                    let tool = self.platform.create_tool(&spec.create_request()).await?;
                    tracing::info!(tool = spec.name, tool_id = %tool.id, "Registered custom tool");
                    tool_ids.push(tool.id);
                }
            }
        }
        Ok(tool_ids)
    }

    async fn create_agent(
        &self,
        name: &str,
        persona: &str,
        block_ids: Vec<String>,
        tools: &[&str],
        tool_ids: Vec<String>,
    ) -> Result<String, CoordinatorError> {
        let request = CreateAgentRequest {
            name: name.to_string(),
            memory_blocks: vec![CreateBlockRequest {
                label: "persona".to_string(),
                value: persona.to_string(),
                limit: 3_000,
                description: None,
            }],
            block_ids,
            model: self.remote.model.clone(),
            embedding: self.remote.embedding.clone(),
            context_window_limit: Some(self.remote.context_window_limit),
            tools: tools.iter().map(|tool| tool.to_string()).collect(),
            tool_ids,
            tags: vec!["marketgap".to_string()],
        };
        let agent = self.platform.create_agent(&request).await?;
        tracing::info!(agent_id = %agent.id, name = %name, "Created agent");
        Ok(agent.id)
    }

    async fn current_handles(&self) -> Result<Handles, CoordinatorError> {
        self.handles
            .lock()
            .await
            .clone()
            .ok_or(CoordinatorError::NotInitialized)
    }

    async fn send(
        &self,
        agent_id: &str,
        content: &str,
        timeout: Duration,
    ) -> Result<AgentReply, CoordinatorError> {
        let reply = tokio::time::timeout(timeout, self.platform.send_message(agent_id, content, timeout))
            .await
            .map_err(|_| RemoteError::Timeout(timeout.as_secs()))??;
        reply.log(agent_id);
        Ok(reply)
    }

    /// Run research → gap analysis → ideation for `industry`.
    ///
    /// Initializes on first use. The phase blocks go back to their sentinels
    /// first, so progress left by an earlier run never counts for this one.
    /// Each phase waits up to the workflow timeout;
    /// the first failing phase is recorded in `workflow_state` and its error
    /// returned.
    pub async fn execute_workflow(&self, industry: &str) -> Result<WorkflowRun, CoordinatorError> {
        let industry = industry.trim();
        if industry.is_empty() {
            return Err(CoordinatorError::InvalidInput(
                "Industry is required for workflow".to_string(),
            ));
        }

        let handles = self.ensure_handles().await?;
        let timeout = self.remote.workflow_timeout();
        tracing::info!(industry = %industry, agent_id = %handles.orchestrator_id, "Starting workflow");

        let mut record = WorkflowStateRecord {
            industry: industry.to_string(),
            current_phase: WorkflowPhase::Initialization,
            completed_phases: Vec::new(),
            failed_phases: Vec::new(),
            last_updated: Utc::now().to_rfc3339(),
        };
        let mut outcomes = Vec::with_capacity(WorkflowPhase::SEQUENCE.len());
        self.clear_phase_blocks(&handles).await;

        for phase in WorkflowPhase::SEQUENCE {
            let Some(instruction) = phase.instruction(industry) else {
                continue;
            };
            record.current_phase = phase;
            self.record_state(&handles, &mut record).await;

            match self.send(&handles.orchestrator_id, &instruction, timeout).await {
                Ok(reply) => {
                    tracing::info!(industry = %industry, phase = ?phase, "Workflow phase finished");
                    record.completed_phases.push(phase);
                    outcomes.push(PhaseOutcome {
                        phase,
                        reply: reply.assistant_text(),
                        tool_calls: reply.tool_calls(),
                    });
                }
                Err(e) => {
                    tracing::error!(industry = %industry, phase = ?phase, "Workflow phase failed: {}", e);
                    record.failed_phases.push(phase);
                    record.current_phase = WorkflowPhase::Failed;
                    self.record_state(&handles, &mut record).await;
                    return Err(e);
                }
            }
        }

        record.current_phase = WorkflowPhase::Completed;
        self.record_state(&handles, &mut record).await;

        Ok(WorkflowRun {
            industry: industry.to_string(),
            orchestrator_id: handles.orchestrator_id,
            phases: outcomes,
        })
    }

    /// Best effort, like `record_state`
    async fn clear_phase_blocks(&self, handles: &Handles) {
        for phase in WizardPhase::ALL {
            let label = phase.block_label();
            let (Some(spec), Some(block_id)) = (blocks::find(label), handles.block_ids.get(label)) else {
                continue;
            };
            if let Err(e) = self.platform.modify_block(block_id, spec.sentinel).await {
                tracing::warn!(label = label, "Failed to reset phase block: {}", e);
            }
        }
    }

    /// Best effort: a failed write is logged, never returned.
    async fn record_state(&self, handles: &Handles, record: &mut WorkflowStateRecord) {
        record.last_updated = Utc::now().to_rfc3339();
        let Some(block_id) = handles.block_ids.get(WORKFLOW_STATE) else {
            return;
        };
        let value = match serde_json::to_string(record) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("Failed to serialize workflow state: {}", e);
                return;
            }
        };
        if let Err(e) = self.platform.modify_block(block_id, &value).await {
            tracing::warn!(label = WORKFLOW_STATE, "Failed to update workflow state: {}", e);
        }
    }

    /// Read every shared block. A failed read becomes an `{error}` entry for
    /// that block only.
    pub async fn workflow_status(&self) -> Result<WorkflowStatusSnapshot, CoordinatorError> {
        let handles = self.current_handles().await?;

        let reads = handles.block_ids.iter().map(|(label, block_id)| async move {
            let status = match self.platform.retrieve_block(block_id).await {
                Ok(block) => block_status(block),
                Err(e) => {
                    tracing::warn!(label = %label, block_id = %block_id, "Failed to read block: {}", e);
                    BlockStatus::Failed {
                        error: e.to_string(),
                    }
                }
            };
            (label.clone(), status)
        });
        let shared_blocks: BTreeMap<String, BlockStatus> = join_all(reads).await.into_iter().collect();

        Ok(WorkflowStatusSnapshot {
            shared_blocks,
            orchestrator_id: Some(handles.orchestrator_id),
            fetched_at: Utc::now(),
        })
    }

    /// Per-phase wizard progress derived from a fresh snapshot
    pub async fn research_progress(&self) -> Result<WorkflowProgress, CoordinatorError> {
        let snapshot = self.workflow_status().await?;
        Ok(WorkflowProgress::from_snapshot(&snapshot))
    }

    /// Overwrite one shared block
    pub async fn update_shared_block(
        &self,
        label: &str,
        value: &str,
    ) -> Result<BlockStatus, CoordinatorError> {
        let spec = blocks::find(label).ok_or_else(|| CoordinatorError::UnknownBlock(label.to_string()))?;
        let length = value.chars().count();
        if length > spec.limit {
            return Err(CoordinatorError::InvalidInput(format!(
                "Value for {} is {} characters; the limit is {}",
                label, length, spec.limit
            )));
        }

        let handles = self.ensure_handles().await?;
        let block_id = handles
            .block_ids
            .get(label)
            .ok_or_else(|| CoordinatorError::UnknownBlock(label.to_string()))?;

        let block = self.platform.modify_block(block_id, value).await?;
        tracing::info!(label = %label, length = length, "Updated shared block");
        Ok(block_status(block))
    }

    /// Ask the market-research worker to crawl white papers from `firms`
    pub async fn crawl_pdfs(&self, firms: &[String]) -> Result<AgentAnswer, CoordinatorError> {
        let firms: Vec<String> = firms
            .iter()
            .map(|firm| firm.trim().to_string())
            .filter(|firm| !firm.is_empty())
            .collect();
        if firms.is_empty() {
            return Err(CoordinatorError::InvalidInput(
                "firmNames array is required".to_string(),
            ));
        }

        let handles = self.current_handles().await?;
        if let Some(block_id) = handles.block_ids.get(CONSULTING_GROUPS) {
            let selection = serde_json::to_string(&firms).unwrap_or_default();
            if let Err(e) = self.platform.modify_block(block_id, &selection).await {
                tracing::warn!(label = CONSULTING_GROUPS, "Failed to record firm selection: {}", e);
            }
        }

        tracing::info!(firms = ?firms, "Starting PDF crawl");
        let reply = self
            .send(
                &handles.market_research_id,
                &prompts::crawl_instruction(&firms),
                self.remote.workflow_timeout(),
            )
            .await?;
        Ok(AgentAnswer::from_reply(&reply, "Crawl started"))
    }

    /// Raw chunks stored by the worker
    pub async fn pdf_chunks(&self) -> Result<AgentAnswer, CoordinatorError> {
        self.ask_market_research(prompts::PDF_CHUNKS_PROMPT, "No chunks available")
            .await
    }

    /// Factual crawl report from the worker
    pub async fn crawling_status(&self) -> Result<AgentAnswer, CoordinatorError> {
        self.ask_market_research(prompts::CRAWLING_STATUS_PROMPT, "No crawling status available")
            .await
    }

    /// Research summary from the worker
    pub async fn research_summary(&self) -> Result<AgentAnswer, CoordinatorError> {
        self.ask_market_research(prompts::RESEARCH_SUMMARY_PROMPT, "No research summary available")
            .await
    }

    async fn ask_market_research(
        &self,
        prompt: &str,
        fallback: &str,
    ) -> Result<AgentAnswer, CoordinatorError> {
        let handles = self.current_handles().await?;
        let reply = self
            .send(&handles.market_research_id, prompt, self.remote.request_timeout())
            .await?;
        Ok(AgentAnswer::from_reply(&reply, fallback))
    }

    /// Core-memory blocks of the market-research worker
    pub async fn memory_state(&self) -> Result<Vec<Block>, CoordinatorError> {
        let handles = self.current_handles().await?;
        Ok(self
            .platform
            .list_agent_blocks(&handles.market_research_id)
            .await?)
    }

    /// Forget cached agents and delete the id file. Remote agents are kept;
    /// the next initialization finds them again by name.
    pub async fn reset(&self) -> Result<(), CoordinatorError> {
        let mut guard = self.handles.lock().await;
        *guard = None;
        self.store.clear()?;
        tracing::info!("Cleared cached and stored agent ids");
        Ok(())
    }
}

fn find_by_name(agents: &[crate::remote::AgentSummary], name: &str) -> Option<String> {
    agents
        .iter()
        .find(|agent| agent.name == name)
        .map(|agent| agent.id.clone())
}

fn block_status(block: Block) -> BlockStatus {
    let last_updated = block
        .updated_at
        .unwrap_or_else(|| Utc::now().to_rfc3339());
    BlockStatus::available(block.value, last_updated)
}
