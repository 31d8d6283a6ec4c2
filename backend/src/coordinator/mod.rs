//! Agent coordination
//!
//! Shared block and tool definitions, instruction text and the
//! [`WorkflowCoordinator`] that ties them to the remote platform.

pub mod blocks;
pub mod prompts;
pub mod tools;
pub mod workflow;

pub use workflow::{
    AgentAnswer, AgentIds, CoordinatorError, PhaseOutcome, WorkflowCoordinator, WorkflowPhase,
    WorkflowRun, MARKET_RESEARCH_NAME, ORCHESTRATOR_NAME,
};
