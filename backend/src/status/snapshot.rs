//! Workflow status snapshot
//!
//! A point-in-time copy of every shared block. Built fresh on each poll.

use crate::status::content::{parse_block, BlockContent};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Result of reading one block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BlockStatus {
    /// The block was read
    Available {
        /// Current value
        value: String,
        /// Value length in bytes
        size: usize,
        /// When the value last changed (or when it was read, if unknown)
        #[serde(rename = "lastUpdated")]
        last_updated: String,
    },
    /// Reading the block failed; other blocks are unaffected
    Failed {
        /// Error message
        error: String,
    },
}

impl BlockStatus {
    /// Status for a successfully read value
    pub fn available(value: String, last_updated: String) -> Self {
        BlockStatus::Available {
            size: value.len(),
            value,
            last_updated,
        }
    }

    /// The value, if the read succeeded
    pub fn value(&self) -> Option<&str> {
        match self {
            BlockStatus::Available { value, .. } => Some(value),
            BlockStatus::Failed { .. } => None,
        }
    }

    /// The error, if the read failed
    pub fn error(&self) -> Option<&str> {
        match self {
            BlockStatus::Available { .. } => None,
            BlockStatus::Failed { error } => Some(error),
        }
    }
}

/// All shared block values at one instant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowStatusSnapshot {
    /// Label → block status
    pub shared_blocks: BTreeMap<String, BlockStatus>,
    /// Orchestrator agent id, if one exists
    pub orchestrator_id: Option<String>,
    /// When the snapshot was taken
    pub fetched_at: DateTime<Utc>,
}

impl WorkflowStatusSnapshot {
    /// Value of a block, if it was read successfully
    pub fn value(&self, label: &str) -> Option<&str> {
        self.shared_blocks.get(label).and_then(BlockStatus::value)
    }

    /// Classified content of a block
    pub fn content(&self, label: &str) -> Option<BlockContent> {
        self.value(label).map(parse_block)
    }

    /// Number of blocks whose read failed
    pub fn error_count(&self) -> usize {
        self.shared_blocks
            .values()
            .filter(|status| status.error().is_some())
            .count()
    }
}
