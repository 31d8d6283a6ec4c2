//! Wizard progress heuristic
//!
//! Turns block values into completion signals. There is no agreed schema
//! between this service and the remote agents, so completion is a length
//! check against each block's sentinel. Everything here is pure and total.

use crate::coordinator::blocks::{self, CONSULTING_DOCS, FINAL_IDEAS, GAP_LIST};
use crate::status::snapshot::{BlockStatus, WorkflowStatusSnapshot};
use serde::{Deserialize, Serialize};

/// True when `value` is not the sentinel and is longer than `threshold` chars
pub fn has_data(value: &str, sentinel: &str, threshold: usize) -> bool {
    value != sentinel && value.chars().count() > threshold
}

/// Steps of the research wizard that are backed by a block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardPhase {
    /// Consulting white papers crawled and chunked
    Research,
    /// Gap analysis written
    Gaps,
    /// Final ideas selected
    Ideas,
}

impl WizardPhase {
    /// Phases in wizard order
    pub const ALL: [WizardPhase; 3] = [WizardPhase::Research, WizardPhase::Gaps, WizardPhase::Ideas];

    /// Block whose content marks this phase complete
    pub fn block_label(self) -> &'static str {
        match self {
            WizardPhase::Research => CONSULTING_DOCS,
            WizardPhase::Gaps => GAP_LIST,
            WizardPhase::Ideas => FINAL_IDEAS,
        }
    }

    /// Display title
    pub fn title(self) -> &'static str {
        match self {
            WizardPhase::Research => "Document research",
            WizardPhase::Gaps => "Gap analysis",
            WizardPhase::Ideas => "Solution ideas",
        }
    }
}

/// Progress of one phase
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseProgress {
    /// The phase
    pub phase: WizardPhase,
    /// Backing block label
    pub label: String,
    /// Block holds real content
    pub complete: bool,
    /// Character count of the block value (0 if unreadable)
    pub chars: usize,
    /// Read error for the block, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Progress of the whole wizard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowProgress {
    /// Per-phase progress, in wizard order
    pub phases: Vec<PhaseProgress>,
    /// Number of completed phases
    pub completed: usize,
    /// Completed phases as a percentage (0-100)
    pub percent: u8,
    /// First phase that is not complete yet
    pub current_phase: Option<WizardPhase>,
}

impl WorkflowProgress {
    /// Derive progress from a snapshot
    pub fn from_snapshot(snapshot: &WorkflowStatusSnapshot) -> Self {
        let phases: Vec<PhaseProgress> = WizardPhase::ALL
            .iter()
            .map(|&phase| phase_progress(phase, snapshot.shared_blocks.get(phase.block_label())))
            .collect();

        let completed = phases.iter().filter(|p| p.complete).count();
        let percent = ((completed * 100) / phases.len()) as u8;
        let current_phase = phases.iter().find(|p| !p.complete).map(|p| p.phase);

        Self {
            phases,
            completed,
            percent,
            current_phase,
        }
    }

    /// True once every phase is complete
    pub fn is_finished(&self) -> bool {
        self.current_phase.is_none()
    }
}

fn phase_progress(phase: WizardPhase, status: Option<&BlockStatus>) -> PhaseProgress {
    let label = phase.block_label();
    let (complete, chars, error) = match status {
        Some(BlockStatus::Available { value, .. }) => {
            let complete = blocks::find(label)
                .map(|spec| spec.has_data(value))
                .unwrap_or(false);
            (complete, value.chars().count(), None)
        }
        Some(BlockStatus::Failed { error }) => (false, 0, Some(error.clone())),
        None => (false, 0, None),
    };

    PhaseProgress {
        phase,
        label: label.to_string(),
        complete,
        chars,
        error,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::collections::BTreeMap;

    const SENTINEL: &str = "No gaps identified yet";

    #[test]
    fn test_has_data_sentinel_is_false() {
        assert!(!has_data(SENTINEL, SENTINEL, 20));
    }

    #[test]
    fn test_has_data_empty_is_false() {
        assert!(!has_data("", SENTINEL, 20));
        assert!(!has_data("", "", 0));
    }

    #[test]
    fn test_has_data_long_value_is_true() {
        let value = r#"[{"id": "gap_1", "severity": "high", "description": "SMB credit"}]"#;
        assert!(has_data(value, SENTINEL, 20));
    }

    #[test]
    fn test_has_data_threshold_is_exclusive() {
        let exactly = "a".repeat(20);
        assert!(!has_data(&exactly, SENTINEL, 20));
        assert!(has_data(&format!("{}b", exactly), SENTINEL, 20));
    }

    #[test]
    fn test_has_data_counts_chars_not_bytes() {
        // 11 two-byte chars: 22 bytes but only 11 chars
        let value = "é".repeat(11);
        assert!(!has_data(&value, SENTINEL, 20));
    }

    fn snapshot_with(entries: Vec<(&str, BlockStatus)>) -> WorkflowStatusSnapshot {
        let shared_blocks: BTreeMap<String, BlockStatus> = entries
            .into_iter()
            .map(|(label, status)| (label.to_string(), status))
            .collect();
        WorkflowStatusSnapshot {
            shared_blocks,
            orchestrator_id: None,
            fetched_at: Utc::now(),
        }
    }

    fn available(value: &str) -> BlockStatus {
        BlockStatus::available(value.to_string(), Utc::now().to_rfc3339())
    }

    #[test]
    fn test_progress_fresh_workflow() {
        let snapshot = snapshot_with(vec![
            (CONSULTING_DOCS, available("No documents processed yet.")),
            (GAP_LIST, available(SENTINEL)),
            (FINAL_IDEAS, available("No final ideas selected yet.")),
        ]);
        let progress = WorkflowProgress::from_snapshot(&snapshot);
        assert_eq!(progress.completed, 0);
        assert_eq!(progress.percent, 0);
        assert_eq!(progress.current_phase, Some(WizardPhase::Research));
        assert!(!progress.is_finished());
    }

    #[test]
    fn test_progress_partial() {
        let docs = "McKinsey: exec-summary on embedded finance adoption across SMB lenders.";
        let snapshot = snapshot_with(vec![
            (CONSULTING_DOCS, available(docs)),
            (GAP_LIST, available("too short")),
            (
                FINAL_IDEAS,
                BlockStatus::Failed {
                    error: "Remote call timed out after 120 seconds".to_string(),
                },
            ),
        ]);
        let progress = WorkflowProgress::from_snapshot(&snapshot);
        assert_eq!(progress.completed, 1);
        assert_eq!(progress.percent, 33);
        assert_eq!(progress.current_phase, Some(WizardPhase::Gaps));
        assert_eq!(progress.phases[0].chars, docs.chars().count());
        assert!(progress.phases[2].error.is_some());
        assert!(!progress.phases[2].complete);
    }

    #[test]
    fn test_progress_finished() {
        let long = "x".repeat(80);
        let snapshot = snapshot_with(vec![
            (CONSULTING_DOCS, available(&long)),
            (GAP_LIST, available(&long)),
            (FINAL_IDEAS, available(&long)),
        ]);
        let progress = WorkflowProgress::from_snapshot(&snapshot);
        assert_eq!(progress.percent, 100);
        assert!(progress.is_finished());
    }

    #[test]
    fn test_progress_missing_blocks() {
        let progress = WorkflowProgress::from_snapshot(&snapshot_with(vec![]));
        assert_eq!(progress.phases.len(), 3);
        assert!(progress.phases.iter().all(|p| !p.complete && p.chars == 0));
    }
}
