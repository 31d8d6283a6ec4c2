//! Shared memory block catalog
//!
//! The fixed set of blocks the orchestrator and its workers share. Each block
//! starts at its sentinel value; a block counts as filled once its value
//! differs from the sentinel and is longer than the block's threshold.

use crate::remote::CreateBlockRequest;
use crate::status::has_data;

/// Consulting groups picked by the user
pub const CONSULTING_GROUPS: &str = "consulting_groups";
/// Chunked consulting white papers
pub const CONSULTING_DOCS: &str = "consulting_docs";
/// Market gaps found in the consulting docs
pub const GAP_LIST: &str = "gap_list";
/// Audience signals per gap
pub const AUDIENCE_SIGNALS: &str = "audience_signals";
/// Problems queued for ideation
pub const PROBLEM_QUEUE: &str = "problem_queue";
/// Feedback entered by the user
pub const USER_FEEDBACK: &str = "user_feedback";
/// Every idea iteration
pub const IDEA_HISTORY: &str = "idea_history";
/// Ideas that passed the ICE cut
pub const FINAL_IDEAS: &str = "final_ideas";
/// Workflow state record written by the coordinator
pub const WORKFLOW_STATE: &str = "workflow_state";

/// Definition of one shared block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SharedBlockSpec {
    /// Block label
    pub label: &'static str,
    /// Placeholder value meaning "no data yet"
    pub sentinel: &'static str,
    /// Description shown to agents
    pub description: &'static str,
    /// Character limit on the platform
    pub limit: usize,
    /// Minimum length (in chars) before the block counts as filled
    pub threshold: usize,
}

/// All shared blocks, in display order
pub const SHARED_BLOCKS: &[SharedBlockSpec] = &[
    SharedBlockSpec {
        label: CONSULTING_GROUPS,
        sentinel: "No consulting groups selected yet.",
        description: "Consulting firms selected by the user for white-paper research.",
        limit: 2_000,
        threshold: 20,
    },
    SharedBlockSpec {
        label: CONSULTING_DOCS,
        sentinel: "No documents processed yet.",
        description: "Chunked consulting white papers (title, exec-summary, finding, table), tagged by firm.",
        limit: 10_000,
        threshold: 50,
    },
    SharedBlockSpec {
        label: GAP_LIST,
        sentinel: "No gaps identified yet",
        description: "JSON array of market gaps with severity, market size and opportunity score.",
        limit: 10_000,
        threshold: 20,
    },
    SharedBlockSpec {
        label: AUDIENCE_SIGNALS,
        sentinel: "No audience signals collected yet.",
        description: "Audience and market signals gathered for each gap.",
        limit: 10_000,
        threshold: 50,
    },
    SharedBlockSpec {
        label: PROBLEM_QUEUE,
        sentinel: "No problems queued yet.",
        description: "Problems picked by the user for ideation.",
        limit: 5_000,
        threshold: 20,
    },
    SharedBlockSpec {
        label: USER_FEEDBACK,
        sentinel: "No user feedback yet.",
        description: "Feedback from the user on generated ideas.",
        limit: 5_000,
        threshold: 20,
    },
    SharedBlockSpec {
        label: IDEA_HISTORY,
        sentinel: "No ideas generated yet.",
        description: "Raw JSON of every ideation iteration, appended.",
        limit: 10_000,
        threshold: 50,
    },
    SharedBlockSpec {
        label: FINAL_IDEAS,
        sentinel: "No final ideas selected yet.",
        description: "Ideas with an average ICE score of at least 7, overwritten each iteration.",
        limit: 10_000,
        threshold: 20,
    },
    SharedBlockSpec {
        label: WORKFLOW_STATE,
        sentinel: "Current workflow: idle. Phase: initialization.",
        description: "Current phase, completed phases and failed phases of the workflow.",
        limit: 5_000,
        threshold: 20,
    },
];

/// Look up a shared block by label
pub fn find(label: &str) -> Option<&'static SharedBlockSpec> {
    SHARED_BLOCKS.iter().find(|spec| spec.label == label)
}

impl SharedBlockSpec {
    /// True once the block holds real content
    pub fn has_data(&self, value: &str) -> bool {
        has_data(value, self.sentinel, self.threshold)
    }

    /// Request that creates this block at its sentinel value
    pub fn create_request(&self) -> CreateBlockRequest {
        CreateBlockRequest {
            label: self.label.to_string(),
            value: self.sentinel.to_string(),
            limit: self.limit,
            description: Some(self.description.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_labels_are_unique() {
        let labels: HashSet<_> = SHARED_BLOCKS.iter().map(|b| b.label).collect();
        assert_eq!(labels.len(), SHARED_BLOCKS.len());
    }

    #[test]
    fn test_sentinels_fit_their_limits_and_are_not_data() {
        for spec in SHARED_BLOCKS {
            assert!(spec.sentinel.len() <= spec.limit, "{}", spec.label);
            assert!(!spec.has_data(spec.sentinel), "{}", spec.label);
        }
    }

    #[test]
    fn test_find() {
        assert_eq!(find(GAP_LIST).unwrap().sentinel, "No gaps identified yet");
        assert!(find("not_a_block").is_none());
    }

    #[test]
    fn test_create_request_starts_at_sentinel() {
        let request = find(CONSULTING_DOCS).unwrap().create_request();
        assert_eq!(request.label, "consulting_docs");
        assert_eq!(request.value, "No documents processed yet.");
        assert_eq!(request.limit, 10_000);
    }
}
