// View state
// What the terminal shows: the latest status snapshot and derived progress

use crate::poller::PollError;
use marketgap_backend::status::{WorkflowProgress, WorkflowStatusSnapshot};

/// Main view state
/// Replaced wholesale on every applied poll; never merged
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    /// Latest snapshot, if any poll has succeeded
    pub snapshot: Option<WorkflowStatusSnapshot>,
    /// Progress derived from `snapshot`
    pub progress: Option<WorkflowProgress>,
    /// Error of the most recent poll, cleared by the next success
    pub last_error: Option<String>,
    /// Sequence number of the last applied poll
    pub last_seq: u64,
    /// Set once polling has stopped; nothing is applied afterwards
    pub stopped: bool,
}

impl ViewState {
    /// Create an empty view
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply the result of poll number `seq`.
    ///
    /// Results older than the last applied one, and anything arriving after
    /// [`stop`](Self::stop), are dropped.
    ///
    /// # Returns
    /// * `true` - the view changed
    /// * `false` - the result was ignored
    pub fn apply(&mut self, seq: u64, result: Result<WorkflowStatusSnapshot, PollError>) -> bool {
        if self.stopped || seq <= self.last_seq {
            return false;
        }
        self.last_seq = seq;

        match result {
            Ok(snapshot) => {
                self.progress = Some(WorkflowProgress::from_snapshot(&snapshot));
                self.snapshot = Some(snapshot);
                self.last_error = None;
            }
            Err(e) => {
                self.last_error = Some(e.to_string());
            }
        }
        true
    }

    /// Freeze the view
    pub fn stop(&mut self) {
        self.stopped = true;
    }

    /// True once every wizard phase has data
    pub fn is_finished(&self) -> bool {
        self.progress
            .as_ref()
            .map(WorkflowProgress::is_finished)
            .unwrap_or(false)
    }
}
