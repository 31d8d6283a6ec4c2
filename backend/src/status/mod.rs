//! Status reconciliation
//!
//! Pure functions that turn opaque block values into something a UI can show:
//! content classification, per-block completion and wizard progress.

pub mod content;
pub mod progress;
pub mod snapshot;

pub use content::{parse_block, BlockContent};
pub use progress::{has_data, PhaseProgress, WizardPhase, WorkflowProgress};
pub use snapshot::{BlockStatus, WorkflowStatusSnapshot};
