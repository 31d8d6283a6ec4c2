// State management module
// Handles the shared application context and agent id persistence

pub mod app_state;
pub mod persistence;

pub use app_state::AppState;
pub use persistence::{AgentIdStore, PersistenceError, StoredAgentIds};
