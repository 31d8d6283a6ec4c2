//! API module
//!
//! Contains HTTP request handlers and the route table

pub mod agents;
pub mod catalog;
pub mod research;
pub mod utils;
pub mod workflow;

use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

/// Build the route table. Middleware is layered on by the caller.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health check and hello world
        .route("/", get(catalog::hello_world))
        .route("/api/health", get(catalog::health_check))
        .route("/api/catalog", get(catalog::get_catalog))
        // Agent lifecycle
        .route(
            "/api/agents/initialize",
            post(agents::initialize_agents)
                .get(agents::initialization_status)
                .delete(agents::reset_agents),
        )
        .route(
            "/api/agents/research",
            post(research::start_research).get(research::research_data),
        )
        // Workflow
        .route(
            "/api/workflow",
            post(workflow::workflow_action).get(workflow::workflow_query),
        )
        .with_state(state)
}
