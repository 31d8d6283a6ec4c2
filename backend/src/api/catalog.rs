//! Catalog and service info handlers

use crate::api::utils::{ok, ApiResponse};
use crate::catalog::{catalog, Catalog};
use axum::response::Json;
use serde::Serialize;

/// Response for the root route
#[derive(Debug, Serialize)]
pub struct HelloResponse {
    /// Greeting
    pub message: String,
    /// Always `ok`
    pub status: String,
}

/// Response for the health check
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always `healthy`
    pub status: String,
    /// Crate version
    pub version: String,
    /// Human-readable message
    pub message: String,
}

/// GET / - Service greeting
pub async fn hello_world() -> Json<HelloResponse> {
    Json(HelloResponse {
        message: "MarketGap backend".to_string(),
        status: "ok".to_string(),
    })
}

/// GET /api/health - Liveness check
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        message: "Backend is running".to_string(),
    })
}

/// GET /api/catalog - Industries and consulting firms offered for selection
pub async fn get_catalog() -> Json<ApiResponse<Catalog>> {
    ok(catalog())
}
