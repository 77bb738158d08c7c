//! API Handlers Module
//!
//! Tool-level failures are still `200 OK`; the envelope's `success` flag
//! carries the outcome.

use axum::{debug_handler, extract::State, response::Json};
use std::collections::HashMap;
use std::sync::Arc;

use guesstimate_tools::{
    CalculatorRequest, ToolDescriptor, ToolRegistry, ToolResponse, WebSearchRequest,
};

use crate::models::ServiceInfo;

/// Shared state of the API server
pub struct ApiState {
    pub registry: ToolRegistry,
}

pub type SharedState = Arc<ApiState>;

/// Service banner
#[debug_handler]
pub async fn root(State(state): State<SharedState>) -> Json<ServiceInfo> {
    Json(ServiceInfo {
        message: "Guesstimate tool server".to_string(),
        tools: state
            .registry
            .tool_names()
            .into_iter()
            .map(str::to_string)
            .collect(),
    })
}

/// Health check endpoint
#[debug_handler]
pub async fn health_check() -> Json<HashMap<String, String>> {
    let mut response = HashMap::new();
    response.insert("status".to_string(), "healthy".to_string());
    Json(response)
}

/// Tool descriptors
#[debug_handler]
pub async fn list_tools(State(state): State<SharedState>) -> Json<Vec<ToolDescriptor>> {
    Json(state.registry.descriptors())
}

#[debug_handler]
pub async fn calculator(
    State(state): State<SharedState>,
    Json(request): Json<CalculatorRequest>,
) -> Json<ToolResponse> {
    tracing::debug!("Calculating: {}", request.expression);
    Json(state.registry.calculator(&request.expression))
}

#[debug_handler]
pub async fn web_search(
    State(state): State<SharedState>,
    Json(request): Json<WebSearchRequest>,
) -> Json<ToolResponse> {
    tracing::debug!("Searching: {}", request.query);
    Json(state.registry.web_search(&request.query).await)
}
