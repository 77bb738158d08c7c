//! API Server Module

use anyhow::{Context, Result};
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use guesstimate_tools::ToolRegistry;

use crate::handlers::{calculator, health_check, list_tools, root, web_search, ApiState};
use crate::models::ApiConfig;

/// HTTP tool server
pub struct ApiServer {
    config: ApiConfig,
    state: Arc<ApiState>,
}

impl ApiServer {
    pub fn new(config: ApiConfig, registry: ToolRegistry) -> Self {
        Self {
            config,
            state: Arc::new(ApiState { registry }),
        }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Application router with shared state and tracing
    pub fn router(&self) -> Router {
        Router::new()
            .route("/", get(root))
            .route("/health", get(health_check))
            .route("/tools", get(list_tools))
            .route("/tools/calculator", post(calculator))
            .route("/tools/web-search", post(web_search))
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive())
            .with_state(self.state.clone())
    }

    /// Bind the configured address and serve until the process ends
    pub async fn start(&self) -> Result<()> {
        let addr = self.config.bind_address();
        let listener = TcpListener::bind(&addr)
            .await
            .with_context(|| format!("Failed to bind {}", addr))?;
        self.serve(listener).await
    }

    /// Serve on an already-bound listener
    pub async fn serve(&self, listener: TcpListener) -> Result<()> {
        let local = listener.local_addr()?;
        info!("Guesstimate tool server listening on {}", local);

        axum::serve(listener, self.router())
            .await
            .map_err(|e| anyhow::anyhow!("Failed to run API server: {}", e))?;

        Ok(())
    }
}
