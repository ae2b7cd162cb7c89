//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router with all handlers
//! - Wire up middleware (tracing, request ID, body limit)
//! - Hold the swappable configuration snapshot and chain handle
//! - Apply reloaded configuration without restarting

use arc_swap::ArcSwap;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::blockchain::{BlockchainResult, ChainClient, ChainGateway};
use crate::config::DashboardConfig;
use crate::http::handlers;

/// One consistent view of configuration and chain handle.
pub struct Inner {
    pub config: DashboardConfig,
    pub gateway: Arc<dyn ChainGateway>,
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub inner: Arc<ArcSwap<Inner>>,
}

impl AppState {
    pub fn new(config: DashboardConfig, gateway: Arc<dyn ChainGateway>) -> Self {
        Self {
            inner: Arc::new(ArcSwap::from_pointee(Inner { config, gateway })),
        }
    }

    /// Current snapshot; re-read on every request.
    pub fn snapshot(&self) -> Arc<Inner> {
        self.inner.load_full()
    }

    /// Swap in a new configuration.
    ///
    /// The provider handle is reused unless the chain settings changed.
    pub fn reload(&self, config: DashboardConfig) -> BlockchainResult<()> {
        let current = self.snapshot();
        let gateway: Arc<dyn ChainGateway> = if config.chain == current.config.chain {
            current.gateway.clone()
        } else {
            tracing::info!(rpc_url = %config.chain.rpc_url, "Chain settings changed, reconnecting");
            Arc::new(ChainClient::connect(&config.chain)?)
        };

        self.inner.store(Arc::new(Inner { config, gateway }));
        Ok(())
    }
}

/// HTTP server for the dashboard API.
pub struct HttpServer {
    router: Router,
    state: AppState,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration and chain handle.
    pub fn new(config: DashboardConfig, gateway: Arc<dyn ChainGateway>) -> Self {
        let max_body_size = config.security.max_body_size;
        let state = AppState::new(config, gateway);
        let router = Self::build_router(state.clone(), max_body_size);
        Self { router, state }
    }

    /// Build the Axum router with all middleware layers.
    pub fn build_router(state: AppState, max_body_size: usize) -> Router {
        Router::new()
            .route("/api/status", get(handlers::get_status))
            .route("/api/stats", get(handlers::get_stats))
            .route("/api/contract", get(handlers::get_contract))
            .route("/api/credentials", post(handlers::issue_credential))
            .route(
                "/api/credentials/{address}/count",
                get(handlers::get_credential_count),
            )
            .route("/api/tokens/{token_id}", get(handlers::get_token))
            .with_state(state)
            .layer(DefaultBodyLimit::max(max_body_size))
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                    .layer(TraceLayer::new_for_http())
                    .layer(PropagateRequestIdLayer::x_request_id()),
            )
    }

    /// Run the server, applying configuration updates until shutdown.
    pub async fn run(
        self,
        listener: TcpListener,
        config_updates: mpsc::UnboundedReceiver<DashboardConfig>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        tokio::spawn(apply_config_updates(self.state.clone(), config_updates));

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }
}

async fn apply_config_updates(
    state: AppState,
    mut updates: mpsc::UnboundedReceiver<DashboardConfig>,
) {
    while let Some(config) = updates.recv().await {
        match state.reload(config) {
            Ok(()) => tracing::info!("Configuration reloaded"),
            Err(e) => tracing::error!(error = %e, "Reloaded configuration rejected, keeping current"),
        }
    }
}

/// Wait for shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
