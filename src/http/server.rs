//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (request id, tracing, timeout)
//! - Build the store, transport and dispatcher the handlers share
//! - Serve until the shutdown signal fires

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::timeout::TimeoutLayer;

use crate::config::SpyglassConfig;
use crate::dispatch::Dispatcher;
use crate::http::handlers::*;
use crate::http::request::with_request_id;
use crate::resilience::RetryPolicy;
use crate::session::{InMemorySessionStore, SessionStore};
use crate::transport::{RawTransport, TcpTransport};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Dispatcher,
}

/// HTTP API server.
pub struct SpyglassServer {
    router: Router,
    config: SpyglassConfig,
}

impl SpyglassServer {
    /// Create a server with an in-memory store and the TCP transport.
    pub fn new(config: SpyglassConfig) -> Self {
        let store: Arc<dyn SessionStore> = Arc::new(InMemorySessionStore::new());
        let transport: Arc<dyn RawTransport> = Arc::new(TcpTransport::new(&config.transport));
        Self::with_components(config, store, transport)
    }

    /// Create a server around an existing store and transport.
    pub fn with_components(
        config: SpyglassConfig,
        store: Arc<dyn SessionStore>,
        transport: Arc<dyn RawTransport>,
    ) -> Self {
        let policy = RetryPolicy::from_config(&config.retries);
        let dispatcher = Dispatcher::new(store, transport, policy);
        let router = Self::build_router(&config, AppState { dispatcher });
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &SpyglassConfig, state: AppState) -> Router {
        let router = Router::new()
            .route("/status", get(get_status))
            .route("/sessions", get(list_sessions).post(create_session))
            .route("/sessions/{id}", get(get_session))
            .route("/sessions/{id}/resend", post(resend_session))
            .route("/sessions/{id}/raw", get(get_raw_request))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.listener.request_timeout_secs)));
        with_request_id(router)
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("HTTP server draining");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &SpyglassConfig {
        &self.config
    }
}
