//! HTTP server for the summary API

use crate::api::handlers;
use crate::config::ServerConfig;
use crate::error::{AppError, Result};
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

/// Build the API router for the given state
pub fn build_router(state: Arc<AppState>) -> Router {
    let upload_path = state.config.upload_path.clone();
    let body_limit = state.config.max_upload_bytes;

    // Allow all origins, uploads usually come from a separate frontend
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::health_check))
        .route(&upload_path, post(handlers::upload_csv))
        .with_state(state)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Summary API server manager
pub struct SummaryServer {
    config: ServerConfig,
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl SummaryServer {
    /// Create a new server
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config,
            shutdown_tx: None,
            task: None,
        }
    }

    /// Bind and start serving in the background
    ///
    /// Returns the bound address, which differs from the configured one
    /// when port 0 was requested.
    pub async fn start(&mut self) -> Result<SocketAddr> {
        if self.is_running() {
            return Err(AppError::Internal("server already running".to_string()));
        }

        self.config.validate()?;

        // Hostnames such as `localhost` resolve here as well as literal IPs
        let host = self.config.host.as_str();
        let listener = tokio::net::TcpListener::bind((host, self.config.port))
            .await
            .map_err(|e| {
                error!("Failed to bind {}: {}", self.config.bind_address(), e);
                AppError::Io(e)
            })?;
        let local_addr = listener.local_addr()?;

        let state = AppState::new(self.config.clone());
        let app = build_router(state);

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        self.shutdown_tx = Some(shutdown_tx);

        self.task = Some(tokio::spawn(async move {
            let server = axum::serve(listener, app).with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
                info!("API server shutting down");
            });

            if let Err(e) = server.await {
                error!("API server error: {}", e);
            }
        }));

        info!("CSV Summary API listening on http://{}", local_addr);
        info!("  GET  http://{}/health", local_addr);
        info!("  POST http://{}{}", local_addr, self.config.upload_path);

        Ok(local_addr)
    }

    /// Stop the server
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
            info!("API server stop signal sent");
        }
    }

    /// Stop the server and wait for in-flight requests to finish
    pub async fn shutdown(&mut self) {
        self.stop();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                error!("API server task failed: {}", e);
            }
        }
    }

    /// Check if server is running
    pub fn is_running(&self) -> bool {
        self.shutdown_tx.is_some()
    }
}

impl Drop for SummaryServer {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ephemeral_config() -> ServerConfig {
        ServerConfig {
            port: 0,
            ..ServerConfig::default()
        }
    }

    #[tokio::test]
    async fn test_start_and_shutdown() {
        let mut server = SummaryServer::new(ephemeral_config());
        let addr = server.start().await.unwrap();

        assert!(server.is_running());
        assert_ne!(addr.port(), 0);

        server.shutdown().await;
        assert!(!server.is_running());
    }

    #[tokio::test]
    async fn test_double_start_rejected() {
        let mut server = SummaryServer::new(ephemeral_config());
        server.start().await.unwrap();

        let err = server.start().await.unwrap_err();
        assert!(matches!(err, AppError::Internal(_)));

        server.shutdown().await;
    }

    #[tokio::test]
    async fn test_hostname_binds() {
        let mut server = SummaryServer::new(ServerConfig {
            host: "localhost".to_string(),
            ..ephemeral_config()
        });

        let addr = server.start().await.unwrap();
        assert!(addr.ip().is_loopback());
        assert_ne!(addr.port(), 0);

        server.shutdown().await;
    }

    #[tokio::test]
    async fn test_unresolvable_host_rejected() {
        let mut server = SummaryServer::new(ServerConfig {
            host: "not a host".to_string(),
            ..ephemeral_config()
        });

        let err = server.start().await.unwrap_err();
        assert!(matches!(err, AppError::Io(_)));
        assert!(!server.is_running());
    }
}
