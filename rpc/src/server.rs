//! Axum-based REST server.

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tracing::info;

use waymark_store::contributor::ContributorStore;
use waymark_store::submission::SubmissionStore;
use waymark_verification::VerificationEngine;

use crate::config::ServerConfig;
use crate::error::RpcError;
use crate::handlers;

/// Shared state handed to every request handler.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<VerificationEngine>,
    pub contributors: Arc<dyn ContributorStore>,
    pub submissions: Arc<dyn SubmissionStore>,
}

/// The REST server, configured with a port and shared state.
pub struct RpcServer {
    pub config: ServerConfig,
    pub state: AppState,
}

impl RpcServer {
    pub fn new(
        config: ServerConfig,
        contributors: Arc<dyn ContributorStore>,
        submissions: Arc<dyn SubmissionStore>,
    ) -> Self {
        let engine = Arc::new(VerificationEngine::new(
            Arc::clone(&contributors),
            Arc::clone(&submissions),
            config.params.clone(),
        ));
        Self {
            config,
            state: AppState {
                engine,
                contributors,
                submissions,
            },
        }
    }

    /// Build the router. Exposed separately so tests can drive handlers
    /// without binding a socket.
    pub fn router(&self) -> Router {
        let router = Router::new()
            .route("/contributors", post(handlers::register_contributor))
            .route("/contributors/:id", get(handlers::get_contributor))
            .route("/submissions", post(handlers::create_submission))
            .route("/submissions/:id", get(handlers::get_submission))
            .route("/submissions/:id/votes", post(handlers::cast_vote))
            .with_state(self.state.clone());

        if self.config.enable_cors {
            router.layer(CorsLayer::permissive())
        } else {
            router
        }
    }

    /// Start listening. Runs until the server is shut down.
    pub async fn start(&self) -> Result<(), RpcError> {
        let app = self.router();
        let addr = format!("0.0.0.0:{}", self.config.port);
        info!("Waymark server listening on {}", addr);
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| RpcError::Server(format!("binding {addr}: {e}")))?;
        axum::serve(listener, app)
            .await
            .map_err(|e| RpcError::Server(e.to_string()))?;
        Ok(())
    }
}
