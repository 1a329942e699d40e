//! Dashboard server implementation.

use tokio::net::TcpListener;

use crate::error::DashboardError;
use crate::routes;
use crate::state::AppState;

/// The dashboard server.
pub struct DashboardServer {
    state: AppState,
    address: String,
}

impl DashboardServer {
    /// Create a server listening on the configured dashboard address.
    pub fn new(state: AppState) -> Self {
        let address = state.config().dashboard.bind_address();
        Self { state, address }
    }

    /// Override the listen address.
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = address.into();
        self
    }

    /// Get the listen address.
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Start the dashboard server and run until Ctrl-C.
    pub async fn run(self) -> Result<(), DashboardError> {
        let listener = TcpListener::bind(&self.address)
            .await
            .map_err(|e| DashboardError::StartupFailed(format!("failed to bind {}: {}", self.address, e)))?;

        tracing::info!(address = %self.address, "NWR Audit Central dashboard listening");

        let app = routes::create_router(self.state);
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| DashboardError::StartupFailed(e.to_string()))?;

        tracing::info!("dashboard stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nwr_core::AppConfig;

    #[test]
    fn test_server_uses_configured_address() {
        let state = AppState::from_config(AppConfig::default()).unwrap();
        let server = DashboardServer::new(state);
        assert_eq!(server.address(), "127.0.0.1:8080");
        assert_eq!(server.with_address("0.0.0.0:9999").address(), "0.0.0.0:9999");
    }
}
