//! `nwr-audit serve` - Run the web dashboard.

use nwr_core::AppConfig;
use nwr_dashboard::{AppState, DashboardServer};

/// Start the dashboard, applying command-line overrides to the listen address.
pub async fn run(mut config: AppConfig, host: Option<String>, port: Option<u16>) -> anyhow::Result<()> {
    if let Some(host) = host {
        config.dashboard.host = host;
    }
    if let Some(port) = port {
        config.dashboard.port = port;
    }

    let state = AppState::from_config(config)?;
    DashboardServer::new(state).run().await?;
    Ok(())
}
