//! Jira Activity - serves a user's recent tracker activity as a report.
//!
//! # Configuration
//!
//! Read from `JIRA_*` environment variables (a `.env` file is honoured):
//! `JIRA_USERNAME`, `JIRA_API_TOKEN`, `JIRA_URL` and `JIRA_PROJECT` are
//! required. `JIRA_ACTIVITY_PORT` selects the listen port.
//!
//! # API Endpoints
//!
//! - `GET /report` - Activity report for a time window
//! - `GET /health` - Health check

use std::env;
use std::net::SocketAddr;

use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use jira_activity::api::{AppState, router};
use jira_activity::config::TrackerConfig;

/// Default port if not specified via environment variable.
const DEFAULT_PORT: u16 = 3000;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive("jira_activity=info".parse()?))
        .init();

    let port: u16 = env::var("JIRA_ACTIVITY_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(DEFAULT_PORT);

    let config = TrackerConfig::from_env()?;
    info!(
        url = %config.url,
        project = %config.project,
        format = %config.format,
        lookback_hours = config.lookback_hours,
        "Configuration loaded"
    );

    let state = AppState {
        service: config.build_service()?,
        format: config.format,
        lookback_hours: config.lookback_hours,
    };

    let app = router(state).layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;

    info!(%addr, "Jira Activity is listening");

    axum::serve(listener, app).await?;

    Ok(())
}
