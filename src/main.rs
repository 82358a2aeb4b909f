//! Course Fee Advisor — Binary Entrypoint
//! Loads the fee model once, wires routes and shared state, and serves the
//! Axum HTTP API.

use std::net::SocketAddr;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use course_fee_advisor::{api, model::ModelState, scrape};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("course_fee_advisor=info,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();
    init_tracing();

    // One load attempt; a failure degrades the prediction endpoints
    // instead of aborting startup.
    let model = ModelState::load_or_degraded();
    let http = scrape::build_client()?;

    let state = api::AppState::new(model, http);
    let router = api::router(state);

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(5000);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "course fee advisor listening");

    axum::serve(listener, router).await?;
    Ok(())
}
