//! REST API server for the class scheduler.
//!
//! Boots the shared repository (seeding the demo roster), builds the
//! axum router and serves it.
//!
//! ```bash
//! cargo run --bin lsm-server --features "local-repo,http-server"
//! ```
//!
//! Configuration comes from the environment: `HOST` (default 0.0.0.0),
//! `PORT` (default 8080), `RUST_LOG` for the log level and
//! `SCHEDULER_POLICY_FILE` for a TOML override of the suggestion search
//! policy.

use std::env;
use std::net::SocketAddr;
use std::sync::Arc;

use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use lsm_rust::db;
use lsm_rust::http::{create_router, AppState};

fn bind_address() -> anyhow::Result<SocketAddr> {
    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(8080);
    Ok(format!("{}:{}", host, port).parse()?)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("Starting scheduler API server");

    // One repository for the whole process; seeded with the demo roster.
    db::init_repository()?;
    let repository = Arc::clone(db::get_repository()?);
    info!("Repository ready, demo roster seeded");

    let app = create_router(AppState::new(repository));

    let addr = bind_address()?;
    info!("Listening on http://{}", addr);
    info!("Health check at http://{}/health", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
