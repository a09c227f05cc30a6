//! Leave Engine API Server
//!
//! Usage: `leave-engine [DATA_DIR]` (defaults to `./data/demo`).

use std::path::PathBuf;

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use leave_engine::api::{AppState, create_router};
use leave_engine::config::ConfigLoader;
use leave_engine::store::InMemoryStore;

const DEFAULT_DATA_DIR: &str = "./data/demo";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "leave_engine=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let data_dir = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));

    // Load configuration
    let config = ConfigLoader::load(&data_dir)?;
    let server = config.server().clone();
    info!(
        data_dir = %data_dir.display(),
        tenants = config.accrual().len(),
        "Configuration loaded"
    );

    // Load employees and leave requests
    let store = InMemoryStore::load(
        &data_dir,
        config.into_accrual(),
        server.default_tenant.as_deref(),
    )?;
    info!(
        employees = store.employee_count(),
        leave_requests = store.requests().len(),
        "Data store loaded"
    );

    let app = create_router(AppState::new(store));

    // Start server
    let addr = server.bind_address();
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
