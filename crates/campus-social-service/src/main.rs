//! Campus Social Service - HTTP API for the campus social graph.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use campus_social_service::{create_router, open_store, AppState, ServiceConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,campus_social=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Campus Social Service");

    let config = ServiceConfig::from_env();

    tracing::info!(
        listen_addr = %config.listen_addr,
        storage_backend = %config.storage_backend,
        data_dir = %config.data_dir,
        delete_batch_size = config.delete_batch_size,
        username_max_probes = config.username_max_probes,
        "Service configuration loaded"
    );

    let store = open_store(&config)?;
    let state = AppState::new(store, config.clone());
    let app = create_router(state);

    tracing::info!(listen_addr = %config.listen_addr, "Starting HTTP server");
    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
