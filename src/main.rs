use attendance_engine::api::{AppState, create_router};
use attendance_engine::config::{ConfigLoader, ServerSettings};
use attendance_engine::engine::Engine;
use attendance_engine::store::{JsonFileStore, StoreBackend};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let settings = ServerSettings::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = ConfigLoader::load(&settings.config_dir)?;
    let store = JsonFileStore::open(&settings.data_dir)?;
    info!(
        config_dir = %settings.config_dir.display(),
        data_dir = %settings.data_dir.display(),
        "Configuration loaded"
    );

    let holidays = config.holidays().to_vec();
    let engine = Engine::new(StoreBackend::from(store), config);
    engine.seed_holidays(&holidays)?;

    let router = create_router(AppState::new(engine));
    let listener = tokio::net::TcpListener::bind(settings.server_addr).await?;
    info!(addr = %settings.server_addr, "Server starting");

    axum::serve(listener, router).await?;
    Ok(())
}
