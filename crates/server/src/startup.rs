use axum::Router;
use configs::{AppConfig, StoreConfig};
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::errors::StartupError;
use crate::routes::{self, AppState};
use service::{artists::ArtistService, runtime, storage::CsvTableStore};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Load `config.toml` (or `CONFIG_PATH`), defaults when absent
pub fn load_config() -> Result<AppConfig, StartupError> {
    AppConfig::load_and_validate().map_err(|e| StartupError::InvalidConfig(e.to_string()))
}

/// Open the CSV store and wrap it in handler state
pub async fn build_state(store: &StoreConfig) -> anyhow::Result<AppState> {
    runtime::ensure_env(&store.path)
        .await
        .map_err(|e| StartupError::Runtime(e.to_string()))?;
    let csv_store = CsvTableStore::from_config(store).await?;
    info!(
        path = %csv_store.path().display(),
        declared_columns = store.columns.len(),
        "artist store opened"
    );
    Ok(AppState { artists: ArtistService::new(csv_store) })
}

pub async fn build_app(cfg: &AppConfig) -> anyhow::Result<Router> {
    let state = build_state(&cfg.store).await?;
    Ok(routes::build_router(state, build_cors()))
}

/// Build the app from an already-loaded config and serve until the listener fails
pub async fn run_with_config(cfg: AppConfig) -> anyhow::Result<()> {
    let app = build_app(&cfg).await?;

    let bind = cfg.server.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind).await?;
    let addr = listener.local_addr()?;
    info!(%addr, "starting artist store server");
    axum::serve(listener, app).await?;
    Ok(())
}
