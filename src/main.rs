use anyhow::Context;
use tracing_subscriber::EnvFilter;

use escuelad::api::{self, AppState};
use escuelad::config::Config;
use escuelad::db;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("escuelad=info,tower_http=info")),
        )
        .init();

    let conn = db::open_db(&config.db_path, &config.admin_password)
        .with_context(|| format!("opening database at {}", config.db_path.display()))?;
    tracing::info!(db = %config.db_path.display(), "database ready");

    let app = api::router(AppState::new(conn));
    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("binding {}", config.addr))?;
    tracing::info!(addr = %config.addr, "escuelad listening");

    axum::serve(listener, app).await?;
    Ok(())
}
