use std::sync::Arc;

use anyhow::Context;

use devconnect_api::config::AppConfig;
use devconnect_api::database::PgStore;
use devconnect_api::routes::{app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL and JWT_SECRET_KEY
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let config = AppConfig::from_env();
    if config.security.jwt_secret.is_empty() {
        anyhow::bail!("JWT_SECRET_KEY must be set");
    }
    tracing::info!("starting devconnect-api in {:?} mode", config.environment);

    // Storage must be reachable at boot; anything else is fatal
    let store = PgStore::connect(&config.database)
        .await
        .context("database connection failed")?;
    store.migrate().await.context("schema bootstrap failed")?;

    let port = config.server.port;
    let state = AppState {
        config: Arc::new(config),
        store: Arc::new(store),
    };

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("listening on http://{}", bind_addr);
    axum::serve(listener, app(state)).await.context("server")?;
    Ok(())
}
