use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::info;

use wayfinder::config::Config;
use wayfinder::db::Database;
use wayfinder::http::{self, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file when present
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("wayfinder=info".parse()?),
        )
        .init();

    info!("Starting wayfinder");

    let config = Config::from_env()?;

    let db = Database::connect(&config.database_url).await?;
    if config.seed_demo_data {
        db.seed_demo_data()
            .await
            .context("Failed to seed demo data")?;
    }

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    let app = http::router(AppState::new(config, db));

    info!("✓ Listening on http://{}", addr);
    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
