use anyhow::Context;
use std::net::SocketAddr;
use std::sync::Arc;
use trade_builder::{api, config::Config, db::init_db, Repository};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing_subscriber::filter::LevelFilter::INFO.into()),
        )
        .init();

    // Load configuration
    let config = Config::from_env().context("invalid configuration")?;

    let port = config.port;

    let pool = init_db(&config.database_path)
        .await
        .with_context(|| format!("failed to open trade store at {}", config.database_path))?;
    let repo = Arc::new(Repository::new(pool));

    tracing::info!(
        currency = %config.currency,
        plan_max_trades = ?config.plan_max_trades,
        "trade builder configured"
    );

    let app = api::create_router(api::AppState::new(repo, config));

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind to {}", addr))?;

    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
