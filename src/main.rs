use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use velomax_server::{
    config::Config,
    db,
    handlers::{self, AppState},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "velomax_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    let pool = db::init_db_pool(&config.database_url, config.db_max_connections).await?;

    let app = handlers::router(AppState::new(pool));

    let listener = tokio::net::TcpListener::bind(config.server_addr()).await?;
    tracing::info!("Listening on {}", config.server_addr());
    axum::serve(listener, app).await?;

    Ok(())
}
