use streamportal::{
    api::{create_router, AppState},
    config::Config,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("streamportal=info,tower_http=info")),
        )
        .init();

    // Fail fast on a missing or malformed API key instead of serving 401s.
    config.validate_api_key()?;
    tracing::info!("TMDB API key validated");

    let state = AppState::from_config(&config)?;
    let app = create_router(state, &config);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(
        addr = %addr,
        origins = ?config.origins(),
        "StreamPortal API listening"
    );
    axum::serve(listener, app).await?;

    Ok(())
}
