use axum::routing::{get, post};
use axum::Router;
use tracing_subscriber::EnvFilter;

use repo_scout::api;
use repo_scout::config::Config;
use repo_scout::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env();
    tracing::info!("GitHub API: {}", config.github.api_url);
    tracing::info!(
        "Ranking weights: semantic={} stars={} recency={}",
        config.ranking.weights.semantic,
        config.ranking.weights.stars,
        config.ranking.weights.recency
    );
    let state = AppState::new(config.clone())?;
    if !state.github.is_authenticated() {
        tracing::warn!("No GITHUB_TOKEN set; unauthenticated requests are rate-limited");
    }

    let app = Router::new()
        .route("/api/analyze", post(api::rank::analyze))
        .route("/api/rank", post(api::rank::rank))
        .route("/api/search", post(api::search::search))
        .route(
            "/api/config",
            get(api::config::get_config).put(api::config::update_config),
        )
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}
