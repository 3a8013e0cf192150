use axum::extract::State;
use axum::Json;

use crate::config::RankingConfig;
use crate::models::RankingConfigUpdate;
use crate::state::AppState;

/// GET /api/config - Current ranking weights and default result count.
pub async fn get_config(State(state): State<AppState>) -> Json<RankingConfig> {
    Json(state.ranking_config())
}

/// PUT /api/config - Partially update ranking settings.
pub async fn update_config(
    State(state): State<AppState>,
    Json(update): Json<RankingConfigUpdate>,
) -> Json<RankingConfig> {
    let updated = {
        let mut ranking = state.ranking.write();
        update.apply(&mut ranking);
        ranking.clone()
    };

    tracing::info!(
        "Ranking config updated: semantic={} stars={} recency={} top_n={}",
        updated.weights.semantic,
        updated.weights.stars,
        updated.weights.recency,
        updated.top_n
    );
    Json(updated)
}
