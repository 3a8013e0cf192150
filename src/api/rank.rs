use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use crate::api::{rank_blocking, resolve_top_n};
use crate::models::{AnalyzeRequest, QuerySignature, RankRequest, RankResponse};
use crate::state::AppState;

/// POST /api/analyze - Extract keywords, languages and frameworks from text.
pub async fn analyze(
    State(state): State<AppState>,
    Json(req): Json<AnalyzeRequest>,
) -> Json<QuerySignature> {
    Json(state.analyzer.analyze(&req.text))
}

/// POST /api/rank - Rank caller-supplied candidates against a description.
///
/// Never fails on record contents: malformed candidates were read with
/// fallbacks during deserialization.
pub async fn rank(
    State(state): State<AppState>,
    Json(req): Json<RankRequest>,
) -> Result<Json<RankResponse>, (StatusCode, String)> {
    let ranking = state.ranking_config();
    let top_n = resolve_top_n(req.top_n, ranking.top_n);
    let weights = req.weights.unwrap_or(ranking.weights);
    let total = req.candidates.len();

    let results = rank_blocking(
        state.ranking_engine(),
        req.candidates,
        req.description,
        top_n,
        weights,
    )
    .await?;

    tracing::info!("Ranked {} candidates, returning {}", total, results.len());
    Ok(Json(RankResponse { results }))
}
