//! Axum HTTP handlers.

pub mod config;
pub mod rank;
pub mod search;

use axum::http::StatusCode;

use crate::models::{RepositoryCandidate, ScoredCandidate, WeightConfig};
use crate::ranking::RankingEngine;

/// Resolve a requested result count: absent uses the configured default,
/// zero or negative yields no results.
pub fn resolve_top_n(requested: Option<i64>, default: usize) -> usize {
    match requested {
        None => default,
        Some(n) => usize::try_from(n).unwrap_or(0),
    }
}

/// Run the CPU-bound ranking step on the blocking pool.
pub async fn rank_blocking(
    engine: RankingEngine,
    candidates: Vec<RepositoryCandidate>,
    description: String,
    top_n: usize,
    weights: WeightConfig,
) -> Result<Vec<ScoredCandidate>, (StatusCode, String)> {
    tokio::task::spawn_blocking(move || {
        engine.rank_with_weights(&candidates, &description, top_n, &weights)
    })
    .await
    .map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Ranking error: {e}"),
        )
    })
}
