use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use crate::api::{rank_blocking, resolve_top_n};
use crate::github::GithubError;
use crate::models::{SearchRequest, SearchResponse};
use crate::state::AppState;

/// POST /api/search - Full pipeline:
///   1. Analyze the description into keywords + language/framework hints
///   2. Search GitHub with the keywords and the first detected language
///   3. Rank the returned repositories against the original description
pub async fn search(
    State(state): State<AppState>,
    Json(req): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, (StatusCode, String)> {
    let description = req.description.trim().to_string();
    if description.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            "Description is required".to_string(),
        ));
    }

    // ── Step 1: Analysis ────────────────────────────────────
    let analysis = state.analyzer.analyze(&description);
    let language = req
        .language
        .clone()
        .filter(|l| !l.trim().is_empty())
        .or_else(|| analysis.primary_language().map(str::to_string));
    tracing::info!(
        "Query analyzed: keywords={:?} language={:?}",
        analysis.keywords,
        language
    );

    // ── Step 2: Fetch candidates ────────────────────────────
    let page = state
        .github
        .fetch_combined(&analysis.keywords, language.as_deref())
        .await
        .map_err(github_error_response)?;

    if page.rate_limit.is_exhausted() {
        tracing::warn!(
            "GitHub rate limit exhausted, resets at {:?}",
            page.rate_limit.reset_at()
        );
    }

    // ── Step 3: Rank ────────────────────────────────────────
    let ranking = state.ranking_config();
    let top_n = resolve_top_n(req.top_n, ranking.top_n);
    let weights = req.weights.unwrap_or(ranking.weights);
    let total_candidates = page.items.len();
    let results = rank_blocking(
        state.ranking_engine(),
        page.items,
        description.clone(),
        top_n,
        weights,
    )
    .await?;

    Ok(Json(SearchResponse {
        query: description,
        search_query: page.query,
        analysis,
        results,
        total_candidates,
        total_count: page.total_count,
        rate_limit: page.rate_limit,
    }))
}

fn github_error_response(err: GithubError) -> (StatusCode, String) {
    tracing::warn!("GitHub search failed: {err}");
    match &err {
        GithubError::EmptyQuery => (
            StatusCode::BAD_REQUEST,
            "No searchable keywords in description".to_string(),
        ),
        GithubError::RateLimited { .. } => (StatusCode::TOO_MANY_REQUESTS, err.to_string()),
        GithubError::Network(e) if e.is_timeout() => {
            (StatusCode::GATEWAY_TIMEOUT, err.to_string())
        }
        GithubError::Network(_) | GithubError::Api { .. } | GithubError::Decode(_) => {
            (StatusCode::BAD_GATEWAY, err.to_string())
        }
    }
}
