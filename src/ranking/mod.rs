//! Relevance ranking of candidate repositories against a free-text
//! description.
//!
//! Each candidate gets three sub-scores, all normalized to `[0, 1]`:
//!
//! ```text
//! semantic   = ratcliff_obershelp(description, name + " " + description)
//! popularity = squash(ln(1 + stars))
//! recency    = 1 / (1 + whole days since updated_at)
//!
//! score = w.semantic * semantic + w.stars * popularity + w.recency * recency
//! ```
//!
//! Candidates are scored independently, sorted by descending score (ties
//! keep input order) and truncated to the requested count. Scoring never
//! fails: malformed fields were already replaced by their fallbacks when the
//! record was read, and a non-finite result is forced to 0.

pub mod clock;
pub mod signals;
pub mod similarity;

use chrono::{DateTime, Utc};

use crate::models::{RepositoryCandidate, ScoreBreakdown, ScoredCandidate, WeightConfig};

pub use clock::{Clock, FixedClock, SystemClock};
pub use signals::{normalize_signal, popularity_score, recency_score, stars_score};
pub use similarity::semantic_similarity;

/// Sub-scores of one candidate against `description`.
pub fn score_breakdown(
    candidate: &RepositoryCandidate,
    description: &str,
    now: DateTime<Utc>,
) -> ScoreBreakdown {
    ScoreBreakdown {
        semantic: semantic_similarity(description, &candidate.match_text()),
        popularity: popularity_score(candidate.stargazer_count),
        recency: normalize_signal(recency_score(candidate.updated_at.as_deref(), now)),
    }
}

/// Weighted sum of a breakdown. Non-finite results become exactly 0.
pub fn composite_score(breakdown: &ScoreBreakdown, weights: &WeightConfig) -> f64 {
    let w = weights.sanitized();
    let score = w.semantic * breakdown.semantic.clamp(0.0, 1.0)
        + w.stars * breakdown.popularity.clamp(0.0, 1.0)
        + w.recency * breakdown.recency.clamp(0.0, 1.0);
    if score.is_finite() {
        score
    } else {
        0.0
    }
}

pub fn score_candidate(
    candidate: &RepositoryCandidate,
    description: &str,
    weights: &WeightConfig,
    now: DateTime<Utc>,
) -> ScoredCandidate {
    let breakdown = score_breakdown(candidate, description, now);
    ScoredCandidate {
        candidate: candidate.clone(),
        score: composite_score(&breakdown, weights),
        breakdown,
    }
}

/// Score every candidate, sort by descending score (stable), keep `top_n`.
///
/// Output length is `min(top_n, candidates.len())`. `now` is the single
/// instant all recency terms are measured against.
pub fn rank_repositories(
    candidates: &[RepositoryCandidate],
    description: &str,
    top_n: usize,
    weights: &WeightConfig,
    now: DateTime<Utc>,
) -> Vec<ScoredCandidate> {
    if top_n == 0 || candidates.is_empty() {
        return Vec::new();
    }

    let mut scored: Vec<(usize, ScoreBreakdown, f64)> = candidates
        .iter()
        .enumerate()
        .map(|(i, candidate)| {
            let breakdown = score_breakdown(candidate, description, now);
            let score = composite_score(&breakdown, weights);
            (i, breakdown, score)
        })
        .collect();

    // sort_by is stable: equal scores keep input order
    scored.sort_by(|a, b| b.2.partial_cmp(&a.2).unwrap_or(std::cmp::Ordering::Equal));
    scored.truncate(top_n);

    tracing::debug!(
        "Ranked {} candidates, kept {} (top score {:.4})",
        candidates.len(),
        scored.len(),
        scored.first().map(|s| s.2).unwrap_or(0.0)
    );

    scored
        .into_iter()
        .map(|(i, breakdown, score)| ScoredCandidate {
            candidate: candidates[i].clone(),
            score,
            breakdown,
        })
        .collect()
}

/// Ranking with a configured weight set and an injected clock.
#[derive(Debug, Clone)]
pub struct RankingEngine<C = SystemClock> {
    weights: WeightConfig,
    clock: C,
}

impl RankingEngine<SystemClock> {
    pub fn new(weights: WeightConfig) -> Self {
        Self::with_clock(weights, SystemClock)
    }
}

impl Default for RankingEngine<SystemClock> {
    fn default() -> Self {
        Self::new(WeightConfig::default())
    }
}

impl<C: Clock> RankingEngine<C> {
    pub fn with_clock(weights: WeightConfig, clock: C) -> Self {
        Self {
            weights: weights.sanitized(),
            clock,
        }
    }

    pub fn weights(&self) -> &WeightConfig {
        &self.weights
    }

    pub fn rank(
        &self,
        candidates: &[RepositoryCandidate],
        description: &str,
        top_n: usize,
    ) -> Vec<ScoredCandidate> {
        self.rank_with_weights(candidates, description, top_n, &self.weights)
    }

    /// Rank with `weights` overriding the engine's own for this call.
    pub fn rank_with_weights(
        &self,
        candidates: &[RepositoryCandidate],
        description: &str,
        top_n: usize,
        weights: &WeightConfig,
    ) -> Vec<ScoredCandidate> {
        rank_repositories(candidates, description, top_n, weights, self.clock.now())
    }
}
