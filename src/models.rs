use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::config::RankingConfig;

/// Structured reading of a free-text project description.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuerySignature {
    /// Most frequent first, ties by first appearance.
    pub keywords: Vec<String>,
    /// Detected languages, in vocabulary order.
    pub languages: Vec<String>,
    /// Detected frameworks, in vocabulary order.
    pub frameworks: Vec<String>,
}

impl QuerySignature {
    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty() && self.languages.is_empty() && self.frameworks.is_empty()
    }

    /// The language used to narrow a search, if any was detected.
    pub fn primary_language(&self) -> Option<&str> {
        self.languages.first().map(String::as_str)
    }
}

/// A repository record as returned by the search API.
///
/// Only `name`, `description`, `stargazer_count` and `updated_at` feed the
/// score; the rest is carried along for display.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RepositoryCandidate {
    pub name: String,
    pub full_name: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "stargazers_count")]
    pub stargazer_count: u64,
    /// ISO-8601 timestamp, kept raw; parsed leniently at scoring time.
    pub updated_at: Option<String>,
    pub html_url: Option<String>,
    pub language: Option<String>,
}

/// A documented fallback applied while reading a candidate record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldFallback {
    /// The record was not a JSON object; every field took its fallback.
    NotAnObject,
    /// `name` missing or not a string; `full_name` or "" used instead.
    Name,
    /// `description` present but not a string; treated as null.
    Description,
    /// `stargazers_count` missing, negative or not an integer; treated as 0.
    StargazerCount,
    /// `updated_at` present but not a string; treated as absent.
    UpdatedAt,
}

fn optional_string(value: &Value, key: &str) -> Result<Option<String>, ()> {
    match value.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(()),
    }
}

fn star_count(value: Option<&Value>) -> Option<u64> {
    let v = value?;
    if let Some(n) = v.as_u64() {
        return Some(n);
    }
    // Whole, non-negative floats such as `42.0` are accepted.
    let f = v.as_f64()?;
    if f.is_finite() && f >= 0.0 && f.fract() == 0.0 && f <= u64::MAX as f64 {
        Some(f as u64)
    } else {
        None
    }
}

impl RepositoryCandidate {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_stars(mut self, stars: u64) -> Self {
        self.stargazer_count = stars;
        self
    }

    pub fn with_updated_at(mut self, updated_at: impl Into<String>) -> Self {
        self.updated_at = Some(updated_at.into());
        self
    }

    /// Read a candidate from an untyped record, applying a fallback for every
    /// field that is missing or malformed. Never fails.
    pub fn from_value_checked(value: &Value) -> (Self, Vec<FieldFallback>) {
        let mut fallbacks = Vec::new();

        if !value.is_object() {
            fallbacks.push(FieldFallback::NotAnObject);
            return (Self::default(), fallbacks);
        }

        let full_name = optional_string(value, "full_name").unwrap_or(None);
        let name = match value.get("name").and_then(Value::as_str) {
            Some(name) => name.to_string(),
            None => {
                fallbacks.push(FieldFallback::Name);
                full_name.clone().unwrap_or_default()
            }
        };

        let description = optional_string(value, "description").unwrap_or_else(|_| {
            fallbacks.push(FieldFallback::Description);
            None
        });

        let stargazer_count = star_count(value.get("stargazers_count")).unwrap_or_else(|| {
            fallbacks.push(FieldFallback::StargazerCount);
            0
        });

        let updated_at = optional_string(value, "updated_at").unwrap_or_else(|_| {
            fallbacks.push(FieldFallback::UpdatedAt);
            None
        });

        let candidate = Self {
            name,
            full_name,
            description,
            stargazer_count,
            updated_at,
            html_url: optional_string(value, "html_url").unwrap_or(None),
            language: optional_string(value, "language").unwrap_or(None),
        };
        (candidate, fallbacks)
    }

    /// Like [`from_value_checked`](Self::from_value_checked), logging any
    /// fallbacks at debug level.
    pub fn from_value(value: &Value) -> Self {
        let (candidate, fallbacks) = Self::from_value_checked(value);
        if !fallbacks.is_empty() {
            tracing::debug!(
                repo = %candidate.name,
                ?fallbacks,
                "Applied field fallbacks to candidate record"
            );
        }
        candidate
    }

    /// Name and description joined by a single space, skipping empty parts.
    pub fn match_text(&self) -> String {
        [Some(self.name.as_str()), self.description.as_deref()]
            .into_iter()
            .flatten()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl<'de> Deserialize<'de> for RepositoryCandidate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(Self::from_value(&value))
    }
}

/// Weights of the three score components. Not required to sum to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeightConfig {
    pub semantic: f64,
    pub stars: f64,
    pub recency: f64,
}

impl Default for WeightConfig {
    fn default() -> Self {
        Self {
            semantic: 0.6,
            stars: 0.25,
            recency: 0.15,
        }
    }
}

impl WeightConfig {
    pub fn new(semantic: f64, stars: f64, recency: f64) -> Self {
        Self {
            semantic,
            stars,
            recency,
        }
    }

    /// Replace negative or non-finite weights with 0.
    pub fn sanitized(self) -> Self {
        fn clean(w: f64) -> f64 {
            if w.is_finite() && w > 0.0 {
                w
            } else {
                0.0
            }
        }
        Self {
            semantic: clean(self.semantic),
            stars: clean(self.stars),
            recency: clean(self.recency),
        }
    }

    /// Upper bound of any composite score under these weights.
    pub fn max_score(&self) -> f64 {
        let w = self.sanitized();
        w.semantic + w.stars + w.recency
    }
}

/// Normalized sub-scores, each in [0, 1], before weighting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub semantic: f64,
    pub popularity: f64,
    pub recency: f64,
}

/// A candidate with its composite relevance score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredCandidate {
    #[serde(flatten)]
    pub candidate: RepositoryCandidate,
    pub score: f64,
    pub breakdown: ScoreBreakdown,
}

/// Rate-limit status reported by the search API.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimit {
    pub remaining: Option<u64>,
    pub limit: Option<u64>,
    /// Reset time as Unix epoch seconds.
    pub reset: Option<i64>,
}

impl RateLimit {
    pub fn is_exhausted(&self) -> bool {
        self.remaining == Some(0)
    }

    pub fn reset_at(&self) -> Option<DateTime<Utc>> {
        self.reset.and_then(|secs| Utc.timestamp_opt(secs, 0).single())
    }
}

/// Analyze request
#[derive(Debug, Clone, Deserialize)]
pub struct AnalyzeRequest {
    pub text: String,
}

/// Rank request: score caller-supplied candidates against a description.
#[derive(Debug, Clone, Deserialize)]
pub struct RankRequest {
    pub description: String,
    #[serde(default)]
    pub candidates: Vec<RepositoryCandidate>,
    /// Falls back to the configured default when absent.
    pub top_n: Option<i64>,
    /// Overrides the process-wide weights for this call only.
    pub weights: Option<WeightConfig>,
}

/// Rank response
#[derive(Debug, Clone, Serialize)]
pub struct RankResponse {
    pub results: Vec<ScoredCandidate>,
}

/// Search request: analyze, fetch from GitHub, rank.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchRequest {
    pub description: String,
    pub top_n: Option<i64>,
    /// Language qualifier; defaults to the first detected language.
    pub language: Option<String>,
    pub weights: Option<WeightConfig>,
}

/// Search response
#[derive(Debug, Clone, Serialize)]
pub struct SearchResponse {
    /// The description as received, trimmed.
    pub query: String,
    /// The query string sent to GitHub.
    pub search_query: String,
    pub analysis: QuerySignature,
    pub results: Vec<ScoredCandidate>,
    /// Candidates fetched and ranked.
    pub total_candidates: usize,
    /// Total matches GitHub reports for the query.
    pub total_count: Option<u64>,
    pub rate_limit: RateLimit,
}

/// Ranking config update request
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RankingConfigUpdate {
    pub semantic: Option<f64>,
    pub stars: Option<f64>,
    pub recency: Option<f64>,
    pub top_n: Option<usize>,
}

impl RankingConfigUpdate {
    pub fn apply(&self, config: &mut RankingConfig) {
        if let Some(v) = self.semantic {
            config.weights.semantic = v;
        }
        if let Some(v) = self.stars {
            config.weights.stars = v;
        }
        if let Some(v) = self.recency {
            config.weights.recency = v;
        }
        config.weights = config.weights.sanitized();
        if let Some(n) = self.top_n {
            config.top_n = n;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_candidate_from_github_item() {
        let item = json!({
            "name": "admin-dashboard",
            "full_name": "acme/admin-dashboard",
            "description": "React TypeScript admin dashboard",
            "stargazers_count": 500,
            "updated_at": "2024-05-01T12:00:00Z",
            "html_url": "https://github.com/acme/admin-dashboard",
            "language": "TypeScript",
            "forks_count": 12
        });
        let (candidate, fallbacks) = RepositoryCandidate::from_value_checked(&item);
        assert!(fallbacks.is_empty());
        assert_eq!(candidate.name, "admin-dashboard");
        assert_eq!(candidate.stargazer_count, 500);
        assert_eq!(candidate.updated_at.as_deref(), Some("2024-05-01T12:00:00Z"));
        assert_eq!(candidate.language.as_deref(), Some("TypeScript"));
    }

    #[test]
    fn test_missing_and_negative_stars_become_zero() {
        let (missing, fallbacks) = RepositoryCandidate::from_value_checked(&json!({"name": "a"}));
        assert_eq!(missing.stargazer_count, 0);
        assert_eq!(fallbacks, vec![FieldFallback::StargazerCount]);

        let negative = RepositoryCandidate::from_value(&json!({"name": "a", "stargazers_count": -5}));
        assert_eq!(negative.stargazer_count, 0);

        let text = RepositoryCandidate::from_value(&json!({"name": "a", "stargazers_count": "lots"}));
        assert_eq!(text.stargazer_count, 0);

        let float = RepositoryCandidate::from_value(&json!({"name": "a", "stargazers_count": 42.0}));
        assert_eq!(float.stargazer_count, 42);
    }

    #[test]
    fn test_malformed_fields_fall_back() {
        let (candidate, fallbacks) = RepositoryCandidate::from_value_checked(&json!({
            "full_name": "acme/tool",
            "description": 17,
            "stargazers_count": 3,
            "updated_at": false
        }));
        assert_eq!(candidate.name, "acme/tool");
        assert_eq!(candidate.description, None);
        assert_eq!(candidate.updated_at, None);
        assert_eq!(
            fallbacks,
            vec![
                FieldFallback::Name,
                FieldFallback::Description,
                FieldFallback::UpdatedAt
            ]
        );
    }

    #[test]
    fn test_non_object_record() {
        let (candidate, fallbacks) = RepositoryCandidate::from_value_checked(&json!([1, 2]));
        assert_eq!(candidate, RepositoryCandidate::default());
        assert_eq!(fallbacks, vec![FieldFallback::NotAnObject]);
    }

    #[test]
    fn test_deserialize_never_fails_on_bad_records() {
        let items: Vec<RepositoryCandidate> = serde_json::from_value(json!([
            {"name": "good", "stargazers_count": 1},
            {"name": null, "stargazers_count": -1, "updated_at": 12},
            "garbage"
        ]))
        .unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].name, "good");
        assert_eq!(items[1].name, "");
        assert_eq!(items[2].stargazer_count, 0);
    }

    #[test]
    fn test_match_text_skips_empty_parts() {
        let both = RepositoryCandidate::new("ts-charts").with_description("charting");
        assert_eq!(both.match_text(), "ts-charts charting");

        let no_desc = RepositoryCandidate::new("ts-charts");
        assert_eq!(no_desc.match_text(), "ts-charts");

        let empty_desc = RepositoryCandidate::new("ts-charts").with_description("");
        assert_eq!(empty_desc.match_text(), "ts-charts");

        let no_name = RepositoryCandidate::new("").with_description("charting");
        assert_eq!(no_name.match_text(), "charting");
    }

    #[test]
    fn test_candidate_serializes_github_star_key() {
        let json = serde_json::to_value(RepositoryCandidate::new("x").with_stars(7)).unwrap();
        assert_eq!(json["stargazers_count"], 7);
    }

    #[test]
    fn test_weights_sanitized() {
        let w = WeightConfig::new(-1.0, f64::NAN, 0.5).sanitized();
        assert_eq!(w, WeightConfig::new(0.0, 0.0, 0.5));
        assert!((WeightConfig::default().max_score() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_partial_weights_deserialize_with_defaults() {
        let w: WeightConfig = serde_json::from_value(json!({"semantic": 1.0})).unwrap();
        assert_eq!(w, WeightConfig::new(1.0, 0.25, 0.15));
    }

    #[test]
    fn test_rate_limit_exhausted() {
        let limit = RateLimit {
            remaining: Some(0),
            limit: Some(10),
            reset: Some(1_700_000_000),
        };
        assert!(limit.is_exhausted());
        assert_eq!(limit.reset_at().unwrap().timestamp(), 1_700_000_000);
        assert!(!RateLimit::default().is_exhausted());
    }

    #[test]
    fn test_ranking_config_update_applies_partially() {
        let mut config = RankingConfig::default();
        RankingConfigUpdate {
            stars: Some(0.5),
            recency: Some(-2.0),
            top_n: Some(3),
            ..Default::default()
        }
        .apply(&mut config);
        assert_eq!(config.weights, WeightConfig::new(0.6, 0.5, 0.0));
        assert_eq!(config.top_n, 3);
    }

    #[test]
    fn test_signature_primary_language() {
        let sig = QuerySignature {
            keywords: vec![],
            languages: vec!["python".into(), "go".into()],
            frameworks: vec![],
        };
        assert_eq!(sig.primary_language(), Some("python"));
        assert!(QuerySignature::default().is_empty());
    }
}
