use serde::{Deserialize, Serialize};

use crate::models::WeightConfig;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server bind address
    pub bind_addr: String,
    /// GitHub search API settings
    pub github: GithubConfig,
    /// Ranking weights and result count
    pub ranking: RankingConfig,
    /// Keyword extraction and vocabulary detection
    pub analyzer: AnalyzerConfig,
}

/// Settings for the GitHub repository search client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GithubConfig {
    /// Base URL for the REST API.
    pub api_url: String,
    /// Personal access token. Unauthenticated requests are heavily rate-limited.
    #[serde(skip_serializing)]
    pub token: Option<String>,
    /// Results requested per search call.
    pub per_page: usize,
    /// Upper bound for `per_page`.
    pub max_results: usize,
    /// Request timeout in seconds (capped at 60).
    pub timeout_secs: u64,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.github.com".to_string(),
            token: None,
            per_page: 30,
            max_results: 50,
            timeout_secs: 15,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingConfig {
    pub weights: WeightConfig,
    /// Default number of ranked results returned
    pub top_n: usize,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            weights: WeightConfig::default(),
            top_n: 10,
        }
    }
}

/// How vocabulary entries are matched against normalized text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// Entry must equal a whole term (terms are split on whitespace and `-`).
    Token,
    /// Entry may appear anywhere, so `go` also matches `going`.
    Substring,
}

impl MatchMode {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "token" | "word" => Some(MatchMode::Token),
            "substring" => Some(MatchMode::Substring),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Maximum number of keywords kept in a query signature
    pub keyword_limit: usize,
    pub match_mode: MatchMode,
    /// Known programming languages, in detection order
    pub languages: Vec<String>,
    /// Known frameworks and libraries, in detection order
    pub frameworks: Vec<String>,
    /// Words never reported as keywords
    pub stopwords: Vec<String>,
}

const DEFAULT_LANGUAGES: &[&str] = &[
    "python",
    "javascript",
    "typescript",
    "go",
    "java",
    "ruby",
    "c",
    "c++",
    "c#",
    "php",
    "rust",
];

const DEFAULT_FRAMEWORKS: &[&str] = &[
    "django", "flask", "fastapi", "react", "vue", "angular", "spring", "express", "rails",
    "laravel",
];

const DEFAULT_STOPWORDS: &[&str] = &[
    "the", "a", "an", "for", "to", "of", "in", "on", "with", "and", "or", "that", "is", "as",
];

fn owned(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            keyword_limit: 8,
            match_mode: MatchMode::Token,
            languages: owned(DEFAULT_LANGUAGES),
            frameworks: owned(DEFAULT_FRAMEWORKS),
            stopwords: owned(DEFAULT_STOPWORDS),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:9000".to_string(),
            github: GithubConfig::default(),
            ranking: RankingConfig::default(),
            analyzer: AnalyzerConfig::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(addr) = std::env::var("REPO_SCOUT_BIND_ADDR") {
            config.bind_addr = addr;
        }

        // GitHub client
        if let Ok(url) = std::env::var("GITHUB_API_URL") {
            config.github.api_url = url.trim_end_matches('/').to_string();
        }
        if let Ok(token) = std::env::var("GITHUB_TOKEN") {
            if !token.trim().is_empty() {
                config.github.token = Some(token);
            }
        }
        if let Ok(val) = std::env::var("GITHUB_PER_PAGE") {
            if let Ok(v) = val.parse() {
                config.github.per_page = v;
            }
        }
        if let Ok(val) = std::env::var("GITHUB_MAX_RESULTS") {
            if let Ok(v) = val.parse() {
                config.github.max_results = v;
            }
        }
        if let Ok(val) = std::env::var("GITHUB_TIMEOUT_SECS") {
            if let Ok(v) = val.parse::<u64>() {
                config.github.timeout_secs = v.min(60); // Cap at 60s
            }
        }

        // Ranking
        if let Ok(val) = std::env::var("REPO_SCOUT_WEIGHT_SEMANTIC") {
            if let Ok(v) = val.parse() {
                config.ranking.weights.semantic = v;
            }
        }
        if let Ok(val) = std::env::var("REPO_SCOUT_WEIGHT_STARS") {
            if let Ok(v) = val.parse() {
                config.ranking.weights.stars = v;
            }
        }
        if let Ok(val) = std::env::var("REPO_SCOUT_WEIGHT_RECENCY") {
            if let Ok(v) = val.parse() {
                config.ranking.weights.recency = v;
            }
        }
        config.ranking.weights = config.ranking.weights.sanitized();
        if let Ok(val) = std::env::var("REPO_SCOUT_TOP_N") {
            if let Ok(v) = val.parse() {
                config.ranking.top_n = v;
            }
        }

        // Analyzer
        if let Ok(val) = std::env::var("REPO_SCOUT_KEYWORD_LIMIT") {
            if let Ok(v) = val.parse() {
                config.analyzer.keyword_limit = v;
            }
        }
        if let Ok(val) = std::env::var("REPO_SCOUT_MATCH_MODE") {
            match MatchMode::parse(&val) {
                Some(mode) => config.analyzer.match_mode = mode,
                None => tracing::warn!("Ignoring unknown REPO_SCOUT_MATCH_MODE: {val}"),
            }
        }

        config
    }
}
