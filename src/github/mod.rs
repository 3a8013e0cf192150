//! GitHub repository search: the network side of the pipeline.
//!
//! Failures here are real errors (network, rate limit, bad responses) and
//! are surfaced to the caller, unlike the analysis and ranking core.

pub mod client;

use crate::models::RateLimit;

pub use client::{build_query, parse_rate_limit, parse_search_body, GithubClient, SearchPage};

#[derive(Debug, thiserror::Error)]
pub enum GithubError {
    #[error("Empty search query")]
    EmptyQuery,
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("GitHub API rate limit exceeded (403): {body}")]
    RateLimited { rate_limit: RateLimit, body: String },
    #[error("GitHub API error {status}: {body}")]
    Api { status: u16, body: String },
    #[error("Malformed GitHub search response: {0}")]
    Decode(String),
}
