//! # repo-scout
//!
//! Turn a free-text description of a desired project into a ranked list of
//! matching GitHub repositories.
//!
//! ## Architecture
//!
//! ```text
//!                   ┌──────────────────────┐
//!                   │  Project description │
//!                   └──────────┬───────────┘
//!                              │
//!                              ▼
//!                  ┌───────────────────────┐
//!                  │     QueryAnalyzer     │
//!                  │  normalize, keywords, │
//!                  │  languages/frameworks │
//!                  └───────────┬───────────┘
//!                              │ QuerySignature
//!                              ▼
//!                  ┌───────────────────────┐
//!                  │  GitHub search API    │
//!                  │  keywords + language: │
//!                  └───────────┬───────────┘
//!                              │ candidates + rate limit
//!                              ▼
//!                  ┌───────────────────────┐
//!                  │    RankingEngine      │
//!                  │  60% text similarity  │
//!                  │  25% log stars        │
//!                  │  15% recency decay    │
//!                  └───────────┬───────────┘
//!                              │ stable sort, top N
//!                              ▼
//!                  ┌───────────────────────┐
//!                  │    Ranked results     │
//!                  └───────────────────────┘
//! ```
//!
//! ## Module Overview
//!
//! - [`config`] - Environment-based configuration for server, GitHub client, ranking and analysis
//! - [`models`] - Shared data types: `QuerySignature`, `RepositoryCandidate`, `ScoredCandidate`, request/response types
//! - [`analysis`] - Text normalization, keyword extraction, vocabulary detection
//! - [`ranking::similarity`] - Ratcliff/Obershelp string similarity
//! - [`ranking::signals`] - Popularity and recency signals with normalization
//! - [`ranking`] - Composite scoring and stable top-N ranking with an injectable clock
//! - [`github`] - GitHub repository search client and rate-limit parsing
//! - [`api`] - Axum HTTP handlers for analyze, rank, search and config
//! - [`state`] - Shared application state holding the analyzer, client and runtime weights

pub mod analysis;
pub mod api;
pub mod config;
pub mod github;
pub mod models;
pub mod ranking;
pub mod state;
