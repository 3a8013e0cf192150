use parking_lot::RwLock;
use std::sync::Arc;

use crate::analysis::QueryAnalyzer;
use crate::config::{Config, RankingConfig};
use crate::github::GithubClient;
use crate::ranking::RankingEngine;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub analyzer: Arc<QueryAnalyzer>,
    pub github: GithubClient,
    /// Weights and default result count, adjustable at runtime
    pub ranking: Arc<RwLock<RankingConfig>>,
}

impl AppState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let analyzer = QueryAnalyzer::new(&config.analyzer);
        let github = GithubClient::new(config.github.clone())?;
        let ranking = config.ranking.clone();

        Ok(Self {
            config,
            analyzer: Arc::new(analyzer),
            github,
            ranking: Arc::new(RwLock::new(ranking)),
        })
    }

    /// Snapshot of the current ranking settings.
    pub fn ranking_config(&self) -> RankingConfig {
        self.ranking.read().clone()
    }

    /// A ranking engine using the current process-wide weights.
    pub fn ranking_engine(&self) -> RankingEngine {
        RankingEngine::new(self.ranking.read().weights)
    }
}
