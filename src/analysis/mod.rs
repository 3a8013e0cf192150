//! Query analysis: turn a free-text project description into a
//! [`QuerySignature`] of keywords plus detected languages and frameworks.
//!
//! Everything here is deterministic and infallible. Text that carries no
//! signal produces an empty signature, never an error.

pub mod keywords;
pub mod vocabulary;

use std::collections::HashSet;

use crate::config::AnalyzerConfig;
use crate::models::QuerySignature;

pub use keywords::normalize;
pub use vocabulary::Vocabulary;

/// Stateless analyzer configured with a keyword limit, stopwords and
/// vocabularies.
#[derive(Debug, Clone)]
pub struct QueryAnalyzer {
    keyword_limit: usize,
    stopwords: HashSet<String>,
    vocabulary: Vocabulary,
}

impl Default for QueryAnalyzer {
    fn default() -> Self {
        Self::new(&AnalyzerConfig::default())
    }
}

impl QueryAnalyzer {
    pub fn new(config: &AnalyzerConfig) -> Self {
        Self {
            keyword_limit: config.keyword_limit,
            stopwords: config.stopwords.iter().map(|w| normalize(w)).collect(),
            vocabulary: Vocabulary::new(&config.languages, &config.frameworks, config.match_mode),
        }
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// See [`keywords::extract_keywords`].
    pub fn extract_keywords(&self, text: &str, top_n: usize) -> Vec<String> {
        keywords::extract_keywords(text, top_n, &self.stopwords)
    }

    /// Known languages and frameworks mentioned in `text`, in vocabulary order.
    pub fn detect_languages_and_frameworks(&self, text: &str) -> (Vec<String>, Vec<String>) {
        self.vocabulary.detect(&normalize(text))
    }

    pub fn analyze(&self, text: &str) -> QuerySignature {
        let keywords = self.extract_keywords(text, self.keyword_limit);
        let (languages, frameworks) = self.detect_languages_and_frameworks(text);

        tracing::debug!(
            ?keywords,
            ?languages,
            ?frameworks,
            mode = ?self.vocabulary.match_mode(),
            "Analyzed query text ({} chars)",
            text.len()
        );

        QuerySignature {
            keywords,
            languages,
            frameworks,
        }
    }
}
