use crate::analysis::keywords::normalize;
use crate::config::MatchMode;

/// Fixed lists of known languages and frameworks.
///
/// Entries are normalized once at construction so they compare directly
/// against normalized query text.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    languages: Vec<String>,
    frameworks: Vec<String>,
    match_mode: MatchMode,
}

fn normalize_entries(entries: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(entries.len());
    for entry in entries {
        let entry = normalize(entry);
        if !entry.is_empty() && !out.contains(&entry) {
            out.push(entry);
        }
    }
    out
}

/// Terms used for whole-word matching: split on spaces and hyphens so that
/// `react-native` still mentions `react`.
fn terms(normalized: &str) -> Vec<&str> {
    normalized
        .split(|c: char| c == ' ' || c == '-')
        .filter(|t| !t.is_empty())
        .collect()
}

impl Vocabulary {
    pub fn new(languages: &[String], frameworks: &[String], match_mode: MatchMode) -> Self {
        Self {
            languages: normalize_entries(languages),
            frameworks: normalize_entries(frameworks),
            match_mode,
        }
    }

    pub fn languages(&self) -> &[String] {
        &self.languages
    }

    pub fn frameworks(&self) -> &[String] {
        &self.frameworks
    }

    pub fn match_mode(&self) -> MatchMode {
        self.match_mode
    }

    /// Detect known languages and frameworks in already-normalized text.
    /// Results follow vocabulary order.
    pub fn detect(&self, normalized: &str) -> (Vec<String>, Vec<String>) {
        let text_terms = terms(normalized);
        let find = |entries: &[String]| -> Vec<String> {
            entries
                .iter()
                .filter(|entry| self.matches(normalized, &text_terms, entry))
                .cloned()
                .collect()
        };
        (find(&self.languages), find(&self.frameworks))
    }

    fn matches(&self, normalized: &str, text_terms: &[&str], entry: &str) -> bool {
        match self.match_mode {
            MatchMode::Substring => normalized.contains(entry),
            MatchMode::Token => {
                let entry_terms = terms(entry);
                if entry_terms.is_empty() || entry_terms.len() > text_terms.len() {
                    return false;
                }
                text_terms
                    .windows(entry_terms.len())
                    .any(|window| window == entry_terms.as_slice())
            }
        }
    }
}
