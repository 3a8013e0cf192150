use std::collections::{HashMap, HashSet};

/// Lower-case `text`, blank out everything except `[a-z0-9+#-]` and
/// whitespace, then collapse whitespace runs. Keeps tokens like `c++` and
/// `c#` intact. Idempotent.
pub fn normalize(text: &str) -> String {
    let cleaned: String = text
        .to_lowercase()
        .chars()
        .map(|c| if is_kept(c) { c } else { ' ' })
        .collect();
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn is_kept(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '+' | '#' | '-') || c.is_whitespace()
}

/// Most frequent non-stopword tokens of `text`, at most `top_n` of them.
///
/// Ties keep the order in which tokens first appear in the normalized text.
/// Single-character tokens are dropped.
pub fn extract_keywords(text: &str, top_n: usize, stopwords: &HashSet<String>) -> Vec<String> {
    if top_n == 0 || text.trim().is_empty() {
        return Vec::new();
    }

    let normalized = normalize(text);

    // (token, count) in first-seen order
    let mut counts: Vec<(&str, usize)> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();

    for token in normalized.split(' ') {
        if token.chars().count() <= 1 || stopwords.contains(token) {
            continue;
        }
        match positions.get(token) {
            Some(&idx) => counts[idx].1 += 1,
            None => {
                positions.insert(token, counts.len());
                counts.push((token, 1));
            }
        }
    }

    // Stable sort keeps first-seen order among equal counts
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
        .into_iter()
        .take(top_n)
        .map(|(token, _)| token.to_string())
        .collect()
}
