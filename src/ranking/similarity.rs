//! Ratcliff/Obershelp "gestalt pattern matching" similarity.
//!
//! The ratio is `2 * M / T`, where `T` is the combined length of both strings
//! in chars and `M` is the number of chars covered by matching blocks. Blocks
//! are found by taking the longest common substring, then recursing on the
//! unmatched pieces to its left and right.
//!
//! Each longest-substring search is a dynamic program over the two ranges,
//! `O(n * m)` time and `O(m)` space. The number of searches grows with the
//! number of blocks, so the worst case is cubic. [`semantic_similarity`]
//! compares at most [`MAX_COMPARE_CHARS`] chars of each side, which keeps
//! one comparison bounded no matter how long the inputs are. No "junk"
//! heuristic is applied, so every char participates in matching.

/// Chars of each input that take part in [`semantic_similarity`].
pub const MAX_COMPARE_CHARS: usize = 512;

/// Similarity of `a` and `b` in `[0, 1]`, compared case-insensitively on the
/// first [`MAX_COMPARE_CHARS`] chars of each side.
/// Returns 0.0 when either side is empty or whitespace-only.
pub fn semantic_similarity(a: &str, b: &str) -> f64 {
    if a.trim().is_empty() || b.trim().is_empty() {
        return 0.0;
    }
    let a: Vec<char> = a.to_lowercase().chars().take(MAX_COMPARE_CHARS).collect();
    let b: Vec<char> = b.to_lowercase().chars().take(MAX_COMPARE_CHARS).collect();
    ratio(&a, &b)
}

/// `2 * M / T` over two char sequences.
pub fn ratio(a: &[char], b: &[char]) -> f64 {
    let total = a.len() + b.len();
    if total == 0 {
        return 0.0;
    }
    let matched: usize = matching_blocks(a, b).iter().map(|block| block.len).sum();
    (2.0 * matched as f64 / total as f64).clamp(0.0, 1.0)
}

/// A run where `a[a_start..a_start + len] == b[b_start..b_start + len]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchBlock {
    pub a_start: usize,
    pub b_start: usize,
    pub len: usize,
}

/// All matching blocks, ordered by position in `a`.
pub fn matching_blocks(a: &[char], b: &[char]) -> Vec<MatchBlock> {
    let mut blocks = Vec::new();
    // Explicit stack of (alo, ahi, blo, bhi) ranges instead of recursion
    let mut pending = vec![(0, a.len(), 0, b.len())];

    while let Some((alo, ahi, blo, bhi)) = pending.pop() {
        let block = longest_match(a, alo, ahi, b, blo, bhi);
        if block.len == 0 {
            continue;
        }
        if alo < block.a_start && blo < block.b_start {
            pending.push((alo, block.a_start, blo, block.b_start));
        }
        let a_end = block.a_start + block.len;
        let b_end = block.b_start + block.len;
        if a_end < ahi && b_end < bhi {
            pending.push((a_end, ahi, b_end, bhi));
        }
        blocks.push(block);
    }

    blocks.sort_by_key(|block| (block.a_start, block.b_start));
    blocks
}

/// Longest common run within `a[alo..ahi]` and `b[blo..bhi]`.
///
/// Among equally long runs, the one starting earliest in `a` wins, then the
/// one starting earliest in `b`.
fn longest_match(
    a: &[char],
    alo: usize,
    ahi: usize,
    b: &[char],
    blo: usize,
    bhi: usize,
) -> MatchBlock {
    let mut best = MatchBlock {
        a_start: alo,
        b_start: blo,
        len: 0,
    };
    if alo >= ahi || blo >= bhi {
        return best;
    }

    let width = bhi - blo;
    // prev[j + 1] = length of the common run ending at (i - 1, blo + j)
    let mut prev = vec![0usize; width + 1];
    let mut curr = vec![0usize; width + 1];

    for i in alo..ahi {
        for j in 0..width {
            curr[j + 1] = if a[i] == b[blo + j] { prev[j] + 1 } else { 0 };
            let len = curr[j + 1];
            if len > best.len {
                best = MatchBlock {
                    a_start: i + 1 - len,
                    b_start: blo + j + 1 - len,
                    len,
                };
            }
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    best
}
