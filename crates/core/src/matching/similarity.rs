//! Bigram similarity between titles.

use std::collections::HashMap;

use super::normalize;

/// Similarity between two titles in `[0, 1]`, rounded to two decimals.
///
/// Both inputs are normalized first. The score is the Dice coefficient over
/// the multisets of character bigrams (whitespace removed): `1.0` when the
/// normalized inputs are identical, `0.0` when they share no bigram.
pub fn score(a: &str, b: &str) -> f64 {
    round2(dice(&normalize(a), &normalize(b)))
}

/// Round half away from zero to two decimals.
///
/// Threshold checks compare against values like `0.60`, so this must round,
/// never truncate.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Raw Dice coefficient of two already-normalized strings.
fn dice(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().filter(|c| !c.is_whitespace()).collect();
    let b: Vec<char> = b.chars().filter(|c| !c.is_whitespace()).collect();

    if a == b {
        return 1.0;
    }
    if a.len() < 2 || b.len() < 2 {
        return 0.0;
    }

    let mut first: HashMap<(char, char), usize> = HashMap::new();
    for pair in a.windows(2) {
        *first.entry((pair[0], pair[1])).or_insert(0) += 1;
    }

    let mut intersection = 0usize;
    for pair in b.windows(2) {
        if let Some(count) = first.get_mut(&(pair[0], pair[1])) {
            if *count > 0 {
                *count -= 1;
                intersection += 1;
            }
        }
    }

    (2.0 * intersection as f64) / ((a.len() - 1) + (b.len() - 1)) as f64
}
