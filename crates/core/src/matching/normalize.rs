//! Title normalization for fuzzy comparison.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Canonicalize a title for comparison.
///
/// Lower-cases, decomposes (NFD) and drops combining marks, turns every run of
/// characters that are neither alphanumeric nor whitespace into a single
/// space, then collapses whitespace runs and trims.
///
/// The result is idempotent: `normalize(&normalize(s)) == normalize(s)`.
pub fn normalize(s: &str) -> String {
    let stripped: String = s
        .to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect();

    let mut out = String::with_capacity(stripped.len());
    let mut pending_space = false;

    for c in stripped.chars() {
        if c.is_alphanumeric() {
            if pending_space && !out.is_empty() {
                out.push(' ');
            }
            pending_space = false;
            out.push(c);
        } else {
            // Punctuation and whitespace both collapse into one separator.
            pending_space = true;
        }
    }

    out
}
