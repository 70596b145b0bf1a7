//! Text utilities: counting, collapsing, and comparing text.

use std::collections::HashSet;

use crate::patterns;

/// Counts Unicode code points, not bytes.
#[inline]
#[must_use]
pub fn char_count(s: &str) -> usize {
    s.chars().count()
}

/// Counts words, splitting on any whitespace run.
#[inline]
#[must_use]
pub fn word_count(s: &str) -> usize {
    s.split_whitespace().count()
}

/// Compares the second text to the first one.
///
/// `1.0` means the same text, `0.0` completely different. Both texts are
/// tokenised on non-word characters; the result is one minus the ratio of
/// the concatenated length of tokens unique to `text_b` over the
/// concatenated length of all tokens of `text_b`.
#[must_use]
pub fn text_similarity(text_a: &str, text_b: &str) -> f64 {
    let lower_a = text_a.to_lowercase();
    let lower_b = text_b.to_lowercase();

    let tokens_a: HashSet<&str> = patterns::TOKENIZE
        .split(&lower_a)
        .filter(|t| !t.is_empty())
        .collect();
    let tokens_b: Vec<&str> = patterns::TOKENIZE
        .split(&lower_b)
        .filter(|t| !t.is_empty())
        .collect();

    let unique_b: Vec<&str> = tokens_b
        .iter()
        .filter(|t| !tokens_a.contains(**t))
        .copied()
        .collect();

    let merged_b = tokens_b.join(" ");
    if merged_b.is_empty() {
        return 0.0;
    }
    let merged_unique_b = unique_b.join(" ");

    let distance = char_count(&merged_unique_b) as f64 / char_count(&merged_b) as f64;
    1.0 - distance
}

/// Repairs a string to valid UTF-8, falling back when nothing survives.
///
/// Strings coming out of the DOM are already valid UTF-8 in Rust, but
/// metadata harvested from entity-decoded attributes can carry replacement
/// characters from a lossy upstream decode. Those are stripped; when the
/// cleaned result is empty the fallback is used instead.
#[must_use]
pub fn to_valid_utf8(src: &str, fallback: &str) -> String {
    if !src.contains('\u{FFFD}') {
        return src.to_string();
    }

    let cleaned: String = src.chars().filter(|c| *c != '\u{FFFD}').collect();
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        fallback.to_string()
    } else {
        cleaned.to_string()
    }
}
