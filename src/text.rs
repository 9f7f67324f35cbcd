//! Text normalization helpers shared by the parser and the fetch loop.

use crate::patterns::{MENTION, OP_MARKER, WHITESPACE};

/// Separator inserted between text runs and in place of stripped markup.
pub const SEPARATOR: &str = " ";

/// Collapses every whitespace run to one space and trims both ends.
///
/// Idempotent: `normalize(&normalize(s)) == normalize(s)`.
///
/// ```
/// use threadsplit::text::normalize;
///
/// assert_eq!(normalize("  a \n\n b\t"), "a b");
/// ```
#[must_use]
pub fn normalize(text: &str) -> String {
    WHITESPACE.replace_all(text, SEPARATOR).trim().to_string()
}

/// Removes quote references and original-poster tags, then normalizes.
///
/// ```
/// use threadsplit::text::strip_mentions;
///
/// assert_eq!(strip_mentions(">>123 (OP) agreed"), "agreed");
/// ```
#[must_use]
pub fn strip_mentions(text: &str) -> String {
    let without_mentions = MENTION.replace_all(text, SEPARATOR);
    let without_op = OP_MARKER.replace_all(&without_mentions, SEPARATOR);
    normalize(&without_op)
}

/// Character length, the unit of every size comparison.
#[inline]
#[must_use]
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// English ordinal for log messages: `1st`, `2nd`, `11th`, `23rd`.
#[must_use]
pub fn ordinal(n: u32) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{n}{suffix}")
}
