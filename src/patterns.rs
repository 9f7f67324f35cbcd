//! Compiled regex patterns, CSS selectors and default site markers.
//!
//! All patterns are compiled once using `LazyLock`. Selector tables are kept
//! in priority order: the first entry that matches wins.

#![allow(clippy::expect_used)]

use std::sync::LazyLock;

use regex::Regex;

use crate::classifier::{MarkerKind, TerminalMarker};

// =============================================================================
// Text Patterns
// =============================================================================

/// Quote reference: reply sigil, post number, optional original-poster tag.
///
/// Matches `>>12345`, `>>12345 (OP)` and `>>12345(OP)`.
pub static MENTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r">>\d+(?:\s*\(OP\))?").expect("MENTION regex")
});

/// Standalone original-poster tag left behind by some templates.
pub static OP_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\(OP\)>?").expect("OP_MARKER regex")
});

/// Post number inside a reply-link text such as `>>12345`.
pub static MENTION_TARGET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*>>(\d+)").expect("MENTION_TARGET regex")
});

/// Any run of whitespace, collapsed to a single space.
pub static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s+").expect("WHITESPACE regex")
});

/// Leading digit run of a malformed id attribute such as `12345"\n`.
pub static LEADING_DIGITS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d+").expect("LEADING_DIGITS regex")
});

/// Post id embedded in raw markup: `m` prefix followed by four or more digits.
pub static EMBEDDED_POST_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\bid\s*=\s*["']?m(\d{4,})"#).expect("EMBEDDED_POST_ID regex")
});

/// Trailing thread number of a locator path, e.g. `/b/res/123456.html`.
pub static THREAD_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+)(?:\.[A-Za-z0-9]+)?/?$").expect("THREAD_NUMBER regex")
});

// =============================================================================
// CSS Selectors
// =============================================================================

/// Root ("original") post container, one entry per known template.
pub const ROOT_POST_SELECTORS: &[&str] = &[
    "div.post.oppost",
    "div.post.post_type_oppost",
    "div.thread__oppost",
];

/// Reply post containers, matched in document order.
pub const REPLY_POST_SELECTOR: &str = "div.post.reply, div.post.post_type_reply";

/// Class names of body nodes that are neither `blockquote` nor `article`.
pub const MESSAGE_CLASSES: &[&str] = &["post__message", "post-message", "post-body"];

/// Anchors that may point at another post.
pub const MENTION_LINK_SELECTOR: &str = "a";

/// Class carried by reply links on every known template.
pub const REPLY_LINK_CLASS: &str = "post-reply-link";

/// Attribute holding the numeric post id on containers and reply links.
pub const POST_NUMBER_ATTR: &str = "data-num";

// =============================================================================
// Network Defaults
// =============================================================================

/// User agent sent unless overridden in `Options`.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36";

/// Terminal markers known for the supported site templates.
#[must_use]
pub fn default_terminal_markers() -> Vec<TerminalMarker> {
    [
        (MarkerKind::NotFound, "Тред не найден"),
        (MarkerKind::Http404, "404 Not Found"),
        (MarkerKind::RegionBlock, "Доступ к ресурсу ограничен"),
        (MarkerKind::RegionBlock, "Access to this resource is restricted in your region"),
        (MarkerKind::Hidden, "Тред скрыт"),
        (MarkerKind::Oversized, "Тред слишком большой"),
        (MarkerKind::RetryIcon, "icon-retry"),
    ]
    .into_iter()
    .map(|(kind, text)| TerminalMarker::new(kind, text))
    .collect()
}
