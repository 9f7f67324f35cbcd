//! Page Classifier
//!
//! Decides what a fetched page is worth: a usable thread, a transient
//! failure that deserves another attempt, or a block/removal page that will
//! never turn into a thread no matter how often it is requested.

use serde::{Deserialize, Serialize};

/// Family of a terminal marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerKind {
    /// Thread does not exist.
    NotFound,
    /// Generic HTTP 404 page.
    Http404,
    /// Regional access block notice.
    RegionBlock,
    /// Thread hidden for content policy reasons.
    Hidden,
    /// Thread too large to render.
    Oversized,
    /// Edge cache "retry" icon page.
    RetryIcon,
}

/// A string whose presence in a page means the thread is gone for good.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerminalMarker {
    /// Marker family, for logs.
    pub kind: MarkerKind,
    /// Literal text searched for in the raw page.
    pub text: String,
}

impl TerminalMarker {
    /// Creates a marker.
    #[must_use]
    pub fn new(kind: MarkerKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

/// Whether the root post of a page was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RootStatus {
    /// Root post parsed and registered.
    Registered,
    /// Root post present but discarded for having no usable text.
    Discarded,
    /// Root container present but its id could not be resolved.
    MissingIdentity,
    /// No root container on the page.
    Absent,
}

impl RootStatus {
    /// Whether the page rendered its root post.
    #[must_use]
    pub fn is_present(self) -> bool {
        matches!(self, Self::Registered | Self::Discarded)
    }
}

/// Classification of one fetch attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Root post parsed: the page is a thread.
    Ok,
    /// Root post missing without any terminal marker: try again.
    Retry,
    /// Root post missing and the page carries a terminal marker.
    TerminalSkip(TerminalMarker),
}

/// Classifies a page from its text and the outcome of parsing its root.
///
/// Markers are only consulted when the root is missing, so a live thread
/// that happens to quote a marker string is still accepted.
///
/// ```
/// use threadsplit::classifier::{classify, RootStatus, Verdict};
/// use threadsplit::patterns::default_terminal_markers;
///
/// let markers = default_terminal_markers();
/// assert_eq!(classify("<html></html>", RootStatus::Absent, &markers), Verdict::Retry);
/// assert!(matches!(
///     classify("<h1>404 Not Found</h1>", RootStatus::Absent, &markers),
///     Verdict::TerminalSkip(_)
/// ));
/// ```
#[must_use]
pub fn classify(page: &str, root: RootStatus, markers: &[TerminalMarker]) -> Verdict {
    if root.is_present() {
        return Verdict::Ok;
    }
    find_marker(page, markers).map_or(Verdict::Retry, |marker| Verdict::TerminalSkip(marker.clone()))
}

/// First marker contained in `page`.
#[must_use]
pub fn find_marker<'m>(page: &str, markers: &'m [TerminalMarker]) -> Option<&'m TerminalMarker> {
    markers
        .iter()
        .find(|marker| !marker.text.is_empty() && page.contains(marker.text.as_str()))
}
