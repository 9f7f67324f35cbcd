//! Result types for fetch and segmentation output.

use serde::{Deserialize, Serialize};

use crate::classifier::TerminalMarker;
use crate::graph::ReplyGraph;

/// A root post and the comments claimed under it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    /// Text of the root post.
    pub title: String,

    /// Texts of the posts claimed under the root, in walk order.
    pub comments: Vec<String>,
}

impl Topic {
    /// Creates a topic.
    #[must_use]
    pub fn new(title: impl Into<String>, comments: Vec<String>) -> Self {
        Self {
            title: title.into(),
            comments,
        }
    }
}

/// What the fetch loop ended with.
#[derive(Debug, Clone)]
pub enum FetchOutcome {
    /// A page whose root post was found.
    Complete(ReplyGraph),

    /// A block or removal page; carries whatever posts it still contained.
    Terminal {
        /// Marker that ended the loop.
        marker: TerminalMarker,
        /// Posts parsed from the final page (often none).
        graph: ReplyGraph,
    },
}

impl FetchOutcome {
    /// The parsed posts, regardless of how the loop ended.
    #[must_use]
    pub fn graph(&self) -> &ReplyGraph {
        match self {
            Self::Complete(graph) | Self::Terminal { graph, .. } => graph,
        }
    }

    /// Whether the loop stopped on a terminal marker.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Terminal { .. })
    }
}
