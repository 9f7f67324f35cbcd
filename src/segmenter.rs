//! Topic Segmenter
//!
//! Splits a reply graph into non-overlapping topics.
//!
//! Posts are ranked by how many replies they drew, then by how few posts
//! they quote themselves, then by length. Walking that ranking, every post
//! that is still unclaimed and long enough opens a topic and claims its
//! whole reply chain depth-first. A post is claimed at most once, so no text
//! can appear in two topics.
//!
//! Posts shorter than the size threshold (a percentile of all post sizes)
//! never open a topic and are never listed as comments, but they are still
//! claimed when a chain passes through them so the chain continues past them.

use std::cmp::Reverse;
use std::collections::HashSet;

use tracing::{debug, warn};

use crate::graph::ReplyGraph;
use crate::post::{Post, PostId};
use crate::result::Topic;
use crate::Options;

/// Value at `percentile` (0-100) of `sizes`, floored to an integer.
///
/// Uses linear interpolation between the two closest ranks. An empty input
/// yields 0.
///
/// ```
/// use threadsplit::segmenter::size_threshold;
///
/// assert_eq!(size_threshold(&[], 15.0), 0);
/// assert_eq!(size_threshold(&[10, 20, 30, 40, 50], 50.0), 30);
/// assert_eq!(size_threshold(&[10, 20], 15.0), 11);
/// ```
#[must_use]
pub fn size_threshold(sizes: &[usize], percentile: f64) -> usize {
    if sizes.is_empty() {
        return 0;
    }
    let mut sorted = sizes.to_vec();
    sorted.sort_unstable();

    let rank = percentile.clamp(0.0, 100.0) * (sorted.len() - 1) as f64 / 100.0;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let low = sorted[lower] as f64;
    let high = sorted[upper] as f64;

    (low + (high - low) * (rank - lower as f64)).floor() as usize
}

/// Partitions reply graphs into topics.
#[derive(Debug, Clone, Copy)]
pub struct Segmenter {
    percentile: f64,
    max_chain_depth: usize,
}

impl Segmenter {
    /// Creates a segmenter from `options.size_percentile` and
    /// `options.max_chain_depth`.
    #[must_use]
    pub fn new(options: &Options) -> Self {
        Self {
            percentile: options.size_percentile,
            max_chain_depth: options.max_chain_depth.max(1),
        }
    }

    /// Splits `graph` into topics, most replied-to roots first.
    #[must_use]
    pub fn segment(&self, graph: &ReplyGraph) -> Vec<Topic> {
        let threshold = size_threshold(graph.sizes(), self.percentile);
        let mut unclaimed: HashSet<PostId> = graph.ids().collect();
        let mut topics = Vec::new();

        for root in rank(graph) {
            if unclaimed.is_empty() {
                break;
            }
            if root.size() < threshold || !unclaimed.remove(&root.id) {
                continue;
            }

            let comments = self.claim_chain(graph, root, &mut unclaimed, threshold);
            topics.push(Topic::new(root.text.clone(), comments));
        }

        debug!(
            posts = graph.len(),
            topics = topics.len(),
            threshold,
            left_unclaimed = unclaimed.len(),
            "segmented thread"
        );
        topics
    }

    /// Claims every unclaimed post reachable from `root` through mentions.
    ///
    /// Returns the texts of claimed posts at or above `threshold`, in
    /// depth-first discovery order.
    fn claim_chain(
        &self,
        graph: &ReplyGraph,
        root: &Post,
        unclaimed: &mut HashSet<PostId>,
        threshold: usize,
    ) -> Vec<String> {
        let mut comments = Vec::new();
        let mut stack: Vec<(PostId, usize)> = root.mentions.iter().rev().map(|&id| (id, 1)).collect();

        while let Some((id, depth)) = stack.pop() {
            if !unclaimed.remove(&id) {
                continue;
            }
            let Some(post) = graph.get(id) else { continue };

            if post.size() >= threshold {
                comments.push(post.text.clone());
            }

            if depth >= self.max_chain_depth {
                if !post.mentions.is_empty() {
                    warn!(root = root.id, post = id, depth, "reply chain too deep, not descending");
                }
                continue;
            }
            stack.extend(post.mentions.iter().rev().map(|&next| (next, depth + 1)));
        }

        comments
    }
}

/// Posts ordered as root candidates.
///
/// Descending reply count, then ascending quote count, then descending
/// length; ties keep document order.
fn rank(graph: &ReplyGraph) -> Vec<&Post> {
    let mut posts: Vec<&Post> = graph.posts().collect();
    posts.sort_by_key(|post| (Reverse(post.mentions.len()), post.n_parents, Reverse(post.size())));
    posts
}

/// Splits `graph` into topics using `options`.
#[must_use]
pub fn segment(graph: &ReplyGraph, options: &Options) -> Vec<Topic> {
    Segmenter::new(options).segment(graph)
}
