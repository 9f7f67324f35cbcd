//! Post model.
//!
//! A post is owned by the per-fetch [`ReplyGraph`](crate::graph::ReplyGraph).
//! Reply links are stored as post ids, so `mentions` never owns the posts it
//! refers to and a dangling id can never keep a post alive.

use std::collections::HashSet;
use std::fmt;

use crate::text::char_len;

/// Numeric post identity, unique within one fetch.
pub type PostId = u64;

/// One parsed post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    /// Identity extracted from the post markup.
    pub id: PostId,

    /// Normalized body text with quote references stripped.
    pub text: String,

    /// Posts that quote this one, in discovery order.
    ///
    /// This is the in-edge list: if post B quotes post A, B's id is appended
    /// to A's `mentions`.
    pub mentions: Vec<PostId>,

    /// Number of posts this post quotes (its out-degree).
    pub n_parents: usize,
}

impl Post {
    /// Creates a post with no recorded mentioners.
    #[must_use]
    pub fn new(id: PostId, text: impl Into<String>, n_parents: usize) -> Self {
        Self {
            id,
            text: text.into(),
            mentions: Vec::new(),
            n_parents,
        }
    }

    /// Length of the text in characters.
    #[must_use]
    pub fn size(&self) -> usize {
        char_len(&self.text)
    }

    /// Records `mentioner` as a post quoting this one.
    pub fn append(&mut self, mentioner: PostId) {
        self.mentions.push(mentioner);
    }

    /// `text @ id`
    #[must_use]
    pub fn short_description(&self) -> String {
        format!("{} @ {}", self.text, self.id)
    }

    /// Debug rendering of the post and its mentioners.
    ///
    /// `resolve` maps a mentioner id to its post; `only` restricts the listed
    /// mentioners to a set of ids (typically the still-unclaimed ones).
    pub fn describe<'a, F>(&self, resolve: F, only: Option<&HashSet<PostId>>) -> String
    where
        F: Fn(PostId) -> Option<&'a Post>,
    {
        let mut out = self.short_description();
        for id in &self.mentions {
            if only.is_some_and(|ids| !ids.contains(id)) {
                continue;
            }
            if let Some(mentioner) = resolve(*id) {
                out.push_str(" > ");
                out.push_str(&mentioner.short_description());
            }
        }
        out
    }
}

impl fmt::Display for Post {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.short_description())
    }
}
