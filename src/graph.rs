//! Reply-Graph Builder
//!
//! Parses the root post and every reply of a page into an id-indexed
//! registry and links each quoted post to the posts quoting it.
//!
//! Replies can only quote earlier posts, so a quote is linked only when its
//! target is already registered; anything else is a dangling reference and
//! is dropped.

use std::collections::HashMap;

use dom_query::Document;
use tracing::debug;

use crate::classifier::RootStatus;
use crate::parser::{ParseOutcome, PostParser};
use crate::post::{Post, PostId};
use crate::selector::thread;
use crate::Result;

/// Posts of one fetched page, in document order.
#[derive(Debug, Clone, Default)]
pub struct ReplyGraph {
    posts: Vec<Post>,
    index: HashMap<PostId, usize>,
    sizes: Vec<usize>,
}

impl ReplyGraph {
    /// Creates an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a whole page.
    ///
    /// The root post is parsed first and its status is returned for the page
    /// classifier. A root that cannot be identified does not stop the
    /// replies from being parsed.
    pub fn from_document(doc: &Document, parser: &PostParser) -> Result<(Self, RootStatus)> {
        let mut graph = Self::new();

        let root_status = match thread::root_post(doc) {
            None => RootStatus::Absent,
            Some(root) => match parser.parse(&root)? {
                ParseOutcome::Parsed { post, mentions } => {
                    graph.insert(post, mentions.as_deref().unwrap_or_default());
                    RootStatus::Registered
                }
                ParseOutcome::Discarded => RootStatus::Discarded,
                ParseOutcome::MissingIdentity => RootStatus::MissingIdentity,
            },
        };

        for reply in thread::reply_posts(doc) {
            match parser.parse(&reply)? {
                ParseOutcome::Parsed { post, mentions } => {
                    graph.insert(post, mentions.as_deref().unwrap_or_default());
                }
                ParseOutcome::Discarded => {}
                ParseOutcome::MissingIdentity => debug!("skipping reply without a post id"),
            }
        }

        Ok((graph, root_status))
    }

    /// Registers `post` and links it under every registered post it quotes.
    ///
    /// A post reusing an id replaces the earlier one in place; the last
    /// registration wins outright.
    pub fn insert(&mut self, post: Post, quoted: &[PostId]) {
        let id = post.id;
        self.sizes.push(post.size());

        match self.index.get(&id) {
            Some(&slot) => {
                debug!(id, "duplicate post id, keeping the later post");
                self.posts[slot] = post;
            }
            None => {
                self.index.insert(id, self.posts.len());
                self.posts.push(post);
            }
        }

        for target in quoted {
            if *target == id {
                continue;
            }
            match self.index.get(target) {
                Some(&slot) => self.posts[slot].append(id),
                None => debug!(from = id, to = target, "dangling mention"),
            }
        }
    }

    /// Looks up a post by id.
    #[must_use]
    pub fn get(&self, id: PostId) -> Option<&Post> {
        self.index.get(&id).map(|&slot| &self.posts[slot])
    }

    /// Whether a post with `id` is registered.
    #[must_use]
    pub fn contains(&self, id: PostId) -> bool {
        self.index.contains_key(&id)
    }

    /// Posts in document order.
    pub fn posts(&self) -> impl Iterator<Item = &Post> {
        self.posts.iter()
    }

    /// Registered ids in document order.
    pub fn ids(&self) -> impl Iterator<Item = PostId> + '_ {
        self.posts.iter().map(|post| post.id)
    }

    /// Size of every registered post, in registration order.
    #[must_use]
    pub fn sizes(&self) -> &[usize] {
        &self.sizes
    }

    /// Number of registered posts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.posts.len()
    }

    /// Whether no post was registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{dom, Options};

    fn build(html: &str) -> (ReplyGraph, RootStatus) {
        let doc = dom::parse(html);
        ReplyGraph::from_document(&doc, &PostParser::new(&Options::default())).unwrap()
    }

    fn reply(id: u64, quotes: &[u64], text: &str) -> String {
        let links: String = quotes
            .iter()
            .map(|q| format!(r#"<a class="post-reply-link" data-num="{q}">&gt;&gt;{q}</a> "#))
            .collect();
        format!(r#"<div class="post reply"><blockquote id="m{id}">{links}{text}</blockquote></div>"#)
    }

    #[test]
    fn links_mentioners_to_quoted_posts() {
        let html = format!(
            r#"<div class="post oppost"><blockquote id="m1">root text</blockquote></div>{}{}{}"#,
            reply(2, &[1], "first reply"),
            reply(3, &[2], "second reply"),
            reply(4, &[1, 2], "third reply"),
        );
        let (graph, status) = build(&html);

        assert_eq!(status, RootStatus::Registered);
        assert_eq!(graph.ids().collect::<Vec<_>>(), vec![1, 2, 3, 4]);
        assert_eq!(graph.get(1).unwrap().mentions, vec![2, 4]);
        assert_eq!(graph.get(2).unwrap().mentions, vec![3, 4]);
        assert!(graph.get(4).unwrap().mentions.is_empty());
        assert_eq!(graph.get(4).unwrap().n_parents, 2);
        assert_eq!(graph.sizes(), &[9, 11, 12, 11]);
    }

    #[test]
    fn dangling_and_forward_mentions_are_dropped() {
        let html = format!(
            r#"<div class="post oppost"><blockquote id="m1">root text</blockquote></div>{}{}"#,
            reply(2, &[999, 3], "quotes the future"),
            reply(3, &[1], "quotes the root"),
        );
        let (graph, _) = build(&html);

        assert_eq!(graph.len(), 3);
        assert_eq!(graph.get(1).unwrap().mentions, vec![3]);
        assert!(graph.get(3).unwrap().mentions.is_empty());
        assert!(!graph.contains(999));
    }

    #[test]
    fn reply_without_body_id_never_replaces_quoted_post() {
        let (graph, status) = build(
            r#"<div class="post oppost"><blockquote id="m1000">the opening post</blockquote></div>
               <div class="post reply"><div class="post-body"><a class="post-reply-link" data-num="1000">&gt;&gt;1000</a> a reply whose body has no id attribute</div></div>"#,
        );

        assert_eq!(status, RootStatus::Registered);
        assert_eq!(graph.ids().collect::<Vec<_>>(), vec![1000]);
        assert_eq!(graph.get(1000).unwrap().text, "the opening post");
        assert!(graph.get(1000).unwrap().mentions.is_empty());
    }

    #[test]
    fn self_mentions_are_ignored() {
        let mut graph = ReplyGraph::new();
        graph.insert(Post::new(5, "loop", 1), &[5]);
        assert!(graph.get(5).unwrap().mentions.is_empty());
    }

    #[test]
    fn duplicate_ids_keep_later_post() {
        let mut graph = ReplyGraph::new();
        graph.insert(Post::new(1, "first", 0), &[]);
        graph.insert(Post::new(2, "other", 0), &[]);
        graph.insert(Post::new(3, "reply", 1), &[1]);
        graph.insert(Post::new(1, "second", 0), &[]);

        assert_eq!(graph.len(), 3);
        assert_eq!(graph.get(1).unwrap().text, "second");
        assert!(graph.get(1).unwrap().mentions.is_empty());
        assert_eq!(graph.get(3).unwrap().n_parents, 1);
        assert_eq!(graph.ids().collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn root_status_reflects_root_parse() {
        let (_, absent) = build(&reply(2, &[], "reply only"));
        assert_eq!(absent, RootStatus::Absent);

        let (graph, missing) = build(
            r#"<div class="post oppost"><blockquote>no id</blockquote></div>"#,
        );
        assert_eq!(missing, RootStatus::MissingIdentity);
        assert!(graph.is_empty());

        let (_, discarded) = build(r#"<div class="post oppost"><blockquote id="m1"> </blockquote></div>"#);
        assert_eq!(discarded, RootStatus::Discarded);
    }

    #[test]
    fn unknown_reply_layout_propagates() {
        let doc = dom::parse(
            r#"<div class="post oppost"><blockquote id="m1">root</blockquote></div><div class="post reply"><p>?</p></div>"#,
        );
        let result = ReplyGraph::from_document(&doc, &PostParser::new(&Options::default()));
        assert!(result.is_err());
    }
}
