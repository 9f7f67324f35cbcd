//! # threadsplit
//!
//! Imageboard thread crawler that rebuilds the reply graph of a thread and
//! segments it into self-contained topics.
//!
//! A thread page holds one root post and a flat list of replies that quote
//! earlier posts with `>>12345` links. This library fetches such a page
//! (retrying through flaky networks and half-rendered pages), parses every
//! post into normalized text plus the ids it quotes, links quoted posts to
//! their repliers, and partitions the result into topics: a root post and the
//! chain of replies hanging off it.
//!
//! ## Quick Start
//!
//! ```rust
//! use threadsplit::{topics_from_html, Options};
//!
//! let html = r#"
//! <div class="post oppost"><blockquote id="m1">Which editor do you use?</blockquote></div>
//! <div class="post reply"><blockquote id="m2">
//!   <a class="post-reply-link" data-num="1">&gt;&gt;1</a> Vim, for twenty years now.
//! </blockquote></div>
//! "#;
//!
//! let topics = topics_from_html(html, &Options::default())?;
//! assert_eq!(topics[0].title, "Which editor do you use?");
//! assert_eq!(topics[0].comments, vec!["Vim, for twenty years now."]);
//! # Ok::<(), threadsplit::Error>(())
//! ```
//!
//! ## Features
//!
//! - **Robust fetching**: transient transport failures and unready pages are
//!   retried; block and removal pages end the fetch with no topics
//! - **Template fallbacks**: post bodies and ids are recovered across several
//!   historical page layouts
//! - **Deterministic segmentation**: most-replied posts become topic roots and
//!   no post is ever listed twice
//! - **Export**: JSON and plain-text output that never clobbers a good file
//!   with an empty result

mod error;
mod options;

/// Compiled regexes, selector tables and default terminal markers.
pub mod patterns;

/// DOM operations adapter over `dom_query`.
pub mod dom;

/// Whitespace normalization and mention stripping.
pub mod text;

/// Character encoding detection and transcoding.
pub mod encoding;

/// Post model.
pub mod post;

/// Ordered selector rules for post containers and bodies.
pub mod selector;

/// Post fragment parsing.
pub mod parser;

/// Page classification: thread, retry or terminal.
pub mod classifier;

/// Reply graph construction.
pub mod graph;

/// Topic segmentation.
pub mod segmenter;

/// Output types.
pub mod result;

/// Retrying fetch loop and transports.
pub mod fetcher;

/// JSON and plain-text topic export.
pub mod export;

/// Crawl index records.
pub mod index;

/// Shared log of threads that produced no topics.
pub mod empty_log;

// Public API - re-exports
pub use classifier::{MarkerKind, TerminalMarker, Verdict};
pub use empty_log::EmptyThreadLog;
pub use error::{Error, Result};
pub use export::{export, ExportStatus, Format};
pub use fetcher::{collect_topics, Fetcher, Locator, Transport};
pub use graph::ReplyGraph;
pub use index::IndexEntry;
pub use options::Options;
pub use post::{Post, PostId};
pub use result::{FetchOutcome, Topic};

/// Fetches a thread with default options and segments it into topics.
///
/// `locator` is an `http(s)://` URL or a path to a stored page. A page that
/// turns out to be a block or removal notice yields an empty list.
///
/// # Example
///
/// ```no_run
/// let topics = threadsplit::fetch("https://example.org/b/res/123456.html")?;
/// for topic in &topics {
///     println!("{} ({} comments)", topic.title, topic.comments.len());
/// }
/// # Ok::<(), threadsplit::Error>(())
/// ```
pub fn fetch(locator: &str) -> Result<Vec<Topic>> {
    fetch_with_options(locator, &Options::default())
}

/// Fetches a thread with custom options and segments it into topics.
///
/// # Example
///
/// ```no_run
/// use std::time::Duration;
/// use threadsplit::{fetch_with_options, Options};
///
/// let options = Options {
///     retry_delay: Duration::from_secs(5),
///     max_attempts: Some(20),
///     ..Options::default()
/// };
/// let topics = fetch_with_options("https://example.org/b/res/123456.html", &options)?;
/// # Ok::<(), threadsplit::Error>(())
/// ```
pub fn fetch_with_options(locator: &str, options: &Options) -> Result<Vec<Topic>> {
    collect_topics(locator, options, None)
}

/// Segments an already fetched page.
///
/// No retry or page classification happens here: a page without a root post
/// simply yields topics built from whatever replies it holds.
pub fn topics_from_html(html: &str, options: &Options) -> Result<Vec<Topic>> {
    let doc = dom::parse(html);
    let (graph, _) = ReplyGraph::from_document(&doc, &parser::PostParser::new(options))?;
    Ok(segmenter::segment(&graph, options))
}
