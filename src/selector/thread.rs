//! Thread Page Selectors
//!
//! Locates the root post container, the reply containers, and the reply
//! links inside a post.

use dom_query::{Document, Selection};

use crate::dom;
use crate::patterns::{
    MENTION_LINK_SELECTOR, MENTION_TARGET, POST_NUMBER_ATTR, REPLY_LINK_CLASS, REPLY_POST_SELECTOR,
    ROOT_POST_SELECTORS,
};
use crate::post::PostId;

/// First root post container found by the selector chain.
#[must_use]
pub fn root_post(doc: &Document) -> Option<Selection<'_>> {
    ROOT_POST_SELECTORS
        .iter()
        .find_map(|selector| dom::first(&doc.select(selector)))
}

/// Every reply container, in document order.
#[must_use]
pub fn reply_posts(doc: &Document) -> Vec<Selection<'_>> {
    doc.select(REPLY_POST_SELECTOR)
        .nodes()
        .iter()
        .map(|node| Selection::from(*node))
        .collect()
}

/// Post id targeted by a single anchor, if it is a reply link.
///
/// Reply-link anchors carry the id in `data-num`; plain anchors qualify
/// when their text starts with the `>>id` sigil.
#[must_use]
pub fn mention_target(anchor: &Selection) -> Option<PostId> {
    if dom::has_class(anchor, REPLY_LINK_CLASS) {
        if let Some(id) = dom::get_attribute(anchor, POST_NUMBER_ATTR)
            .and_then(|value| value.trim().parse().ok())
        {
            return Some(id);
        }
    }
    let text = dom::text_content(anchor);
    MENTION_TARGET
        .captures(&text)
        .and_then(|caps| caps[1].parse().ok())
}

/// Ids of every post quoted from within `context`, in document order.
#[must_use]
pub fn mention_ids(context: &Selection) -> Vec<PostId> {
    dom::query_selector_all(context, MENTION_LINK_SELECTOR)
        .iter()
        .filter_map(|anchor| mention_target(&anchor))
        .collect()
}
