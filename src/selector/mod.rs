//! Selector Infrastructure
//!
//! Rules are plain predicates over a `Selection`. Template variants are
//! handled by ordered rule lists: callers try each rule in turn and the first
//! one that matches an element wins.

use dom_query::Selection;

pub mod body;
pub mod thread;

/// A selector rule that tests if a selection matches certain criteria.
pub type Rule = fn(&Selection) -> bool;

/// Query for first descendant matching the rule, in document order.
///
/// # Example
///
/// ```rust
/// use threadsplit::{dom, selector};
///
/// let doc = dom::parse(r#"<div><p class="content">text</p></div>"#);
/// let root = doc.select("div");
///
/// fn has_content_class(sel: &dom_query::Selection) -> bool {
///     dom::has_class(sel, "content")
/// }
///
/// assert!(selector::query(&root, has_content_class).is_some());
/// ```
#[must_use]
pub fn query<'a>(root: &Selection<'a>, rule: Rule) -> Option<Selection<'a>> {
    for node in root.select("*").nodes() {
        let sel = Selection::from(*node);
        if rule(&sel) {
            return Some(sel);
        }
    }
    None
}

/// Tries `rules` in order and returns the first descendant matched by the
/// earliest rule that matches anything.
///
/// Returns the index of the winning rule alongside the match.
#[must_use]
pub fn first_match<'a>(root: &Selection<'a>, rules: &[Rule]) -> Option<(usize, Selection<'a>)> {
    rules
        .iter()
        .enumerate()
        .find_map(|(idx, rule)| query(root, *rule).map(|sel| (idx, sel)))
}
