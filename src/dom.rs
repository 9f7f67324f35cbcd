//! DOM Operations Adapter
//!
//! Small layer over the `dom_query` crate with the handful of operations the
//! post parser needs. Text is always collected run by run so that adjacent
//! inline elements never glue their words together.

// Re-export core types for external use
pub use dom_query::{Document, Selection};

pub use tendril::StrTendril;

// === Attribute Operations ===

/// Get any attribute value
#[inline]
#[must_use]
pub fn get_attribute(sel: &Selection, name: &str) -> Option<String> {
    sel.attr(name).map(|s| s.to_string())
}

/// Check whether the `class` attribute lists `class`
#[must_use]
pub fn has_class(sel: &Selection, class: &str) -> bool {
    sel.attr("class")
        .is_some_and(|value| value.split_ascii_whitespace().any(|c| c == class))
}

// === Tag/Node Information ===

/// Get tag name (lowercase)
#[must_use]
pub fn tag_name(sel: &Selection) -> Option<String> {
    sel.nodes()
        .first()
        .and_then(dom_query::NodeRef::node_name)
        .map(|t| t.to_string())
}

// === Text Content ===

/// Get all text content of node and descendants, concatenated as-is
#[inline]
#[must_use]
pub fn text_content(sel: &Selection) -> StrTendril {
    sel.text()
}

/// Join every descendant text run of the first node with `separator`.
///
/// Unlike [`text_content`], `<b>one</b><i>two</i>` yields `"one two"` for a
/// single-space separator. Script and style contents are skipped.
#[must_use]
pub fn joined_text(sel: &Selection, separator: &str) -> String {
    let Some(root) = sel.nodes().first() else {
        return String::new();
    };

    let mut out = String::new();
    for node in root.descendants() {
        if !node.is_text() {
            continue;
        }
        let inside_code = node.parent().is_some_and(|parent| {
            parent.node_name().is_some_and(|tag| {
                tag.eq_ignore_ascii_case("script") || tag.eq_ignore_ascii_case("style")
            })
        });
        if inside_code {
            continue;
        }
        if !out.is_empty() {
            out.push_str(separator);
        }
        out.push_str(&node.text());
    }
    out
}

/// Get outer HTML content
#[inline]
#[must_use]
pub fn outer_html(sel: &Selection) -> StrTendril {
    sel.html()
}

// === Querying ===

/// Query all elements by CSS selector
#[inline]
#[must_use]
pub fn query_selector_all<'a>(sel: &Selection<'a>, selector: &str) -> Selection<'a> {
    sel.select(selector)
}

/// First element of `sel` as its own selection, if any.
#[must_use]
pub fn first<'a>(sel: &Selection<'a>) -> Option<Selection<'a>> {
    sel.nodes().first().map(|node| Selection::from(*node))
}

// === Parsing ===

/// Parse HTML string into document
#[inline]
#[must_use]
pub fn parse(html: &str) -> Document {
    Document::from(html)
}
