//! Post Body Selectors
//!
//! The site has served three body layouts over the years:
//! - a `blockquote` holding the message (oldest template),
//! - an `article` element (current template),
//! - a `div` carrying a message class name (mobile and archive mirrors).
//!
//! [`BODY`] lists one rule per layout in the order they are tried.

use dom_query::Selection;

use crate::dom;
use crate::patterns::MESSAGE_CLASSES;
use crate::selector::{first_match, Rule};

/// Body rules, most specific first.
pub static BODY: &[Rule] = &[quote_block, article_body, message_class];

/// Names of the rules in [`BODY`], for log messages.
pub const BODY_RULE_NAMES: &[&str] = &["quote-block", "article", "message-class"];

/// Rule 1: `<blockquote>` message node.
#[must_use]
pub fn quote_block(sel: &Selection) -> bool {
    dom::tag_name(sel).as_deref() == Some("blockquote")
}

/// Rule 2: `<article>` message node.
#[must_use]
pub fn article_body(sel: &Selection) -> bool {
    dom::tag_name(sel).as_deref() == Some("article")
}

/// Rule 3: any element with a known message class.
#[must_use]
pub fn message_class(sel: &Selection) -> bool {
    MESSAGE_CLASSES
        .iter()
        .any(|class| dom::has_class(sel, class))
}

/// Locates the body node inside a post container.
///
/// Returns the match together with the name of the rule that produced it.
#[must_use]
pub fn find_body<'a>(fragment: &Selection<'a>) -> Option<(&'static str, Selection<'a>)> {
    first_match(fragment, BODY).map(|(idx, sel)| (BODY_RULE_NAMES[idx], sel))
}

/// Whether `sel` is itself a body node under any rule.
#[must_use]
pub fn is_body(sel: &Selection) -> bool {
    BODY.iter().any(|rule| rule(sel))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_quote_block_first() {
        let doc = dom::parse(
            r#"<div class="post"><article>not me</article><blockquote id="m1">me</blockquote></div>"#,
        );
        let post = doc.select("div.post");

        let (rule, body) = find_body(&post).unwrap();
        assert_eq!(rule, "quote-block");
        assert_eq!(dom::text_content(&body), "me".into());
    }

    #[test]
    fn falls_back_to_article() {
        let doc = dom::parse(r#"<div class="post"><article class="post__message">text</article></div>"#);
        let (rule, _) = find_body(&doc.select("div.post")).unwrap();
        assert_eq!(rule, "article");
    }

    #[test]
    fn falls_back_to_message_class() {
        let doc = dom::parse(r#"<div class="post"><div class="post-body">text</div></div>"#);
        let (rule, body) = find_body(&doc.select("div.post")).unwrap();
        assert_eq!(rule, "message-class");
        assert_eq!(dom::text_content(&body), "text".into());
    }

    #[test]
    fn no_body_in_unknown_layout() {
        let doc = dom::parse(r#"<div class="post"><p>text</p></div>"#);
        assert!(find_body(&doc.select("div.post")).is_none());
    }

    #[test]
    fn is_body_accepts_each_layout() {
        let doc = dom::parse(
            r#"<blockquote>a</blockquote><article>b</article><div class="post__message">c</div><p>d</p>"#,
        );
        assert!(is_body(&doc.select("blockquote")));
        assert!(is_body(&doc.select("article")));
        assert!(is_body(&doc.select("div.post__message")));
        assert!(!is_body(&doc.select("p")));
    }
}
