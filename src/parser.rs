//! Post Parser
//!
//! Turns one post container into a [`Post`] plus the ids it quotes.
//!
//! Parsing has three ordinary outcomes, modelled by [`ParseOutcome`]:
//! a post, a fragment that is not worth keeping (no text), and a fragment
//! whose id cannot be recovered. Only a container whose body matches no known
//! template is an error: that means the markup changed and the parser needs a
//! new rule.

use dom_query::Selection;
use tracing::debug;

use crate::dom;
use crate::patterns::{EMBEDDED_POST_ID, LEADING_DIGITS, POST_NUMBER_ATTR};
use crate::post::{Post, PostId};
use crate::selector::{body, thread};
use crate::text::{char_len, strip_mentions, SEPARATOR};
use crate::{Error, Options, Result};

/// Result of parsing one post fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome {
    /// A usable post.
    ///
    /// `mentions` is `None` when no page context was available, which is
    /// different from an empty list of quotes.
    Parsed {
        /// The parsed post.
        post: Post,
        /// Ids quoted by the post.
        mentions: Option<Vec<PostId>>,
    },

    /// Not a real post: empty or too short after normalization.
    Discarded,

    /// The fragment has text but no recoverable numeric id.
    MissingIdentity,
}

impl ParseOutcome {
    /// The parsed post, if any.
    #[must_use]
    pub fn post(&self) -> Option<&Post> {
        match self {
            Self::Parsed { post, .. } => Some(post),
            _ => None,
        }
    }
}

/// Parses post fragments with the thresholds from `Options`.
#[derive(Debug, Clone, Copy)]
pub struct PostParser {
    min_post_length: usize,
}

impl PostParser {
    /// Creates a parser using `options.min_post_length`.
    #[must_use]
    pub fn new(options: &Options) -> Self {
        Self {
            min_post_length: options.min_post_length,
        }
    }

    /// Parses a post container: body text, id, and quoted ids.
    ///
    /// Mentions are collected from every reply link inside `fragment`, not
    /// only from the body.
    pub fn parse(&self, fragment: &Selection) -> Result<ParseOutcome> {
        let Some((rule, body)) = body::find_body(fragment) else {
            return Err(Error::UnsupportedLayout(layout_hint(fragment)));
        };
        debug!(rule, "matched post body");

        Ok(self.build(Some(fragment), &body))
    }

    /// Parses a bare body node without its container.
    ///
    /// Quote discovery needs the container, so the outcome carries
    /// `mentions: None`.
    pub fn parse_body(&self, body: &Selection) -> Result<ParseOutcome> {
        if body::is_body(body) {
            return Ok(self.build(None, body));
        }
        match body::find_body(body) {
            Some((_, inner)) => Ok(self.build(None, &inner)),
            None => Err(Error::UnsupportedLayout(layout_hint(body))),
        }
    }

    fn build(&self, context: Option<&Selection>, body: &Selection) -> ParseOutcome {
        let text = strip_mentions(&dom::joined_text(body, SEPARATOR));
        let length = char_len(&text);
        if text.is_empty() || length < self.min_post_length {
            debug!(length, min = self.min_post_length, "discarding short post");
            return ParseOutcome::Discarded;
        }

        let Some(id) = resolve_id(context, body) else {
            debug!(excerpt = %excerpt(&text), "post id could not be resolved");
            return ParseOutcome::MissingIdentity;
        };

        let mentions = context.map(thread::mention_ids);
        let n_parents = mentions.as_ref().map_or(0, Vec::len);

        ParseOutcome::Parsed {
            post: Post::new(id, text, n_parents),
            mentions,
        }
    }
}

/// Resolves the numeric id of a post.
///
/// Tried in order:
/// 1. `data-num` on the container, when it parses as an integer;
/// 2. the body `id` without its one-character prefix (`m12345`);
/// 3. the leading digit run of that attribute when it carries junk;
/// 4. when the body has no `id` at all, the first `id="m<digits>"` in its
///    markup (reply-link `data-num` values are never taken).
#[must_use]
pub fn resolve_id(context: Option<&Selection>, body: &Selection) -> Option<PostId> {
    if let Some(id) = context
        .and_then(|ctx| dom::get_attribute(ctx, POST_NUMBER_ATTR))
        .and_then(|value| value.trim().parse().ok())
    {
        return Some(id);
    }

    match dom::get_attribute(body, "id") {
        Some(raw) => {
            let stripped: String = raw.chars().skip(1).collect();
            stripped.parse().ok().or_else(|| {
                LEADING_DIGITS
                    .find(stripped.trim_start())
                    .and_then(|digits| digits.as_str().parse().ok())
            })
        }
        None => {
            let html = dom::outer_html(body);
            EMBEDDED_POST_ID
                .captures(&html)
                .and_then(|caps| caps[1].parse().ok())
        }
    }
}

fn layout_hint(fragment: &Selection) -> String {
    let html = dom::outer_html(fragment);
    excerpt(&html)
}

fn excerpt(text: &str) -> String {
    text.chars().take(80).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser() -> PostParser {
        PostParser::new(&Options::default())
    }

    fn parse_first(html: &str, selector: &str) -> Result<ParseOutcome> {
        let doc = dom::parse(html);
        parser().parse(&doc.select(selector))
    }

    #[test]
    fn parses_old_template_post() {
        let outcome = parse_first(
            r#"<div class="post reply">
                <blockquote id="m200" class="post-message">
                    <a class="post-reply-link" data-num="100">&gt;&gt;100 (OP)</a><br>
                    Totally <b>agree</b><i>here</i>
                </blockquote>
            </div>"#,
            "div.post",
        )
        .unwrap();

        let ParseOutcome::Parsed { post, mentions } = outcome else {
            panic!("expected a parsed post");
        };
        assert_eq!(post.id, 200);
        assert_eq!(post.text, "Totally agree here");
        assert_eq!(mentions, Some(vec![100]));
        assert_eq!(post.n_parents, 1);
        assert!(post.mentions.is_empty());
    }

    #[test]
    fn container_data_num_wins_over_body_id() {
        let outcome = parse_first(
            r#"<div class="post post_type_reply" data-num="555">
                <article class="post__message" id="m444">text</article>
            </div>"#,
            "div.post",
        )
        .unwrap();
        assert_eq!(outcome.post().map(|p| p.id), Some(555));
    }

    #[test]
    fn malformed_id_uses_leading_digits() {
        let doc = dom::parse(r#"<div class="post"><blockquote>text</blockquote></div>"#);
        let quote = doc.select("blockquote");
        quote.set_attr("id", "m4242 \"junk");

        assert_eq!(resolve_id(None, &quote), Some(4242));
    }

    #[test]
    fn missing_id_attribute_scans_markup() {
        let outcome = parse_first(
            r#"<div class="post"><div class="post-body"><span id="m98765"></span>words</div></div>"#,
            "div.post",
        )
        .unwrap();
        assert_eq!(outcome.post().map(|p| p.id), Some(98765));
    }

    #[test]
    fn reply_link_number_is_not_taken_as_own_id() {
        let outcome = parse_first(
            r#"<div class="post reply"><div class="post-body"><a class="post-reply-link" data-num="1000">&gt;&gt;1000</a> a reply whose body has no id attribute</div></div>"#,
            "div.post",
        )
        .unwrap();
        assert_eq!(outcome, ParseOutcome::MissingIdentity);
    }

    #[test]
    fn unresolvable_id_is_missing_identity() {
        let outcome = parse_first(
            r#"<div class="post"><blockquote>no id anywhere</blockquote></div>"#,
            "div.post",
        )
        .unwrap();
        assert_eq!(outcome, ParseOutcome::MissingIdentity);

        let junk = parse_first(
            r#"<div class="post"><blockquote id="mabc">still no id</blockquote></div>"#,
            "div.post",
        )
        .unwrap();
        assert_eq!(junk, ParseOutcome::MissingIdentity);
    }

    #[test]
    fn empty_text_is_discarded_before_id_lookup() {
        let outcome = parse_first(
            r#"<div class="post"><blockquote><a class="post-reply-link" data-num="1">&gt;&gt;1</a> (OP)</blockquote></div>"#,
            "div.post",
        )
        .unwrap();
        assert_eq!(outcome, ParseOutcome::Discarded);
    }

    #[test]
    fn min_length_discards_short_posts() {
        let parser = PostParser::new(&Options {
            min_post_length: 10,
            ..Options::default()
        });
        let doc = dom::parse(r#"<div class="post"><blockquote id="m1">short</blockquote></div>"#);
        assert_eq!(parser.parse(&doc.select("div.post")).unwrap(), ParseOutcome::Discarded);
    }

    #[test]
    fn unknown_layout_is_an_error() {
        let result = parse_first(r#"<div class="post"><p>text</p></div>"#, "div.post");
        assert!(matches!(result, Err(Error::UnsupportedLayout(_))));
    }

    #[test]
    fn body_only_parsing_has_unknown_mentions() {
        let doc = dom::parse(
            r#"<blockquote id="m77"><a class="post-reply-link" data-num="5">&gt;&gt;5</a> reply</blockquote>"#,
        );
        let outcome = parser().parse_body(&doc.select("blockquote")).unwrap();

        let ParseOutcome::Parsed { post, mentions } = outcome else {
            panic!("expected a parsed post");
        };
        assert_eq!(post.id, 77);
        assert_eq!(post.text, "reply");
        assert_eq!(mentions, None);
        assert_eq!(post.n_parents, 0);
    }
}
