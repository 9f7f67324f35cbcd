use threadsplit::graph::ReplyGraph;
use threadsplit::parser::PostParser;
use threadsplit::{dom, topics_from_html, Error, Options};

/// Text of exactly `len` characters starting with `label`.
fn text(label: &str, len: usize) -> String {
    format!("{label} {}", "w".repeat(len - label.len() - 1))
}

fn root(id: u64, body: &str) -> String {
    format!(r#"<div class="post oppost" data-num="{id}"><blockquote id="m{id}" class="post-message">{body}</blockquote></div>"#)
}

fn reply(id: u64, quotes: &[u64], body: &str) -> String {
    let links: String = quotes
        .iter()
        .map(|q| format!(r#"<a class="post-reply-link" data-num="{q}">&gt;&gt;{q}</a><br>"#))
        .collect();
    format!(
        r#"<div class="post reply" data-num="{id}"><blockquote id="m{id}" class="post-message">{links}{body}</blockquote></div>"#
    )
}

fn page(posts: &[String]) -> String {
    format!("<html><body><div class=\"thread\">{}</div></body></html>", posts.concat())
}

#[test]
fn lone_root_is_one_topic_without_comments() {
    let title = text("root", 120);
    let topics = topics_from_html(&page(&[root(1, &title)]), &Options::default()).unwrap();

    assert_eq!(topics.len(), 1);
    assert_eq!(topics[0].title, title);
    assert!(topics[0].comments.is_empty());
}

#[test]
fn reply_chain_is_collected_in_discovery_order() {
    let r = text("root", 60);
    let c1 = text("first", 60);
    let c2 = text("second", 60);
    let html = page(&[root(1, &r), reply(2, &[1], &c1), reply(3, &[2], &c2)]);

    let topics = topics_from_html(&html, &Options::default()).unwrap();

    assert_eq!(topics.len(), 1);
    assert_eq!(topics[0].title, r);
    assert_eq!(topics[0].comments, vec![c1, c2]);
}

#[test]
fn dangling_mention_has_no_effect() {
    let html = page(&[
        root(1, &text("root", 50)),
        reply(2, &[404_404], &text("ghost", 50)),
        reply(3, &[1], &text("real", 50)),
    ]);
    let doc = dom::parse(&html);
    let (graph, _) = ReplyGraph::from_document(&doc, &PostParser::new(&Options::default())).unwrap();

    assert_eq!(graph.len(), 3);
    assert!(!graph.contains(404_404));
    assert_eq!(graph.get(1).unwrap().mentions, vec![3]);
    assert!(graph.get(2).unwrap().mentions.is_empty());
    assert_eq!(graph.get(2).unwrap().n_parents, 1);
}

#[test]
fn independent_chains_under_one_root_share_a_topic() {
    let r = text("root", 70);
    let c1 = text("left", 70);
    let c2 = text("right", 70);
    // c2 appears first in the markup
    let html = page(&[root(1, &r), reply(3, &[1], &c2), reply(2, &[1], &c1)]);

    let topics = topics_from_html(&html, &Options::default()).unwrap();

    assert_eq!(topics.len(), 1);
    assert_eq!(topics[0].title, r);
    assert_eq!(topics[0].comments.len(), 2);
    assert!(topics[0].comments.contains(&c1));
    assert!(topics[0].comments.contains(&c2));
}

#[test]
fn bump_reply_is_claimed_but_not_listed() {
    let r = text("root", 80);
    let c1 = text("answer", 80);
    let c3 = text("follow-up", 80);
    let html = page(&[
        root(1, &r),
        reply(2, &[1], &c1),
        reply(3, &[2], "bump"),
        reply(4, &[3], &c3),
    ]);

    let topics = topics_from_html(&html, &Options::default()).unwrap();

    assert_eq!(topics.len(), 1);
    assert_eq!(topics[0].comments, vec![c1, c3]);
}

#[test]
fn mention_markers_are_stripped_from_text() {
    let html = page(&[
        root(10, "Original question here"),
        format!(
            r#"<div class="post reply"><blockquote id="m11"><a class="post-reply-link" data-num="10">&gt;&gt;10 (OP)</a> I <b>fully</b><i>agree</i> (OP) &gt;&gt;10</blockquote></div>"#
        ),
    ]);
    let doc = dom::parse(&html);
    let (graph, _) = ReplyGraph::from_document(&doc, &PostParser::new(&Options::default())).unwrap();

    assert_eq!(graph.get(11).unwrap().text, "I fully agree");
}

#[test]
fn current_template_is_supported() {
    let html = r#"
        <div class="thread">
          <div class="post post_type_oppost" data-num="500">
            <article class="post__message">Current template opening post text</article>
          </div>
          <div class="post post_type_reply" data-num="501">
            <article class="post__message"><a class="post-reply-link" data-num="500">&gt;&gt;500</a> Current template answer text</article>
          </div>
        </div>"#;

    let topics = topics_from_html(html, &Options::default()).unwrap();

    assert_eq!(topics.len(), 1);
    assert_eq!(topics[0].title, "Current template opening post text");
    assert_eq!(topics[0].comments, vec!["Current template answer text"]);
}

#[test]
fn unknown_body_layout_is_an_error() {
    let html = page(&[
        root(1, "root text"),
        r#"<div class="post reply" data-num="2"><section>new layout</section></div>"#.to_string(),
    ]);
    assert!(matches!(
        topics_from_html(&html, &Options::default()),
        Err(Error::UnsupportedLayout(_))
    ));
}

#[test]
fn empty_page_yields_no_topics() {
    assert!(topics_from_html("<html><body></body></html>", &Options::default())
        .unwrap()
        .is_empty());
}
