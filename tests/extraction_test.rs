use rs_readability::{dom, parse, parse_document, parse_with_options, Error, Options};

fn long_paragraphs(n: usize) -> String {
    let mut out = String::new();
    for i in 0..n {
        out.push_str(&format!(
            "<p>Paragraph number {i} carries a generous amount of text, several clauses, \
             and a couple of commas, written so the scoring pass treats it as honest \
             article prose rather than site furniture or navigation debris.</p>"
        ));
    }
    out
}

fn article_page() -> String {
    [
        "<html><head><title>A Perfectly Reasonable Article Title</title>",
        "<meta property=\"og:site_name\" content=\"The Site\">",
        "</head><body><div class=\"main\"><article>",
        &long_paragraphs(10),
        "</article>",
        "<aside class=\"sidebar\"><a href=\"/other\">Other stories</a></aside>",
        "<div class=\"comments\"><p>First comment!</p></div>",
        "</div></body></html>",
    ]
    .concat()
}

#[test]
fn extracts_article_and_strips_chrome() {
    let article = parse(&article_page(), Some("https://example.com/post")).unwrap();

    let content = article.content.as_deref().unwrap();
    for i in 0..10 {
        assert!(content.contains(&format!("Paragraph number {i}")), "paragraph {i} missing");
    }
    assert!(!content.contains("First comment!"));
    assert!(!content.contains("Other stories"));
    assert_eq!(article.site_name.as_deref(), Some("The Site"));
}

#[test]
fn output_carries_page_envelope() {
    let article = parse(&article_page(), None).unwrap();
    let content = article.content.unwrap();

    assert!(content.contains("id=\"readability-page-1\""));
    assert!(content.contains("class=\"page\""));
}

#[test]
fn length_matches_text_content_char_count() {
    let article = parse(&article_page(), None).unwrap();
    let text = article.text_content.as_deref().unwrap();

    assert_eq!(article.length, text.chars().count());
    assert_eq!(text, text.trim());
}

#[test]
fn callers_document_is_not_modified() {
    let doc = dom::parse(&article_page());
    let before = doc.html().to_string();

    let _ = parse_document(&doc, Some("https://example.com/post")).unwrap();

    assert_eq!(doc.html().to_string(), before);
}

#[test]
fn body_only_text_synthesises_page_container() {
    let html = ["<html><body>", &long_paragraphs(10), "</body></html>"].concat();
    let article = parse(&html, None).unwrap();

    let content = article.content.unwrap();
    assert!(content.contains("id=\"readability-page-1\""));
    assert!(content.contains("Paragraph number 0"));
}

#[test]
fn anchors_in_output_are_hash_data_or_absolute() {
    let html = [
        "<html><body><article>",
        &long_paragraphs(6),
        "<p>Some links to keep around for context and testing purposes here: \
         <a href=\"relative/page\">relative</a> and <a href=\"#note-1\">note</a> \
         and <a href=\"https://other.example/x\">absolute</a>.</p>",
        &long_paragraphs(3),
        "</article></body></html>",
    ]
    .concat();

    let article = parse(&html, Some("https://example.com/dir/post.html")).unwrap();
    let content_doc = dom::parse(article.content.as_deref().unwrap());

    let anchors = content_doc.select("a");
    assert!(anchors.exists());
    for a in anchors.nodes() {
        let node = a.clone();
        let href = dom::get_attribute(&node, "href");
        if href.is_empty() {
            continue;
        }
        assert!(
            href.starts_with('#')
                || href.starts_with("data:")
                || href.contains("://"),
            "href not normalised: {href}"
        );
    }
}

#[test]
fn no_bookkeeping_attributes_survive() {
    let article = parse(&article_page(), None).unwrap();
    let content = article.content.unwrap();

    assert!(!content.contains("data-readability-score"));
    assert!(!content.contains("data-readability-table"));
    assert!(!content.contains("class=\"readability-"));
}

#[test]
fn classes_are_stripped_unless_kept() {
    let article = parse(&article_page(), None).unwrap();
    assert!(!article.content.unwrap().contains("class=\"main\""));

    let options = Options {
        keep_classes: true,
        ..Options::default()
    };
    let article = parse_with_options(&article_page(), None, &options).unwrap();
    let content = article.content.unwrap();
    assert!(content.contains("Paragraph number 0"));
}

#[test]
fn element_cap_boundary() {
    let html = article_page();
    let doc = dom::parse(&html);
    let root = dom::document_element(&doc).unwrap();
    let element_count = dom::descendant_elements(&root).len() + 1;

    let at_cap = Options {
        max_elems_to_parse: element_count,
        ..Options::default()
    };
    assert!(parse_with_options(&html, None, &at_cap).is_ok());

    let below_cap = Options {
        max_elems_to_parse: element_count - 1,
        ..Options::default()
    };
    match parse_with_options(&html, None, &below_cap) {
        Err(Error::InputTooLarge { count, max }) => {
            assert_eq!(count, element_count);
            assert_eq!(max, element_count - 1);
        }
        other => panic!("expected InputTooLarge, got {other:?}"),
    }
}

#[test]
fn br_only_body_is_unreadable() {
    let html = "<html><body><br><br><br></body></html>";
    match parse(html, None) {
        Err(Error::Unreadable) => {}
        other => panic!("expected Unreadable, got {other:?}"),
    }
}

#[test]
fn invalid_base_url_is_rejected() {
    match parse(&article_page(), Some("not a url")) {
        Err(Error::InvalidUrl(_)) => {}
        other => panic!("expected InvalidUrl, got {other:?}"),
    }
}

#[test]
fn short_page_yields_best_effort_article() {
    let html = "<html><body><div><p>Merely a hundred characters of content in the whole page, \
                which is well below the threshold.</p></div></body></html>";

    // All retry flags exhaust; the longest attempt still comes back
    let article = parse(html, None).unwrap();
    assert!(article.text_content.unwrap().contains("hundred characters"));
    assert!(article.length < 500);
}

#[test]
fn article_node_walks_to_page_root() {
    let article = parse(&article_page(), None).unwrap();
    let node_doc = article.node.as_ref().unwrap();

    let page = rs_readability::article_root(node_doc).unwrap();
    assert_eq!(dom::id(&page), "readability-page-1");
    assert_eq!(dom::class_name(&page), "page");
}

#[test]
fn hero_image_from_noscript_is_absolute() {
    let html = [
        "<html><body><article>",
        &long_paragraphs(5),
        "<div>",
        "<img src=\"data:image/gif;base64,R0lGODlhAQABAAAAACw=\" data-thumb=\"thumb.jpg\">",
        "<noscript><img src=\"hires.jpg\"></noscript>",
        "</div>",
        &long_paragraphs(5),
        "</article></body></html>",
    ]
    .concat();

    let article = parse(&html, Some("https://example.com/posts/1")).unwrap();
    let content = article.content.unwrap();
    assert!(
        content.contains("https://example.com/posts/hires.jpg"),
        "noscript image not unwrapped/resolved: {content}"
    );
    assert!(!content.contains("noscript"));
}
