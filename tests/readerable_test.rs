use rs_readability::{check, check_document, dom, parse_document};

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

#[test]
fn readerable_page_extracts_successfully() {
    let html = [
        "<html><head><title>A Perfectly Reasonable Article Title</title></head>",
        "<body><article>",
        &long_paragraphs(10),
        "</article></body></html>",
    ]
    .concat();
    let doc = dom::parse(&html);

    assert!(check_document(&doc));

    let article = parse_document(&doc, None).unwrap();
    assert!(article.length > 500);
}

#[test]
fn short_page_is_not_readerable() {
    let html = "<html><body><div><p>Merely a hundred characters of content in the whole \
                page, which is well below the threshold.</p></div></body></html>";

    assert!(!check(html));
}

#[test]
fn empty_page_is_not_readerable() {
    assert!(!check("<html><body></body></html>"));
}

#[test]
fn chrome_only_page_is_not_readerable() {
    // The unlikely-candidate check looks at each node's own class/id
    let mut html = String::from("<html><body>");
    for _ in 0..5 {
        html.push_str(
            "<p class=\"sidebar\">Endless widgets and promotional filler live in this \
             sidebar paragraph, repeated over and over, never part of any real article body, \
             stuffed with links and teasers and related headlines beyond counting.</p>",
        );
    }
    html.push_str("</body></html>");

    assert!(!check(&html));
}

#[test]
fn hidden_content_is_not_readerable() {
    let mut html = String::from("<html><body>");
    for _ in 0..5 {
        html.push_str(
            "<p hidden>Even a generous helping of paragraph text cannot make a page \
             readerable when every single paragraph is marked hidden away from the \
             reader, as this one is, over and over again without exception.</p>",
        );
    }
    html.push_str("</body></html>");

    assert!(!check(&html));
}
