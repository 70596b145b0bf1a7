//! Content scoring primitives.
//!
//! Initial scores from tag type and class vocabulary, link density, and
//! text density. Scores live in the per-attempt side table of
//! [`GrabContext`](super::state::GrabContext).

use crate::dom::{self, NodeRef};
use crate::patterns;
use crate::text::char_count;

use super::state::GrabContext;

/// Initialize a node's content score from its tag type and class weight,
/// and remember it in the score table.
pub fn initialize_node(node: &NodeRef, ctx: &mut GrabContext) {
    let mut content_score = f64::from(get_class_weight(node, ctx));

    match dom::tag_name(node).as_str() {
        "div" => content_score += 5.0,
        "pre" | "td" | "blockquote" => content_score += 3.0,
        "address" | "ol" | "ul" | "dl" | "dd" | "dt" | "li" | "form" => content_score -= 3.0,
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "th" => content_score -= 5.0,
        _ => {}
    }

    ctx.scores.insert(node.id, content_score);
}

/// Class/id weight of an element: +25 per positive vocabulary match,
/// -25 per negative, applied independently to class and id. Returns 0
/// when class weighing is off for this attempt.
#[must_use]
pub fn get_class_weight(node: &NodeRef, ctx: &GrabContext) -> i32 {
    if !ctx.flags.use_weight_classes {
        return 0;
    }

    let mut weight = 0;

    let class = dom::class_name(node);
    if !class.is_empty() {
        if patterns::is_negative_class(&class) {
            weight -= 25;
        }
        if patterns::is_positive_class(&class) {
            weight += 25;
        }
    }

    let id = dom::id(node);
    if !id.is_empty() {
        if patterns::is_negative_class(&id) {
            weight -= 25;
        }
        if patterns::is_positive_class(&id) {
            weight += 25;
        }
    }

    weight
}

/// The fraction of an element's text that sits inside links.
///
/// In-page fragment anchors contribute 30% of their length rather than
/// the full amount.
#[must_use]
pub fn get_link_density(element: &NodeRef) -> f64 {
    let text_length = char_count(&dom::get_inner_text(element, true));
    if text_length == 0 {
        return 0.0;
    }

    let mut link_length = 0.0;
    for link in dom::get_elements_by_tag_name(element, "a") {
        let href = dom::get_attribute(&link, "href");
        let href = href.trim();

        let coefficient = if !href.is_empty() && patterns::HASH_URL.is_match(href) {
            0.3
        } else {
            1.0
        };

        link_length += char_count(&dom::get_inner_text(&link, true)) as f64 * coefficient;
    }

    link_length / text_length as f64
}

/// The fraction of an element's text contributed by descendants with the
/// given tags.
#[must_use]
pub fn get_text_density(node: &NodeRef, tags: &[&str]) -> f64 {
    let text_length = char_count(&dom::get_inner_text(node, true));
    if text_length == 0 {
        return 0.0;
    }

    let mut children_length = 0usize;
    for child in dom::get_all_nodes_with_tag(node, tags) {
        children_length += char_count(&dom::get_inner_text(&child, true));
    }

    children_length as f64 / text_length as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::Options;

    fn first<'a>(doc: &'a dom::Document, sel: &str) -> NodeRef<'a> {
        doc.select(sel).nodes().first().cloned().unwrap()
    }

    #[test]
    fn tag_base_scores() {
        let options = Options::default();
        let mut ctx = GrabContext::new(&options, "");
        let doc = dom::parse("<div id=\"d\"></div><pre id=\"p\"></pre><ul id=\"u\"></ul><th id=\"t\"></th>");

        for sel in ["#d", "#p", "#u", "#t"] {
            let node = first(&doc, sel);
            initialize_node(&node, &mut ctx);
        }

        assert_eq!(ctx.scores[&first(&doc, "#d").id], 5.0);
        assert_eq!(ctx.scores[&first(&doc, "#p").id], 3.0);
        assert_eq!(ctx.scores[&first(&doc, "#u").id], -3.0);
        assert_eq!(ctx.scores[&first(&doc, "#t").id], -5.0);
    }

    #[test]
    fn class_weight_combines_class_and_id() {
        let options = Options::default();
        let ctx = GrabContext::new(&options, "");
        let doc = dom::parse(concat!(
            "<div id=\"a\" class=\"article\"></div>",
            "<div id=\"b\" class=\"sidebar\"></div>",
            "<div id=\"story\" class=\"entry\"></div>",
            "<div id=\"footer\" class=\"comment\"></div>",
        ));

        assert_eq!(get_class_weight(&first(&doc, "#a"), &ctx), 25);
        assert_eq!(get_class_weight(&first(&doc, "#b"), &ctx), -25);
        assert_eq!(get_class_weight(&first(&doc, "#story"), &ctx), 50);
        assert_eq!(get_class_weight(&first(&doc, "#footer"), &ctx), -50);
    }

    #[test]
    fn class_weight_disabled_by_flag() {
        let options = Options::default();
        let mut ctx = GrabContext::new(&options, "");
        ctx.flags.use_weight_classes = false;

        let doc = dom::parse("<div id=\"x\" class=\"article\"></div>");
        assert_eq!(get_class_weight(&first(&doc, "#x"), &ctx), 0);
    }

    #[test]
    fn link_density_weighs_hash_links_lighter() {
        let doc = dom::parse(concat!(
            "<div id=\"a\">aaaaa<a href=\"/x\">bbbbb</a></div>",
            "<div id=\"b\">aaaaa<a href=\"#f\">bbbbb</a></div>",
            "<div id=\"c\">no links at all</div>",
        ));

        let full = get_link_density(&first(&doc, "#a"));
        let hash = get_link_density(&first(&doc, "#b"));
        assert!((full - 0.5).abs() < 1e-9);
        assert!((hash - 0.15).abs() < 1e-9);
        assert_eq!(get_link_density(&first(&doc, "#c")), 0.0);
    }

    #[test]
    fn text_density_of_headings() {
        let doc = dom::parse("<div id=\"x\"><h2>12345</h2>12345</div>");
        let density = get_text_density(&first(&doc, "#x"), &["h1", "h2", "h3", "h4", "h5", "h6"]);
        assert!((density - 0.5).abs() < 0.1);
    }
}
