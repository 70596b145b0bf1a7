//! The article grabber.
//!
//! A bounded retry loop over a multi-pass scoring and pruning algorithm:
//! each attempt clones the prepped document, walks it dropping hidden and
//! unlikely nodes, scores paragraph-like elements into their ancestors,
//! promotes the best candidate, aggregates related siblings, cleans the
//! result, and wraps it in the output envelope. When an attempt yields
//! too little text, one behavioural flag is relaxed and the whole dance
//! runs again.

pub mod clean;
pub mod score;
pub mod state;

use crate::dom::{self, Document, NodeRef};
use crate::options::Options;
use crate::patterns;
use crate::text::char_count;

use clean::{prep_article, ALTER_TO_DIV_EXCEPTIONS};
use score::{get_link_density, initialize_node};
use state::{Attempt, GrabContext};

/// Roles that disqualify a node during the prep walk.
const UNLIKELY_ROLES: &[&str] = &[
    "menu", "menubar", "complementary", "navigation", "alert", "alertdialog", "dialog",
];

/// A successful grab: the article container (alone in its own document)
/// plus the fields harvested during the walk.
pub struct GrabResult {
    /// Document whose body holds the article container as its single
    /// child; the container's first element child carries
    /// `id="readability-page-1"`.
    pub doc: Document,
    /// Byline found on a byline node, if any.
    pub byline: Option<String>,
    /// Language from `<html lang>`.
    pub lang: Option<String>,
    /// Text direction from `<html dir>`.
    pub dir: Option<String>,
}

/// Find the content most likely to be the article and return it wrapped
/// in a container div.
///
/// Returns `None` when every attempt produced zero text.
#[must_use]
pub fn grab_article(prepped: &Document, article_title: &str, options: &Options) -> Option<GrabResult> {
    let mut ctx = GrabContext::new(options, article_title);
    let mut attempts: Vec<Attempt> = Vec::new();

    loop {
        ctx.log("**** grab_article ****");
        ctx.reset_attempt();

        let doc = dom::clone_document(prepped);
        let Some(page) = dom::body(&doc) else {
            ctx.log("no body found in document, abort");
            return None;
        };

        let elements_to_score = prep_walk(&doc, &mut ctx);
        let article_content = select_and_assemble(&doc, &page, &elements_to_score, &mut ctx);

        let text_length = char_count(&dom::get_inner_text(&article_content, true));
        if text_length < ctx.options.char_threshold {
            ctx.log(&format!(
                "attempt yielded {text_length} chars, threshold is {}",
                ctx.options.char_threshold
            ));
            attempts.push(Attempt {
                html: dom::outer_html(&article_content),
                text_length,
            });

            if ctx.flags.relax() {
                continue;
            }

            // No luck after relaxing every flag; take the attempt with
            // the longest text.
            attempts.sort_by(|a, b| b.text_length.cmp(&a.text_length));
            let best = attempts.into_iter().next()?;
            if best.text_length == 0 {
                return None;
            }

            return Some(GrabResult {
                doc: Document::from(best.html),
                byline: ctx.byline,
                lang: ctx.lang,
                dir: ctx.dir,
            });
        }

        return Some(GrabResult {
            doc: Document::from(dom::outer_html(&article_content)),
            byline: ctx.byline,
            lang: ctx.lang,
            dir: ctx.dir,
        });
    }
}

/// Phase A: walk the document depth-first, trash nodes that look cruddy,
/// and coalesce stray phrasing content into paragraphs. Returns the
/// elements enqueued for scoring.
fn prep_walk<'a>(doc: &'a Document, ctx: &mut GrabContext) -> Vec<NodeRef<'a>> {
    let mut elements_to_score: Vec<NodeRef<'a>> = Vec::new();
    let mut should_remove_title_header = true;

    let mut node_opt = dom::document_element(doc);
    while let Some(node) = node_opt {
        let tag = dom::tag_name(&node);
        let match_string = format!("{} {}", dom::class_name(&node), dom::id(&node));

        if tag == "html" {
            let lang = dom::get_attribute(&node, "lang");
            if !lang.is_empty() {
                ctx.lang = Some(lang);
            }
            let dir = dom::get_attribute(&node, "dir");
            if !dir.is_empty() {
                ctx.dir = Some(dir);
            }
        }

        if !dom::is_probably_visible(&node) {
            ctx.log(&format!("removing hidden node: {match_string:?}"));
            node_opt = remove_and_get_next(&node);
            continue;
        }

        // Users cannot see elements applied with both aria-modal=true
        // and role=dialog
        if dom::get_attribute(&node, "aria-modal") == "true"
            && dom::get_attribute(&node, "role") == "dialog"
        {
            node_opt = remove_and_get_next(&node);
            continue;
        }

        if check_byline(&node, &match_string, ctx) {
            node_opt = remove_and_get_next(&node);
            continue;
        }

        if should_remove_title_header && header_duplicates_title(&node, &ctx.article_title) {
            ctx.log(&format!(
                "removing header duplicating title: {:?}",
                dom::get_inner_text(&node, true)
            ));
            should_remove_title_header = false;
            node_opt = remove_and_get_next(&node);
            continue;
        }

        // Remove unlikely candidates
        if ctx.flags.strip_unlikelys {
            if patterns::is_unlikely_candidate(&match_string)
                && !patterns::maybe_is_candidate(&match_string)
                && !dom::has_ancestor_tag(&node, "table", 3)
                && !dom::has_ancestor_tag(&node, "code", 3)
                && tag != "body"
                && tag != "a"
            {
                ctx.log(&format!("removing unlikely candidate: {match_string:?}"));
                node_opt = remove_and_get_next(&node);
                continue;
            }

            let role = dom::get_attribute(&node, "role");
            if UNLIKELY_ROLES.contains(&role.as_str()) {
                ctx.log(&format!("removing content with role {role:?}: {match_string:?}"));
                node_opt = remove_and_get_next(&node);
                continue;
            }
        }

        // Remove DIV, SECTION and HEADER nodes without any content
        if matches!(
            tag.as_str(),
            "div" | "section" | "header" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6"
        ) && dom::is_element_without_content(&node)
        {
            node_opt = remove_and_get_next(&node);
            continue;
        }

        if ctx.options.tags_to_score.iter().any(|t| t == &tag) {
            elements_to_score.push(node.clone());
        }

        // Turn divs without block-level children into paragraphs
        let mut current = node.clone();
        if tag == "div" {
            coalesce_phrasing_children(&node);

            if dom::has_single_tag_inside_element(&node, "p") && get_link_density(&node) < 0.25 {
                // A div wrapping a lone paragraph is the paragraph
                let child = dom::children(&node)[0].clone();
                dom::replace_node(&node, &child);
                elements_to_score.push(child.clone());
                current = child;
            } else if !dom::has_child_block_element(&node) {
                dom::set_node_tag(&node, "p");
                elements_to_score.push(node);
            }
        }

        node_opt = dom::get_next_node(&current, false);
    }

    elements_to_score
}

/// Wrap runs of phrasing children of a div into synthesised `<p>`
/// elements.
fn coalesce_phrasing_children(node: &NodeRef) {
    let mut p: Option<NodeRef> = None;
    let mut child_opt = node.first_child();

    while let Some(child) = child_opt {
        let next_sibling = child.next_sibling();

        if dom::is_phrasing_content(&child) {
            if let Some(ref paragraph) = p {
                dom::append_child(paragraph, &child);
            } else if !dom::is_whitespace(&child) {
                let paragraph = dom::create_element(node, "p");
                dom::replace_node(&child, &paragraph);
                dom::append_child(&paragraph, &child);
                p = Some(paragraph);
            }
        } else if let Some(ref paragraph) = p {
            while let Some(last) = dom::child_nodes(paragraph).pop() {
                if dom::is_whitespace(&last) {
                    dom::remove_node(&last);
                } else {
                    break;
                }
            }
            p = None;
        }

        child_opt = next_sibling;
    }
}

/// Remove a node and continue the walk at its depth-first successor.
fn remove_and_get_next<'a>(node: &NodeRef<'a>) -> Option<NodeRef<'a>> {
    let next = dom::get_next_node(node, true);
    dom::remove_node(node);
    next
}

/// Whether the node carries the article byline; when it does, the text is
/// recorded and the node is dropped by the caller.
fn check_byline(node: &NodeRef, match_string: &str, ctx: &mut GrabContext) -> bool {
    if ctx.byline.is_some() {
        return false;
    }

    let rel = dom::get_attribute(node, "rel");
    let itemprop = dom::get_attribute(node, "itemprop");
    let looks_like_byline = rel == "author"
        || itemprop.contains("author")
        || patterns::is_byline(match_string);
    if !looks_like_byline {
        return false;
    }

    let text = dom::text_content(node);
    let trimmed = text.trim();
    let length = char_count(trimmed);
    if length > 0 && length < 100 {
        ctx.byline = Some(trimmed.split_whitespace().collect::<Vec<_>>().join(" "));
        return true;
    }

    false
}

/// Whether this is an H1/H2 whose content mostly repeats the article
/// title.
fn header_duplicates_title(node: &NodeRef, title: &str) -> bool {
    let tag = dom::tag_name(node);
    if tag != "h1" && tag != "h2" {
        return false;
    }

    let heading = dom::get_inner_text(node, false);
    crate::text::text_similarity(title, &heading) > 0.75
}

/// The node's ancestors, nearest first, up to `max_depth` (0 = all).
fn get_node_ancestors<'a>(node: &NodeRef<'a>, max_depth: usize) -> Vec<NodeRef<'a>> {
    let mut ancestors = Vec::new();
    let mut current = node.parent();

    while let Some(parent) = current {
        ancestors.push(parent.clone());
        if max_depth > 0 && ancestors.len() == max_depth {
            break;
        }
        current = parent.parent();
    }

    ancestors
}

/// Phases B-F: score the enqueued elements, pick and adjust the top
/// candidate, pull in related siblings, clean the result, and give it the
/// output envelope. Returns the article container.
fn select_and_assemble<'a>(
    doc: &'a Document,
    page: &NodeRef<'a>,
    elements_to_score: &[NodeRef<'a>],
    ctx: &mut GrabContext,
) -> NodeRef<'a> {
    // Phase B: loop through the scoring candidates and award points
    // based on how content-y they look, shared up the ancestor chain.
    let mut candidates: Vec<NodeRef<'a>> = Vec::new();
    for element in elements_to_score {
        let Some(parent) = element.parent() else {
            continue;
        };
        if !parent.is_element() {
            continue;
        }

        let inner_text = dom::get_inner_text(element, true);
        let text_len = char_count(&inner_text);
        // Paragraphs under 25 characters don't count
        if text_len < 25 {
            continue;
        }

        let ancestors = get_node_ancestors(element, 5);
        if ancestors.is_empty() {
            continue;
        }

        let mut content_score = 1.0;
        content_score += patterns::count_commas(&inner_text) as f64;
        content_score += ((text_len as f64 / 100.0).floor()).min(3.0);

        for (level, ancestor) in ancestors.iter().enumerate() {
            if dom::tag_name(ancestor).is_empty() {
                continue;
            }
            let Some(grandparent) = ancestor.parent() else {
                continue;
            };
            if !grandparent.is_element() {
                continue;
            }

            if !ctx.scores.contains_key(&ancestor.id) {
                initialize_node(ancestor, ctx);
                candidates.push(ancestor.clone());
            }

            // Score dividers: parent counts in full, grandparent half,
            // deeper ancestors fall off by level * 3.
            let divider = match level {
                0 => 1.0,
                1 => 2.0,
                _ => (level * 3) as f64,
            };

            if let Some(score) = ctx.scores.get_mut(&ancestor.id) {
                *score += content_score / divider;
            }
        }
    }

    // Phase C: scale candidates by link density and pick the best one.
    for candidate in &candidates {
        let scaled =
            ctx.scores[&candidate.id] * (1.0 - get_link_density(candidate));
        ctx.log(&format!(
            "candidate {} {:?} with score {scaled}",
            dom::tag_name(candidate),
            format!("{} {}", dom::class_name(candidate), dom::id(candidate)),
        ));
        ctx.scores.insert(candidate.id, scaled);
    }

    candidates.sort_by(|a, b| {
        ctx.scores[&b.id]
            .partial_cmp(&ctx.scores[&a.id])
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    let top_candidates: Vec<NodeRef<'a>> = candidates
        .iter()
        .take(ctx.options.n_top_candidates)
        .cloned()
        .collect();

    let mut needed_to_create_top_candidate = false;
    let primary = top_candidates
        .first()
        .cloned()
        .filter(|tc| dom::tag_name(tc) != "body");

    let top_candidate = if let Some(mut tc) = primary {
        // Find a better top candidate when at least three runners-up
        // share an ancestor chain with it.
        let top_score = ctx.scores[&tc.id];
        let mut alternative_ancestors: Vec<Vec<dom::NodeId>> = Vec::new();
        for other in top_candidates.iter().skip(1) {
            if ctx.scores[&other.id] / top_score >= 0.75 {
                alternative_ancestors
                    .push(get_node_ancestors(other, 0).iter().map(|n| n.id).collect());
            }
        }

        const MINIMUM_TOP_CANDIDATES: usize = 3;
        if alternative_ancestors.len() >= MINIMUM_TOP_CANDIDATES {
            let mut parent = tc.parent();
            while let Some(p) = parent {
                if dom::tag_name(&p) == "body" {
                    break;
                }

                let lists_containing = alternative_ancestors
                    .iter()
                    .filter(|ancestors| ancestors.contains(&p.id))
                    .count();
                if lists_containing >= MINIMUM_TOP_CANDIDATES {
                    tc = p;
                    break;
                }

                parent = p.parent();
            }
        }

        if !ctx.scores.contains_key(&tc.id) {
            initialize_node(&tc, ctx);
        }

        // Parents of candidates carry scores of their own. A score that
        // climbs on the way up means more content is lurking nearby and
        // should be unified in.
        let mut parent_opt = tc.parent();
        let mut last_score = ctx.scores[&tc.id];
        let score_threshold = last_score / 3.0;
        while let Some(parent) = parent_opt {
            if dom::tag_name(&parent) == "body" {
                break;
            }
            let Some(parent_score) = ctx.scores.get(&parent.id).copied() else {
                parent_opt = parent.parent();
                continue;
            };

            if parent_score < score_threshold {
                break;
            }
            if parent_score > last_score {
                tc = parent;
                break;
            }

            last_score = parent_score;
            parent_opt = parent.parent();
        }

        // An only-child top candidate joins its parent, which helps the
        // sibling logic when adjacent content lives one level up.
        let mut parent_opt = tc.parent();
        while let Some(parent) = parent_opt {
            if dom::tag_name(&parent) == "body" || dom::children(&parent).len() != 1 {
                break;
            }
            tc = parent;
            parent_opt = tc.parent();
        }

        if !ctx.scores.contains_key(&tc.id) {
            initialize_node(&tc, ctx);
        }

        tc
    } else {
        // No candidate, or the best one is the body itself. Last resort:
        // move everything, text nodes included, into a synthesised
        // container so there is something to modify.
        let container = dom::create_element(page, "div");
        needed_to_create_top_candidate = true;

        for child in dom::child_nodes(page) {
            ctx.log("moving child into synthesised top candidate");
            dom::append_child(&container, &child);
        }
        dom::append_child(page, &container);
        initialize_node(&container, ctx);
        container
    };

    // Phase D: look through the top candidate's siblings for related
    // content such as preambles and content split by ads.
    let article_content = dom::create_element(page, "div");

    let top_score = ctx.scores[&top_candidate.id];
    let sibling_score_threshold = (top_score * 0.2).max(10.0);
    let top_class = dom::class_name(&top_candidate);

    let parent_of_top = top_candidate.parent().unwrap_or_else(|| page.clone());
    for sibling in dom::children(&parent_of_top) {
        let mut append = false;

        if sibling.id == top_candidate.id {
            append = true;
        } else {
            let mut content_bonus = 0.0;
            if !top_class.is_empty() && dom::class_name(&sibling) == top_class {
                content_bonus += top_score * 0.2;
            }

            if let Some(sibling_score) = ctx.scores.get(&sibling.id).copied() {
                if sibling_score + content_bonus >= sibling_score_threshold {
                    append = true;
                }
            }

            if !append && dom::tag_name(&sibling) == "p" {
                let link_density = get_link_density(&sibling);
                let node_content = dom::get_inner_text(&sibling, true);
                let node_length = char_count(&node_content);

                if node_length > 80 && link_density < 0.25 {
                    append = true;
                } else if node_length < 80
                    && node_length > 0
                    && link_density == 0.0
                    && patterns::SENTENCE_PERIOD.is_match(&node_content)
                {
                    append = true;
                }
            }
        }

        if append {
            // Odd block elements like form or td would be filtered out
            // later by accident; neutralise them to divs.
            if !ALTER_TO_DIV_EXCEPTIONS.contains(&dom::tag_name(&sibling).as_str()) {
                dom::set_node_tag(&sibling, "div");
            }
            dom::append_child(&article_content, &sibling);
        }
    }
    dom::append_child(page, &article_content);

    // Phase E: clean the aggregated content for presentation.
    prep_article(&article_content, ctx);

    // Phase F: the output envelope.
    if needed_to_create_top_candidate {
        if let Some(first_child) = dom::first_element_child(&article_content) {
            if dom::tag_name(&first_child) == "div" {
                dom::set_attribute(&first_child, "id", "readability-page-1");
                dom::set_attribute(&first_child, "class", "page");
            }
        }
    } else {
        let page_div = dom::create_element(&article_content, "div");
        dom::set_attribute(&page_div, "id", "readability-page-1");
        dom::set_attribute(&page_div, "class", "page");
        for child in dom::child_nodes(&article_content) {
            dom::append_child(&page_div, &child);
        }
        dom::append_child(&article_content, &page_div);
    }

    article_content
}

#[cfg(test)]
mod tests {
    use super::*;

    fn long_paragraphs(n: usize) -> String {
        let mut out = String::new();
        for i in 0..n {
            out.push_str(&format!(
                "<p>Paragraph {i} of the piece carries enough substance, several clauses, \
                 and a couple of commas, so the scorer treats it as honest article prose \
                 rather than site furniture or navigation debris.</p>"
            ));
        }
        out
    }

    #[test]
    fn grabs_article_and_drops_sidebar() {
        let html = [
            "<html><body><div class=\"main-column\"><article>",
            &long_paragraphs(10),
            "</article><aside class=\"sidebar\"><a href=\"/x\">Related</a></aside>",
            "<div class=\"comments\"><p>first!</p></div>",
            "</div></body></html>",
        ]
        .concat();
        let doc = dom::parse(&html);

        let result = grab_article(&doc, "", &Options::default()).unwrap();
        let text = result.doc.select("body").text().to_string();

        assert!(text.contains("Paragraph 0"));
        assert!(text.contains("Paragraph 9"));
        assert!(!text.contains("first!"));
        assert!(!text.contains("Related"));
    }

    #[test]
    fn envelope_has_page_marker() {
        let html = [
            "<html><body><article>",
            &long_paragraphs(8),
            "</article></body></html>",
        ]
        .concat();
        let doc = dom::parse(&html);

        let result = grab_article(&doc, "", &Options::default()).unwrap();
        let page = result.doc.select("#readability-page-1");
        assert!(page.exists());
        assert_eq!(page.attr("class").map(|s| s.to_string()), Some("page".to_string()));
    }

    #[test]
    fn body_as_top_candidate_synthesises_container() {
        // Text directly in body, no wrappers at all
        let mut html = String::from("<html><body>");
        html.push_str(&long_paragraphs(10));
        html.push_str("</body></html>");
        let doc = dom::parse(&html);

        let result = grab_article(&doc, "", &Options::default()).unwrap();
        assert!(result.doc.select("#readability-page-1").exists());
    }

    #[test]
    fn harvests_byline_and_lang() {
        let html = [
            "<html lang=\"en\"><body><article>",
            "<div class=\"byline\">By  Jane   Doe</div>",
            &long_paragraphs(8),
            "</article></body></html>",
        ]
        .concat();
        let doc = dom::parse(&html);

        let result = grab_article(&doc, "", &Options::default()).unwrap();
        assert_eq!(result.byline.as_deref(), Some("By Jane Doe"));
        assert_eq!(result.lang.as_deref(), Some("en"));
        // The byline node itself is removed from the content
        assert!(!result.doc.select("body").text().contains("Jane"));
    }

    #[test]
    fn hidden_nodes_are_dropped() {
        let html = [
            "<html><body><article>",
            &long_paragraphs(8),
            "<p style=\"display:none\">invisible text that should never appear</p>",
            "</article></body></html>",
        ]
        .concat();
        let doc = dom::parse(&html);

        let result = grab_article(&doc, "", &Options::default()).unwrap();
        assert!(!result.doc.select("body").text().contains("invisible text"));
    }

    #[test]
    fn title_heading_is_removed_once() {
        let html = [
            "<html><body><article>",
            "<h1>The Grand Article Title</h1>",
            &long_paragraphs(8),
            "</article></body></html>",
        ]
        .concat();
        let doc = dom::parse(&html);

        let result = grab_article(&doc, "The Grand Article Title", &Options::default()).unwrap();
        assert!(!result
            .doc
            .select("body")
            .text()
            .contains("The Grand Article Title"));
    }

    #[test]
    fn short_page_exhausts_retries_and_returns_best_attempt() {
        let html = "<html><body><div><p>Only a hundred characters of text in this entire page, \
                    which is not enough at all.</p></div></body></html>";
        let doc = dom::parse(html);

        // Default threshold 500 forces the retry loop to exhaust; the
        // longest attempt is still returned.
        let result = grab_article(&doc, "", &Options::default());
        assert!(result.is_some());
        let text = result.unwrap().doc.select("body").text().to_string();
        assert!(text.contains("hundred characters"));
    }

    #[test]
    fn empty_page_returns_none() {
        let doc = dom::parse("<html><body></body></html>");
        assert!(grab_article(&doc, "", &Options::default()).is_none());
    }

    #[test]
    fn unlikely_candidates_dropped_only_with_flag() {
        let html = [
            "<html><body><article>",
            &long_paragraphs(8),
            "<div class=\"social-share\"><p>sharing widget text here</p></div>",
            "</article></body></html>",
        ]
        .concat();
        let doc = dom::parse(&html);

        let result = grab_article(&doc, "", &Options::default()).unwrap();
        assert!(!result.doc.select("body").text().contains("sharing widget"));
    }
}
