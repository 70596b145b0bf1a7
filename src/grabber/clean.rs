//! Article cleanup.
//!
//! Runs after sibling aggregation on the article container: strips
//! presentational attributes, marks data tables, repairs lazy images, and
//! removes elements that look like boilerplate based on content length,
//! class vocabulary, link density, and embed counts.

use crate::dom::{self, NodeRef};
use crate::patterns;
use crate::text::char_count;
use crate::url_utils;

use super::score::{get_class_weight, get_link_density, get_text_density};
use super::state::GrabContext;

/// Attributes stripped from the article as presentational leftovers.
const PRESENTATIONAL_ATTRIBUTES: &[&str] = &[
    "align", "background", "bgcolor", "border", "cellpadding", "cellspacing", "frame", "hspace",
    "rules", "style", "valign", "vspace",
];

/// Elements whose deprecated `width`/`height` attributes are dropped.
const DEPRECATED_SIZE_ATTRIBUTE_ELEMS: &[&str] = &["table", "th", "td", "hr", "pre"];

/// Tags kept as-is during sibling aggregation; everything else becomes a
/// `<div>`.
pub const ALTER_TO_DIV_EXCEPTIONS: &[&str] = &["div", "article", "section", "p"];

/// Prepare the article container for display.
///
/// Order is significant; see the conditional cleaning rules below.
pub fn prep_article(article_content: &NodeRef, ctx: &mut GrabContext) {
    clean_styles(article_content);

    // Mark data tables before cleaning, so isolated but meaningful table
    // content survives the conditional passes.
    mark_data_tables(article_content, ctx);

    fix_lazy_images(article_content);

    clean_conditionally(article_content, "form", ctx);
    clean_conditionally(article_content, "fieldset", ctx);
    clean(article_content, "object", ctx);
    clean(article_content, "embed", ctx);
    clean(article_content, "footer", ctx);
    clean(article_content, "link", ctx);
    clean(article_content, "aside", ctx);

    // Drop share blocks from the top candidates, unless they carry more
    // text than the success threshold.
    let share_element_threshold = ctx.options.char_threshold;
    for top_candidate in dom::children(article_content) {
        clean_matched_nodes(&top_candidate, |node, match_string| {
            patterns::is_share_element(match_string)
                && char_count(&dom::text_content(node)) < share_element_threshold
        });
    }

    clean(article_content, "iframe", ctx);
    clean(article_content, "input", ctx);
    clean(article_content, "textarea", ctx);
    clean(article_content, "select", ctx);
    clean(article_content, "button", ctx);
    clean_headers(article_content, ctx);

    // Do these last, as the previous cleanup may have removed junk that
    // would have affected the verdicts.
    clean_conditionally(article_content, "table", ctx);
    clean_conditionally(article_content, "ul", ctx);
    clean_conditionally(article_content, "div", ctx);

    // H1 is reserved for the title, which is rendered separately
    for h1 in dom::get_elements_by_tag_name(article_content, "h1") {
        dom::set_node_tag(&h1, "h2");
    }

    // Remove paragraphs with no media and no text
    let paragraphs = dom::get_elements_by_tag_name(article_content, "p");
    for p in paragraphs.iter().rev() {
        let media_count = dom::get_elements_by_tag_name(p, "img").len()
            + dom::get_elements_by_tag_name(p, "embed").len()
            + dom::get_elements_by_tag_name(p, "object").len()
            + dom::get_elements_by_tag_name(p, "iframe").len();

        if media_count == 0 && dom::get_inner_text(p, false).is_empty() {
            dom::remove_node(p);
        }
    }

    // A <br> directly before a paragraph is redundant
    for br in dom::get_elements_by_tag_name(article_content, "br") {
        if let Some(next) = dom::next_significant_node(br.next_sibling()) {
            if dom::tag_name(&next) == "p" {
                dom::remove_node(&br);
            }
        }
    }

    // Collapse tables that hold a single cell
    for table in dom::get_elements_by_tag_name(article_content, "table") {
        let tbody = if dom::has_single_tag_inside_element(&table, "tbody") {
            dom::first_element_child(&table).unwrap_or(table.clone())
        } else {
            table.clone()
        };

        if dom::has_single_tag_inside_element(&tbody, "tr") {
            let Some(row) = dom::first_element_child(&tbody) else {
                continue;
            };
            if dom::has_single_tag_inside_element(&row, "td") {
                let Some(cell) = dom::first_element_child(&row) else {
                    continue;
                };

                let all_phrasing = dom::child_nodes(&cell)
                    .iter()
                    .all(dom::is_phrasing_content);
                dom::set_node_tag(&cell, if all_phrasing { "p" } else { "div" });
                dom::replace_node(&table, &cell);
            }
        }
    }
}

/// Remove `style` and other presentational attributes everywhere except
/// inside `<svg>` subtrees.
pub fn clean_styles(node: &NodeRef) {
    if dom::tag_name(node) == "svg" {
        return;
    }

    for attribute in PRESENTATIONAL_ATTRIBUTES {
        dom::remove_attribute(node, attribute);
    }

    if DEPRECATED_SIZE_ATTRIBUTE_ELEMS.contains(&dom::tag_name(node).as_str()) {
        dom::remove_attribute(node, "width");
        dom::remove_attribute(node, "height");
    }

    let mut child = dom::first_element_child(node);
    while let Some(c) = child {
        clean_styles(&c);
        child = dom::next_element_sibling(&c);
    }
}

/// How many rows and columns a table spans, honouring `rowspan` and
/// `colspan`.
fn get_row_and_column_count(table: &NodeRef) -> (usize, usize) {
    let mut rows = 0usize;
    let mut columns = 0usize;

    for tr in dom::get_elements_by_tag_name(table, "tr") {
        let row_span: usize = dom::get_attribute(&tr, "rowspan").parse().unwrap_or(0);
        rows += row_span.max(1);

        let mut columns_in_row = 0usize;
        for cell in dom::get_elements_by_tag_name(&tr, "td") {
            let col_span: usize = dom::get_attribute(&cell, "colspan").parse().unwrap_or(0);
            columns_in_row += col_span.max(1);
        }
        columns = columns.max(columns_in_row);
    }

    (rows, columns)
}

/// Mark 'data' tables (as opposed to layout tables), so conditional
/// cleaning leaves them alone. Mirrors the heuristics Firefox uses for
/// table accessibility.
pub fn mark_data_tables(root: &NodeRef, ctx: &mut GrabContext) {
    for table in dom::get_elements_by_tag_name(root, "table") {
        if dom::get_attribute(&table, "role") == "presentation" {
            continue;
        }
        if dom::get_attribute(&table, "datatable") == "0" {
            continue;
        }
        if dom::has_attribute(&table, "summary") {
            ctx.data_tables.insert(table.id);
            continue;
        }

        if let Some(caption) = dom::get_elements_by_tag_name(&table, "caption").first() {
            if !dom::child_nodes(caption).is_empty() {
                ctx.data_tables.insert(table.id);
                continue;
            }
        }

        let data_table_descendants = ["col", "colgroup", "tfoot", "thead", "th"];
        if data_table_descendants
            .iter()
            .any(|tag| !dom::get_elements_by_tag_name(&table, tag).is_empty())
        {
            ctx.data_tables.insert(table.id);
            continue;
        }

        // Nested tables indicate a layout table
        if !dom::get_elements_by_tag_name(&table, "table").is_empty() {
            continue;
        }

        let (rows, columns) = get_row_and_column_count(&table);
        if rows >= 10 || columns > 4 {
            ctx.data_tables.insert(table.id);
            continue;
        }

        if rows * columns > 10 {
            ctx.data_tables.insert(table.id);
        }
    }
}

/// Whether any ancestor of the node is a marked data table.
fn has_data_table_ancestor(node: &NodeRef, ctx: &GrabContext) -> bool {
    let mut current = node.parent();
    while let Some(parent) = current {
        if dom::tag_name(&parent) == "table" && ctx.data_tables.contains(&parent.id) {
            return true;
        }
        current = parent.parent();
    }
    false
}

/// Convert images with lazy-loading attributes into plain loadable
/// images.
pub fn fix_lazy_images(root: &NodeRef) {
    for elem in dom::get_all_nodes_with_tag(root, &["img", "picture", "figure"]) {
        let mut src = dom::get_attribute(&elem, "src");
        let srcset = dom::get_attribute(&elem, "srcset");
        let node_tag = dom::tag_name(&elem);
        let node_class = dom::class_name(&elem);

        // Tiny base64 placeholders shadow the real source; strip them
        // when the element carries another image-shaped attribute.
        if !src.is_empty() {
            let mime = patterns::B64_DATA_URL
                .captures(&src)
                .map(|caps| caps[1].to_string());
            // SVG can be meaningful below the size cutoff
            if mime.is_some_and(|m| m != "image/svg+xml") {
                let src_could_be_removed = dom::get_all_attributes(&elem)
                    .iter()
                    .filter(|(name, _)| name != "src")
                    .any(|(_, value)| {
                        patterns::IMG_EXTENSIONS.is_match(value) && url_utils::is_valid_url(value)
                    });

                if src_could_be_removed {
                    let b64_start = src.find("base64").map_or(0, |i| i + 7);
                    if src.len() - b64_start < 133 {
                        src = String::new();
                        dom::remove_attribute(&elem, "src");
                    }
                }
            }
        }

        if (!src.is_empty() || !srcset.is_empty()) && !node_class.to_lowercase().contains("lazy") {
            continue;
        }

        for (name, value) in dom::get_all_attributes(&elem) {
            if name == "src" || name == "srcset" || name == "alt" {
                continue;
            }

            let copy_to = if patterns::LAZY_IMAGE_SRCSET.is_match(&value) {
                "srcset"
            } else if patterns::LAZY_IMAGE_SRC.is_match(&value) {
                "src"
            } else {
                continue;
            };

            if !url_utils::is_valid_url(value.trim()) {
                continue;
            }

            if node_tag == "img" || node_tag == "picture" {
                dom::set_attribute(&elem, copy_to, &value);
            } else if node_tag == "figure"
                && dom::get_all_nodes_with_tag(&elem, &["img", "picture"]).is_empty()
            {
                // A figure without an image gets one synthesised from the
                // promoted URL.
                let escaped = html_escape::encode_double_quoted_attribute(&value);
                dom::append_html(&elem, &format!("<img {copy_to}=\"{escaped}\">"));
            }
        }
    }
}

/// Whether an embed element belongs to an allowed video host.
fn is_allowed_embed(element: &NodeRef, ctx: &GrabContext) -> bool {
    let filter = ctx.video_filter();

    for (_, value) in dom::get_all_attributes(element) {
        if filter.is_match(&value) {
            return true;
        }
    }

    dom::tag_name(element) == "object" && filter.is_match(&dom::inner_html(element))
}

/// Remove every descendant with the given tag. Embeds pointing at an
/// allowed video host survive.
pub fn clean(node: &NodeRef, tag: &str, ctx: &GrabContext) {
    let is_embed = matches!(tag, "object" | "embed" | "iframe");

    let targets = dom::get_elements_by_tag_name(node, tag);
    for element in targets.iter().rev() {
        if is_embed && is_allowed_embed(element, ctx) {
            continue;
        }
        dom::remove_node(element);
    }
}

/// Clean an element of all tags of the given type when they look fishy:
/// suspicious class weight, high link density, too many images or
/// inputs, or not enough commas.
pub fn clean_conditionally(element: &NodeRef, tag: &str, ctx: &GrabContext) {
    if !ctx.flags.clean_conditionally {
        return;
    }

    // Traverse backwards so removals don't disturb the iteration
    let targets = dom::get_elements_by_tag_name(element, tag);
    for node in targets.iter().rev() {
        if should_conditionally_remove(node, tag, ctx) {
            dom::remove_node(node);
        }
    }
}

fn should_conditionally_remove(node: &NodeRef, tag: &str, ctx: &GrabContext) -> bool {
    // Data tables and their content are exempt
    if tag == "table" && ctx.data_tables.contains(&node.id) {
        return false;
    }
    if has_data_table_ancestor(node, ctx) {
        return false;
    }

    if dom::has_ancestor_tag(node, "code", 3) {
        return false;
    }

    let mut is_list = tag == "ul" || tag == "ol";
    if !is_list {
        let mut list_length = 0usize;
        for list in dom::get_all_nodes_with_tag(node, &["ul", "ol"]) {
            list_length += char_count(&dom::get_inner_text(&list, true));
        }

        let node_length = char_count(&dom::get_inner_text(node, true));
        if node_length > 0 {
            is_list = list_length as f64 / node_length as f64 > 0.9;
        }
    }

    let weight = get_class_weight(node, ctx);
    if weight < 0 {
        return true;
    }

    if dom::get_inner_text(node, true).matches(',').count() >= 10 {
        return false;
    }

    // Not many commas; weigh non-paragraph content against paragraphs
    let p = dom::get_elements_by_tag_name(node, "p").len() as f64;
    let img = dom::get_elements_by_tag_name(node, "img").len() as f64;
    let li = dom::get_elements_by_tag_name(node, "li").len() as f64 - 100.0;
    let input = dom::get_elements_by_tag_name(node, "input").len() as f64;
    let heading_density = get_text_density(node, &["h1", "h2", "h3", "h4", "h5", "h6"]);

    let mut embed_count = 0usize;
    for embed in dom::get_all_nodes_with_tag(node, &["object", "embed", "iframe"]) {
        if is_allowed_embed(&embed, ctx) {
            return false;
        }
        embed_count += 1;
    }

    let link_density = get_link_density(node);
    let content_length = char_count(&dom::get_inner_text(node, true));
    let in_figure = dom::has_ancestor_tag(node, "figure", 3);

    let have_to_remove = (img > 1.0 && p / img < 0.5 && !in_figure)
        || (!is_list && li > p)
        || (input > (p / 3.0).floor())
        || (!is_list
            && heading_density < 0.9
            && content_length < 25
            && (img == 0.0 || img > 2.0)
            && !in_figure)
        || (!is_list && weight < 25 && link_density > 0.2)
        || (weight >= 25 && link_density > 0.5)
        || ((embed_count == 1 && content_length < 75) || embed_count > 1);

    // Allow simple lists of images to remain
    if is_list && have_to_remove {
        for child in dom::children(node) {
            if dom::children(&child).len() > 1 {
                return have_to_remove;
            }
        }

        let li_count = dom::get_elements_by_tag_name(node, "li").len();
        #[allow(clippy::float_cmp)]
        if img == li_count as f64 {
            return false;
        }
    }

    have_to_remove
}

/// Clean out elements whose class/id combination matches the filter,
/// scanning the subtree under `e` depth-first.
pub fn clean_matched_nodes(e: &NodeRef, filter: impl Fn(&NodeRef, &str) -> bool) {
    let end_of_search = dom::get_next_node(e, true).map(|n| n.id);
    let mut next = dom::get_next_node(e, false);

    while let Some(node) = next {
        if end_of_search == Some(node.id) {
            break;
        }

        let match_string = format!("{} {}", dom::class_name(&node), dom::id(&node));
        if filter(&node, &match_string) {
            next = dom::get_next_node(&node, true);
            dom::remove_node(&node);
        } else {
            next = dom::get_next_node(&node, false);
        }
    }
}

/// Remove spurious `<h1>`/`<h2>` headings with a negative class weight.
pub fn clean_headers(e: &NodeRef, ctx: &GrabContext) {
    let headings = dom::get_all_nodes_with_tag(e, &["h1", "h2"]);
    for heading in headings.iter().rev() {
        if get_class_weight(heading, ctx) < 0 {
            ctx.log(&format!(
                "removing header with low class weight: {} {}",
                dom::class_name(heading),
                dom::id(heading)
            ));
            dom::remove_node(heading);
        }
    }
}
