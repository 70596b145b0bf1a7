//! Post-processing of the extracted article.
//!
//! Rewrites URIs to absolute form, simplifies pointless nesting, strips
//! classes, and removes any leftover bookkeeping attributes. Runs once on
//! the article container after the grabber succeeds.

use url::Url;

use crate::dom::{self, NodeRef};
use crate::options::Options;
use crate::patterns;

/// Run all post-process modifications on the article container.
pub fn post_process_content(
    article_content: &NodeRef,
    base_url: Option<&Url>,
    options: &Options,
) {
    // Readers cannot open relative URIs, so convert them to absolute
    fix_relative_uris(article_content, base_url);

    simplify_nested_elements(article_content);

    if !options.keep_classes {
        clean_classes(article_content, options);
    }

    clear_readability_attrs(article_content);
}

/// Convert every `<a>` and media URI in the subtree to absolute form.
///
/// `javascript:` links are collapsed to their text (or a `<span>` keeping
/// their children); unresolvable URIs lose the attribute entirely.
pub fn fix_relative_uris(article_content: &NodeRef, base_url: Option<&Url>) {
    for link in dom::get_elements_by_tag_name(article_content, "a") {
        let href = dom::get_attribute(&link, "href");
        if href.is_empty() {
            continue;
        }

        if href.starts_with("javascript:") {
            // Scripts are gone, so the link cannot work anymore
            let children = dom::child_nodes(&link);
            if children.len() == 1 && children[0].is_text() {
                let text = dom::text_content(&link);
                dom::replace_with_html(&link, &html_escape::encode_text(&text));
            } else {
                let inner = dom::inner_html(&link);
                dom::replace_with_html(&link, &["<span>", &inner, "</span>"].concat());
            }
            continue;
        }

        match crate::url_utils::to_absolute_uri(&href, base_url) {
            Some(absolute) => dom::set_attribute(&link, "href", &absolute),
            None => dom::remove_attribute(&link, "href"),
        }
    }

    for media in dom::get_all_nodes_with_tag(
        article_content,
        &["img", "picture", "figure", "video", "audio", "source"],
    ) {
        for attribute in ["src", "poster"] {
            let value = dom::get_attribute(&media, attribute);
            if value.is_empty() {
                continue;
            }
            match crate::url_utils::to_absolute_uri(&value, base_url) {
                Some(absolute) => dom::set_attribute(&media, attribute, &absolute),
                None => dom::remove_attribute(&media, attribute),
            }
        }

        let srcset = dom::get_attribute(&media, "srcset");
        if !srcset.is_empty() {
            let rewritten = patterns::SRCSET_URL.replace_all(&srcset, |caps: &regex::Captures| {
                let url = &caps[1];
                let descriptor = caps.get(2).map_or("", |m| m.as_str());
                let separator = caps.get(3).map_or("", |m| m.as_str());
                let absolute = crate::url_utils::to_absolute_uri(url, base_url)
                    .unwrap_or_else(|| url.to_string());
                [absolute.as_str(), descriptor, separator].concat()
            });
            dom::set_attribute(&media, "srcset", &rewritten);
        }
    }
}

/// Collapse single-child `<div>`/`<section>` chains and drop empty ones.
///
/// The article container itself and the `readability-` envelope are left
/// alone.
pub fn simplify_nested_elements(article_content: &NodeRef) {
    let mut node_opt = Some(article_content.clone());

    while let Some(node) = node_opt {
        let tag = dom::tag_name(&node);
        let is_simplifiable = node.id != article_content.id
            && node.parent().is_some()
            && (tag == "div" || tag == "section")
            && !dom::id(&node).starts_with("readability");

        if is_simplifiable {
            if dom::is_element_without_content(&node) {
                node_opt = dom::get_next_node(&node, true);
                dom::remove_node(&node);
                continue;
            }

            if dom::has_single_tag_inside_element(&node, "div")
                || dom::has_single_tag_inside_element(&node, "section")
            {
                let child = dom::children(&node)[0].clone();
                for (name, value) in dom::get_all_attributes(&node) {
                    dom::set_attribute(&child, &name, &value);
                }
                dom::replace_node(&node, &child);
                node_opt = Some(child);
                continue;
            }
        }

        node_opt = dom::get_next_node(&node, false);
    }
}

/// Strip `class` attributes in the subtree, keeping only the classes the
/// options preserve. The envelope's `page` class always survives.
pub fn clean_classes(node: &NodeRef, options: &Options) {
    let class = dom::class_name(node);
    let preserved: Vec<&str> = class
        .split_whitespace()
        .filter(|c| *c == "page" || options.classes_to_preserve.iter().any(|p| p == c))
        .collect();

    if preserved.is_empty() {
        dom::remove_attribute(node, "class");
    } else {
        dom::set_attribute(node, "class", &preserved.join(" "));
    }

    let mut child = dom::first_element_child(node);
    while let Some(c) = child {
        clean_classes(&c, options);
        child = dom::next_element_sibling(&c);
    }
}

/// Remove per-node bookkeeping attributes from the subtree.
///
/// Scores and table marks live in side tables, so this is a scrub for
/// attribute-shaped leftovers in pathological inputs.
pub fn clear_readability_attrs(node: &NodeRef) {
    dom::remove_attribute(node, "data-readability-score");
    dom::remove_attribute(node, "data-readability-table");

    let mut child = dom::first_element_child(node);
    while let Some(c) = child {
        clear_readability_attrs(&c);
        child = dom::next_element_sibling(&c);
    }
}
