//! Document preparation.
//!
//! Runs before metadata harvesting and extraction: strips scripts, styles
//! and comments, repairs `<br>`-based paragraph markup, retags `<font>`,
//! and rescues full-quality images hidden inside `<noscript>` blocks.

use crate::dom::{self, Document, NodeRef};
use crate::patterns;

/// Prepare the document for extraction.
///
/// Removes comments and `<style>` elements, collapses `<br>` runs in the
/// body into paragraphs, and retags every `<font>` as `<span>`.
pub fn prep_document(doc: &Document) {
    remove_comments(doc);

    if let Some(root) = dom::document_element(doc) {
        for style in dom::get_elements_by_tag_name(&root, "style") {
            dom::remove_node(&style);
        }
    }

    if let Some(body) = dom::body(doc) {
        replace_brs(&body);
    }

    if let Some(root) = dom::document_element(doc) {
        for font in dom::get_elements_by_tag_name(&root, "font") {
            dom::set_node_tag(&font, "span");
        }
    }
}

/// Remove `<script>` and `<noscript>` elements.
///
/// Runs after [`unwrap_noscript_images`] so rescued images survive.
pub fn remove_scripts(doc: &Document) {
    if let Some(root) = dom::document_element(doc) {
        for node in dom::get_all_nodes_with_tag(&root, &["script", "noscript"]) {
            dom::remove_node(&node);
        }
    }
}

/// Remove every comment node in the document.
pub fn remove_comments(doc: &Document) {
    if let Some(root) = dom::document_element(doc) {
        let mut comments = Vec::new();
        collect_comments(&root, &mut comments);
        for comment in comments {
            dom::remove_node(&comment);
        }
    }
}

fn collect_comments<'a>(node: &NodeRef<'a>, out: &mut Vec<NodeRef<'a>>) {
    for child in dom::child_nodes(node) {
        if child.is_comment() {
            out.push(child);
        } else {
            collect_comments(&child, out);
        }
    }
}

/// Replace two or more successive `<br>` elements with a single `<p>`.
///
/// Whitespace between the `<br>` elements is ignored:
///
/// ```text
/// <div>foo<br>bar<br> <br><br>abc</div>
/// ```
///
/// becomes
///
/// ```text
/// <div>foo<br>bar<p>abc</p></div>
/// ```
pub fn replace_brs(body: &NodeRef) {
    for br in dom::get_elements_by_tag_name(body, "br") {
        let mut next = br.next_sibling();

        // Remove the rest of the <br> chain, leaving the first one behind
        // to be retagged below.
        let mut replaced = false;
        loop {
            let Some(node) = dom::next_significant_node(next) else {
                break;
            };
            if dom::tag_name(&node) != "br" {
                break;
            }

            replaced = true;
            next = node.next_sibling();
            dom::remove_node(&node);
        }

        if !replaced {
            continue;
        }

        // The surviving <br> becomes the paragraph; absorb following
        // phrasing siblings until the next <br><br> pair or a block.
        dom::set_node_tag(&br, "p");
        for (name, _) in dom::get_all_attributes(&br) {
            dom::remove_attribute(&br, &name);
        }
        let p = br;

        let mut next = p.next_sibling();
        while let Some(node) = next {
            if dom::tag_name(&node) == "br" {
                if let Some(after) = dom::next_significant_node(node.next_sibling()) {
                    if dom::tag_name(&after) == "br" {
                        break;
                    }
                }
            }

            if !dom::is_phrasing_content(&node) {
                break;
            }

            next = node.next_sibling();
            dom::append_child(&p, &node);
        }

        while let Some(last) = dom::child_nodes(&p).pop() {
            if dom::is_whitespace(&last) {
                dom::remove_node(&last);
            } else {
                break;
            }
        }

        if let Some(parent) = p.parent() {
            if dom::tag_name(&parent) == "p" {
                dom::set_node_tag(&parent, "div");
            }
        }
    }
}

/// Whether a node is an image, or contains exactly one image as its only
/// content, directly or through descendants.
fn is_single_image(node: &NodeRef) -> bool {
    if dom::tag_name(node) == "img" {
        return true;
    }

    let children = dom::children(node);
    if children.len() != 1 || !dom::text_content(node).trim().is_empty() {
        return false;
    }

    is_single_image(&children[0])
}

/// Unwrap full-quality images hidden inside `<noscript>` blocks.
///
/// Finds every `<noscript>` whose content parses to a single image and
/// whose previous element sibling is a single-image placeholder, then
/// replaces the placeholder with the noscript image. Placeholder
/// attributes that look like image sources are carried over, suffixed
/// `data-old-` when they collide.
pub fn unwrap_noscript_images(doc: &Document) {
    let Some(root) = dom::document_element(doc) else {
        return;
    };

    // Drop placeholder images with no usable source at all, so they don't
    // shadow the noscript replacement below.
    for img in dom::get_elements_by_tag_name(&root, "img") {
        let mut has_source = false;
        for (name, value) in dom::get_all_attributes(&img) {
            match name.as_str() {
                "src" | "data-src" | "srcset" | "data-srcset" => {
                    has_source = true;
                    break;
                }
                _ => {}
            }
            if patterns::IMG_EXTENSIONS.is_match(&value) {
                has_source = true;
                break;
            }
        }

        if !has_source {
            dom::remove_node(&img);
        }
    }

    for noscript in dom::get_elements_by_tag_name(&root, "noscript") {
        // Depending on the parser's scripting flag, noscript content is
        // either raw text or a parsed subtree; inner_html covers both.
        let tmp_doc = dom::parse(&dom::inner_html(&noscript));
        let Some(tmp_body) = dom::body(&tmp_doc) else {
            continue;
        };
        if !is_single_image(&tmp_body) {
            continue;
        }

        let Some(prev) = dom::previous_element_sibling(&noscript) else {
            continue;
        };
        if !is_single_image(&prev) {
            continue;
        }

        let prev_img = if dom::tag_name(&prev) == "img" {
            prev.clone()
        } else {
            match dom::get_elements_by_tag_name(&prev, "img").first().cloned() {
                Some(img) => img,
                None => continue,
            }
        };

        let Some(new_img) = dom::get_elements_by_tag_name(&tmp_body, "img").first().cloned()
        else {
            continue;
        };

        for (name, value) in dom::get_all_attributes(&prev_img) {
            if value.is_empty() {
                continue;
            }

            if name == "src" || name == "srcset" || patterns::IMG_EXTENSIONS.is_match(&value) {
                if dom::get_attribute(&new_img, &name) == value {
                    continue;
                }

                let mut attr_name = name;
                if dom::has_attribute(&new_img, &attr_name) {
                    attr_name = format!("data-old-{attr_name}");
                }
                dom::set_attribute(&new_img, &attr_name, &value);
            }
        }

        if let Some(replacement) = dom::first_element_child(&tmp_body) {
            dom::replace_with_html(&prev, &dom::outer_html(&replacement));
        }
        dom::remove_node(&noscript);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removes_comments_styles_and_retags_font() {
        let doc = dom::parse(
            "<html><head><style>p{}</style></head><body><!-- note --><font>x</font></body></html>",
        );
        prep_document(&doc);

        let html = doc.html().to_string();
        assert!(!html.contains("<!--"));
        assert!(!html.contains("<style"));
        assert!(doc.select("span").exists());
        assert!(doc.select("font").is_empty());
    }

    #[test]
    fn br_chain_becomes_paragraph() {
        let doc = dom::parse("<body><div>foo<br>bar<br> <br><br>abc</div></body>");
        let body = dom::body(&doc).unwrap();
        replace_brs(&body);

        let div_html = doc.select("div").html().to_string();
        assert_eq!(dom::get_elements_by_tag_name(&body, "br").len(), 1);
        assert!(div_html.contains("<p>"));
        assert!(div_html.contains("abc</p>"));
        assert!(doc.select("p").text().contains("abc"));
    }

    #[test]
    fn single_br_is_left_alone() {
        let doc = dom::parse("<body><div>foo<br>bar</div></body>");
        let body = dom::body(&doc).unwrap();
        replace_brs(&body);

        assert_eq!(dom::get_elements_by_tag_name(&body, "br").len(), 1);
        assert!(doc.select("p").is_empty());
    }

    #[test]
    fn paragraph_created_inside_p_retags_parent_to_div() {
        let doc = dom::parse("<body><p>alpha<br><br>beta</p></body>");
        let body = dom::body(&doc).unwrap();
        replace_brs(&body);

        assert!(doc.select("div > p").exists());
    }

    #[test]
    fn noscript_image_replaces_placeholder() {
        let doc = dom::parse(concat!(
            "<body><div>",
            "<img src=\"data:image/gif;base64,AAAA\" data-thumb=\"low.jpg\">",
            "<noscript><img src=\"hires.jpg\"></noscript>",
            "</div></body>",
        ));
        unwrap_noscript_images(&doc);

        let img = doc.select("img");
        assert_eq!(img.length(), 1);
        assert_eq!(img.attr("src").map(|s| s.to_string()), Some("hires.jpg".to_string()));
        assert!(doc.select("noscript").is_empty());
    }

    #[test]
    fn colliding_placeholder_attributes_get_data_old_prefix() {
        let doc = dom::parse(concat!(
            "<body><div>",
            "<img src=\"low.jpg\">",
            "<noscript><img src=\"hires.jpg\"></noscript>",
            "</div></body>",
        ));
        unwrap_noscript_images(&doc);

        let img = doc.select("img");
        assert_eq!(img.attr("src").map(|s| s.to_string()), Some("hires.jpg".to_string()));
        assert_eq!(
            img.attr("data-old-src").map(|s| s.to_string()),
            Some("low.jpg".to_string())
        );
    }

    #[test]
    fn noscript_with_markup_other_than_an_image_is_ignored() {
        let doc = dom::parse(concat!(
            "<body><div>",
            "<img src=\"keep.jpg\">",
            "<noscript><div>text content</div></noscript>",
            "</div></body>",
        ));
        unwrap_noscript_images(&doc);

        assert_eq!(
            doc.select("img").attr("src").map(|s| s.to_string()),
            Some("keep.jpg".to_string())
        );
    }

    #[test]
    fn sourceless_placeholder_is_dropped() {
        let doc = dom::parse("<body><img id=\"ph\"><img src=\"real.jpg\"></body>");
        unwrap_noscript_images(&doc);

        assert_eq!(doc.select("img").length(), 1);
        assert!(doc.select("#ph").is_empty());
    }
}
