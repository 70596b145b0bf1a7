//! DOM operations adapter.
//!
//! Provides typed access over the `dom_query` crate: navigation, attribute
//! access, mutation, and the node predicates the extraction passes share.
//! Keeping every `dom_query` touch-point here gives the rest of the crate a
//! stable, readability-shaped API.

// Re-export core types for external use
pub use dom_query::{Document, NodeId, NodeRef, Selection};

// Re-export StrTendril so callers can hold zero-copy text
pub use tendril::StrTendril;

use crate::patterns;

/// Elements permissible inside a paragraph.
const PHRASING_ELEMS: &[&str] = &[
    "abbr", "audio", "b", "bdo", "br", "button", "cite", "code", "data", "datalist", "dfn", "em",
    "embed", "i", "img", "input", "kbd", "label", "mark", "math", "meter", "noscript", "object",
    "output", "progress", "q", "ruby", "samp", "script", "select", "small", "span", "strong",
    "sub", "sup", "textarea", "time", "var", "wbr",
];

/// Block-level elements that stop a `<div>` from being treated as a
/// paragraph.
const BLOCK_ELEMS: &[&str] = &[
    "blockquote", "dl", "div", "img", "ol", "p", "pre", "table", "ul", "select",
];

// === Parsing and cloning ===

/// Parse an HTML string into a document.
#[inline]
#[must_use]
pub fn parse(html: &str) -> Document {
    Document::from(html)
}

/// Clone a document by re-serializing it.
///
/// The clone owns a fresh arena, so mutations never leak back into the
/// original tree.
#[must_use]
pub fn clone_document(doc: &Document) -> Document {
    Document::from(doc.html().to_string())
}

// === Attribute operations ===

/// Get the element id attribute, or an empty string.
#[inline]
#[must_use]
pub fn id(node: &NodeRef) -> String {
    get_attribute(node, "id")
}

/// Get the element class attribute, or an empty string.
#[inline]
#[must_use]
pub fn class_name(node: &NodeRef) -> String {
    get_attribute(node, "class")
}

/// Get any attribute value, or an empty string when absent.
#[must_use]
pub fn get_attribute(node: &NodeRef, name: &str) -> String {
    node.attrs()
        .iter()
        .find(|attr| attr.name.local.as_ref() == name)
        .map(|attr| attr.value.to_string())
        .unwrap_or_default()
}

/// Check if an attribute exists.
#[must_use]
pub fn has_attribute(node: &NodeRef, name: &str) -> bool {
    node.attrs().iter().any(|attr| attr.name.local.as_ref() == name)
}

/// Set an attribute value.
#[inline]
pub fn set_attribute(node: &NodeRef, name: &str, value: &str) {
    Selection::from(node.clone()).set_attr(name, value);
}

/// Remove an attribute.
#[inline]
pub fn remove_attribute(node: &NodeRef, name: &str) {
    Selection::from(node.clone()).remove_attr(name);
}

/// Get all attributes as key-value pairs.
#[must_use]
pub fn get_all_attributes(node: &NodeRef) -> Vec<(String, String)> {
    node.attrs()
        .iter()
        .map(|attr| (attr.name.local.to_string(), attr.value.to_string()))
        .collect()
}

// === Tag and node information ===

/// Get the tag name (lowercase), or an empty string for non-elements.
#[must_use]
pub fn tag_name(node: &NodeRef) -> String {
    if !node.is_element() {
        return String::new();
    }
    node.node_name().map(|t| t.to_lowercase()).unwrap_or_default()
}

// === Text content ===

/// Get all text content of the node and its descendants.
#[inline]
#[must_use]
pub fn text_content(node: &NodeRef) -> String {
    node.text().to_string()
}

/// Get the inner HTML of a node.
#[inline]
#[must_use]
pub fn inner_html(node: &NodeRef) -> String {
    Selection::from(node.clone()).inner_html().to_string()
}

/// Get the outer HTML of a node.
#[inline]
#[must_use]
pub fn outer_html(node: &NodeRef) -> String {
    Selection::from(node.clone()).html().to_string()
}

/// Trimmed text content, optionally whitespace-collapsed.
#[must_use]
pub fn get_inner_text(node: &NodeRef, normalize: bool) -> String {
    let text = text_content(node);
    let trimmed = text.trim();
    if normalize {
        patterns::normalize_spaces(trimmed)
    } else {
        trimmed.to_string()
    }
}

// === Tree navigation ===

/// All child nodes, including text and comment nodes.
#[must_use]
pub fn child_nodes<'a>(node: &NodeRef<'a>) -> Vec<NodeRef<'a>> {
    let mut out = Vec::new();
    let mut child = node.first_child();
    while let Some(c) = child {
        child = c.next_sibling();
        out.push(c);
    }
    out
}

/// Element children only.
#[must_use]
pub fn children<'a>(node: &NodeRef<'a>) -> Vec<NodeRef<'a>> {
    child_nodes(node).into_iter().filter(NodeRef::is_element).collect()
}

/// First element child, skipping text nodes.
#[must_use]
pub fn first_element_child<'a>(node: &NodeRef<'a>) -> Option<NodeRef<'a>> {
    let mut child = node.first_child();
    while let Some(c) = child {
        if c.is_element() {
            return Some(c);
        }
        child = c.next_sibling();
    }
    None
}

/// Next element sibling, skipping text nodes.
#[must_use]
pub fn next_element_sibling<'a>(node: &NodeRef<'a>) -> Option<NodeRef<'a>> {
    let mut sibling = node.next_sibling();
    while let Some(s) = sibling {
        if s.is_element() {
            return Some(s);
        }
        sibling = s.next_sibling();
    }
    None
}

/// Previous element sibling, skipping text nodes.
#[must_use]
pub fn previous_element_sibling<'a>(node: &NodeRef<'a>) -> Option<NodeRef<'a>> {
    let mut sibling = node.prev_sibling();
    while let Some(s) = sibling {
        if s.is_element() {
            return Some(s);
        }
        sibling = s.prev_sibling();
    }
    None
}

/// The `<html>` element of a document.
#[must_use]
pub fn document_element(doc: &Document) -> Option<NodeRef> {
    doc.select("html").nodes().first().cloned()
}

/// The `<body>` element of a document.
#[must_use]
pub fn body(doc: &Document) -> Option<NodeRef> {
    doc.select("body").nodes().first().cloned()
}

/// All element descendants in document order (the node itself excluded).
#[must_use]
pub fn descendant_elements<'a>(node: &NodeRef<'a>) -> Vec<NodeRef<'a>> {
    let mut out = Vec::new();
    collect_elements(node, "*", &mut out);
    out
}

/// Descendants with the given tag, in document order. `"*"` matches every
/// element.
#[must_use]
pub fn get_elements_by_tag_name<'a>(node: &NodeRef<'a>, name: &str) -> Vec<NodeRef<'a>> {
    let mut out = Vec::new();
    collect_elements(node, name, &mut out);
    out
}

/// Descendants matching any of the given tags, in document order.
#[must_use]
pub fn get_all_nodes_with_tag<'a>(node: &NodeRef<'a>, names: &[&str]) -> Vec<NodeRef<'a>> {
    let mut out = Vec::new();
    for name in names {
        collect_elements(node, name, &mut out);
    }
    out
}

fn collect_elements<'a>(node: &NodeRef<'a>, name: &str, out: &mut Vec<NodeRef<'a>>) {
    let mut child = node.first_child();
    while let Some(c) = child {
        child = c.next_sibling();
        if c.is_element() {
            if name == "*" || tag_name(&c) == name {
                out.push(c.clone());
            }
            collect_elements(&c, name, out);
        }
    }
}

/// Depth-first traversal over the element tree.
///
/// Pass `ignore_self_and_kids` when the current node (and its subtree) is
/// going away and the walk should continue at the next node over.
#[must_use]
pub fn get_next_node<'a>(node: &NodeRef<'a>, ignore_self_and_kids: bool) -> Option<NodeRef<'a>> {
    if !ignore_self_and_kids {
        if let Some(first) = first_element_child(node) {
            return Some(first);
        }
    }

    if let Some(sibling) = next_element_sibling(node) {
        return Some(sibling);
    }

    // Move up the parent chain until a parent with a sibling is found
    let mut current = node.parent();
    while let Some(parent) = current {
        if let Some(sibling) = next_element_sibling(&parent) {
            return Some(sibling);
        }
        current = parent.parent();
    }
    None
}

/// Find the next node starting from the given one, skipping
/// whitespace-only text nodes in between. An element or a text node with
/// real content stops the scan.
#[must_use]
pub fn next_significant_node(start: Option<NodeRef>) -> Option<NodeRef> {
    let mut next = start;
    while let Some(node) = next {
        if node.is_element() || !text_content(&node).trim().is_empty() {
            return Some(node);
        }
        next = node.next_sibling();
    }
    None
}

/// Whether an ancestor within `max_depth` levels has the given tag.
/// `max_depth <= 0` walks all the way up.
#[must_use]
pub fn has_ancestor_tag(node: &NodeRef, tag: &str, max_depth: i32) -> bool {
    let mut depth = 0;
    let mut current = node.parent();
    while let Some(parent) = current {
        if max_depth > 0 && depth > max_depth {
            return false;
        }
        if tag_name(&parent) == tag {
            return true;
        }
        current = parent.parent();
        depth += 1;
    }
    false
}

// === Tree manipulation ===

/// Create a new detached element in the document's arena.
#[inline]
#[must_use]
pub fn create_element<'a>(context: &NodeRef<'a>, name: &str) -> NodeRef<'a> {
    context.tree.new_element(name)
}

/// Move a node (and its subtree) to be the last child of `parent`.
#[inline]
pub fn append_child(parent: &NodeRef, child: &NodeRef) {
    parent.append_child(child);
}

/// Replace `old` with `new` at the same position. `new` is detached from
/// its current position first, so replacing an element with one of its
/// own descendants works; `old` stays valid and can be re-attached.
#[inline]
pub fn replace_node(old: &NodeRef, new: &NodeRef) {
    Selection::from(new.clone()).remove();
    old.replace_with(new);
}

/// Remove a node and its subtree from the tree.
#[inline]
pub fn remove_node(node: &NodeRef) {
    Selection::from(node.clone()).remove();
}

/// Change the tag of an element, keeping children and attributes.
#[inline]
pub fn set_node_tag(node: &NodeRef, new_tag: &str) {
    Selection::from(node.clone()).rename(new_tag);
}

/// Replace a node with raw HTML.
#[inline]
pub fn replace_with_html(node: &NodeRef, html: &str) {
    Selection::from(node.clone()).replace_with_html(html);
}

/// Append raw HTML to a node's children.
#[inline]
pub fn append_html(node: &NodeRef, html: &str) {
    Selection::from(node.clone()).append_html(html);
}

// === Node predicates ===

/// Whether a node is a text node containing only whitespace, or a `<br>`.
#[must_use]
pub fn is_whitespace(node: &NodeRef) -> bool {
    if node.is_text() {
        return text_content(node).trim().is_empty();
    }
    node.is_element() && tag_name(node) == "br"
}

/// Whether a node qualifies as phrasing content.
#[must_use]
pub fn is_phrasing_content(node: &NodeRef) -> bool {
    if node.is_text() {
        return true;
    }
    if !node.is_element() {
        return false;
    }

    let tag = tag_name(node);
    if PHRASING_ELEMS.contains(&tag.as_str()) {
        return true;
    }

    (tag == "a" || tag == "del" || tag == "ins")
        && child_nodes(node).iter().all(is_phrasing_content)
}

/// Whether an element has no content: no text after trimming and children
/// consisting only of `<br>` and `<hr>`.
#[must_use]
pub fn is_element_without_content(node: &NodeRef) -> bool {
    if !node.is_element() {
        return false;
    }

    if !text_content(node).trim().is_empty() {
        return false;
    }

    let childs = children(node);
    let brs = get_elements_by_tag_name(node, "br");
    let hrs = get_elements_by_tag_name(node, "hr");
    childs.is_empty() || childs.len() == brs.len() + hrs.len()
}

/// Whether any child is a block-level element (recursively).
#[must_use]
pub fn has_child_block_element(node: &NodeRef) -> bool {
    child_nodes(node).iter().any(|child| {
        BLOCK_ELEMS.contains(&tag_name(child).as_str()) || has_child_block_element(child)
    })
}

/// Whether an element contains exactly one child element with the given
/// tag and no other content-bearing text nodes.
#[must_use]
pub fn has_single_tag_inside_element(node: &NodeRef, tag: &str) -> bool {
    let childs = children(node);
    if childs.len() != 1 || tag_name(&childs[0]) != tag {
        return false;
    }

    !child_nodes(node).iter().any(|child| {
        child.is_text() && patterns::HAS_CONTENT.is_match(&text_content(child))
    })
}

/// Whether a node is probably visible to the reader.
///
/// Inline `display:none`/`visibility:hidden`, the `hidden` attribute, and
/// `aria-hidden="true"` all count as invisible, except for the
/// "fallback-image" escape hatch used by Wikimedia math images.
#[must_use]
pub fn is_probably_visible(node: &NodeRef) -> bool {
    let style = get_attribute(node, "style");
    if !style.is_empty()
        && (patterns::DISPLAY_NONE.is_match(&style) || patterns::VISIBILITY_HIDDEN.is_match(&style))
    {
        return false;
    }

    if has_attribute(node, "hidden") {
        return false;
    }

    let aria_hidden = get_attribute(node, "aria-hidden");
    if aria_hidden == "true" && !class_name(node).contains("fallback-image") {
        return false;
    }

    true
}
