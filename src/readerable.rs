//! Fast reader-ability check.
//!
//! Decides whether a document carries enough textual paragraph content to
//! be worth extracting, without running the full algorithm.

use std::collections::HashSet;

use crate::dom::{self, Document, NodeId};
use crate::patterns;
use crate::text::char_count;

/// Minimum trimmed text length for a node to count towards the score.
const MIN_CONTENT_LENGTH: usize = 140;

/// Accumulated score above which the document counts as readerable.
const MIN_SCORE: f64 = 20.0;

/// Whether the document contains enough readable paragraph content.
///
/// Collects `<p>`, `<pre>` and `<article>` nodes plus any `<div>` with a
/// direct `<br>` child, then accumulates `sqrt(text_len - 140)` over the
/// visible, likely-content ones, short-circuiting as soon as the score
/// clears the threshold.
#[must_use]
pub fn check_document(doc: &Document) -> bool {
    let mut nodes: Vec<dom::NodeRef> = doc.select("p, pre, article").nodes().to_vec();

    // Divs used as paragraphs via <br> markup count too, each once
    let mut seen: HashSet<NodeId> = HashSet::new();
    for br in doc.select("div > br").nodes() {
        if let Some(parent) = br.parent() {
            if seen.insert(parent.id) {
                nodes.push(parent);
            }
        }
    }

    let mut score = 0.0;
    for node in nodes {
        if !dom::is_probably_visible(&node) {
            continue;
        }

        let match_string = format!("{} {}", dom::class_name(&node), dom::id(&node));
        if patterns::is_unlikely_candidate(&match_string)
            && !patterns::maybe_is_candidate(&match_string)
        {
            continue;
        }

        if dom::tag_name(&node) == "p" && dom::has_ancestor_tag(&node, "li", -1) {
            continue;
        }

        let text_length = char_count(dom::text_content(&node).trim());
        if text_length < MIN_CONTENT_LENGTH {
            continue;
        }

        score += ((text_length - MIN_CONTENT_LENGTH) as f64).sqrt();
        if score > MIN_SCORE {
            return true;
        }
    }

    false
}
