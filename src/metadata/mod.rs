//! Metadata extraction.
//!
//! Harvests article metadata from `<meta>` tags (Dublin Core, Open Graph,
//! Twitter Cards, weibo), JSON-LD structured data, the `<title>` heuristic,
//! and favicon `<link>` elements.

pub mod json_ld;

use std::collections::HashMap;

use url::Url;

use crate::dom::{self, Document};
use crate::patterns;
use crate::text::{char_count, word_count};
use crate::url_utils;

pub use json_ld::{get_json_ld, JsonLd};

/// Raw metadata harvested from a document.
///
/// All fields are unparsed strings; timestamps are forwarded to the date
/// parser during article assembly.
#[derive(Debug, Clone, Default)]
pub struct Metadata {
    /// Article title.
    pub title: String,
    /// Author name(s).
    pub byline: String,
    /// Short description.
    pub excerpt: String,
    /// Site or publication name.
    pub site_name: String,
    /// Main image URL (absolute when a base is available).
    pub image: String,
    /// Favicon URL (absolute when a base is available).
    pub favicon: String,
    /// Publication date string.
    pub published_time: String,
    /// Modification date string.
    pub modified_time: String,
}

fn first_non_empty(candidates: &[Option<&String>]) -> String {
    candidates
        .iter()
        .flatten()
        .find(|s| !s.is_empty())
        .map(|s| (*s).clone())
        .unwrap_or_default()
}

/// Harvest metadata for the article.
///
/// JSON-LD values win over `<meta>` values, which win over the computed
/// title. Textual fields are HTML-entity-unescaped before return.
#[must_use]
pub fn get_article_metadata(
    doc: &Document,
    json_ld: &JsonLd,
    base_url: Option<&Url>,
) -> Metadata {
    let mut values: HashMap<String, String> = HashMap::new();

    let Some(root) = dom::document_element(doc) else {
        return Metadata::default();
    };

    for element in dom::get_elements_by_tag_name(&root, "meta") {
        let element_name = dom::get_attribute(&element, "name");
        let element_property = dom::get_attribute(&element, "property");
        let content = dom::get_attribute(&element, "content");
        if content.is_empty() {
            continue;
        }

        let mut matched_property = false;
        if !element_property.is_empty() {
            let matches: Vec<_> = patterns::META_PROPERTY
                .find_iter(&element_property)
                .collect();
            matched_property = !matches.is_empty();
            // Reverse order so the first match wins when a property carries
            // several recognised names.
            for m in matches.iter().rev() {
                // Lowercase and strip whitespace so the lookups below match
                let name: String = m
                    .as_str()
                    .to_lowercase()
                    .split_whitespace()
                    .collect::<Vec<_>>()
                    .concat();
                values.insert(name, content.trim().to_string());
            }
        }

        if !matched_property
            && !element_name.is_empty()
            && patterns::META_NAME.is_match(&element_name)
        {
            let name: String = element_name
                .to_lowercase()
                .split_whitespace()
                .collect::<Vec<_>>()
                .concat()
                .replace('.', ":");
            values.insert(name, content.trim().to_string());
        }
    }

    let mut title = first_non_empty(&[
        json_ld.title.as_ref(),
        values.get("dc:title"),
        values.get("dcterm:title"),
        values.get("og:title"),
        values.get("weibo:article:title"),
        values.get("weibo:webpage:title"),
        values.get("title"),
        values.get("twitter:title"),
    ]);
    if title.is_empty() {
        title = get_article_title(doc);
    }

    let byline = first_non_empty(&[
        json_ld.byline.as_ref(),
        values.get("dc:creator"),
        values.get("dcterm:creator"),
        values.get("author"),
    ]);

    let excerpt = first_non_empty(&[
        json_ld.excerpt.as_ref(),
        values.get("dc:description"),
        values.get("dcterm:description"),
        values.get("og:description"),
        values.get("weibo:article:description"),
        values.get("weibo:webpage:description"),
        values.get("description"),
        values.get("twitter:description"),
    ]);

    let site_name = first_non_empty(&[json_ld.site_name.as_ref(), values.get("og:site_name")]);

    let image = first_non_empty(&[
        values.get("og:image"),
        values.get("image"),
        values.get("twitter:image"),
    ]);
    let image = url_utils::to_absolute_uri(&image, base_url).unwrap_or(image);

    let favicon = get_article_favicon(doc, base_url);

    let published_time = first_non_empty(&[
        json_ld.date_published.as_ref(),
        values.get("article:published_time"),
        values.get("dcterms:available"),
        values.get("dcterms:created"),
        values.get("dcterms:issued"),
        values.get("weibo:article:create_at"),
    ]);

    let modified_time = first_non_empty(&[
        json_ld.date_modified.as_ref(),
        values.get("article:modified_time"),
        values.get("dcterms:modified"),
    ]);

    // Meta values are often escaped with HTML entities
    let unescape = |s: String| html_escape::decode_html_entities(&s).to_string();

    Metadata {
        title: unescape(title),
        byline: unescape(byline),
        excerpt: unescape(excerpt),
        site_name: unescape(site_name),
        image,
        favicon,
        published_time: unescape(published_time),
        modified_time: unescape(modified_time),
    }
}

/// Compute the article title from `<title>` and the document headings.
///
/// Separator-delimited titles lose their final segment (or their first, if
/// the remainder gets too short); `Site: Title` forms are cut at the colon
/// unless a heading carries the full string; degenerate lengths fall back
/// to a lone `<h1>`. The original title is restored when the result drops
/// too many words.
#[must_use]
pub fn get_article_title(doc: &Document) -> String {
    let Some(root) = dom::document_element(doc) else {
        return String::new();
    };

    let mut orig_title = String::new();
    if let Some(title_el) = dom::get_elements_by_tag_name(&root, "title").first() {
        orig_title = dom::get_inner_text(title_el, true);
    }
    let mut cur_title = orig_title.clone();
    let mut title_had_hierarchical_separators = false;

    if patterns::TITLE_SEPARATOR.is_match(&cur_title) {
        title_had_hierarchical_separators = patterns::TITLE_HIERARCHY_SEP.is_match(&cur_title);
        cur_title = patterns::TITLE_REMOVE_FINAL_PART
            .replace(&orig_title, "$1")
            .to_string();

        // If the resulting title is too short, remove the first part instead
        if word_count(&cur_title) < 3 {
            cur_title = patterns::TITLE_REMOVE_FIRST_PART
                .replace(&orig_title, "$1")
                .to_string();
        }
    } else if cur_title.contains(": ") {
        // Check if a heading contains this exact string, in which case
        // it is the full title already.
        let mut headings = dom::get_elements_by_tag_name(&root, "h1");
        headings.extend(dom::get_elements_by_tag_name(&root, "h2"));

        let trimmed_title = cur_title.trim().to_string();
        let heading_matches = headings
            .iter()
            .any(|h| dom::text_content(h).trim() == trimmed_title);

        if !heading_matches {
            if let Some(last_colon) = orig_title.rfind(':') {
                cur_title = orig_title[last_colon + 1..].to_string();

                if word_count(&cur_title) < 3 {
                    if let Some(first_colon) = orig_title.find(':') {
                        cur_title = orig_title[first_colon + 1..].to_string();
                    }
                } else if let Some(first_colon) = orig_title.find(':') {
                    // Too many words before the colon means the titles and
                    // the H tags disagree, keep the original.
                    if word_count(&orig_title[..first_colon]) > 5 {
                        cur_title = orig_title.clone();
                    }
                }
            }
        }
    } else if char_count(&cur_title) > 150 || char_count(&cur_title) < 15 {
        let h_ones = dom::get_elements_by_tag_name(&root, "h1");
        if h_ones.len() == 1 {
            cur_title = dom::get_inner_text(&h_ones[0], true);
        }
    }

    cur_title = patterns::normalize_spaces(cur_title.trim());

    // With 4 words or fewer, and either no hierarchical separators in the
    // original or a drop of more than one word, keep the original title.
    let cur_word_count = word_count(&cur_title);
    let stripped_orig = patterns::TITLE_ANY_SEPARATOR.replace_all(&orig_title, "");
    if cur_word_count <= 4
        && (!title_had_hierarchical_separators
            || cur_word_count != word_count(&stripped_orig).saturating_sub(1))
    {
        cur_title = orig_title;
    }

    cur_title
}

/// Pick the best favicon from `<link rel*="icon">` elements.
///
/// Only PNG icons are considered; the largest square size declared in
/// `sizes` or embedded in the href wins.
#[must_use]
pub fn get_article_favicon(doc: &Document, base_url: Option<&Url>) -> String {
    let Some(root) = dom::document_element(doc) else {
        return String::new();
    };

    let mut favicon = String::new();
    let mut favicon_size: i64 = -1;

    for link in dom::get_elements_by_tag_name(&root, "link") {
        let link_rel = dom::get_attribute(&link, "rel").trim().to_string();
        let link_type = dom::get_attribute(&link, "type").trim().to_string();
        let link_href = dom::get_attribute(&link, "href").trim().to_string();
        let link_sizes = dom::get_attribute(&link, "sizes").trim().to_string();

        if link_href.is_empty() || !link_rel.contains("icon") {
            continue;
        }

        if link_type != "image/png" && !link_href.contains(".png") {
            continue;
        }

        let mut size = 0i64;
        for location in [&link_sizes, &link_href] {
            if let Some(caps) = patterns::FAVICON_SIZE.captures(location) {
                if caps[1] == caps[2] {
                    size = caps[1].parse().unwrap_or(0);
                    break;
                }
            }
        }

        if size > favicon_size {
            favicon_size = size;
            favicon = link_href;
        }
    }

    url_utils::to_absolute_uri(&favicon, base_url).unwrap_or(favicon)
}
