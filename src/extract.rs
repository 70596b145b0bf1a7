//! Extraction orchestration.
//!
//! Wires the passes together: clone the input, unwrap noscript images,
//! harvest JSON-LD before scripts are removed, prep the document, harvest
//! metadata, grab the article, post-process it, and assemble the final
//! [`Article`] record.

use chrono::{DateTime, Utc};
use url::Url;

use crate::article::Article;
use crate::dom::{self, Document, NodeRef};
use crate::error::{Error, Result};
use crate::grabber;
use crate::metadata;
use crate::options::Options;
use crate::postprocess;
use crate::prep;
use crate::text::{char_count, to_valid_utf8};

pub(crate) fn parse_document_impl(
    input: &Document,
    base_url: Option<&str>,
    options: &Options,
) -> Result<Article> {
    let document_url = base_url
        .map(|raw| Url::parse(raw).map_err(|_| Error::InvalidUrl(raw.to_string())))
        .transpose()?;

    // Work on a clone so the caller's tree is never modified
    let doc = dom::clone_document(input);

    if options.max_elems_to_parse > 0 {
        let count = dom::document_element(&doc)
            .map(|root| dom::descendant_elements(&root).len() + 1)
            .unwrap_or(0);
        if count > options.max_elems_to_parse {
            return Err(Error::InputTooLarge {
                count,
                max: options.max_elems_to_parse,
            });
        }
    }

    prep::unwrap_noscript_images(&doc);

    // JSON-LD lives in script elements, read it before they are removed
    let json_ld = if options.disable_json_ld {
        metadata::JsonLd::default()
    } else {
        metadata::get_json_ld(&doc, options)
    };

    prep::remove_scripts(&doc);
    prep::prep_document(&doc);

    let meta = metadata::get_article_metadata(&doc, &json_ld, document_url.as_ref());

    let Some(grabbed) = grabber::grab_article(&doc, &meta.title, options) else {
        return Err(Error::Unreadable);
    };

    let Some(container) = dom::body(&grabbed.doc).and_then(|b| dom::first_element_child(&b))
    else {
        return Err(Error::Unreadable);
    };

    postprocess::post_process_content(&container, document_url.as_ref(), options);

    // Without a metadata excerpt, the article's first paragraph serves as
    // the content preview.
    let mut excerpt = meta.excerpt.clone();
    if excerpt.is_empty() {
        if let Some(first_p) = dom::get_elements_by_tag_name(&container, "p").first() {
            excerpt = dom::text_content(first_p).trim().to_string();
        }
    }
    // An excerpt is supposed to be short and concise, no newlines
    let excerpt = excerpt.split_whitespace().collect::<Vec<_>>().join(" ");

    let byline = if meta.byline.is_empty() {
        grabbed.byline.clone().unwrap_or_default()
    } else {
        meta.byline.clone()
    };

    let content = dom::inner_html(&container);
    let text_content = dom::text_content(&container).trim().to_string();
    let length = char_count(&text_content);

    // Metadata can arrive in a broken encoding; repair it, with the page
    // URL standing in for an unusable title.
    let replacement_title = document_url.as_ref().map(Url::to_string).unwrap_or_default();
    let title = to_valid_utf8(&meta.title, &replacement_title);
    let byline = to_valid_utf8(&byline, "");
    let excerpt = to_valid_utf8(&excerpt, "");

    let published_time = parse_date(&meta.published_time);
    let modified_time = parse_date(&meta.modified_time);

    let non_empty = |s: String| if s.is_empty() { None } else { Some(s) };

    Ok(Article {
        title: non_empty(title),
        byline: non_empty(byline),
        content: Some(content),
        text_content: Some(text_content),
        length,
        excerpt: non_empty(excerpt),
        site_name: non_empty(meta.site_name),
        image: non_empty(meta.image),
        favicon: non_empty(meta.favicon),
        language: grabbed.lang.clone(),
        published_time,
        modified_time,
        node: Some(grabbed.doc),
    })
}

/// Parse a date string using a list of known formats.
///
/// Malformed strings yield `None`; the error is never surfaced.
fn parse_date(date_str: &str) -> Option<DateTime<Utc>> {
    let date_str = date_str.trim();
    if date_str.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(date_str) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Ok(dt) = DateTime::parse_from_rfc2822(date_str) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%d %H:%M:%S %z"] {
        if let Ok(dt) = DateTime::parse_from_str(date_str, format) {
            return Some(dt.with_timezone(&Utc));
        }
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(date_str, format) {
            return Some(dt.and_utc());
        }
    }

    for format in ["%Y-%m-%d", "%Y/%m/%d", "%B %d, %Y", "%b %d, %Y", "%d %B %Y"] {
        if let Ok(date) = chrono::NaiveDate::parse_from_str(date_str, format) {
            return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
        }
    }

    None
}

/// The root element of the extracted subtree inside an article's owned
/// document: the container's `readability-page-1` child.
#[must_use]
pub fn article_root(node_doc: &Document) -> Option<NodeRef> {
    dom::body(node_doc)
        .and_then(|body| dom::first_element_child(&body))
        .and_then(|container| dom::first_element_child(&container))
}
