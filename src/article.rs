//! The extracted article record.
//!
//! [`Article`] is the output of a successful extraction: the cleaned content
//! subtree (serialized and as a walkable document), the normalised text, and
//! the harvested metadata fields.

use chrono::{DateTime, Utc};
use dom_query::Document;
use serde::Serialize;

/// The final readable content of a page.
///
/// Textual fields are best-effort: they are `None` when the page carries no
/// usable value. Invalid UTF-8 is repaired before the record is built, so
/// every field is guaranteed to hold valid text.
#[derive(Default, Serialize)]
pub struct Article {
    /// Article title, from metadata or the title heuristic.
    pub title: Option<String>,

    /// Author name(s), from metadata or a byline node found during
    /// extraction.
    pub byline: Option<String>,

    /// Serialized HTML of the extracted subtree.
    pub content: Option<String>,

    /// Plain text of the extracted subtree, whitespace-collapsed.
    pub text_content: Option<String>,

    /// Character count of `text_content` (Unicode code points).
    pub length: usize,

    /// Short description, from metadata or the article's first paragraph.
    pub excerpt: Option<String>,

    /// Name of the site or publication.
    pub site_name: Option<String>,

    /// Main image URL (absolute).
    pub image: Option<String>,

    /// Favicon URL (absolute).
    pub favicon: Option<String>,

    /// Content language from `<html lang>`.
    pub language: Option<String>,

    /// Publication timestamp, when a date string could be parsed.
    pub published_time: Option<DateTime<Utc>>,

    /// Last-modification timestamp, when a date string could be parsed.
    pub modified_time: Option<DateTime<Utc>>,

    /// The extracted subtree as an owned document, for callers that want
    /// to walk the tree themselves. Its root element is the extraction
    /// container whose first child carries `id="readability-page-1"`.
    #[serde(skip)]
    pub node: Option<Document>,
}

impl std::fmt::Debug for Article {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Article")
            .field("title", &self.title)
            .field("byline", &self.byline)
            .field("length", &self.length)
            .field("excerpt", &self.excerpt)
            .field("site_name", &self.site_name)
            .field("image", &self.image)
            .field("favicon", &self.favicon)
            .field("language", &self.language)
            .field("published_time", &self.published_time)
            .field("modified_time", &self.modified_time)
            .field("has_node", &self.node.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_article_is_empty() {
        let article = Article::default();
        assert!(article.title.is_none());
        assert!(article.content.is_none());
        assert_eq!(article.length, 0);
        assert!(article.node.is_none());
    }

    #[test]
    fn serializes_without_node_field() {
        let article = Article {
            title: Some("Hello".to_string()),
            length: 5,
            ..Article::default()
        };
        let json = serde_json::to_string(&article).unwrap();
        assert!(json.contains("\"title\":\"Hello\""));
        assert!(!json.contains("node"));
    }
}
