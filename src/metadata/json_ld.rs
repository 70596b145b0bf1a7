//! JSON-LD metadata extraction.
//!
//! Pulls article metadata out of schema.org JSON-LD scripts. Only objects
//! whose `@type` is an Article variant (see
//! [`patterns::JSONLD_ARTICLE_TYPES`]) are considered; a top-level
//! `@graph` is searched one level deep for the first such object.

use serde_json::Value;

use crate::dom::{Document, Selection};
use crate::metadata::get_article_title;
use crate::options::Options;
use crate::patterns;
use crate::text::text_similarity;

/// Metadata recovered from a JSON-LD payload.
#[derive(Debug, Clone, Default)]
pub struct JsonLd {
    /// Article title (from `name` or `headline`).
    pub title: Option<String>,
    /// Author name(s), joined with `", "` when several.
    pub byline: Option<String>,
    /// Description.
    pub excerpt: Option<String>,
    /// Publisher name.
    pub site_name: Option<String>,
    /// `datePublished` string, forwarded unparsed.
    pub date_published: Option<String>,
    /// `dateModified` string, forwarded unparsed.
    pub date_modified: Option<String>,
}

/// Extract metadata from the document's JSON-LD scripts.
///
/// The first script that decodes to a schema.org article wins. Malformed
/// payloads are skipped (logged when `options.debug` is set).
#[must_use]
pub fn get_json_ld(doc: &Document, options: &Options) -> JsonLd {
    for script in doc
        .select(r#"script[type="application/ld+json"]"#)
        .nodes()
    {
        let content = Selection::from(script.clone()).text().to_string();
        let content = patterns::CDATA.replace_all(&content, "");

        let parsed: Value = match serde_json::from_str(content.trim()) {
            Ok(value) => value,
            Err(err) => {
                if options.debug {
                    eprintln!("readability: error while decoding json-ld: {err}");
                }
                continue;
            }
        };

        let Value::Object(mut object) = parsed else {
            continue;
        };

        // Require a schema.org context
        let context_ok = object
            .get("@context")
            .and_then(Value::as_str)
            .is_some_and(|c| patterns::SCHEMA_ORG.is_match(c));
        if !context_ok {
            continue;
        }

        // Without a top-level @type, take the first article entry of @graph
        if !object.contains_key("@type") {
            let Some(Value::Array(graph)) = object.get("@graph") else {
                continue;
            };

            let found = graph.iter().find_map(|entry| match entry {
                Value::Object(graph_obj) => {
                    let is_article = graph_obj
                        .get("@type")
                        .and_then(Value::as_str)
                        .is_some_and(|t| patterns::JSONLD_ARTICLE_TYPES.is_match(t));
                    is_article.then(|| graph_obj.clone())
                }
                _ => None,
            });

            match found {
                Some(graph_obj) => object = graph_obj,
                None => continue,
            }
        }

        let type_ok = object
            .get("@type")
            .and_then(Value::as_str)
            .is_some_and(|t| patterns::JSONLD_ARTICLE_TYPES.is_match(t));
        if !type_ok {
            continue;
        }

        let mut metadata = JsonLd::default();

        // Title: some sites put their own name in "name" and the article
        // title in "headline". Prefer whichever resembles the page title.
        let name = object.get("name").and_then(Value::as_str);
        let headline = object.get("headline").and_then(Value::as_str);
        match (name, headline) {
            (Some(name), Some(headline)) if name != headline => {
                let page_title = get_article_title(doc);
                let name_matches = text_similarity(name, &page_title) > 0.75;
                let headline_matches = text_similarity(headline, &page_title) > 0.75;

                if headline_matches && !name_matches {
                    metadata.title = Some(headline.trim().to_string());
                } else {
                    metadata.title = Some(name.trim().to_string());
                }
            }
            (Some(name), _) => metadata.title = Some(name.trim().to_string()),
            (None, Some(headline)) => metadata.title = Some(headline.trim().to_string()),
            (None, None) => {}
        }

        // Author: a string, an object with a name, or an array of either
        match object.get("author") {
            Some(Value::String(author)) => {
                metadata.byline = Some(author.trim().to_string());
            }
            Some(Value::Object(author)) => {
                if let Some(name) = author.get("name").and_then(Value::as_str) {
                    metadata.byline = Some(name.trim().to_string());
                }
            }
            Some(Value::Array(authors)) => {
                let names: Vec<String> = authors
                    .iter()
                    .filter_map(|author| match author {
                        Value::String(name) => Some(name.trim().to_string()),
                        Value::Object(author) => author
                            .get("name")
                            .and_then(Value::as_str)
                            .map(|name| name.trim().to_string()),
                        _ => None,
                    })
                    .collect();
                if !names.is_empty() {
                    metadata.byline = Some(names.join(", "));
                }
            }
            _ => {}
        }

        if let Some(description) = object.get("description").and_then(Value::as_str) {
            metadata.excerpt = Some(description.trim().to_string());
        }

        if let Some(Value::Object(publisher)) = object.get("publisher") {
            if let Some(name) = publisher.get("name").and_then(Value::as_str) {
                metadata.site_name = Some(name.trim().to_string());
            }
        }

        if let Some(date) = object.get("datePublished").and_then(Value::as_str) {
            metadata.date_published = Some(date.to_string());
        }

        if let Some(date) = object.get("dateModified").and_then(Value::as_str) {
            metadata.date_modified = Some(date.to_string());
        }

        return metadata;
    }

    JsonLd::default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom;

    fn json_ld_for(script: &str) -> JsonLd {
        let html = [
            "<html><head><script type=\"application/ld+json\">",
            script,
            "</script></head><body></body></html>",
        ]
        .concat();
        let doc = dom::parse(&html);
        get_json_ld(&doc, &Options::default())
    }

    #[test]
    fn news_article_fields_are_extracted() {
        let metadata = json_ld_for(
            r#"{"@context":"https://schema.org","@type":"NewsArticle","headline":"X",
                "author":{"name":"Y"},"datePublished":"2020-01-02T03:04:05Z",
                "description":"D","publisher":{"name":"P"}}"#,
        );

        assert_eq!(metadata.title.as_deref(), Some("X"));
        assert_eq!(metadata.byline.as_deref(), Some("Y"));
        assert_eq!(metadata.excerpt.as_deref(), Some("D"));
        assert_eq!(metadata.site_name.as_deref(), Some("P"));
        assert_eq!(metadata.date_published.as_deref(), Some("2020-01-02T03:04:05Z"));
    }

    #[test]
    fn author_array_is_joined() {
        let metadata = json_ld_for(
            r#"{"@context":"https://schema.org","@type":"Article",
                "author":[{"name":"A"},{"name":"B"}]}"#,
        );
        assert_eq!(metadata.byline.as_deref(), Some("A, B"));
    }

    #[test]
    fn author_string_is_accepted() {
        let metadata = json_ld_for(
            r#"{"@context":"https://schema.org","@type":"Article","author":"Solo"}"#,
        );
        assert_eq!(metadata.byline.as_deref(), Some("Solo"));
    }

    #[test]
    fn graph_is_searched_for_the_first_article() {
        let metadata = json_ld_for(
            r#"{"@context":"https://schema.org","@graph":[
                {"@type":"WebSite","name":"Site"},
                {"@type":"BlogPosting","headline":"From Graph"}]}"#,
        );
        assert_eq!(metadata.title.as_deref(), Some("From Graph"));
    }

    #[test]
    fn non_schema_context_is_ignored() {
        let metadata = json_ld_for(
            r#"{"@context":"https://example.com","@type":"Article","headline":"No"}"#,
        );
        assert!(metadata.title.is_none());
    }

    #[test]
    fn non_article_type_is_ignored() {
        let metadata = json_ld_for(
            r#"{"@context":"https://schema.org","@type":"WebSite","name":"No"}"#,
        );
        assert!(metadata.title.is_none());
    }

    #[test]
    fn malformed_json_is_skipped() {
        let metadata = json_ld_for("{not json");
        assert!(metadata.title.is_none());
    }

    #[test]
    fn cdata_markers_are_stripped() {
        let metadata = json_ld_for(
            r#"<![CDATA[{"@context":"https://schema.org","@type":"Article","headline":"H"}]]>"#,
        );
        assert_eq!(metadata.title.as_deref(), Some("H"));
    }

    #[test]
    fn headline_preferred_when_it_matches_page_title() {
        let html = concat!(
            "<html><head><title>The Actual Article Headline Here</title>",
            "<script type=\"application/ld+json\">",
            r#"{"@context":"https://schema.org","@type":"NewsArticle",
                "name":"Aktualne News","headline":"The Actual Article Headline Here"}"#,
            "</script></head><body></body></html>",
        );
        let doc = dom::parse(html);
        let metadata = get_json_ld(&doc, &Options::default());
        assert_eq!(
            metadata.title.as_deref(),
            Some("The Actual Article Headline Here")
        );
    }
}
