//! # rs-readability
//!
//! Rust port of readability - extracts the principal readable article
//! from an HTML page.
//!
//! The engine takes an HTML document (or a pre-parsed tree) plus a base
//! URL and returns the cleaned article subtree together with its
//! metadata: title, byline, excerpt, site name, hero image, favicon,
//! language, and publication dates. Navigation, advertisements, comment
//! sections, share widgets and other chrome are stripped along the way.
//!
//! ## Quick Start
//!
//! ```rust
//! use rs_readability::parse;
//!
//! let html = r#"<html><head><title>My Article</title></head>
//! <body><article><p>Main content with enough text to matter.</p></article></body></html>"#;
//!
//! match parse(html, Some("https://example.com/post")) {
//!     Ok(article) => {
//!         println!("Title: {:?}", article.title);
//!         println!("Length: {}", article.length);
//!     }
//!     Err(err) => eprintln!("not readable: {err}"),
//! }
//! ```
//!
//! ## Pre-flight Check
//!
//! [`check`] answers "is this page worth extracting?" without running
//! the full multi-pass algorithm:
//!
//! ```rust
//! use rs_readability::check;
//!
//! if check("<html><body><p>short</p></body></html>") {
//!     // run the full parse
//! }
//! ```
//!
//! ## Algorithm
//!
//! Extraction runs in phases: the document is prepped (scripts, styles
//! and comments removed, `<br>` runs collapsed, lazy and noscript images
//! repaired), metadata is harvested from meta tags and JSON-LD, then the
//! grabber scores paragraph-like nodes into their ancestors, promotes the
//! best candidate, aggregates related siblings, and conditionally cleans
//! the result. When an attempt yields too little text the grabber retries
//! with progressively relaxed heuristics before giving up.
//!
//! The caller's tree is never modified: every pass works on a clone.

mod article;
mod error;
mod extract;
mod options;

pub mod dom;
pub mod grabber;
pub mod metadata;
pub mod patterns;
pub mod postprocess;
pub mod prep;
pub mod readerable;
pub mod text;
pub mod url_utils;

pub use article::Article;
pub use error::{Error, Result};
pub use extract::article_root;
pub use options::Options;

use dom::Document;

/// Parse HTML and extract the main readable content, using default
/// options.
///
/// # Errors
///
/// Returns [`Error::InvalidUrl`] when `base_url` does not parse,
/// [`Error::InputTooLarge`] when the element cap is exceeded, and
/// [`Error::Unreadable`] when no content could be extracted.
pub fn parse(html: &str, base_url: Option<&str>) -> Result<Article> {
    parse_with_options(html, base_url, &Options::default())
}

/// Parse HTML and extract the main readable content with custom options.
///
/// # Errors
///
/// Same as [`parse`].
pub fn parse_with_options(html: &str, base_url: Option<&str>, options: &Options) -> Result<Article> {
    let doc = dom::parse(html);
    extract::parse_document_impl(&doc, base_url, options)
}

/// Extract the main readable content from a pre-parsed document, using
/// default options. The document is not modified.
///
/// # Errors
///
/// Same as [`parse`].
pub fn parse_document(doc: &Document, base_url: Option<&str>) -> Result<Article> {
    extract::parse_document_impl(doc, base_url, &Options::default())
}

/// Extract the main readable content from a pre-parsed document with
/// custom options. The document is not modified.
///
/// # Errors
///
/// Same as [`parse`].
pub fn parse_document_with_options(
    doc: &Document,
    base_url: Option<&str>,
    options: &Options,
) -> Result<Article> {
    extract::parse_document_impl(doc, base_url, options)
}

/// Quickly check whether a page is likely readable, without extracting.
#[must_use]
pub fn check(html: &str) -> bool {
    check_document(&dom::parse(html))
}

/// Quickly check whether a pre-parsed document is likely readable.
#[must_use]
pub fn check_document(doc: &Document) -> bool {
    readerable::check_document(doc)
}
