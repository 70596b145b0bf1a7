//! URL utility functions.
//!
//! Resolution of relative URIs against the document base, plus the
//! validation used when promoting lazy-image attribute values.

use url::Url;

/// Convert a URI to absolute form against the document base.
///
/// Fragment-only URIs (`#...`) and `data:` URIs are returned unchanged.
/// Already-absolute URLs are returned as-is. When no base is available or
/// resolution fails, `None` is returned so the caller can drop the
/// attribute instead of leaving it dangling.
#[must_use]
pub fn to_absolute_uri(uri: &str, base: Option<&Url>) -> Option<String> {
    let uri = uri.trim();
    if uri.is_empty() {
        return None;
    }

    // In-page fragment, keep as it is
    if uri.starts_with('#') {
        return Some(uri.to_string());
    }

    if uri.starts_with("data:") {
        return Some(uri.to_string());
    }

    // Already absolute
    if let Ok(parsed) = Url::parse(uri) {
        if !parsed.scheme().is_empty() && parsed.host_str().is_some() {
            return Some(uri.to_string());
        }
    }

    let base = base?;
    base.join(uri).map(|resolved| resolved.to_string()).ok()
}

/// Whether a string parses as an HTTP(S) URL or a host-relative path that
/// could become one.
///
/// Used when deciding if a non-standard attribute value is worth promoting
/// to an image `src`/`srcset`.
#[must_use]
pub fn is_valid_url(s: &str) -> bool {
    let s = s.trim();
    if s.is_empty() || s.contains(char::is_whitespace) {
        return false;
    }

    match Url::parse(s) {
        Ok(url) => url.host_str().is_some(),
        // A bare path is fine, it will be resolved against the base later
        Err(url::ParseError::RelativeUrlWithoutBase) => true,
        Err(_) => false,
    }
}
