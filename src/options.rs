//! Configuration options for article extraction.
//!
//! The [`Options`] struct controls extraction behavior: scoring thresholds,
//! element limits, class preservation, and metadata extraction toggles.

use regex::Regex;

/// Configuration options for the extraction engine.
///
/// All fields are public for easy configuration. Use `Default::default()`
/// for standard settings.
///
/// # Example
///
/// ```rust
/// use rs_readability::Options;
///
/// // Use defaults
/// let options = Options::default();
///
/// // Customize specific fields
/// let options = Options {
///     char_threshold: 300,
///     keep_classes: true,
///     ..Options::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct Options {
    /// Maximum number of elements to parse. `0` means no limit.
    ///
    /// When the document contains more elements, extraction fails with
    /// [`Error::InputTooLarge`](crate::Error::InputTooLarge).
    ///
    /// Default: `0`
    pub max_elems_to_parse: usize,

    /// Number of top-scored candidates to consider when analysing how
    /// tight the competition is among candidates.
    ///
    /// Default: `5`
    pub n_top_candidates: usize,

    /// Minimum number of characters an extracted article must have.
    ///
    /// Below this threshold the grabber retries with relaxed flags before
    /// giving up.
    ///
    /// Default: `500`
    pub char_threshold: usize,

    /// Class names preserved when classes are stripped from the output.
    ///
    /// `"page"` is always preserved regardless of this list.
    ///
    /// Default: `["page"]`
    pub classes_to_preserve: Vec<String>,

    /// Keep all class attributes in the output HTML.
    ///
    /// Default: `false`
    pub keep_classes: bool,

    /// Element tags seeded into the scoring set.
    ///
    /// Default: `section, h2, h3, h4, h5, h6, p, td, pre`
    pub tags_to_score: Vec<String>,

    /// Skip JSON-LD metadata extraction.
    ///
    /// Default: `false`
    pub disable_json_ld: bool,

    /// Override for the default video-embed allow pattern.
    ///
    /// Embeds whose attributes match this pattern survive cleaning. When
    /// `None`, the built-in host list (YouTube, Vimeo, Dailymotion, ...)
    /// is used.
    ///
    /// Default: `None`
    pub allowed_video_regex: Option<Regex>,

    /// Emit decision traces to stderr.
    ///
    /// Default: `false`
    pub debug: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            max_elems_to_parse: 0,
            n_top_candidates: 5,
            char_threshold: 500,
            classes_to_preserve: vec!["page".to_string()],
            keep_classes: false,
            tags_to_score: ["section", "h2", "h3", "h4", "h5", "h6", "p", "td", "pre"]
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
            disable_json_ld: false,
            allowed_video_regex: None,
            debug: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_values() {
        let options = Options::default();
        assert_eq!(options.max_elems_to_parse, 0);
        assert_eq!(options.n_top_candidates, 5);
        assert_eq!(options.char_threshold, 500);
        assert_eq!(options.classes_to_preserve, vec!["page".to_string()]);
        assert!(!options.keep_classes);
        assert!(!options.disable_json_ld);
        assert!(options.allowed_video_regex.is_none());
        assert!(options.tags_to_score.contains(&"p".to_string()));
        assert_eq!(options.tags_to_score.len(), 9);
    }

    #[test]
    fn options_can_be_overridden_with_struct_update() {
        let options = Options {
            char_threshold: 25,
            keep_classes: true,
            ..Options::default()
        };
        assert_eq!(options.char_threshold, 25);
        assert!(options.keep_classes);
        assert_eq!(options.n_top_candidates, 5);
    }
}
