//! Compiled regex patterns and classifier predicates.
//!
//! All patterns are compiled once at startup using `LazyLock`. The
//! class/id classifiers run on every element during extraction, so they
//! are kept as anchored alternations matching the reference vocabularies.

#![allow(clippy::expect_used)]

use std::sync::LazyLock;

use regex::Regex;

// =============================================================================
// Class/id classifiers
// =============================================================================

/// Matches class/id combinations that mark a node as an unlikely article
/// candidate (ads, comments, navigation chrome, social widgets).
pub static UNLIKELY_CANDIDATES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)-ad-|ai2html|banner|breadcrumbs|combx|comment|community|cover-wrap|disqus|extra|footer|gdpr|header|legends|menu|related|remark|replies|rss|shoutbox|sidebar|skyscraper|social|sponsor|supplemental|ad-break|agegate|pagination|pager|popup|yom-remote",
    )
    .expect("UNLIKELY_CANDIDATES regex")
});

/// Matches class/id combinations that rescue a node from the unlikely set.
pub static MAYBE_CANDIDATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)and|article|body|column|content|main|shadow").expect("MAYBE_CANDIDATE regex")
});

/// Matches class/id combinations used for author bylines.
pub static BYLINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)byline|author|dateline|writtenby|p-author").expect("BYLINE regex")
});

/// Class/id vocabulary indicating content-bearing containers.
pub static POSITIVE_CLASS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)article|body|content|entry|hentry|h-entry|main|page|pagination|post|text|blog|story",
    )
    .expect("POSITIVE_CLASS regex")
});

/// Class/id vocabulary indicating boilerplate containers.
pub static NEGATIVE_CLASS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)hidden|^hid$| hid$| hid |^hid |banner|combx|comment|com-|contact|foot|footer|footnote|gdpr|masthead|media|meta|outbrain|promo|related|scroll|share|shoutbox|sidebar|skyscraper|sponsor|shopping|tags|tool|widget",
    )
    .expect("NEGATIVE_CLASS regex")
});

/// Matches share-widget class/id combinations.
pub static SHARE_ELEMENTS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\b|_)(share|sharedaddy)(\b|_)").expect("SHARE_ELEMENTS regex")
});

/// Matches embed URLs from hosts whose players are worth keeping.
pub static VIDEOS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)//(www\.)?((dailymotion|youtube|youtube-nocookie|player\.vimeo|v\.qq)\.com|(archive|upload\.wikimedia)\.org|player\.twitch\.tv)",
    )
    .expect("VIDEOS regex")
});

// =============================================================================
// Visibility and structure
// =============================================================================

/// Matches `display: none` in inline styles.
pub static DISPLAY_NONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)display\s*:\s*none").expect("DISPLAY_NONE regex"));

/// Matches `visibility: hidden` in inline styles.
pub static VISIBILITY_HIDDEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)visibility\s*:\s*hidden").expect("VISIBILITY_HIDDEN regex"));

/// Matches text that ends with non-whitespace (a node with real content).
pub static HAS_CONTENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\S$").expect("HAS_CONTENT regex"));

/// Matches in-page fragment URLs.
pub static HASH_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#.+").expect("HASH_URL regex"));

/// Matches a sentence-final period (followed by a space or end of text).
pub static SENTENCE_PERIOD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.( |$)").expect("SENTENCE_PERIOD regex"));

/// Splits text into tokens on non-word characters.
pub static TOKENIZE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\W+").expect("TOKENIZE regex"));

/// Collapses runs of whitespace.
pub static NORMALIZE_SPACES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s{2,}").expect("NORMALIZE_SPACES regex"));

// =============================================================================
// Title heuristics
// =============================================================================

/// A separator between title segments, surrounded by spaces.
pub static TITLE_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i) [\|\-\\/>»] ").expect("TITLE_SEPARATOR regex"));

/// A hierarchical separator (`\`, `/`, `>`, `»`) surrounded by spaces.
pub static TITLE_HIERARCHY_SEP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i) [\\/>»] ").expect("TITLE_HIERARCHY_SEP regex"));

/// Captures everything before the final separator segment.
pub static TITLE_REMOVE_FINAL_PART: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(.*)[\|\-\\/>»] .*").expect("TITLE_REMOVE_FINAL_PART regex"));

/// Captures everything after the first separator segment.
pub static TITLE_REMOVE_FIRST_PART: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)[^\|\-\\/>»]*[\|\-\\/>»](.*)").expect("TITLE_REMOVE_FIRST_PART regex")
});

/// Any run of title separator characters.
pub static TITLE_ANY_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)[\|\-\\/>»]+").expect("TITLE_ANY_SEPARATOR regex"));

// =============================================================================
// Metadata
// =============================================================================

/// Matches `<meta property>` values carrying article metadata.
pub static META_PROPERTY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\s*(dc|dcterm|og|article|twitter)\s*:\s*(author|creator|description|title|site_name|published_time|modified_time|image\S*)\s*",
    )
    .expect("META_PROPERTY regex")
});

/// Matches `<meta name>` values carrying article metadata.
pub static META_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^\s*(?:(dc|dcterm|article|og|twitter|weibo:(article|webpage))\s*[\.:]\s*)?(author|creator|description|title|site_name|published_time|modified_time|image)\s*$",
    )
    .expect("META_NAME regex")
});

/// Matches a square favicon size declaration such as `32x32`.
pub static FAVICON_SIZE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d+)x(\d+)").expect("FAVICON_SIZE regex"));

/// Schema.org article types accepted for JSON-LD extraction.
pub static JSONLD_ARTICLE_TYPES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^Article|AdvertiserContentArticle|NewsArticle|AnalysisNewsArticle|AskPublicNewsArticle|BackgroundNewsArticle|OpinionNewsArticle|ReportageNewsArticle|ReviewNewsArticle|Report|SatiricalArticle|ScholarlyArticle|MedicalScholarlyArticle|SocialMediaPosting|BlogPosting|LiveBlogPosting|DiscussionForumPosting|TechArticle|APIReference$",
    )
    .expect("JSONLD_ARTICLE_TYPES regex")
});

/// CDATA markers wrapped around JSON-LD payloads.
pub static CDATA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*<!\[CDATA\[|\]\]>\s*$").expect("CDATA regex"));

/// The schema.org context URL.
pub static SCHEMA_ORG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^https?://schema\.org/?$").expect("SCHEMA_ORG regex"));

// =============================================================================
// Images
// =============================================================================

/// Matches srcset-shaped values hiding in non-standard attributes.
pub static LAZY_IMAGE_SRCSET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\.(jpg|jpeg|png|webp)\s+\d").expect("LAZY_IMAGE_SRCSET regex"));

/// Matches single-URL image values hiding in non-standard attributes.
pub static LAZY_IMAGE_SRC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*\S+\.(jpg|jpeg|png|webp)\S*\s*$").expect("LAZY_IMAGE_SRC regex")
});

/// Matches common raster image extensions anywhere in a value.
pub static IMG_EXTENSIONS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\.(jpg|jpeg|png|webp)").expect("IMG_EXTENSIONS regex"));

/// Splits a `srcset` attribute into URL/descriptor/separator triples.
pub static SRCSET_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\S+)(\s+[\d.]+[xw])?(\s*(?:,|$))").expect("SRCSET_URL regex")
});

/// Matches base64 data URIs and captures the MIME type.
pub static B64_DATA_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^data:\s*([^\s;,]+)\s*;\s*base64\s*,").expect("B64_DATA_URL regex")
});

// =============================================================================
// Predicates
// =============================================================================

/// Whether a class/id combination marks an unlikely candidate.
#[inline]
#[must_use]
pub fn is_unlikely_candidate(match_string: &str) -> bool {
    UNLIKELY_CANDIDATES.is_match(match_string)
}

/// Whether a class/id combination rescues a node from the unlikely set.
#[inline]
#[must_use]
pub fn maybe_is_candidate(match_string: &str) -> bool {
    MAYBE_CANDIDATE.is_match(match_string)
}

/// Whether a class/id combination looks like a byline.
#[inline]
#[must_use]
pub fn is_byline(match_string: &str) -> bool {
    BYLINE.is_match(match_string)
}

/// Whether a class or id carries the positive content vocabulary.
#[inline]
#[must_use]
pub fn is_positive_class(s: &str) -> bool {
    POSITIVE_CLASS.is_match(s)
}

/// Whether a class or id carries the negative boilerplate vocabulary.
#[inline]
#[must_use]
pub fn is_negative_class(s: &str) -> bool {
    NEGATIVE_CLASS.is_match(s)
}

/// Whether a class/id combination marks a share widget.
#[inline]
#[must_use]
pub fn is_share_element(match_string: &str) -> bool {
    SHARE_ELEMENTS.is_match(match_string)
}

/// Whether a URL points at an allowed video host.
#[inline]
#[must_use]
pub fn is_video_host(s: &str) -> bool {
    VIDEOS.is_match(s)
}

/// Comma characters across the script variants readability recognises.
const COMMAS: [char; 9] = [
    '\u{002C}', '\u{060C}', '\u{FE50}', '\u{FE10}', '\u{FE11}', '\u{2E41}', '\u{2E34}',
    '\u{2E32}', '\u{FF0C}',
];

/// Counts comma characters, covering nine script variants.
#[must_use]
pub fn count_commas(text: &str) -> usize {
    text.chars().filter(|c| COMMAS.contains(c)).count()
}

/// Replaces any run of two or more whitespace characters with one space.
#[must_use]
pub fn normalize_spaces(text: &str) -> String {
    NORMALIZE_SPACES.replace_all(text, " ").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unlikely_candidates_vocabulary() {
        assert!(is_unlikely_candidate("site-sidebar"));
        assert!(is_unlikely_candidate("comment-section"));
        assert!(is_unlikely_candidate("ad-break banner"));
        assert!(is_unlikely_candidate("DISQUS_thread"));
        assert!(!is_unlikely_candidate("article-text"));
        assert!(!is_unlikely_candidate(""));
    }

    #[test]
    fn maybe_candidate_rescues_content_names() {
        assert!(maybe_is_candidate("main-column"));
        assert!(maybe_is_candidate("article-body"));
        assert!(!maybe_is_candidate("promo"));
    }

    #[test]
    fn byline_vocabulary() {
        assert!(is_byline("post-byline"));
        assert!(is_byline("writtenby"));
        assert!(is_byline("p-author h-card"));
        assert!(!is_byline("content"));
    }

    #[test]
    fn class_weight_vocabularies() {
        assert!(is_positive_class("entry-content"));
        assert!(is_positive_class("blog-post"));
        assert!(is_negative_class("footer-widgets"));
        assert!(is_negative_class("com-box"));
        // "hid" only matches as a standalone token
        assert!(is_negative_class("hid"));
        assert!(is_negative_class("box hid"));
        assert!(!is_negative_class("hidalgo"));
    }

    #[test]
    fn share_elements_require_word_boundary() {
        assert!(is_share_element("share"));
        assert!(is_share_element("social_share_box"));
        assert!(is_share_element("sharedaddy"));
        assert!(!is_share_element("shareholder"));
    }

    #[test]
    fn video_hosts() {
        assert!(is_video_host("https://www.youtube.com/embed/x"));
        assert!(is_video_host("//player.vimeo.com/video/1"));
        assert!(is_video_host("https://archive.org/embed/x"));
        assert!(is_video_host("https://player.twitch.tv/?channel=x"));
        assert!(!is_video_host("https://example.com/video"));
    }

    #[test]
    fn comma_counting_covers_script_variants() {
        assert_eq!(count_commas("a,b,c"), 2);
        assert_eq!(count_commas("один، два، три"), 2);
        assert_eq!(count_commas("一，二，三"), 2);
        assert_eq!(count_commas("no commas here"), 0);
        assert_eq!(count_commas(""), 0);
    }

    #[test]
    fn normalize_spaces_collapses_runs() {
        assert_eq!(normalize_spaces("a  b\t\nc"), "a b c");
        assert_eq!(normalize_spaces("already normal"), "already normal");
    }

    #[test]
    fn srcset_splitter_captures_descriptors() {
        let caps: Vec<_> = SRCSET_URL
            .captures_iter("a.jpg 1x, b.jpg 2x")
            .map(|c| c.get(1).unwrap().as_str().to_string())
            .collect();
        assert_eq!(caps, vec!["a.jpg", "b.jpg"]);
    }

    #[test]
    fn b64_data_url_captures_mime() {
        let caps = B64_DATA_URL
            .captures("data:image/gif;base64,R0lGOD")
            .unwrap();
        assert_eq!(&caps[1], "image/gif");
        assert!(!B64_DATA_URL.is_match("https://example.com/x.gif"));
    }

    #[test]
    fn jsonld_article_types() {
        assert!(JSONLD_ARTICLE_TYPES.is_match("NewsArticle"));
        assert!(JSONLD_ARTICLE_TYPES.is_match("BlogPosting"));
        assert!(!JSONLD_ARTICLE_TYPES.is_match("WebSite"));
    }
}
