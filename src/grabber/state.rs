//! Extraction state tracking.
//!
//! Per-invocation bookkeeping for the grabber: the retry flags, the
//! identity-keyed score table, data-table marks, and the attempts saved
//! across retries.

use std::collections::{HashMap, HashSet};

use regex::Regex;

use crate::dom::NodeId;
use crate::options::Options;
use crate::patterns;

/// Behavioural flags of the grabber.
///
/// All start set; the retry loop clears one per attempt, in declaration
/// order, until extraction yields enough text.
#[derive(Debug, Clone, Copy)]
pub struct Flags {
    /// Drop nodes whose class/id matches the unlikely-candidate set.
    pub strip_unlikelys: bool,
    /// Weigh class/id vocabularies into content scores.
    pub use_weight_classes: bool,
    /// Run the conditional cleaning pass over tables, lists and divs.
    pub clean_conditionally: bool,
}

impl Flags {
    /// All flags set, the state of the first attempt.
    #[must_use]
    pub fn new() -> Self {
        Self {
            strip_unlikelys: true,
            use_weight_classes: true,
            clean_conditionally: true,
        }
    }

    /// Clear the next flag in retry order. Returns `false` when every
    /// flag was already cleared, meaning the retry loop is exhausted.
    pub fn relax(&mut self) -> bool {
        if self.strip_unlikelys {
            self.strip_unlikelys = false;
        } else if self.use_weight_classes {
            self.use_weight_classes = false;
        } else if self.clean_conditionally {
            self.clean_conditionally = false;
        } else {
            return false;
        }
        true
    }
}

impl Default for Flags {
    fn default() -> Self {
        Self::new()
    }
}

/// A saved extraction attempt.
#[derive(Debug)]
pub struct Attempt {
    /// Serialized article container of the attempt.
    pub html: String,
    /// Character count of the attempt's inner text.
    pub text_length: usize,
}

/// Per-invocation grabber state.
///
/// The score table and data-table marks are keyed by node identity and
/// reset for every attempt (each attempt works on a fresh clone). The
/// flags, harvested byline, and language persist across attempts.
pub struct GrabContext<'a> {
    /// Extraction options.
    pub options: &'a Options,
    /// Behavioural flags for the current attempt.
    pub flags: Flags,
    /// Content score per element, live for one attempt.
    pub scores: HashMap<NodeId, f64>,
    /// Elements marked as data tables, live for one attempt.
    pub data_tables: HashSet<NodeId>,
    /// The computed article title, for the duplicate-heading check.
    pub article_title: String,
    /// Byline harvested from a byline node, kept across attempts.
    pub byline: Option<String>,
    /// Language from `<html lang>`.
    pub lang: Option<String>,
    /// Text direction from `<html dir>`.
    pub dir: Option<String>,
}

impl<'a> GrabContext<'a> {
    /// Fresh state for a `grab_article` invocation.
    #[must_use]
    pub fn new(options: &'a Options, article_title: &str) -> Self {
        Self {
            options,
            flags: Flags::new(),
            scores: HashMap::new(),
            data_tables: HashSet::new(),
            article_title: article_title.to_string(),
            byline: None,
            lang: None,
            dir: None,
        }
    }

    /// Reset the per-attempt tables before working on a fresh clone.
    pub fn reset_attempt(&mut self) {
        self.scores.clear();
        self.data_tables.clear();
    }

    /// The embed allow pattern: the caller's override or the built-in
    /// host list.
    #[must_use]
    pub fn video_filter(&self) -> &Regex {
        self.options
            .allowed_video_regex
            .as_ref()
            .unwrap_or(&*patterns::VIDEOS)
    }

    /// Emit a decision trace when debugging is enabled.
    pub fn log(&self, message: &str) {
        if self.options.debug {
            eprintln!("readability: {message}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_relax_in_fixed_order() {
        let mut flags = Flags::new();
        assert!(flags.strip_unlikelys && flags.use_weight_classes && flags.clean_conditionally);

        assert!(flags.relax());
        assert!(!flags.strip_unlikelys && flags.use_weight_classes);

        assert!(flags.relax());
        assert!(!flags.use_weight_classes && flags.clean_conditionally);

        assert!(flags.relax());
        assert!(!flags.clean_conditionally);

        assert!(!flags.relax());
    }

    #[test]
    fn context_reset_clears_tables_but_keeps_byline() {
        use crate::dom;

        let options = Options::default();
        let mut ctx = GrabContext::new(&options, "Title");

        let doc = dom::parse("<p>x</p>");
        let node = doc.select("p").nodes().first().cloned().unwrap();
        ctx.scores.insert(node.id, 4.0);
        ctx.data_tables.insert(node.id);
        ctx.byline = Some("A. Writer".to_string());

        ctx.reset_attempt();
        assert!(ctx.scores.is_empty());
        assert!(ctx.data_tables.is_empty());
        assert_eq!(ctx.byline.as_deref(), Some("A. Writer"));
    }

    #[test]
    fn video_filter_prefers_override() {
        let options = Options {
            allowed_video_regex: Some(Regex::new(r"myhost\.example").unwrap()),
            ..Options::default()
        };
        let ctx = GrabContext::new(&options, "");
        assert!(ctx.video_filter().is_match("https://myhost.example/v/1"));
        assert!(!ctx.video_filter().is_match("https://www.youtube.com/embed/x"));
    }
}
