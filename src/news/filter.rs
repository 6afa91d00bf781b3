//! Banned-word filter for comment text.

use tracing::debug;

use crate::config::CommentsConfig;
use crate::error::FieldErrors;

/// Substring blocklist applied to submitted comment text.
#[derive(Debug, Clone)]
pub struct BannedWordFilter {
    words: Vec<String>,
    warning: String,
    ignore_case: bool,
}

impl Default for BannedWordFilter {
    fn default() -> Self {
        Self::from_config(&CommentsConfig::default())
    }
}

impl BannedWordFilter {
    /// Create a filter. Empty words are ignored.
    pub fn new(words: Vec<String>, warning: impl Into<String>, ignore_case: bool) -> Self {
        let words = words
            .into_iter()
            .filter(|w| !w.is_empty())
            .map(|w| if ignore_case { w.to_lowercase() } else { w })
            .collect();
        Self {
            words,
            warning: warning.into(),
            ignore_case,
        }
    }

    /// Build the filter from the `[comments]` configuration section.
    pub fn from_config(config: &CommentsConfig) -> Self {
        Self::new(
            config.banned_words.clone(),
            config.warning.clone(),
            config.ignore_case,
        )
    }

    /// The warning reported on a match.
    pub fn warning(&self) -> &str {
        &self.warning
    }

    /// Find the first banned word contained in `text`.
    pub fn find(&self, text: &str) -> Option<&str> {
        let haystack = if self.ignore_case {
            text.to_lowercase()
        } else {
            text.to_string()
        };
        self.words
            .iter()
            .find(|word| haystack.contains(word.as_str()))
            .map(String::as_str)
    }

    /// Reject `text` with the warning on the `text` field if it contains a
    /// banned word.
    pub fn check(&self, text: &str) -> Result<(), FieldErrors> {
        match self.find(text) {
            Some(word) => {
                debug!(word, "Comment rejected by banned-word filter");
                Err(FieldErrors::single("text", self.warning.clone()))
            }
            None => Ok(()),
        }
    }
}
