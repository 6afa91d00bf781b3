//! Comment submission form.

use serde::Deserialize;
use validator::Validate;

use super::filter::BannedWordFilter;
use crate::error::FieldErrors;

/// Comment add/edit form.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CommentForm {
    #[serde(default)]
    #[validate(length(min = 1, message = "This field is required."))]
    pub text: String,
}

impl CommentForm {
    /// Create a form with the given text.
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Validate the text and run it through the banned-word filter.
    ///
    /// Returns the accepted text.
    pub fn clean(&self, filter: &BannedWordFilter) -> Result<String, FieldErrors> {
        FieldErrors::from_form(self).into_result()?;
        filter.check(&self.text)?;
        Ok(self.text.clone())
    }
}
