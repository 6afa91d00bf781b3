//! Note submission form.

use serde::Deserialize;
use validator::Validate;

use super::slug::is_valid_slug;
use crate::error::FieldErrors;

/// Maximum title length in characters.
pub const MAX_TITLE_LENGTH: usize = 100;

/// Suffix of the message bound to `slug` when the slug is taken.
pub const SLUG_TAKEN_WARNING: &str = " - такой slug уже существует, придумайте уникальное значение!";

/// Slugs that would shadow fixed note routes.
const RESERVED_SLUGS: &[&str] = &["add", "done"];

/// Message bound to `slug` for characters outside `[-a-zA-Z0-9_]`.
pub const INVALID_SLUG: &str =
    "Enter a valid “slug” consisting of letters, numbers, underscores or hyphens.";

/// Field error for a slug already used by another note.
pub fn slug_taken(slug: &str) -> FieldErrors {
    FieldErrors::single("slug", format!("{slug}{SLUG_TAKEN_WARNING}"))
}

/// Field error for a slug that collides with a fixed route.
pub fn slug_reserved(slug: &str) -> Option<FieldErrors> {
    RESERVED_SLUGS.contains(&slug).then(|| {
        FieldErrors::single(
            "slug",
            format!("{slug} - зарезервированное значение, придумайте другое!"),
        )
    })
}

/// Note add/edit form.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct NoteForm {
    /// Title, required.
    #[serde(default)]
    #[validate(length(min = 1, message = "This field is required."))]
    pub title: String,
    /// Body text, required.
    #[serde(default)]
    #[validate(length(min = 1, message = "This field is required."))]
    pub text: String,
    /// Explicit slug; empty means derive from the title.
    #[serde(default)]
    pub slug: Option<String>,
}

/// Validated note fields, with the slug not yet resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteDraft {
    /// Title.
    pub title: String,
    /// Body text.
    pub text: String,
    /// Explicit slug, if one was given.
    pub slug: Option<String>,
}

impl NoteForm {
    /// Create a form with the given values.
    pub fn new(title: impl Into<String>, text: impl Into<String>, slug: Option<&str>) -> Self {
        Self {
            title: title.into(),
            text: text.into(),
            slug: slug.map(str::to_string),
        }
    }

    /// Validate field shapes. Slug uniqueness is checked by the service.
    pub fn clean(&self, slug_max_length: usize) -> Result<NoteDraft, FieldErrors> {
        let mut errors = FieldErrors::from_form(self);

        let title_len = self.title.chars().count();
        if title_len > MAX_TITLE_LENGTH {
            errors.add(
                "title",
                format!(
                    "Ensure this value has at most {MAX_TITLE_LENGTH} characters (it has {title_len})."
                ),
            );
        }

        let slug = self
            .slug
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());
        if let Some(slug) = slug {
            let slug_len = slug.chars().count();
            if slug_len > slug_max_length {
                errors.add(
                    "slug",
                    format!(
                        "Ensure this value has at most {slug_max_length} characters (it has {slug_len})."
                    ),
                );
            }
            if !is_valid_slug(slug) {
                errors.add("slug", INVALID_SLUG);
            }
        }

        errors.into_result()?;

        Ok(NoteDraft {
            title: self.title.clone(),
            text: self.text.clone(),
            slug: slug.map(str::to_string),
        })
    }
}
