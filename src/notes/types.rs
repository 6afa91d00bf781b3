//! Note model.

/// A private note, visible only to its author.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Note {
    /// Unique note ID.
    pub id: i64,
    /// Title (at most 100 characters).
    pub title: String,
    /// Body text.
    pub text: String,
    /// Unique URL-safe identifier.
    pub slug: String,
    /// ID of the owning user.
    pub author_id: i64,
}

impl Note {
    /// Check if the note belongs to the given user.
    pub fn is_owned_by(&self, user_id: i64) -> bool {
        self.author_id == user_id
    }
}

/// Data for creating a new note.
#[derive(Debug, Clone)]
pub struct NewNote {
    /// Title.
    pub title: String,
    /// Body text.
    pub text: String,
    /// Slug, already resolved.
    pub slug: String,
    /// ID of the owning user.
    pub author_id: i64,
}

impl NewNote {
    /// Create a new note with all fields.
    pub fn new(
        title: impl Into<String>,
        text: impl Into<String>,
        slug: impl Into<String>,
        author_id: i64,
    ) -> Self {
        Self {
            title: title.into(),
            text: text.into(),
            slug: slug.into(),
            author_id,
        }
    }
}

/// Data for updating an existing note.
///
/// The author never changes.
#[derive(Debug, Clone, Default)]
pub struct NoteUpdate {
    /// New title.
    pub title: Option<String>,
    /// New body text.
    pub text: Option<String>,
    /// New slug.
    pub slug: Option<String>,
}

impl NoteUpdate {
    /// Create an empty update.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set new title.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set new body text.
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Set new slug.
    pub fn slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = Some(slug.into());
        self
    }

    /// Check if any fields are set.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.text.is_none() && self.slug.is_none()
    }
}
