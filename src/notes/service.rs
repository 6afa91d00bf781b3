//! Note service.
//!
//! Owner-scoped note operations: listing, creation with slug resolution, and
//! author-only view, edit and delete.

use tracing::info;

use super::form::{slug_reserved, slug_taken, NoteDraft, NoteForm};
use super::repository::NoteRepository;
use super::slug::slug_from_title;
use super::types::{NewNote, Note, NoteUpdate};
use crate::auth::{authorize, Operation};
use crate::db::Database;
use crate::error::FieldErrors;
use crate::{NoteboardError, Result};

/// Default maximum slug length.
pub const DEFAULT_SLUG_MAX_LENGTH: usize = 100;

/// Service for note operations with ownership checks.
pub struct NoteService<'a> {
    db: &'a Database,
    slug_max_length: usize,
}

impl<'a> NoteService<'a> {
    /// Create a new NoteService with the given database reference.
    pub fn new(db: &'a Database) -> Self {
        Self {
            db,
            slug_max_length: DEFAULT_SLUG_MAX_LENGTH,
        }
    }

    /// Set the maximum slug length.
    pub fn with_slug_max_length(mut self, slug_max_length: usize) -> Self {
        self.slug_max_length = slug_max_length;
        self
    }

    /// List the caller's own notes.
    pub async fn list(&self, caller: i64) -> Result<Vec<Note>> {
        NoteRepository::new(self.db.pool())
            .list_by_author(caller)
            .await
    }

    /// Create a note owned by `author_id`.
    ///
    /// An empty slug is derived from the title. A slug already used by
    /// another note is rejected and nothing is stored.
    pub async fn create(&self, author_id: i64, form: &NoteForm) -> Result<Note> {
        let draft = form.clean(self.slug_max_length)?;
        let slug = self.resolve_slug(&draft, None).await?;

        let new_note = NewNote::new(draft.title, draft.text, slug, author_id);
        let note = NoteRepository::new(self.db.pool())
            .create(&new_note)
            .await?;

        info!(note_id = note.id, author_id, slug = %note.slug, "Note created");
        Ok(note)
    }

    /// Fetch a note by slug for an operation by `caller`.
    ///
    /// Anonymous callers get `LoginRequired` whether or not the slug exists.
    /// Missing notes and notes of other users both yield `NotFound`.
    pub async fn get_owned(
        &self,
        caller: Option<i64>,
        slug: &str,
        operation: Operation,
    ) -> Result<Note> {
        if caller.is_none() {
            return Err(NoteboardError::LoginRequired);
        }

        let note = NoteRepository::new(self.db.pool())
            .get_by_slug(slug)
            .await?
            .ok_or_else(|| NoteboardError::NotFound("note".to_string()))?;

        authorize(caller, note.author_id, operation)
            .map_err(|e| e.for_resource("note"))?;
        Ok(note)
    }

    /// Replace the title, text and slug of the caller's note.
    pub async fn update(&self, caller: Option<i64>, slug: &str, form: &NoteForm) -> Result<Note> {
        let note = self.get_owned(caller, slug, Operation::Edit).await?;

        let draft = form.clean(self.slug_max_length)?;
        let new_slug = self.resolve_slug(&draft, Some(note.id)).await?;

        let update = NoteUpdate::new()
            .title(draft.title)
            .text(draft.text)
            .slug(new_slug);

        let updated = NoteRepository::new(self.db.pool())
            .update(note.id, &update)
            .await?
            .ok_or_else(|| NoteboardError::NotFound("note".to_string()))?;

        info!(note_id = updated.id, slug = %updated.slug, "Note updated");
        Ok(updated)
    }

    /// Delete the caller's note.
    pub async fn delete(&self, caller: Option<i64>, slug: &str) -> Result<()> {
        let note = self.get_owned(caller, slug, Operation::Delete).await?;

        let deleted = NoteRepository::new(self.db.pool()).delete(note.id).await?;
        if !deleted {
            return Err(NoteboardError::NotFound("note".to_string()));
        }

        info!(note_id = note.id, slug = %note.slug, "Note deleted");
        Ok(())
    }

    /// Pick the slug for a draft and check it is free.
    ///
    /// `exclude_id` is the note being edited, whose current slug may be kept.
    async fn resolve_slug(&self, draft: &NoteDraft, exclude_id: Option<i64>) -> Result<String> {
        let slug = match &draft.slug {
            Some(slug) => slug.clone(),
            None => slug_from_title(&draft.title, self.slug_max_length),
        };

        if slug.is_empty() {
            return Err(FieldErrors::single(
                "slug",
                "Could not derive a slug from the title, enter one explicitly.",
            )
            .into());
        }
        if let Some(errors) = slug_reserved(&slug) {
            return Err(errors.into());
        }

        let taken = NoteRepository::new(self.db.pool())
            .slug_exists(&slug, exclude_id)
            .await?;
        if taken {
            return Err(slug_taken(&slug).into());
        }

        Ok(slug)
    }
}
