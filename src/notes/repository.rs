//! Note repository.
//!
//! CRUD operations for notes. Slug conflicts detected by the UNIQUE
//! constraint surface as the same field error the service reports.

use sqlx::QueryBuilder;

use super::form::slug_taken;
use super::types::{NewNote, Note, NoteUpdate};
use crate::db::DbPool;
use crate::error::is_unique_violation;
use crate::{NoteboardError, Result};

/// Map an insert/update failure, turning slug conflicts into a form error.
fn map_write_error(err: sqlx::Error, slug: &str) -> NoteboardError {
    if is_unique_violation(&err) {
        slug_taken(slug).into()
    } else {
        NoteboardError::Database(err.to_string())
    }
}

/// Repository for note CRUD operations.
pub struct NoteRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> NoteRepository<'a> {
    /// Create a new NoteRepository with the given database pool reference.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Create a new note.
    ///
    /// Returns the created note with the assigned ID.
    pub async fn create(&self, new_note: &NewNote) -> Result<Note> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO notes (title, text, slug, author_id) VALUES (?, ?, ?, ?) RETURNING id",
        )
        .bind(&new_note.title)
        .bind(&new_note.text)
        .bind(&new_note.slug)
        .bind(new_note.author_id)
        .fetch_one(self.pool)
        .await
        .map_err(|e| map_write_error(e, &new_note.slug))?;

        self.get_by_id(id)
            .await?
            .ok_or_else(|| NoteboardError::NotFound("note".to_string()))
    }

    /// Insert many notes at once, all or nothing.
    ///
    /// Slugs are stored as given. Returns the new IDs in input order.
    pub async fn bulk_create(&self, notes: &[NewNote]) -> Result<Vec<i64>> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| NoteboardError::Database(e.to_string()))?;

        let mut ids = Vec::with_capacity(notes.len());
        for note in notes {
            let id: i64 = sqlx::query_scalar(
                "INSERT INTO notes (title, text, slug, author_id) VALUES (?, ?, ?, ?) RETURNING id",
            )
            .bind(&note.title)
            .bind(&note.text)
            .bind(&note.slug)
            .bind(note.author_id)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| map_write_error(e, &note.slug))?;
            ids.push(id);
        }

        tx.commit()
            .await
            .map_err(|e| NoteboardError::Database(e.to_string()))?;
        Ok(ids)
    }

    /// Get a note by ID.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<Note>> {
        let note = sqlx::query_as::<_, Note>(
            "SELECT id, title, text, slug, author_id FROM notes WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| NoteboardError::Database(e.to_string()))?;

        Ok(note)
    }

    /// Get a note by slug.
    pub async fn get_by_slug(&self, slug: &str) -> Result<Option<Note>> {
        let note = sqlx::query_as::<_, Note>(
            "SELECT id, title, text, slug, author_id FROM notes WHERE slug = ?",
        )
        .bind(slug)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| NoteboardError::Database(e.to_string()))?;

        Ok(note)
    }

    /// Update a note by ID.
    ///
    /// Only fields that are set in the update will be modified.
    /// Returns the updated note, or None if not found.
    pub async fn update(&self, id: i64, update: &NoteUpdate) -> Result<Option<Note>> {
        if update.is_empty() {
            return self.get_by_id(id).await;
        }

        let mut query: QueryBuilder<sqlx::Sqlite> = QueryBuilder::new("UPDATE notes SET ");
        let mut separated = query.separated(", ");

        if let Some(ref title) = update.title {
            separated.push("title = ");
            separated.push_bind_unseparated(title);
        }
        if let Some(ref text) = update.text {
            separated.push("text = ");
            separated.push_bind_unseparated(text);
        }
        if let Some(ref slug) = update.slug {
            separated.push("slug = ");
            separated.push_bind_unseparated(slug);
        }

        query.push(" WHERE id = ");
        query.push_bind(id);

        let result = query
            .build()
            .execute(self.pool)
            .await
            .map_err(|e| map_write_error(e, update.slug.as_deref().unwrap_or_default()))?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.get_by_id(id).await
    }

    /// Delete a note by ID.
    ///
    /// Returns true if a note was deleted, false if not found.
    pub async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM notes WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await
            .map_err(|e| NoteboardError::Database(e.to_string()))?;
        Ok(result.rows_affected() > 0)
    }

    /// List the notes of one author, oldest first.
    pub async fn list_by_author(&self, author_id: i64) -> Result<Vec<Note>> {
        let notes = sqlx::query_as::<_, Note>(
            "SELECT id, title, text, slug, author_id FROM notes
             WHERE author_id = ? ORDER BY id",
        )
        .bind(author_id)
        .fetch_all(self.pool)
        .await
        .map_err(|e| NoteboardError::Database(e.to_string()))?;

        Ok(notes)
    }

    /// Count all notes.
    pub async fn count(&self) -> Result<i64> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM notes")
            .fetch_one(self.pool)
            .await
            .map_err(|e| NoteboardError::Database(e.to_string()))?;
        Ok(count.0)
    }

    /// Check if a slug is used by any note other than `exclude_id`.
    pub async fn slug_exists(&self, slug: &str, exclude_id: Option<i64>) -> Result<bool> {
        let exists: (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM notes WHERE slug = ? AND id != COALESCE(?, -1))",
        )
        .bind(slug)
        .bind(exclude_id)
        .fetch_one(self.pool)
        .await
        .map_err(|e| NoteboardError::Database(e.to_string()))?;
        Ok(exists.0)
    }
}
