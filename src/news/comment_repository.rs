//! Comment repository.
//!
//! Threads are read in creation order; comments created in the same instant
//! keep their insertion order.

use super::types::{Comment, CommentWithAuthor, NewComment};
use crate::db::DbPool;
use crate::{NoteboardError, Result};

/// Repository for comments on news items.
pub struct CommentRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> CommentRepository<'a> {
    /// Create a new CommentRepository with the given database pool reference.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Create a new comment.
    pub async fn create(&self, new_comment: &NewComment) -> Result<Comment> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO comments (news_id, author_id, text, created) VALUES (?, ?, ?, ?) RETURNING id",
        )
        .bind(new_comment.news_id)
        .bind(new_comment.author_id)
        .bind(&new_comment.text)
        .bind(new_comment.created)
        .fetch_one(self.pool)
        .await
        .map_err(|e| NoteboardError::Database(e.to_string()))?;

        self.get_by_id(id)
            .await?
            .ok_or_else(|| NoteboardError::NotFound("comment".to_string()))
    }

    /// Insert many comments in one transaction.
    ///
    /// Returns the new IDs in input order.
    pub async fn bulk_create(&self, comments: &[NewComment]) -> Result<Vec<i64>> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| NoteboardError::Database(e.to_string()))?;

        let mut ids = Vec::with_capacity(comments.len());
        for comment in comments {
            let id: i64 = sqlx::query_scalar(
                "INSERT INTO comments (news_id, author_id, text, created) VALUES (?, ?, ?, ?) RETURNING id",
            )
            .bind(comment.news_id)
            .bind(comment.author_id)
            .bind(&comment.text)
            .bind(comment.created)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| NoteboardError::Database(e.to_string()))?;
            ids.push(id);
        }

        tx.commit()
            .await
            .map_err(|e| NoteboardError::Database(e.to_string()))?;
        Ok(ids)
    }

    /// Get a comment by ID.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<Comment>> {
        let comment = sqlx::query_as::<_, Comment>(
            "SELECT id, news_id, author_id, text, created FROM comments WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| NoteboardError::Database(e.to_string()))?;

        Ok(comment)
    }

    /// List the thread of a news item, oldest first.
    pub async fn list_by_news(&self, news_id: i64) -> Result<Vec<CommentWithAuthor>> {
        let comments = sqlx::query_as::<_, CommentWithAuthor>(
            "SELECT c.id, c.news_id, c.author_id, u.username AS author_username,
                    c.text, c.created
             FROM comments c
             JOIN users u ON u.id = c.author_id
             WHERE c.news_id = ?
             ORDER BY c.created ASC, c.id ASC",
        )
        .bind(news_id)
        .fetch_all(self.pool)
        .await
        .map_err(|e| NoteboardError::Database(e.to_string()))?;

        Ok(comments)
    }

    /// Replace the text of a comment.
    ///
    /// Returns the updated comment, or None if not found.
    pub async fn update_text(&self, id: i64, text: &str) -> Result<Option<Comment>> {
        let result = sqlx::query("UPDATE comments SET text = ? WHERE id = ?")
            .bind(text)
            .bind(id)
            .execute(self.pool)
            .await
            .map_err(|e| NoteboardError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.get_by_id(id).await
    }

    /// Delete a comment by ID.
    ///
    /// Returns true if a comment was deleted, false if not found.
    pub async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM comments WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await
            .map_err(|e| NoteboardError::Database(e.to_string()))?;
        Ok(result.rows_affected() > 0)
    }

    /// Count all comments.
    pub async fn count(&self) -> Result<i64> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM comments")
            .fetch_one(self.pool)
            .await
            .map_err(|e| NoteboardError::Database(e.to_string()))?;
        Ok(count.0)
    }
}
