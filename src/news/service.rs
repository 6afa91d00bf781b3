//! News service.
//!
//! Public news listing and detail pages, plus comment submission with the
//! banned-word filter and author-only comment edit and delete.

use tracing::info;

use super::comment_repository::CommentRepository;
use super::filter::BannedWordFilter;
use super::form::CommentForm;
use super::repository::NewsRepository;
use super::types::{Comment, CommentWithAuthor, NewComment, News, NewsSummary};
use crate::auth::{authorize, Operation};
use crate::db::Database;
use crate::{NoteboardError, Result};

/// Default number of news items on one page.
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Pagination parameters.
#[derive(Debug, Clone, Copy, Default)]
pub struct Pagination {
    /// Number of items to skip.
    pub offset: i64,
    /// Maximum number of items to return.
    pub limit: i64,
}

impl Pagination {
    /// Create pagination for a 1-based page number. Page 0 is treated as 1.
    pub fn page(number: u32, limit: i64) -> Self {
        let index = i64::from(number.max(1) - 1);
        Self {
            offset: index * limit,
            limit,
        }
    }
}

/// Result of a paginated query.
#[derive(Debug, Clone)]
pub struct PaginatedResult<T> {
    /// The items in this page.
    pub items: Vec<T>,
    /// Total number of items (across all pages).
    pub total: i64,
    /// Current offset.
    pub offset: i64,
    /// Limit used for this query.
    pub limit: i64,
}

impl<T> PaginatedResult<T> {
    /// Check if there are more items after this page.
    pub fn has_more(&self) -> bool {
        self.offset + (self.items.len() as i64) < self.total
    }
}

/// A news item with its comment thread.
#[derive(Debug, Clone)]
pub struct NewsDetail {
    pub news: News,
    /// Comments, oldest first.
    pub comments: Vec<CommentWithAuthor>,
}

/// Service for news and comment operations.
pub struct NewsService<'a> {
    db: &'a Database,
    filter: &'a BannedWordFilter,
    page_size: i64,
}

impl<'a> NewsService<'a> {
    /// Create a new NewsService that checks comments against `filter`.
    pub fn new(db: &'a Database, filter: &'a BannedWordFilter) -> Self {
        Self {
            db,
            filter,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Set the number of news items per page.
    pub fn with_page_size(mut self, page_size: i64) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// List one page of news, newest first.
    ///
    /// Page numbers start at 1. A page past the end is empty.
    pub async fn home_page(&self, page: u32) -> Result<PaginatedResult<NewsSummary>> {
        let pagination = Pagination::page(page, self.page_size);
        let repo = NewsRepository::new(self.db.pool());

        let items = repo
            .list_paginated(pagination.offset, pagination.limit)
            .await?;
        let total = repo.count().await?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }

    /// Get a news item with its comment thread.
    pub async fn detail(&self, news_id: i64) -> Result<NewsDetail> {
        let news = NewsRepository::new(self.db.pool())
            .get_by_id(news_id)
            .await?
            .ok_or_else(|| NoteboardError::NotFound("news".to_string()))?;

        let comments = CommentRepository::new(self.db.pool())
            .list_by_news(news_id)
            .await?;

        Ok(NewsDetail { news, comments })
    }

    /// Post a comment on a news item.
    ///
    /// Anonymous callers get `LoginRequired` and nothing is stored. Text
    /// containing a banned word is rejected with the filter warning.
    pub async fn create_comment(
        &self,
        caller: Option<i64>,
        news_id: i64,
        form: &CommentForm,
    ) -> Result<Comment> {
        let author_id = caller.ok_or(NoteboardError::LoginRequired)?;

        let exists = NewsRepository::new(self.db.pool())
            .get_by_id(news_id)
            .await?
            .is_some();
        if !exists {
            return Err(NoteboardError::NotFound("news".to_string()));
        }

        let text = form.clean(self.filter)?;
        let comment = CommentRepository::new(self.db.pool())
            .create(&NewComment::new(news_id, author_id, text))
            .await?;

        info!(comment_id = comment.id, news_id, author_id, "Comment created");
        Ok(comment)
    }

    /// Fetch a comment for an operation by `caller`.
    ///
    /// Missing comments and comments of other users both yield `NotFound`.
    pub async fn get_owned_comment(
        &self,
        caller: Option<i64>,
        comment_id: i64,
        operation: Operation,
    ) -> Result<Comment> {
        if caller.is_none() {
            return Err(NoteboardError::LoginRequired);
        }

        let comment = CommentRepository::new(self.db.pool())
            .get_by_id(comment_id)
            .await?
            .ok_or_else(|| NoteboardError::NotFound("comment".to_string()))?;

        authorize(caller, comment.author_id, operation)
            .map_err(|e| e.for_resource("comment"))?;
        Ok(comment)
    }

    /// Replace the text of the caller's comment.
    ///
    /// Only the text changes; author, news item and creation time are kept.
    pub async fn update_comment(
        &self,
        caller: Option<i64>,
        comment_id: i64,
        form: &CommentForm,
    ) -> Result<Comment> {
        let comment = self
            .get_owned_comment(caller, comment_id, Operation::Edit)
            .await?;

        let text = form.clean(self.filter)?;
        let updated = CommentRepository::new(self.db.pool())
            .update_text(comment.id, &text)
            .await?
            .ok_or_else(|| NoteboardError::NotFound("comment".to_string()))?;

        info!(comment_id = updated.id, news_id = updated.news_id, "Comment updated");
        Ok(updated)
    }

    /// Delete the caller's comment.
    ///
    /// Returns the deleted comment.
    pub async fn delete_comment(&self, caller: Option<i64>, comment_id: i64) -> Result<Comment> {
        let comment = self
            .get_owned_comment(caller, comment_id, Operation::Delete)
            .await?;

        let deleted = CommentRepository::new(self.db.pool())
            .delete(comment.id)
            .await?;
        if !deleted {
            return Err(NoteboardError::NotFound("comment".to_string()));
        }

        info!(comment_id = comment.id, news_id = comment.news_id, "Comment deleted");
        Ok(comment)
    }
}
