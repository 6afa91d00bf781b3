//! Response DTOs for the web layer.
//!
//! Pages are rendered as JSON documents: list and detail pages carry the
//! records they show, add and edit pages carry a form description.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::news::{Comment, CommentWithAuthor, News, NewsDetail, NewsSummary};
use crate::notes::Note;

// ============================================================================
// Generic Response Wrappers
// ============================================================================

/// Generic API response wrapper.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a new API response.
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// Paginated response wrapper.
#[derive(Debug, Serialize)]
pub struct PaginatedResponse<T: Serialize> {
    /// Response data.
    pub data: Vec<T>,
    /// Pagination metadata.
    pub meta: PaginationMeta,
}

impl<T: Serialize> PaginatedResponse<T> {
    /// Create a new paginated response.
    pub fn new(data: Vec<T>, page: u32, per_page: u32, total: u64, has_next: bool) -> Self {
        Self {
            data,
            meta: PaginationMeta {
                page,
                per_page,
                total,
                has_next,
            },
        }
    }
}

/// Pagination metadata.
#[derive(Debug, Serialize)]
pub struct PaginationMeta {
    /// Current page number.
    pub page: u32,
    /// Items per page.
    pub per_page: u32,
    /// Total number of items.
    pub total: u64,
    /// Whether a later page has items.
    pub has_next: bool,
}

/// Plain message page (done, logout).
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

// ============================================================================
// Forms
// ============================================================================

/// One field of a form description.
#[derive(Debug, Serialize)]
pub struct FormField {
    /// Field name, as submitted.
    pub name: &'static str,
    /// Whether the field must be filled in.
    pub required: bool,
    /// Initial value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

/// Description of a form a page offers.
#[derive(Debug, Serialize)]
pub struct FormResponse {
    /// Form name.
    pub name: &'static str,
    /// Fields in display order.
    pub fields: Vec<FormField>,
}

impl FormResponse {
    /// Start an empty form description.
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            fields: Vec::new(),
        }
    }

    /// Add a field without an initial value.
    pub fn field(mut self, name: &'static str, required: bool) -> Self {
        self.fields.push(FormField {
            name,
            required,
            value: None,
        });
        self
    }

    /// Add a field with an initial value.
    pub fn field_with_value(
        mut self,
        name: &'static str,
        required: bool,
        value: impl Into<String>,
    ) -> Self {
        self.fields.push(FormField {
            name,
            required,
            value: Some(value.into()),
        });
        self
    }

    /// Note add form.
    pub fn note() -> Self {
        Self::new("note")
            .field("title", true)
            .field("text", true)
            .field("slug", false)
    }

    /// Note edit form, prefilled.
    pub fn note_for(note: &Note) -> Self {
        Self::new("note")
            .field_with_value("title", true, &note.title)
            .field_with_value("text", true, &note.text)
            .field_with_value("slug", false, &note.slug)
    }

    /// Comment add form.
    pub fn comment() -> Self {
        Self::new("comment").field("text", true)
    }

    /// Comment edit form, prefilled.
    pub fn comment_for(comment: &Comment) -> Self {
        Self::new("comment").field_with_value("text", true, &comment.text)
    }

    /// Login form.
    pub fn login() -> Self {
        Self::new("login")
            .field("username", true)
            .field("password", true)
    }

    /// Signup form.
    pub fn signup() -> Self {
        Self::new("signup")
            .field("username", true)
            .field("password1", true)
            .field("password2", true)
            .field("email", false)
    }
}

/// A page whose only content is a form.
#[derive(Debug, Serialize)]
pub struct FormPage {
    pub form: FormResponse,
}

// ============================================================================
// Note DTOs
// ============================================================================

/// Note response.
#[derive(Debug, Serialize)]
pub struct NoteResponse {
    /// Note ID.
    pub id: i64,
    /// Title.
    pub title: String,
    /// Body text.
    pub text: String,
    /// Slug.
    pub slug: String,
    /// Author ID.
    pub author_id: i64,
}

impl From<Note> for NoteResponse {
    fn from(note: Note) -> Self {
        Self {
            id: note.id,
            title: note.title,
            text: note.text,
            slug: note.slug,
            author_id: note.author_id,
        }
    }
}

/// Note edit page.
#[derive(Debug, Serialize)]
pub struct NoteEditPage {
    pub note: NoteResponse,
    pub form: FormResponse,
}

// ============================================================================
// News DTOs
// ============================================================================

/// News item on the home page.
#[derive(Debug, Serialize)]
pub struct NewsListItem {
    /// News ID.
    pub id: i64,
    /// Headline.
    pub title: String,
    /// Article text.
    pub text: String,
    /// Publication date.
    pub date: NaiveDate,
    /// Number of comments.
    pub comment_count: i64,
}

impl From<NewsSummary> for NewsListItem {
    fn from(item: NewsSummary) -> Self {
        Self {
            id: item.id,
            title: item.title,
            text: item.text,
            date: item.date,
            comment_count: item.comment_count,
        }
    }
}

/// News item response.
#[derive(Debug, Serialize)]
pub struct NewsResponse {
    pub id: i64,
    pub title: String,
    pub text: String,
    pub date: NaiveDate,
}

impl From<News> for NewsResponse {
    fn from(news: News) -> Self {
        Self {
            id: news.id,
            title: news.title,
            text: news.text,
            date: news.date,
        }
    }
}

/// Comment author information.
#[derive(Debug, Serialize)]
pub struct AuthorInfo {
    /// User ID.
    pub id: i64,
    /// Username.
    pub username: String,
}

/// Comment in a news thread.
#[derive(Debug, Serialize)]
pub struct CommentResponse {
    /// Comment ID.
    pub id: i64,
    /// Parent news ID.
    pub news_id: i64,
    /// Author info.
    pub author: AuthorInfo,
    /// Comment text.
    pub text: String,
    /// Creation timestamp.
    pub created: DateTime<Utc>,
}

impl From<CommentWithAuthor> for CommentResponse {
    fn from(comment: CommentWithAuthor) -> Self {
        Self {
            id: comment.id,
            news_id: comment.news_id,
            author: AuthorInfo {
                id: comment.author_id,
                username: comment.author_username,
            },
            text: comment.text,
            created: comment.created,
        }
    }
}

/// A comment addressed on its own (edit and delete pages).
#[derive(Debug, Serialize)]
pub struct CommentItem {
    pub id: i64,
    pub news_id: i64,
    pub author_id: i64,
    pub text: String,
    pub created: DateTime<Utc>,
}

impl From<Comment> for CommentItem {
    fn from(comment: Comment) -> Self {
        Self {
            id: comment.id,
            news_id: comment.news_id,
            author_id: comment.author_id,
            text: comment.text,
            created: comment.created,
        }
    }
}

/// Comment edit page.
#[derive(Debug, Serialize)]
pub struct CommentEditPage {
    pub comment: CommentItem,
    pub form: FormResponse,
}

/// News detail page.
#[derive(Debug, Serialize)]
pub struct NewsDetailPage {
    /// The news item.
    pub news: NewsResponse,
    /// Comments, oldest first.
    pub comments: Vec<CommentResponse>,
    /// Comment form, only for authenticated callers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub form: Option<FormResponse>,
}

impl NewsDetailPage {
    /// Build the page, including the comment form when `with_form` is set.
    pub fn new(detail: NewsDetail, with_form: bool) -> Self {
        Self {
            news: detail.news.into(),
            comments: detail.comments.into_iter().map(Into::into).collect(),
            form: with_form.then(FormResponse::comment),
        }
    }
}

/// IDs of published news items.
#[derive(Debug, Serialize)]
pub struct PublishedResponse {
    pub ids: Vec<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_form_description() {
        let json = serde_json::to_value(FormResponse::note()).unwrap();
        assert_eq!(json["name"], "note");
        assert_eq!(json["fields"][0]["name"], "title");
        assert_eq!(json["fields"][2]["required"], false);
        assert!(json["fields"][0].get("value").is_none());
    }

    #[test]
    fn test_prefilled_note_form() {
        let note = Note {
            id: 1,
            title: "Title".to_string(),
            text: "Text".to_string(),
            slug: "slug".to_string(),
            author_id: 2,
        };
        let json = serde_json::to_value(FormResponse::note_for(&note)).unwrap();
        assert_eq!(json["fields"][2]["value"], "slug");
    }

    #[test]
    fn test_detail_page_form_only_when_requested() {
        let detail = NewsDetail {
            news: News {
                id: 1,
                title: "T".to_string(),
                text: "x".to_string(),
                date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            },
            comments: Vec::new(),
        };

        let json = serde_json::to_value(NewsDetailPage::new(detail.clone(), false)).unwrap();
        assert!(json.get("form").is_none());
        assert_eq!(json["news"]["date"], "2024-01-01");

        let json = serde_json::to_value(NewsDetailPage::new(detail, true)).unwrap();
        assert_eq!(json["form"]["name"], "comment");
    }

    #[test]
    fn test_paginated_response() {
        let page = PaginatedResponse::new(vec![1, 2], 1, 10, 2, false);
        let json = serde_json::to_value(page).unwrap();
        assert_eq!(json["meta"]["per_page"], 10);
        assert_eq!(json["meta"]["has_next"], false);
        assert_eq!(json["data"].as_array().unwrap().len(), 2);
    }
}
