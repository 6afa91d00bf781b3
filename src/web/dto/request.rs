//! Request DTOs for the web layer.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::news::NewNews;

/// `?page=N` on the home page.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    /// 1-based page number.
    #[serde(default)]
    pub page: Option<u32>,
}

/// `?next=/path` on the login page.
#[derive(Debug, Default, Deserialize)]
pub struct NextQuery {
    /// Where to go after a successful login.
    #[serde(default)]
    pub next: Option<String>,
}

/// One news item to publish.
///
/// `Serialize` is required by the `length` check on
/// [`PublishNewsRequest::items`].
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct NewsInput {
    /// Headline.
    #[validate(length(min = 1, max = 50, message = "Title must be 1 to 50 characters"))]
    pub title: String,
    /// Article text.
    #[validate(length(min = 1, message = "This field is required."))]
    pub text: String,
    /// Publication date (defaults to today).
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

impl NewsInput {
    /// Convert into repository input.
    pub fn into_new_news(self) -> NewNews {
        let news = NewNews::new(self.title, self.text);
        match self.date {
            Some(date) => news.with_date(date),
            None => news,
        }
    }
}

/// Bulk publish request for `/admin/news/`.
///
/// Items are validated one by one so errors can name the offending index.
#[derive(Debug, Deserialize, Validate)]
pub struct PublishNewsRequest {
    #[validate(length(min = 1, message = "At least one news item is required"))]
    pub items: Vec<NewsInput>,
}
