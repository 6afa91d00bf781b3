//! News and comment models.

use chrono::{DateTime, NaiveDate, Utc};

/// Maximum news title length in characters.
pub const MAX_NEWS_TITLE_LENGTH: usize = 50;

/// A published news item.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct News {
    /// Unique news ID.
    pub id: i64,
    /// Headline.
    pub title: String,
    /// Article text.
    pub text: String,
    /// Publication date.
    pub date: NaiveDate,
}

/// A news item as shown on the home page, with its comment count.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct NewsSummary {
    pub id: i64,
    pub title: String,
    pub text: String,
    pub date: NaiveDate,
    /// Number of comments in the thread.
    pub comment_count: i64,
}

/// Data for publishing a news item.
#[derive(Debug, Clone)]
pub struct NewNews {
    /// Headline.
    pub title: String,
    /// Article text.
    pub text: String,
    /// Publication date (defaults to today).
    pub date: NaiveDate,
}

impl NewNews {
    /// Create a news item dated today.
    pub fn new(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            text: text.into(),
            date: Utc::now().date_naive(),
        }
    }

    /// Set the publication date.
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = date;
        self
    }
}

/// A comment on a news item.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Comment {
    /// Unique comment ID.
    pub id: i64,
    /// Parent news item.
    pub news_id: i64,
    /// ID of the user who wrote the comment.
    pub author_id: i64,
    /// Comment text.
    pub text: String,
    /// Creation time.
    pub created: DateTime<Utc>,
}

impl Comment {
    /// Check if the comment belongs to the given user.
    pub fn is_owned_by(&self, user_id: i64) -> bool {
        self.author_id == user_id
    }
}

/// A comment joined with its author's username, for thread display.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct CommentWithAuthor {
    pub id: i64,
    pub news_id: i64,
    pub author_id: i64,
    pub author_username: String,
    pub text: String,
    pub created: DateTime<Utc>,
}

/// Data for creating a new comment.
#[derive(Debug, Clone)]
pub struct NewComment {
    /// Parent news item.
    pub news_id: i64,
    /// Author ID.
    pub author_id: i64,
    /// Comment text.
    pub text: String,
    /// Creation time (defaults to now).
    pub created: DateTime<Utc>,
}

impl NewComment {
    /// Create a comment stamped with the current time.
    pub fn new(news_id: i64, author_id: i64, text: impl Into<String>) -> Self {
        Self {
            news_id,
            author_id,
            text: text.into(),
            created: Utc::now(),
        }
    }

    /// Override the creation time.
    pub fn with_created(mut self, created: DateTime<Utc>) -> Self {
        self.created = created;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_news_defaults_to_today() {
        let news = NewNews::new("Title", "Text");
        assert_eq!(news.date, Utc::now().date_naive());

        let date = NaiveDate::from_ymd_opt(2020, 1, 31).unwrap();
        assert_eq!(NewNews::new("Title", "Text").with_date(date).date, date);
    }

    #[test]
    fn test_comment_ownership() {
        let comment = Comment {
            id: 1,
            news_id: 1,
            author_id: 7,
            text: "Text".to_string(),
            created: Utc::now(),
        };
        assert!(comment.is_owned_by(7));
        assert!(!comment.is_owned_by(8));
    }
}
