//! News module for noteboard.
//!
//! Public news with comment threads:
//! - News and comment models and repositories
//! - Paginated home listing, newest first
//! - Comment form with the banned-word filter
//! - Author-only comment edit and delete

mod comment_repository;
mod filter;
mod form;
mod repository;
mod service;
mod types;

pub use comment_repository::CommentRepository;
pub use filter::BannedWordFilter;
pub use form::CommentForm;
pub use repository::NewsRepository;
pub use service::{
    NewsDetail, NewsService, PaginatedResult, Pagination, DEFAULT_PAGE_SIZE,
};
pub use types::{
    Comment, CommentWithAuthor, NewComment, NewNews, News, NewsSummary, MAX_NEWS_TITLE_LENGTH,
};
