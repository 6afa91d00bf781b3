//! Page and form handlers.

pub mod admin;
pub mod auth;
pub mod news;
pub mod notes;

pub use auth::AppState;
