//! noteboard - private notes and public news with comment threads.
//!
//! Two small sites behind one HTTP server: a notes area where every user
//! sees only their own notes, and a news feed anyone can read but only
//! logged-in users can comment on.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod news;
pub mod notes;
pub mod web;

pub use auth::{
    authorize, hash_password, register, register_with_role, validate_password, verify_password,
    AccessError, LoginForm, Operation, PasswordError, RegistrationError, RegistrationRequest,
    SignupForm,
};
pub use config::Config;
pub use db::{Database, NewUser, Role, User, UserRepository, UserUpdate};
pub use error::{FieldErrors, NoteboardError, Result};
pub use news::{BannedWordFilter, Comment, CommentForm, News, NewsService};
pub use notes::{Note, NoteForm, NoteService};
pub use web::WebServer;
