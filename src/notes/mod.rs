//! Notes module for noteboard.
//!
//! Private, per-user notes:
//! - Note model and CRUD repository
//! - Slug derivation from titles (Russian transliteration)
//! - Add/edit form validation
//! - Owner-scoped service used by the HTTP handlers

mod form;
mod repository;
mod service;
mod slug;
mod types;

pub use form::{
    slug_taken, NoteDraft, NoteForm, INVALID_SLUG, MAX_TITLE_LENGTH, SLUG_TAKEN_WARNING,
};
pub use repository::NoteRepository;
pub use service::{NoteService, DEFAULT_SLUG_MAX_LENGTH};
pub use slug::{is_valid_slug, slug_from_title, slugify};
pub use types::{NewNote, Note, NoteUpdate};
