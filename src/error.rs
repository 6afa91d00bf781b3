//! Error types for noteboard.

use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

/// Field-bound validation messages, keyed by form field name.
///
/// This is what a rejected form submission carries back to the caller:
/// every field that failed, with one or more human-readable messages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    /// Create an empty error set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an error set with a single message on one field.
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    /// Add a message to a field.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    /// Merge another error set into this one.
    pub fn extend(&mut self, other: FieldErrors) {
        for (field, messages) in other.0 {
            self.0.entry(field).or_default().extend(messages);
        }
    }

    /// Messages recorded for a field.
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    /// Check whether no field failed.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Turn the set into `Ok(())` when empty, or `Err(self)` otherwise.
    pub fn into_result(self) -> std::result::Result<(), FieldErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }

    /// Iterate over `(field, messages)` pairs in field order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<String>)> {
        self.0.iter()
    }

    /// Consume the set into its underlying map.
    pub fn into_inner(self) -> BTreeMap<String, Vec<String>> {
        self.0
    }

    /// Run the declarative `validator` rules of a form and collect failures.
    pub fn from_form<T: validator::Validate>(form: &T) -> Self {
        match form.validate() {
            Ok(()) => Self::new(),
            Err(errors) => errors.into(),
        }
    }
}

impl From<validator::ValidationErrors> for FieldErrors {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields = Self::new();
        for (field, field_errors) in errors.field_errors() {
            for error in field_errors {
                let message = error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Invalid value for {field}"));
                fields.add(field.to_string(), message);
            }
        }
        fields
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            for message in messages {
                if !first {
                    f.write_str("; ")?;
                }
                write!(f, "{field}: {message}")?;
                first = false;
            }
        }
        Ok(())
    }
}

/// Common error type for noteboard.
#[derive(Error, Debug)]
pub enum NoteboardError {
    /// Database error.
    ///
    /// Database errors from sqlx are automatically converted.
    #[error("database error: {0}")]
    Database(String),

    /// Database connection error.
    #[error("database connection error: {0}")]
    DatabaseConnection(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Authentication error (bad credentials, disabled account).
    #[error("authentication error: {0}")]
    Auth(String),

    /// Validation error for a single piece of input.
    #[error("validation error: {0}")]
    Validation(String),

    /// Form submission rejected with field-bound messages.
    #[error("form rejected: {0}")]
    Form(FieldErrors),

    /// Resource not found, or hidden from the caller.
    #[error("{0} not found")]
    NotFound(String),

    /// The operation needs an authenticated caller.
    #[error("login required")]
    LoginRequired,

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<sqlx::Error> for NoteboardError {
    fn from(e: sqlx::Error) -> Self {
        NoteboardError::Database(e.to_string())
    }
}

impl From<FieldErrors> for NoteboardError {
    fn from(errors: FieldErrors) -> Self {
        NoteboardError::Form(errors)
    }
}

/// Result type alias for noteboard operations.
pub type Result<T> = std::result::Result<T, NoteboardError>;

/// Check whether a sqlx error is a UNIQUE constraint violation.
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.is_unique_violation())
}
