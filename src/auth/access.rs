//! Ownership checks for author-owned content.
//!
//! Notes and comments are visible and mutable only to their author. Any
//! other authenticated caller is told the resource does not exist, and roles
//! grant no override: an administrator addressing someone else's note gets
//! the same answer as a regular member.

use std::fmt;

use thiserror::Error;

use crate::NoteboardError;

/// Operation a caller attempts on an owned resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Read the resource.
    View,
    /// Change the resource.
    Edit,
    /// Remove the resource.
    Delete,
}

impl Operation {
    /// Lowercase name used in log fields.
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::View => "view",
            Operation::Edit => "edit",
            Operation::Delete => "delete",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Access denial.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessError {
    /// The caller is anonymous.
    #[error("login required")]
    LoginRequired,

    /// The caller is not the owner; the resource is reported missing.
    #[error("not found")]
    NotFound,
}

impl AccessError {
    /// Convert into the crate error for a resource of kind `resource`.
    ///
    /// A hidden foreign resource reports the same `NotFound` as a missing
    /// one, so callers must pass the kind they use for missing rows.
    pub fn for_resource(self, resource: &str) -> NoteboardError {
        match self {
            AccessError::LoginRequired => NoteboardError::LoginRequired,
            AccessError::NotFound => NoteboardError::NotFound(resource.to_string()),
        }
    }
}

/// Decide whether `caller` may perform `operation` on a resource owned by
/// `owner_id`.
///
/// # Examples
///
/// ```
/// use noteboard::auth::access::{authorize, AccessError, Operation};
///
/// assert_eq!(authorize(None, 1, Operation::View), Err(AccessError::LoginRequired));
/// assert_eq!(authorize(Some(2), 1, Operation::Edit), Err(AccessError::NotFound));
/// assert!(authorize(Some(1), 1, Operation::Delete).is_ok());
/// ```
pub fn authorize(
    caller: Option<i64>,
    owner_id: i64,
    operation: Operation,
) -> Result<(), AccessError> {
    let caller = caller.ok_or(AccessError::LoginRequired)?;

    if caller != owner_id {
        tracing::debug!(
            caller,
            owner_id,
            operation = %operation,
            "Access to foreign resource hidden"
        );
        return Err(AccessError::NotFound);
    }

    Ok(())
}
