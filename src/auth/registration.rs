//! Account registration.

use thiserror::Error;
use tracing::info;

use crate::auth::validation::{validate_registration, ValidationError};
use crate::auth::{hash_password, PasswordError};
use crate::config::AdminConfig;
use crate::db::{NewUser, Role, User, UserRepository, UserUpdate};
use crate::error::FieldErrors;
use crate::{NoteboardError, Result};

/// Message bound to `username` when the name is taken.
pub const USERNAME_TAKEN: &str = "A user with that username already exists.";

/// Registration-specific errors.
#[derive(Error, Debug)]
pub enum RegistrationError {
    /// Validation failed.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Username already exists.
    #[error("username already exists")]
    UsernameExists,

    /// Password hashing failed.
    #[error("password error: {0}")]
    Password(#[from] PasswordError),

    /// Database error.
    #[error("database error: {0}")]
    Database(String),
}

impl From<RegistrationError> for NoteboardError {
    fn from(err: RegistrationError) -> Self {
        match err {
            RegistrationError::Validation(e) => FieldErrors::single(e.field(), e.to_string()).into(),
            RegistrationError::UsernameExists => {
                FieldErrors::single("username", USERNAME_TAKEN).into()
            }
            RegistrationError::Password(e) => NoteboardError::Auth(e.to_string()),
            RegistrationError::Database(msg) => NoteboardError::Database(msg),
        }
    }
}

/// Registration request data.
#[derive(Debug, Clone)]
pub struct RegistrationRequest {
    /// Desired username (4-16 alphanumeric + underscore).
    pub username: String,
    /// Password (8-128 characters).
    pub password: String,
    /// Optional email address.
    pub email: Option<String>,
}

impl RegistrationRequest {
    /// Create a new registration request.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            email: None,
        }
    }

    /// Set the email address.
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}

/// Register a new member.
///
/// Validates the request, checks that the username is free, hashes the
/// password and creates the account.
pub async fn register(
    repo: &UserRepository<'_>,
    request: RegistrationRequest,
) -> std::result::Result<User, RegistrationError> {
    register_with_role(repo, request, Role::Member).await
}

/// Register a new user with a specific role.
///
/// Used for provisioning administrators.
pub async fn register_with_role(
    repo: &UserRepository<'_>,
    request: RegistrationRequest,
    role: Role,
) -> std::result::Result<User, RegistrationError> {
    let email = request.email.as_deref().filter(|e| !e.is_empty());
    validate_registration(&request.username, &request.password, email)?;

    if repo
        .username_exists(&request.username)
        .await
        .map_err(|e| RegistrationError::Database(e.to_string()))?
    {
        return Err(RegistrationError::UsernameExists);
    }

    let password_hash = hash_password(&request.password)?;

    let mut new_user = NewUser::new(&request.username, password_hash).with_role(role);
    if let Some(email) = email {
        new_user = new_user.with_email(email);
    }

    let user = repo.create(&new_user).await.map_err(|e| match e {
        NoteboardError::Database(msg) if msg.contains("UNIQUE") => RegistrationError::UsernameExists,
        other => RegistrationError::Database(other.to_string()),
    })?;

    info!(
        username = %user.username,
        user_id = user.id,
        role = %user.role,
        "New user registered"
    );

    Ok(user)
}

/// Make sure the administrator named in `[admin]` exists.
///
/// A missing account is registered with the admin role. An existing member
/// or deactivated account is promoted and reactivated, keeping its password.
/// Returns `None` when no administrator is configured.
pub async fn ensure_admin(
    repo: &UserRepository<'_>,
    config: &AdminConfig,
) -> Result<Option<User>> {
    if !config.is_enabled() {
        return Ok(None);
    }
    let username = config.username.trim();

    let Some(user) = repo.get_by_username(username).await? else {
        if config.password.is_empty() {
            return Err(NoteboardError::Config(format!(
                "admin.password is required to create administrator {username}"
            )));
        }
        let request = RegistrationRequest::new(username, config.password.as_str());
        let user = register_with_role(repo, request, Role::Admin)
            .await
            .map_err(|e| NoteboardError::Config(format!("cannot create administrator: {e}")))?;
        return Ok(Some(user));
    };

    if user.is_admin() && user.is_active {
        return Ok(Some(user));
    }

    let update = UserUpdate::new().role(Role::Admin).is_active(true);
    let promoted = repo
        .update(user.id, &update)
        .await?
        .ok_or_else(|| NoteboardError::NotFound("user".to_string()))?;

    info!(username = %promoted.username, user_id = promoted.id, "Administrator promoted");
    Ok(Some(promoted))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Database;

    #[tokio::test]
    async fn test_register_member() {
        let db = Database::open_in_memory().await.unwrap();
        let repo = UserRepository::new(db.pool());

        let request = RegistrationRequest::new("author", "password123").with_email("a@example.com");
        let user = register(&repo, request).await.unwrap();

        assert_eq!(user.username, "author");
        assert_eq!(user.role, Role::Member);
        assert_eq!(user.email, Some("a@example.com".to_string()));
        assert!(user.password.starts_with("$argon2id$"));
    }

    #[tokio::test]
    async fn test_register_duplicate_username() {
        let db = Database::open_in_memory().await.unwrap();
        let repo = UserRepository::new(db.pool());
        repo.create(&NewUser::new("author", "hash")).await.unwrap();

        let result = register(&repo, RegistrationRequest::new("Author", "password123")).await;
        assert!(matches!(result, Err(RegistrationError::UsernameExists)));
    }

    #[tokio::test]
    async fn test_register_invalid_input() {
        let db = Database::open_in_memory().await.unwrap();
        let repo = UserRepository::new(db.pool());

        let result = register(&repo, RegistrationRequest::new("ab", "password123")).await;
        assert!(matches!(
            result,
            Err(RegistrationError::Validation(ValidationError::UsernameTooShort))
        ));
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_register_empty_email_is_ignored() {
        let db = Database::open_in_memory().await.unwrap();
        let repo = UserRepository::new(db.pool());

        let request = RegistrationRequest::new("author", "password123").with_email("");
        let user = register(&repo, request).await.unwrap();
        assert!(user.email.is_none());
    }

    fn admin_config(username: &str, password: &str) -> AdminConfig {
        AdminConfig {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_ensure_admin_disabled() {
        let db = Database::open_in_memory().await.unwrap();
        let repo = UserRepository::new(db.pool());

        assert!(ensure_admin(&repo, &AdminConfig::default())
            .await
            .unwrap()
            .is_none());
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_ensure_admin_creates_account() {
        let db = Database::open_in_memory().await.unwrap();
        let repo = UserRepository::new(db.pool());

        let admin = ensure_admin(&repo, &admin_config("siteadmin", "bootstrap-pass"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(admin.role, Role::Admin);
        assert!(crate::auth::verify_password("bootstrap-pass", &admin.password).is_ok());

        // A second start leaves the account alone.
        let again = ensure_admin(&repo, &admin_config("siteadmin", "other-password"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(again.id, admin.id);
        assert_eq!(again.password, admin.password);
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_ensure_admin_promotes_member() {
        let db = Database::open_in_memory().await.unwrap();
        let repo = UserRepository::new(db.pool());
        let member = register(&repo, RegistrationRequest::new("editor", "password123"))
            .await
            .unwrap();
        repo.update(member.id, &UserUpdate::new().is_active(false))
            .await
            .unwrap();

        let admin = ensure_admin(&repo, &admin_config("Editor", ""))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(admin.id, member.id);
        assert_eq!(admin.role, Role::Admin);
        assert!(admin.is_active);
        assert_eq!(admin.password, member.password);
    }

    #[tokio::test]
    async fn test_ensure_admin_needs_password_to_create() {
        let db = Database::open_in_memory().await.unwrap();
        let repo = UserRepository::new(db.pool());

        let result = ensure_admin(&repo, &admin_config("siteadmin", "")).await;
        assert!(matches!(result, Err(NoteboardError::Config(_))));

        // Reserved names are refused like at sign-up.
        let result = ensure_admin(&repo, &admin_config("admin", "bootstrap-pass")).await;
        assert!(matches!(result, Err(NoteboardError::Config(_))));
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[test]
    fn test_registration_error_becomes_field_error() {
        let err: NoteboardError = RegistrationError::UsernameExists.into();
        match err {
            NoteboardError::Form(fields) => {
                assert_eq!(fields.get("username").unwrap(), [USERNAME_TAKEN]);
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let err: NoteboardError =
            RegistrationError::Validation(ValidationError::PasswordTooShort).into();
        match err {
            NoteboardError::Form(fields) => assert!(fields.get("password1").is_some()),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
