//! Input validation for account registration.
//!
//! This module provides validation functions for usernames, passwords and
//! email addresses.

use thiserror::Error;

use super::password::{MAX_PASSWORD_LENGTH, MIN_PASSWORD_LENGTH};

/// Minimum username length.
pub const MIN_USERNAME_LENGTH: usize = 4;

/// Maximum username length.
pub const MAX_USERNAME_LENGTH: usize = 16;

/// Maximum email length.
pub const MAX_EMAIL_LENGTH: usize = 254;

/// Validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Username is too short.
    #[error("username must be at least {MIN_USERNAME_LENGTH} characters")]
    UsernameTooShort,

    /// Username is too long.
    #[error("username must be at most {MAX_USERNAME_LENGTH} characters")]
    UsernameTooLong,

    /// Username contains invalid characters.
    #[error("username can only contain alphanumeric characters and underscores")]
    UsernameInvalidChars,

    /// Username is reserved.
    #[error("this username is reserved")]
    UsernameReserved,

    /// Password is too short.
    #[error("password must be at least {MIN_PASSWORD_LENGTH} characters")]
    PasswordTooShort,

    /// Password is too long.
    #[error("password must be at most {MAX_PASSWORD_LENGTH} characters")]
    PasswordTooLong,

    /// Password is the same as username.
    #[error("password cannot be the same as username")]
    PasswordSameAsUsername,

    /// Email is too long.
    #[error("email must be at most {MAX_EMAIL_LENGTH} characters")]
    EmailTooLong,

    /// Email format is invalid.
    #[error("invalid email format")]
    EmailInvalidFormat,
}

impl ValidationError {
    /// Name of the form field the error is bound to.
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::UsernameTooShort
            | ValidationError::UsernameTooLong
            | ValidationError::UsernameInvalidChars
            | ValidationError::UsernameReserved => "username",
            ValidationError::PasswordTooShort
            | ValidationError::PasswordTooLong
            | ValidationError::PasswordSameAsUsername => "password1",
            ValidationError::EmailTooLong | ValidationError::EmailInvalidFormat => "email",
        }
    }
}

/// Reserved usernames that cannot be registered.
const RESERVED_USERNAMES: &[&str] = &[
    "admin",
    "administrator",
    "root",
    "system",
    "anonymous",
    "moderator",
    "support",
    "null",
    "undefined",
    "noteboard",
];

/// Check if a username is reserved.
pub fn is_reserved_username(username: &str) -> bool {
    let lower = username.to_lowercase();
    RESERVED_USERNAMES.iter().any(|&r| r == lower)
}

/// Validate a username.
///
/// Requirements:
/// - Length: 4-16 characters
/// - Characters: alphanumeric (a-z, A-Z, 0-9) and underscore (_)
/// - Not a reserved username
///
/// # Examples
///
/// ```
/// use noteboard::auth::validation::validate_username;
///
/// assert!(validate_username("john_doe").is_ok());
/// assert!(validate_username("ab").is_err()); // too short
/// assert!(validate_username("admin").is_err()); // reserved
/// ```
pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    let length = username.chars().count();
    if length < MIN_USERNAME_LENGTH {
        return Err(ValidationError::UsernameTooShort);
    }
    if length > MAX_USERNAME_LENGTH {
        return Err(ValidationError::UsernameTooLong);
    }

    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        return Err(ValidationError::UsernameInvalidChars);
    }

    if is_reserved_username(username) {
        return Err(ValidationError::UsernameReserved);
    }

    Ok(())
}

/// Validate a password chosen at registration.
///
/// Requirements:
/// - Length: 8-128 characters
/// - Must not be the same as the username (if provided)
pub fn validate_registration_password(
    password: &str,
    username: Option<&str>,
) -> Result<(), ValidationError> {
    let length = password.chars().count();
    if length < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::PasswordTooShort);
    }
    if length > MAX_PASSWORD_LENGTH {
        return Err(ValidationError::PasswordTooLong);
    }

    if let Some(user) = username {
        if password.eq_ignore_ascii_case(user) {
            return Err(ValidationError::PasswordSameAsUsername);
        }
    }

    Ok(())
}

/// Validate an email address (optional field).
///
/// Empty input is accepted. Otherwise a single `@` with a dotted domain is
/// required.
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if email.is_empty() {
        return Ok(());
    }

    if email.len() > MAX_EMAIL_LENGTH {
        return Err(ValidationError::EmailTooLong);
    }

    let (local, domain) = email
        .split_once('@')
        .ok_or(ValidationError::EmailInvalidFormat)?;

    if local.is_empty()
        || domain.contains('@')
        || !domain.contains('.')
        || domain.starts_with('.')
        || domain.ends_with('.')
    {
        return Err(ValidationError::EmailInvalidFormat);
    }

    Ok(())
}

/// Validate every registration field, stopping at the first error.
pub fn validate_registration(
    username: &str,
    password: &str,
    email: Option<&str>,
) -> Result<(), ValidationError> {
    validate_username(username)?;
    validate_registration_password(password, Some(username))?;
    if let Some(email) = email {
        validate_email(email)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_username_valid() {
        assert!(validate_username("john").is_ok());
        assert!(validate_username("john_doe").is_ok());
        assert!(validate_username("User123").is_ok());
        assert!(validate_username("a".repeat(16).as_str()).is_ok());
    }

    #[test]
    fn test_validate_username_length() {
        assert_eq!(validate_username("abc"), Err(ValidationError::UsernameTooShort));
        assert_eq!(
            validate_username(&"a".repeat(17)),
            Err(ValidationError::UsernameTooLong)
        );
    }

    #[test]
    fn test_validate_username_invalid_chars() {
        assert_eq!(
            validate_username("john doe"),
            Err(ValidationError::UsernameInvalidChars)
        );
        assert_eq!(
            validate_username("john-doe"),
            Err(ValidationError::UsernameInvalidChars)
        );
        assert_eq!(
            validate_username("иван_петров"),
            Err(ValidationError::UsernameInvalidChars)
        );
        assert_eq!(
            validate_username("иван"),
            Err(ValidationError::UsernameInvalidChars)
        );
    }

    #[test]
    fn test_lengths_count_characters() {
        // Eight Cyrillic letters are sixteen bytes.
        assert_eq!(
            validate_username("петрович"),
            Err(ValidationError::UsernameInvalidChars)
        );
        assert_eq!(
            validate_registration_password("пароль1", None),
            Err(ValidationError::PasswordTooShort)
        );
        assert!(validate_registration_password("пароль12", None).is_ok());
    }

    #[test]
    fn test_validate_username_reserved() {
        assert_eq!(validate_username("admin"), Err(ValidationError::UsernameReserved));
        assert_eq!(validate_username("ROOT"), Err(ValidationError::UsernameReserved));
        assert!(is_reserved_username("NoteBoard"));
        assert!(!is_reserved_username("author"));
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_registration_password("secure_pass123", Some("john")).is_ok());
        assert_eq!(
            validate_registration_password("short", None),
            Err(ValidationError::PasswordTooShort)
        );
        assert_eq!(
            validate_registration_password(&"a".repeat(129), None),
            Err(ValidationError::PasswordTooLong)
        );
        assert_eq!(
            validate_registration_password("JohnDoe123", Some("johndoe123")),
            Err(ValidationError::PasswordSameAsUsername)
        );
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("").is_ok());
        assert!(validate_email("user@example.com").is_ok());
        assert_eq!(validate_email("invalid"), Err(ValidationError::EmailInvalidFormat));
        assert_eq!(validate_email("@example.com"), Err(ValidationError::EmailInvalidFormat));
        assert_eq!(validate_email("user@localhost"), Err(ValidationError::EmailInvalidFormat));
        assert_eq!(validate_email("a@b@c.com"), Err(ValidationError::EmailInvalidFormat));

        let long = format!("{}@example.com", "a".repeat(250));
        assert_eq!(validate_email(&long), Err(ValidationError::EmailTooLong));
    }

    #[test]
    fn test_validate_registration_fails_on_first_error() {
        assert!(validate_registration("author", "password123", None).is_ok());
        assert_eq!(
            validate_registration("ab", "short", Some("bad")),
            Err(ValidationError::UsernameTooShort)
        );
        assert_eq!(
            validate_registration("author", "password123", Some("bad")),
            Err(ValidationError::EmailInvalidFormat)
        );
    }

    #[test]
    fn test_error_field_binding() {
        assert_eq!(ValidationError::UsernameReserved.field(), "username");
        assert_eq!(ValidationError::PasswordTooShort.field(), "password1");
        assert_eq!(ValidationError::EmailInvalidFormat.field(), "email");
    }
}
