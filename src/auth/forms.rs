//! Sign-up and login form submissions.

use serde::Deserialize;
use validator::Validate;

use super::registration::RegistrationRequest;
use crate::error::FieldErrors;

/// Message for a required field left empty.
pub const FIELD_REQUIRED: &str = "This field is required.";

/// Message bound to `password2` when the two passwords differ.
pub const PASSWORD_MISMATCH: &str = "The two password fields didn't match.";

/// Account sign-up form.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct SignupForm {
    /// Desired username.
    #[serde(default)]
    #[validate(length(min = 1, message = "This field is required."))]
    pub username: String,
    /// Password.
    #[serde(default)]
    #[validate(length(min = 1, message = "This field is required."))]
    pub password1: String,
    /// Password confirmation.
    #[serde(default)]
    #[validate(length(min = 1, message = "This field is required."))]
    pub password2: String,
    /// Optional email address.
    #[serde(default)]
    pub email: Option<String>,
}

impl SignupForm {
    /// Validate the submission into a registration request.
    ///
    /// Username rules and password strength are checked by
    /// [`register`](super::register), which binds its failures to the same
    /// field names.
    pub fn clean(&self) -> Result<RegistrationRequest, FieldErrors> {
        let mut errors = FieldErrors::from_form(self);

        if !self.password1.is_empty()
            && !self.password2.is_empty()
            && self.password1 != self.password2
        {
            errors.add("password2", PASSWORD_MISMATCH);
        }
        errors.into_result()?;

        let mut request = RegistrationRequest::new(self.username.trim(), &self.password1);
        if let Some(email) = self.email.as_deref().map(str::trim).filter(|e| !e.is_empty()) {
            request = request.with_email(email);
        }
        Ok(request)
    }
}

/// Login form.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct LoginForm {
    /// Username.
    #[serde(default)]
    #[validate(length(min = 1, message = "This field is required."))]
    pub username: String,
    /// Password.
    #[serde(default)]
    #[validate(length(min = 1, message = "This field is required."))]
    pub password: String,
}

impl LoginForm {
    /// Check that both credentials were supplied.
    pub fn clean(&self) -> Result<(), FieldErrors> {
        FieldErrors::from_form(self).into_result()
    }
}

/// Check that a post-login redirect target stays on this site.
///
/// Only absolute local paths are accepted; scheme-relative (`//host`) and
/// backslash tricks are rejected.
pub fn is_safe_redirect(next: &str) -> bool {
    next.starts_with('/')
        && !next.starts_with("//")
        && !next.starts_with("/\\")
        && !next.chars().any(|c| c.is_control())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signup(username: &str, p1: &str, p2: &str) -> SignupForm {
        SignupForm {
            username: username.to_string(),
            password1: p1.to_string(),
            password2: p2.to_string(),
            email: None,
        }
    }

    #[test]
    fn test_signup_clean_success() {
        let mut form = signup("author", "password123", "password123");
        form.email = Some(" author@example.com ".to_string());

        let request = form.clean().unwrap();
        assert_eq!(request.username, "author");
        assert_eq!(request.password, "password123");
        assert_eq!(request.email, Some("author@example.com".to_string()));
    }

    #[test]
    fn test_signup_requires_fields() {
        let errors = signup("", "", "").clean().unwrap_err();
        assert_eq!(errors.get("username").unwrap(), [FIELD_REQUIRED]);
        assert_eq!(errors.get("password1").unwrap(), [FIELD_REQUIRED]);
        assert_eq!(errors.get("password2").unwrap(), [FIELD_REQUIRED]);
    }

    #[test]
    fn test_signup_password_mismatch() {
        let errors = signup("author", "password123", "password124")
            .clean()
            .unwrap_err();
        assert_eq!(errors.get("password2").unwrap(), [PASSWORD_MISMATCH]);
        assert!(errors.get("username").is_none());
    }

    #[test]
    fn test_login_clean() {
        let form = LoginForm {
            username: "author".to_string(),
            password: String::new(),
        };
        let errors = form.clean().unwrap_err();
        assert_eq!(errors.get("password").unwrap(), [FIELD_REQUIRED]);
    }

    #[test]
    fn test_is_safe_redirect() {
        assert!(is_safe_redirect("/notes/"));
        assert!(is_safe_redirect("/notes/add/?x=1"));
        assert!(!is_safe_redirect("https://evil.example/"));
        assert!(!is_safe_redirect("//evil.example/"));
        assert!(!is_safe_redirect("/\\evil.example"));
        assert!(!is_safe_redirect("notes/"));
        assert!(!is_safe_redirect(""));
    }
}
