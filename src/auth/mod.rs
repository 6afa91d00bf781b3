//! Authentication module for noteboard.
//!
//! This module provides password hashing, account registration, the
//! sign-up/login forms and the ownership gate applied to notes and comments.

pub mod access;
pub mod forms;
mod password;
mod registration;
pub mod validation;

pub use access::{authorize, AccessError, Operation};
pub use forms::{is_safe_redirect, LoginForm, SignupForm};
pub use password::{
    hash_password, validate_password, verify_dummy_password, verify_password, PasswordError,
};
pub use registration::{
    ensure_admin, register, register_with_role, RegistrationError, RegistrationRequest,
    USERNAME_TAKEN,
};
pub use validation::ValidationError;
