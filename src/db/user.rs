//! User model for noteboard.
//!
//! Users are referenced by notes and comments as their authors, never owned
//! by them.

use std::fmt;
use std::str::FromStr;

/// User role.
///
/// Roles only gate administrative endpoints. They grant no access to
/// content owned by other users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Role {
    /// Regular member.
    #[default]
    Member = 1,
    /// Administrator, may publish news.
    Admin = 2,
}

impl Role {
    /// Convert role to database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Member => "member",
            Role::Admin => "admin",
        }
    }

    /// Check if this role has at least the required permission level.
    ///
    /// # Examples
    ///
    /// ```
    /// use noteboard::db::Role;
    ///
    /// assert!(Role::Admin.can_access(Role::Member));
    /// assert!(Role::Member.can_access(Role::Member));
    /// assert!(!Role::Member.can_access(Role::Admin));
    /// ```
    pub fn can_access(&self, required: Role) -> bool {
        *self >= required
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "member" => Ok(Role::Member),
            "admin" => Ok(Role::Admin),
            _ => Err(format!("unknown role: {s}")),
        }
    }
}

/// User entity representing a registered account.
#[derive(Debug, Clone)]
pub struct User {
    /// Unique user ID.
    pub id: i64,
    /// Login username (unique, case-insensitive).
    pub username: String,
    /// Password hash (Argon2).
    pub password: String,
    /// Email address (optional).
    pub email: Option<String>,
    /// User role.
    pub role: Role,
    /// Account creation timestamp.
    pub created_at: String,
    /// Last login timestamp (optional).
    pub last_login: Option<String>,
    /// Whether the account is active.
    pub is_active: bool,
}

impl User {
    /// Check if this user is an administrator.
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Data for creating a new user.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Login username.
    pub username: String,
    /// Password hash (should be pre-hashed with Argon2).
    pub password: String,
    /// Email address (optional).
    pub email: Option<String>,
    /// User role (defaults to Member).
    pub role: Role,
}

impl NewUser {
    /// Create a new user with the required fields.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            email: None,
            role: Role::Member,
        }
    }

    /// Set the email address.
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Set the role.
    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }
}

/// Account status change applied by an administrator or at startup.
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    /// New role.
    pub role: Option<Role>,
    /// New active status.
    pub is_active: Option<bool>,
}

impl UserUpdate {
    /// Create an empty update.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set new role.
    pub fn role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    /// Set active status.
    pub fn is_active(mut self, is_active: bool) -> Self {
        self.is_active = Some(is_active);
        self
    }

    /// Check if any fields are set.
    pub fn is_empty(&self) -> bool {
        self.role.is_none() && self.is_active.is_none()
    }
}
