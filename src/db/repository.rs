//! User repository for noteboard.

use sqlx::QueryBuilder;

use super::user::{NewUser, Role, User, UserUpdate};
use super::DbPool;
use crate::{NoteboardError, Result};

const USER_COLUMNS: &str = "id, username, password, email, role, created_at, last_login, is_active";

/// Repository for user CRUD operations.
pub struct UserRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new UserRepository with the given database pool reference.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Create a new user in the database.
    ///
    /// Returns the created user with the assigned ID.
    pub async fn create(&self, new_user: &NewUser) -> Result<User> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO users (username, password, email, role)
             VALUES (?, ?, ?, ?) RETURNING id",
        )
        .bind(&new_user.username)
        .bind(&new_user.password)
        .bind(&new_user.email)
        .bind(new_user.role.as_str())
        .fetch_one(self.pool)
        .await
        .map_err(|e| NoteboardError::Database(e.to_string()))?;

        self.get_by_id(id)
            .await?
            .ok_or_else(|| NoteboardError::NotFound("user".to_string()))
    }

    /// Get a user by ID.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<User>> {
        let result: Option<UserRow> =
            sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"))
                .bind(id)
                .fetch_optional(self.pool)
                .await
                .map_err(|e| NoteboardError::Database(e.to_string()))?;

        Ok(result.map(UserRow::into_user))
    }

    /// Get a user by username (case-insensitive).
    pub async fn get_by_username(&self, username: &str) -> Result<Option<User>> {
        let result: Option<UserRow> = sqlx::query_as(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = ? COLLATE NOCASE"
        ))
        .bind(username)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| NoteboardError::Database(e.to_string()))?;

        Ok(result.map(UserRow::into_user))
    }

    /// Update a user by ID.
    ///
    /// Only fields that are set in the update will be modified.
    /// Returns the updated user, or None if not found.
    pub async fn update(&self, id: i64, update: &UserUpdate) -> Result<Option<User>> {
        if update.is_empty() {
            return self.get_by_id(id).await;
        }

        let mut query: QueryBuilder<sqlx::Sqlite> = QueryBuilder::new("UPDATE users SET ");
        let mut separated = query.separated(", ");

        if let Some(role) = update.role {
            separated.push("role = ");
            separated.push_bind_unseparated(role.as_str());
        }
        if let Some(is_active) = update.is_active {
            separated.push("is_active = ");
            separated.push_bind_unseparated(is_active);
        }

        query.push(" WHERE id = ");
        query.push_bind(id);

        let result = query
            .build()
            .execute(self.pool)
            .await
            .map_err(|e| NoteboardError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.get_by_id(id).await
    }

    /// Update the last login timestamp for a user.
    pub async fn update_last_login(&self, id: i64) -> Result<()> {
        sqlx::query("UPDATE users SET last_login = datetime('now') WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await
            .map_err(|e| NoteboardError::Database(e.to_string()))?;
        Ok(())
    }

    /// Count all users.
    pub async fn count(&self) -> Result<i64> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(self.pool)
            .await
            .map_err(|e| NoteboardError::Database(e.to_string()))?;
        Ok(count.0)
    }

    /// Check if a username is already taken (case-insensitive).
    pub async fn username_exists(&self, username: &str) -> Result<bool> {
        let exists: (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM users WHERE username = ? COLLATE NOCASE)")
                .bind(username)
                .fetch_one(self.pool)
                .await
                .map_err(|e| NoteboardError::Database(e.to_string()))?;
        Ok(exists.0)
    }
}

/// Internal struct for mapping database rows to User.
#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    username: String,
    password: String,
    email: Option<String>,
    role: String,
    created_at: String,
    last_login: Option<String>,
    is_active: bool,
}

impl UserRow {
    fn into_user(self) -> User {
        User {
            id: self.id,
            username: self.username,
            password: self.password,
            email: self.email,
            role: self.role.parse().unwrap_or(Role::Member),
            created_at: self.created_at,
            last_login: self.last_login,
            is_active: self.is_active,
        }
    }
}
