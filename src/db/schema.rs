//! Database schema and migrations for noteboard.
//!
//! Migrations are applied sequentially when the database is first opened or
//! upgraded.

/// Database migrations.
///
/// Each migration is a SQL script that will be executed in order.
/// The schema_version table tracks which migrations have been applied.
pub const MIGRATIONS: &[&str] = &[
    // v1: users
    r#"
CREATE TABLE users (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    username    TEXT NOT NULL UNIQUE COLLATE NOCASE,
    password    TEXT NOT NULL,           -- Argon2 hash
    email       TEXT,
    role        TEXT NOT NULL DEFAULT 'member',  -- 'member', 'admin'
    created_at  TEXT NOT NULL DEFAULT (datetime('now')),
    last_login  TEXT,
    is_active   INTEGER NOT NULL DEFAULT 1
);

CREATE INDEX idx_users_role ON users(role);
"#,
    // v2: news and comments
    r#"
CREATE TABLE news (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    title       TEXT NOT NULL,
    text        TEXT NOT NULL,
    date        TEXT NOT NULL DEFAULT (date('now'))
);

CREATE INDEX idx_news_date ON news(date);

CREATE TABLE comments (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    news_id     INTEGER NOT NULL REFERENCES news(id) ON DELETE CASCADE,
    author_id   INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    text        TEXT NOT NULL,
    created     TEXT NOT NULL
);

CREATE INDEX idx_comments_news_created ON comments(news_id, created);
CREATE INDEX idx_comments_author_id ON comments(author_id);
"#,
    // v3: notes
    r#"
CREATE TABLE notes (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    title       TEXT NOT NULL,
    text        TEXT NOT NULL,
    slug        TEXT NOT NULL UNIQUE,
    author_id   INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE
);

CREATE INDEX idx_notes_author_id ON notes(author_id);
"#,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_migration_contains_users_table() {
        let first = MIGRATIONS[0];
        assert!(first.contains("CREATE TABLE users"));
        assert!(first.contains("COLLATE NOCASE"));
        assert!(first.contains("password"));
    }

    #[test]
    fn test_migrations_are_valid_sql() {
        for migration in MIGRATIONS {
            assert!(!migration.trim().is_empty());
            assert!(migration.contains("CREATE TABLE") || migration.contains("ALTER TABLE"));
        }
    }

    #[test]
    fn test_comments_cascade_with_news() {
        let news_migration = MIGRATIONS[1];
        assert!(news_migration.contains("CREATE TABLE news"));
        assert!(news_migration.contains("CREATE TABLE comments"));
        assert!(news_migration.contains("REFERENCES news(id) ON DELETE CASCADE"));
    }

    #[test]
    fn test_notes_slug_unique() {
        let notes_migration = MIGRATIONS[2];
        assert!(notes_migration.contains("CREATE TABLE notes"));
        assert!(notes_migration.contains("slug        TEXT NOT NULL UNIQUE"));
    }
}
