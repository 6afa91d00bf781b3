//! Configuration module for noteboard.

use serde::Deserialize;
use std::path::Path;

use crate::{NoteboardError, Result};

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port number to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_db_path")]
    pub path: String,
}

fn default_db_path() -> String {
    "data/noteboard.db".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file.
    #[serde(default = "default_log_file")]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "logs/noteboard.log".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

/// Web layer configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct WebConfig {
    /// CORS allowed origins.
    #[serde(default)]
    pub cors_origins: Vec<String>,
    /// Secret used to sign session tokens (must be set).
    #[serde(default)]
    pub jwt_secret: String,
    /// Session token lifetime in seconds.
    #[serde(default = "default_jwt_expiry")]
    pub jwt_expiry_secs: u64,
    /// Rate limit for the login endpoint (requests per minute per client).
    #[serde(default = "default_login_rate_limit")]
    pub login_rate_limit: u32,
    /// Mark the session cookie `Secure` (HTTPS only).
    #[serde(default)]
    pub secure_cookie: bool,
    /// Key the login rate limit on `X-Forwarded-For` / `X-Real-IP`.
    ///
    /// Only enable behind a reverse proxy that overwrites these headers;
    /// otherwise clients can pick their own key.
    #[serde(default)]
    pub trust_proxy_headers: bool,
}

fn default_jwt_expiry() -> u64 {
    14 * 24 * 3600 // two weeks
}

fn default_login_rate_limit() -> u32 {
    5
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            cors_origins: vec![],
            jwt_secret: String::new(),
            jwt_expiry_secs: default_jwt_expiry(),
            login_rate_limit: default_login_rate_limit(),
            secure_cookie: false,
            trust_proxy_headers: false,
        }
    }
}

/// News listing configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct NewsConfig {
    /// Number of news items on one page of the home listing.
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

fn default_page_size() -> u32 {
    10
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
        }
    }
}

/// Comment submission filter configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CommentsConfig {
    /// Substrings that make a comment unacceptable.
    #[serde(default = "default_banned_words")]
    pub banned_words: Vec<String>,
    /// Message bound to the `text` field when a banned word is found.
    #[serde(default = "default_warning")]
    pub warning: String,
    /// Match banned words regardless of letter case.
    #[serde(default)]
    pub ignore_case: bool,
}

fn default_banned_words() -> Vec<String> {
    vec!["редиска".to_string(), "негодяй".to_string()]
}

fn default_warning() -> String {
    "Не ругайтесь!".to_string()
}

impl Default for CommentsConfig {
    fn default() -> Self {
        Self {
            banned_words: default_banned_words(),
            warning: default_warning(),
            ignore_case: false,
        }
    }
}

/// Notes configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct NotesConfig {
    /// Maximum slug length in characters; derived slugs are truncated to it.
    #[serde(default = "default_slug_max_length")]
    pub slug_max_length: usize,
}

fn default_slug_max_length() -> usize {
    100
}

impl Default for NotesConfig {
    fn default() -> Self {
        Self {
            slug_max_length: default_slug_max_length(),
        }
    }
}

/// Administrator account created or promoted at startup.
///
/// Left empty, no account is touched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdminConfig {
    /// Username of the administrator.
    #[serde(default)]
    pub username: String,
    /// Password used only when the account has to be created.
    #[serde(default)]
    pub password: String,
}

impl AdminConfig {
    /// Whether an administrator is configured.
    pub fn is_enabled(&self) -> bool {
        !self.username.trim().is_empty()
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Web layer configuration.
    #[serde(default)]
    pub web: WebConfig,
    /// News listing configuration.
    #[serde(default)]
    pub news: NewsConfig,
    /// Comment filter configuration.
    #[serde(default)]
    pub comments: CommentsConfig,
    /// Notes configuration.
    #[serde(default)]
    pub notes: NotesConfig,
    /// Startup administrator.
    #[serde(default)]
    pub admin: AdminConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(NoteboardError::Io)?;
        Self::parse(&content)
    }

    /// Load configuration from a TOML file and apply environment variable overrides.
    pub fn load_with_env<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| NoteboardError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `NOTEBOARD_JWT_SECRET`: Override the session signing secret
    /// - `NOTEBOARD_ADMIN_PASSWORD`: Override the startup administrator password
    pub fn apply_env_overrides(&mut self) {
        if let Ok(jwt_secret) = std::env::var("NOTEBOARD_JWT_SECRET") {
            if !jwt_secret.is_empty() {
                self.web.jwt_secret = jwt_secret;
            }
        }
        if let Ok(password) = std::env::var("NOTEBOARD_ADMIN_PASSWORD") {
            if !password.is_empty() {
                self.admin.password = password;
            }
        }
    }

    /// Validate the configuration.
    ///
    /// Returns an error if:
    /// - the session signing secret is not set
    /// - the news page size is zero
    pub fn validate(&self) -> Result<()> {
        if self.web.jwt_secret.is_empty() {
            return Err(NoteboardError::Config(
                "jwt_secret is not set. \
                 Set it in config.toml or via NOTEBOARD_JWT_SECRET environment variable."
                    .to_string(),
            ));
        }
        if self.news.page_size == 0 {
            return Err(NoteboardError::Config(
                "news.page_size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8000);

        assert_eq!(config.database.path, "data/noteboard.db");

        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.file, "logs/noteboard.log");

        assert!(config.web.cors_origins.is_empty());
        assert!(config.web.jwt_secret.is_empty());
        assert_eq!(config.web.jwt_expiry_secs, 14 * 24 * 3600);
        assert_eq!(config.web.login_rate_limit, 5);
        assert!(!config.web.secure_cookie);
        assert!(!config.web.trust_proxy_headers);

        assert_eq!(config.news.page_size, 10);

        assert_eq!(config.comments.banned_words, vec!["редиска", "негодяй"]);
        assert_eq!(config.comments.warning, "Не ругайтесь!");
        assert!(!config.comments.ignore_case);

        assert_eq!(config.notes.slug_max_length, 100);

        assert!(!config.admin.is_enabled());
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[server]
host = "127.0.0.1"
port = 8080

[database]
path = "custom/db.sqlite"

[logging]
level = "debug"
file = "custom/logs/app.log"

[web]
cors_origins = ["http://localhost:3000"]
jwt_secret = "test-secret-key"
jwt_expiry_secs = 600
login_rate_limit = 10
secure_cookie = true
trust_proxy_headers = true

[news]
page_size = 20

[comments]
banned_words = ["spam", "scam"]
warning = "No spam"
ignore_case = true

[notes]
slug_max_length = 50

[admin]
username = "siteadmin"
password = "bootstrap-pass"
"#;

        let config = Config::parse(toml).unwrap();

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.database.path, "custom/db.sqlite");
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.file, "custom/logs/app.log");

        assert_eq!(config.web.cors_origins, vec!["http://localhost:3000"]);
        assert_eq!(config.web.jwt_secret, "test-secret-key");
        assert_eq!(config.web.jwt_expiry_secs, 600);
        assert_eq!(config.web.login_rate_limit, 10);
        assert!(config.web.secure_cookie);
        assert!(config.web.trust_proxy_headers);

        assert_eq!(config.news.page_size, 20);

        assert_eq!(config.comments.banned_words, vec!["spam", "scam"]);
        assert_eq!(config.comments.warning, "No spam");
        assert!(config.comments.ignore_case);

        assert_eq!(config.notes.slug_max_length, 50);

        assert!(config.admin.is_enabled());
        assert_eq!(config.admin.username, "siteadmin");
        assert_eq!(config.admin.password, "bootstrap-pass");
    }

    #[test]
    fn test_parse_partial_config() {
        let toml = r#"
[server]
port = 3000

[comments]
warning = "Be nice"
"#;

        let config = Config::parse(toml).unwrap();

        assert_eq!(config.server.port, 3000);
        assert_eq!(config.comments.warning, "Be nice");

        // Defaults fill in the rest, including the untouched banned list
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.comments.banned_words.len(), 2);
        assert_eq!(config.news.page_size, 10);
    }

    #[test]
    fn test_parse_empty_config() {
        let config = Config::parse("").unwrap();

        assert_eq!(config.server.port, 8000);
        assert_eq!(config.database.path, "data/noteboard.db");
    }

    #[test]
    fn test_parse_invalid_config() {
        let result = Config::parse("this is not valid toml [[[");

        if let Err(NoteboardError::Config(msg)) = result {
            assert!(msg.contains("config parse error"));
        } else {
            panic!("Expected Config error");
        }
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = Config::load("nonexistent.toml");
        assert!(matches!(result, Err(NoteboardError::Io(_))));
    }

    #[test]
    fn test_load_with_env_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[web]\njwt_secret = \"from-file\"\n").unwrap();

        let config = Config::load_with_env(&path).unwrap();
        assert!(!config.web.jwt_secret.is_empty());
    }

    #[test]
    fn test_apply_env_overrides_jwt_secret() {
        let original = std::env::var("NOTEBOARD_JWT_SECRET").ok();

        std::env::set_var("NOTEBOARD_JWT_SECRET", "env-secret-key");
        let mut config = Config::default();
        config.apply_env_overrides();
        assert_eq!(config.web.jwt_secret, "env-secret-key");

        std::env::set_var("NOTEBOARD_JWT_SECRET", "");
        let mut config = Config::default();
        config.web.jwt_secret = "original-secret".to_string();
        config.apply_env_overrides();
        // Empty values never override
        assert_eq!(config.web.jwt_secret, "original-secret");

        if let Some(val) = original {
            std::env::set_var("NOTEBOARD_JWT_SECRET", val);
        } else {
            std::env::remove_var("NOTEBOARD_JWT_SECRET");
        }
    }

    #[test]
    fn test_validate_requires_secret() {
        let config = Config::default();
        let result = config.validate();
        if let Err(NoteboardError::Config(msg)) = result {
            assert!(msg.contains("jwt_secret"));
        } else {
            panic!("Expected Config error");
        }
    }

    #[test]
    fn test_validate_rejects_zero_page_size() {
        let mut config = Config::default();
        config.web.jwt_secret = "secret".to_string();
        config.news.page_size = 0;
        assert!(config.validate().is_err());

        config.news.page_size = 10;
        assert!(config.validate().is_ok());
    }
}
