//! Tracing subscriber setup.
//!
//! Events go to stdout and are appended to `[logging] file`. `RUST_LOG`
//! directives are layered on top of `[logging] level`, so
//! `RUST_LOG=sqlx=warn` quiets the driver without touching the config.

use std::fs::{self, File};
use std::io;
use std::path::Path;
use std::sync::Arc;

use tracing::level_filters::LevelFilter;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;
use crate::{NoteboardError, Result};

/// Level named in the config; unknown names fall back to `info`.
fn level_filter(level: &str) -> LevelFilter {
    match level.trim().to_ascii_lowercase().as_str() {
        "warning" => LevelFilter::WARN,
        other => other.parse().unwrap_or(LevelFilter::INFO),
    }
}

fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::from_default_env().add_directive(level_filter(level).into())
}

fn open_log_file(path: &Path) -> io::Result<File> {
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    File::options().create(true).append(true).open(path)
}

/// Install the global subscriber writing to stdout and the log file.
///
/// Fails if the log file cannot be opened or a subscriber is already set.
pub fn init(config: &LoggingConfig) -> Result<()> {
    let log_file = Arc::new(open_log_file(Path::new(&config.file))?);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stdout.and(log_file))
                .with_ansi(false)
                .with_target(true),
        )
        .with(env_filter(&config.level))
        .try_init()
        .map_err(|e| NoteboardError::Config(format!("logging: {e}")))
}

/// Stdout-only fallback used when the log file is unusable.
pub fn init_console_only(level: &str) {
    let _ = tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .with(env_filter(level))
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_names() {
        assert_eq!(level_filter("trace"), LevelFilter::TRACE);
        assert_eq!(level_filter("DEBUG"), LevelFilter::DEBUG);
        assert_eq!(level_filter(" Info "), LevelFilter::INFO);
        assert_eq!(level_filter("warning"), LevelFilter::WARN);
        assert_eq!(level_filter("error"), LevelFilter::ERROR);
        assert_eq!(level_filter("off"), LevelFilter::OFF);
    }

    #[test]
    fn test_unknown_level_is_info() {
        assert_eq!(level_filter("verbose"), LevelFilter::INFO);
        assert_eq!(level_filter(""), LevelFilter::INFO);
    }

    #[test]
    fn test_log_file_directory_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs/nested/noteboard.log");

        open_log_file(&path).unwrap();
        assert!(path.exists());
    }
}
