//! Tracing setup.
//!
//! The configured level applies to Droply's own targets and to request
//! traces from `tower_http`. Everything else (sqlx statement logging,
//! hyper internals) stays at `warn` unless `RUST_LOG` says otherwise.

use std::fs::{self, File, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use tracing::level_filters::LevelFilter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::LoggingConfig;
use crate::{DroplyError, Result};

/// Level used for third-party targets when `RUST_LOG` is unset.
const DEPENDENCY_LEVEL: &str = "warn";

/// Map a configured level name onto a filter, defaulting to `info`.
fn level_filter(level: &str) -> LevelFilter {
    match level.trim().to_ascii_lowercase().as_str() {
        "warning" => LevelFilter::WARN,
        other => other.parse().unwrap_or(LevelFilter::INFO),
    }
}

/// Default filter directives for a configured level.
fn default_directives(level: &str) -> String {
    let level = level_filter(level).to_string().to_ascii_lowercase();
    format!("{DEPENDENCY_LEVEL},droply={level},tower_http={level}")
}

/// `RUST_LOG` when set, otherwise the directives for `level`.
fn build_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives(level)))
}

/// Open the log file in append mode, creating its directory.
fn open_log_file(path: &str) -> Result<File> {
    if let Some(dir) = Path::new(path).parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    Ok(OpenOptions::new().create(true).append(true).open(path)?)
}

fn install(level: &str, log_file: Option<File>) -> Result<()> {
    let file_layer = log_file.map(|file| {
        fmt::layer()
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .with_target(true)
    });

    tracing_subscriber::registry()
        .with(build_filter(level))
        .with(fmt::layer().with_target(true))
        .with(file_layer)
        .try_init()
        .map_err(|e| DroplyError::Config(format!("logging already initialized: {e}")))
}

/// Log to stdout and, unless `file` is empty, append to the log file.
pub fn init(config: &LoggingConfig) -> Result<()> {
    let log_file = if config.file.is_empty() {
        None
    } else {
        Some(open_log_file(&config.file)?)
    };
    install(&config.level, log_file)
}

/// Log to stdout only. Used when the log file cannot be opened.
pub fn init_console_only(level: &str) {
    if let Err(e) = install(level, None) {
        eprintln!("{e}");
    }
}
