//! File logging bootstrap for the interaction core.
//!
//! # Responsibility
//! - Initialize rotating file logs exactly once per process.
//! - Keep diagnostic events metadata-only and single-line.
//!
//! # Invariants
//! - Repeated initialization with the same directory is idempotent.
//! - A conflicting re-initialization is rejected, never silently applied.
//! - Initialization never panics.

use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};
use log::info;
use once_cell::sync::OnceCell;
use std::path::{Path, PathBuf};

const LOG_BASENAME: &str = "startdeck";
const ROTATE_AT_BYTES: u64 = 5 * 1024 * 1024;
const KEEP_LOG_FILES: usize = 3;

static ACTIVE: OnceCell<ActiveLogging> = OnceCell::new();

struct ActiveLogging {
    level: &'static str,
    directory: PathBuf,
    _handle: LoggerHandle,
}

/// Returns the default log level for the current build mode.
pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    }
}

/// Starts file logging at `level` under `directory`.
///
/// # Errors
/// - Unsupported level or non-absolute/empty directory.
/// - Conflict with an earlier initialization using different settings.
/// - Backend startup failure.
pub fn init_logging(level: &str, directory: &str) -> Result<(), String> {
    let level = parse_level(level)?;
    let directory = parse_directory(directory)?;

    let state = ACTIVE.get_or_try_init(|| start(level, directory.clone()))?;
    if state.directory != directory || state.level != level {
        return Err(format!(
            "logging already active at `{}` level `{}`; refusing to reconfigure",
            state.directory.display(),
            state.level
        ));
    }
    Ok(())
}

/// Returns `(level, directory)` of the active logger, if any.
pub fn logging_status() -> Option<(&'static str, PathBuf)> {
    ACTIVE
        .get()
        .map(|state| (state.level, state.directory.clone()))
}

fn start(level: &'static str, directory: PathBuf) -> Result<ActiveLogging, String> {
    std::fs::create_dir_all(&directory)
        .map_err(|err| format!("cannot create log directory `{}`: {err}", directory.display()))?;

    let handle = Logger::try_with_str(level)
        .map_err(|err| format!("invalid log level `{level}`: {err}"))?
        .log_to_file(
            FileSpec::default()
                .directory(directory.as_path())
                .basename(LOG_BASENAME),
        )
        .rotate(
            Criterion::Size(ROTATE_AT_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(KEEP_LOG_FILES),
        )
        .write_mode(WriteMode::BufferAndFlush)
        .append()
        .format_for_files(flexi_logger::detailed_format)
        .start()
        .map_err(|err| format!("cannot start logger: {err}"))?;

    info!(
        "event=core_init module=logging status=ok level={} dir={} version={}",
        level,
        directory.display(),
        env!("CARGO_PKG_VERSION")
    );

    Ok(ActiveLogging {
        level,
        directory,
        _handle: handle,
    })
}

fn parse_level(level: &str) -> Result<&'static str, String> {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => Ok("trace"),
        "debug" => Ok("debug"),
        "info" => Ok("info"),
        "warn" | "warning" => Ok("warn"),
        "error" => Ok("error"),
        other => Err(format!(
            "unsupported log level `{other}`; expected trace|debug|info|warn|error"
        )),
    }
}

fn parse_directory(directory: &str) -> Result<PathBuf, String> {
    let trimmed = directory.trim();
    if trimmed.is_empty() {
        return Err("log directory cannot be empty".to_string());
    }
    let path = Path::new(trimmed);
    if !path.is_absolute() {
        return Err(format!("log directory must be absolute, got `{trimmed}`"));
    }
    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::{default_log_level, parse_directory, parse_level};

    #[test]
    fn levels_normalize_case_and_aliases() {
        assert_eq!(parse_level("INFO").unwrap(), "info");
        assert_eq!(parse_level(" warning ").unwrap(), "warn");
        assert!(parse_level("loud").is_err());
    }

    #[test]
    fn relative_directories_are_rejected() {
        let err = parse_directory("logs/dev").unwrap_err();
        assert!(err.contains("absolute"));
        assert!(parse_directory("  ").is_err());
    }

    #[test]
    fn default_level_is_known() {
        assert!(parse_level(default_log_level()).is_ok());
    }
}
