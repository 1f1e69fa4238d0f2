// ============================================================================
// clipforge-cli/src/logging.rs
// ============================================================================
//
// LOGGING SETUP: Console and File Logging for the CLI
//
// Console logging uses env_logger (honoring RUST_LOG). When --log-file is
// given, clipforge-core's log4rs setup is used instead so lines go to both
// stderr and the file.
//
// AI-ASSISTANT-INFO: Logger initialization and log file naming

use crate::cli::GlobalArgs;
use clipforge_core::file_logging::setup::setup_file_logging;
use log::LevelFilter;
use std::path::{Path, PathBuf};

/// Returns the current local timestamp formatted as "YYYYMMDD_HHMMSS".
pub fn get_timestamp() -> String {
    chrono::Local::now().format("%Y%m%d_%H%M%S").to_string()
}

/// Level used unless RUST_LOG says otherwise.
pub fn level_for(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

/// Resolves `--log-file`: a directory gets a timestamped file inside it.
pub fn resolve_log_path(path: &Path) -> PathBuf {
    if path.is_dir() {
        path.join(format!("clipforge_{}.log", get_timestamp()))
    } else {
        path.to_path_buf()
    }
}

/// Installs the global logger. Returns the log file in use, if any.
pub fn init_logging(globals: &GlobalArgs) -> anyhow::Result<Option<PathBuf>> {
    let level = level_for(globals.verbose);
    match &globals.log_file {
        Some(path) => {
            let log_path = resolve_log_path(path);
            setup_file_logging(&log_path, level)?;
            Ok(Some(log_path))
        }
        None => {
            env_logger::Builder::from_env(
                env_logger::Env::default().default_filter_or(level.as_str()),
            )
            .format_timestamp(None)
            .format_target(false)
            .init();
            Ok(None)
        }
    }
}
