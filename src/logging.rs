use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;

/// Environment variable holding a `tracing` filter directive.
pub const LOG_ENV: &str = "TUI_EXPLORER_LOG";

/// Install a file-backed `tracing` subscriber.
///
/// The terminal belongs to the UI, so events go to a file. Returns the log
/// path, or `None` when the file could not be opened and logging is off.
pub fn init(config: &AppConfig) -> Option<PathBuf> {
    let path = config.log_file();
    let file = open_log_file(&path)?;

    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(config.log_level()))
        .unwrap_or_else(|_| EnvFilter::new(crate::config::DEFAULT_LOG_LEVEL));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .ok()?;

    Some(path)
}

fn open_log_file(path: &Path) -> Option<fs::File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).ok()?;
    }
    OpenOptions::new().create(true).append(true).open(path).ok()
}
