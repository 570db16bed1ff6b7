//! File logging.
//!
//! The terminal backend owns stdout, so tracing output goes to a log file in
//! the platform data directory instead.

use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;

use driftfield_config::{Config, LogConfig};
use tracing_subscriber::EnvFilter;

const LOG_FILE_NAME: &str = "driftfield.log";

/// Install the global subscriber and return the log file path.
///
/// `RUST_LOG` takes precedence over the configured level. Returns `None`
/// (and logs nowhere) when no writable data directory is available.
pub fn init(config: &LogConfig) -> Option<PathBuf> {
    let dir = Config::project_dirs()?.data_local_dir().to_path_buf();
    fs::create_dir_all(&dir).ok()?;
    let path = dir.join(LOG_FILE_NAME);
    let file = OpenOptions::new().create(true).append(true).open(&path).ok()?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .ok()?;
    Some(path)
}
