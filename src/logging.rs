//! Tracing setup.
//!
//! The TUI owns stdout/stderr while a game runs, so log output goes to a
//! file under the platform data directory instead of the terminal.

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

/// Environment variable holding a tracing filter directive.
pub const LOG_ENV: &str = "WHACK_A_MOLE_LOG";

/// Filter used when `WHACK_A_MOLE_LOG` is unset or invalid.
const DEFAULT_FILTER: &str = "whack_a_mole=info";

/// Default log file: `<data_dir>/whack-a-mole/whack-a-mole.log`.
pub fn default_log_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("whack-a-mole")
        .join("whack-a-mole.log")
}

/// Install the global subscriber writing to `path`.
///
/// Returns false, leaving logging disabled, if the file cannot be opened or
/// a subscriber is already installed. Never fails the caller.
pub fn init(path: &Path) -> bool {
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    let file = match OpenOptions::new().create(true).append(true).open(path) {
        Ok(f) => f,
        Err(_) => return false,
    };

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .is_ok()
}
