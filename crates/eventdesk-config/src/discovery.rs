//! Config directory discovery and well-known locations.
//!
//! Everything EventDesk persists lives under one directory:
//!
//! ```text
//! <config dir>/
//!   client.yaml        backend contexts
//!   session.json       bearer token + user profile
//!   logs/              rolling JSON logs
//! ```

use std::path::PathBuf;

/// Application name for platform directory resolution.
const APP_NAME: &str = "eventdesk";

/// Session store filename within the config directory.
const SESSION_FILE: &str = "session.json";

/// Log directory name within the config directory.
const LOGS_DIR: &str = "logs";

/// Environment variable to override the config directory.
///
/// Takes precedence over the platform default. Useful for tests and for
/// keeping several independent sessions on one machine.
pub const CONFIG_DIR_ENV: &str = "EVENTDESK_CONFIG_DIR";

/// Environment variable selecting the backend base address.
pub const API_URL_ENV: &str = "EVENTDESK_API_URL";

/// Backend base address used when nothing else is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";

/// Request timeout used when nothing else is configured.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Get the config directory for eventdesk.
///
/// Checks `EVENTDESK_CONFIG_DIR` first, then falls back to the platform
/// default (`~/.config/eventdesk` on Linux).
pub fn config_dir() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var(CONFIG_DIR_ENV)
        && !dir.is_empty()
    {
        return Some(PathBuf::from(dir));
    }
    dirs::config_dir().map(|d| d.join(APP_NAME))
}

/// Path of the persisted session file.
pub fn session_file_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join(SESSION_FILE))
}

/// Directory for rolling log files.
pub fn logs_dir() -> Option<PathBuf> {
    config_dir().map(|d| d.join(LOGS_DIR))
}
