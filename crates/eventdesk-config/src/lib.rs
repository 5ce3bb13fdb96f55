//! Client configuration for EventDesk.
//!
//! Provides YAML-based client configuration (kubeconfig-style):
//! - Named backend contexts (`server` + optional `timeout`)
//! - `current-context` for default selection
//! - Base-URL resolution (explicit → `EVENTDESK_API_URL` → context → default)
//!
//! The config directory also holds the persisted session and log files;
//! see [`config_dir`].

pub mod client;
pub mod discovery;
pub mod error;

pub use client::{
    ClientConfig, ClientDefaults, Context, ResolvedServer, ServerSource, client_config_path,
    load_client_config, load_client_config_from, save_client_config, save_client_config_to,
};
pub use discovery::{
    API_URL_ENV, CONFIG_DIR_ENV, DEFAULT_API_URL, DEFAULT_TIMEOUT_SECS, config_dir, logs_dir,
    session_file_path,
};
pub use error::{ConfigError, Result};
