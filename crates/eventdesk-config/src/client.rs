//! Client configuration for connecting to EventDesk backends.
//!
//! `client.yaml` lists named backends, kubeconfig style:
//!
//! ```yaml
//! api-version: v1
//! kind: ClientConfig
//!
//! current-context: local
//!
//! contexts:
//!   - name: local
//!     server: http://localhost:5000/api
//!   - name: staging
//!     server: https://events.staging.example.com/api
//!     timeout: 20
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::discovery::{API_URL_ENV, DEFAULT_API_URL, DEFAULT_TIMEOUT_SECS, config_dir};
use crate::{ConfigError, Result};

// ─────────────────────────────────────────────────────────────────────────────
// Client Config
// ─────────────────────────────────────────────────────────────────────────────

/// Format version written to `api-version`.
pub const API_VERSION: &str = "v1";

/// Document type written to `kind`.
pub const KIND: &str = "ClientConfig";

const CLIENT_CONFIG_FILE: &str = "client.yaml";

/// Contents of `client.yaml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ClientConfig {
    #[serde(default = "api_version")]
    pub api_version: String,

    #[serde(default = "kind")]
    pub kind: String,

    /// Context used when `--context` is not given.
    #[serde(default)]
    pub current_context: Option<String>,

    /// Known backends.
    #[serde(default)]
    pub contexts: Vec<Context>,

    #[serde(default)]
    pub defaults: ClientDefaults,
}

fn api_version() -> String {
    API_VERSION.to_string()
}

fn kind() -> String {
    KIND.to_string()
}

impl ClientConfig {
    /// A config with no contexts.
    pub fn new() -> Self {
        Self {
            api_version: api_version(),
            kind: kind(),
            ..Default::default()
        }
    }

    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(|e| ConfigError::ParseYaml(e.to_string()))
    }

    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| ConfigError::ParseYaml(e.to_string()))
    }

    /// The context named by `current-context`. A name that matches no
    /// context yields `None`.
    pub fn current(&self) -> Option<&Context> {
        let name = self.current_context.as_deref()?;
        self.get_context(name)
    }

    pub fn get_context(&self, name: &str) -> Option<&Context> {
        self.contexts.iter().find(|ctx| ctx.name == name)
    }

    pub fn get_context_mut(&mut self, name: &str) -> Option<&mut Context> {
        self.contexts.iter_mut().find(|ctx| ctx.name == name)
    }

    /// Insert `context`, replacing any context of the same name.
    pub fn set_context(&mut self, context: Context) {
        match self.contexts.iter().position(|ctx| ctx.name == context.name) {
            Some(index) => self.contexts[index] = context,
            None => self.contexts.push(context),
        }
    }

    /// Drop a context. Deleting the current one leaves no current context.
    pub fn remove_context(&mut self, name: &str) -> Option<Context> {
        let index = self.contexts.iter().position(|ctx| ctx.name == name)?;
        let removed = self.contexts.remove(index);
        if self.current_context.as_deref() == Some(name) {
            self.current_context = None;
        }
        Some(removed)
    }

    /// Make `name` the current context.
    pub fn use_context(&mut self, name: &str) -> Result<()> {
        if self.get_context(name).is_none() {
            return Err(ConfigError::ContextNotFound(name.to_string()));
        }
        self.current_context = Some(name.to_string());
        Ok(())
    }

    /// Resolve which backend to talk to, reading `EVENTDESK_API_URL`.
    ///
    /// See [`ClientConfig::resolve_server_with_env`] for the order.
    pub fn resolve_server(
        &self,
        explicit: Option<&str>,
        context: Option<&str>,
    ) -> Result<ResolvedServer> {
        let env = std::env::var(API_URL_ENV).ok();
        self.resolve_server_with_env(explicit, env.as_deref(), context)
    }

    /// Resolve which backend to talk to.
    ///
    /// Order: explicit URL, then the env value, then the named (or current)
    /// context, then [`DEFAULT_API_URL`]. A named context that does not
    /// exist is an error; a dangling `current-context` is ignored.
    pub fn resolve_server_with_env(
        &self,
        explicit: Option<&str>,
        env: Option<&str>,
        context: Option<&str>,
    ) -> Result<ResolvedServer> {
        let selected = match context {
            Some(name) => Some(
                self.get_context(name)
                    .ok_or_else(|| ConfigError::ContextNotFound(name.to_string()))?,
            ),
            None => self.current(),
        };

        // Zero would expire every request; treat it as unset
        let timeout_secs = selected
            .and_then(|c| c.timeout)
            .filter(|&secs| secs > 0)
            .or(Some(self.defaults.timeout).filter(|&secs| secs > 0))
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let (url, source) = if let Some(url) = non_empty(explicit) {
            (url.to_string(), ServerSource::Explicit)
        } else if let Some(url) = non_empty(env) {
            (url.to_string(), ServerSource::Env)
        } else if let Some(ctx) = selected {
            (ctx.server.clone(), ServerSource::Context(ctx.name.clone()))
        } else {
            (DEFAULT_API_URL.to_string(), ServerSource::Default)
        };

        tracing::debug!(%url, %source, timeout_secs, "Resolved backend");

        Ok(ResolvedServer {
            url,
            timeout_secs,
            source,
        })
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

// ─────────────────────────────────────────────────────────────────────────────
// Context
// ─────────────────────────────────────────────────────────────────────────────

/// A backend the CLI can talk to, selected by name.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Context {
    pub name: String,

    /// API base address, e.g. `http://localhost:5000/api`.
    pub server: String,

    /// Overrides `defaults.timeout` (seconds).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
}

impl Context {
    pub fn new(name: impl Into<String>, server: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            server: server.into(),
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: u64) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Defaults
// ─────────────────────────────────────────────────────────────────────────────

/// Settings used when the selected context does not override them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ClientDefaults {
    /// Request timeout in seconds.
    pub timeout: u64,
}

impl Default for ClientDefaults {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT_SECS,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Resolution result
// ─────────────────────────────────────────────────────────────────────────────

/// A fully resolved backend address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedServer {
    /// Base address for API requests.
    pub url: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Where the address came from.
    pub source: ServerSource,
}

/// Tracks where the backend address was resolved from, for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerSource {
    /// Given on the command line or by the embedding code.
    Explicit,
    /// From `EVENTDESK_API_URL`.
    Env,
    /// From a named context in `client.yaml`.
    Context(String),
    /// Built-in default.
    Default,
}

impl std::fmt::Display for ServerSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServerSource::Explicit => write!(f, "explicit"),
            ServerSource::Env => write!(f, "{}", API_URL_ENV),
            ServerSource::Context(name) => write!(f, "context '{}'", name),
            ServerSource::Default => write!(f, "default"),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Loading / Saving
// ─────────────────────────────────────────────────────────────────────────────

/// `<config dir>/client.yaml`.
pub fn client_config_path() -> Option<PathBuf> {
    Some(config_dir()?.join(CLIENT_CONFIG_FILE))
}

/// Read `client.yaml` from the config directory.
pub fn load_client_config() -> Result<ClientConfig> {
    load_client_config_from(client_config_path().as_deref())
}

/// Read a client config. No path or a missing file gives an empty config.
pub fn load_client_config_from(path: Option<&Path>) -> Result<ClientConfig> {
    match path {
        Some(path) if path.exists() => {
            let yaml = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
                path: path.display().to_string(),
                source,
            })?;
            ClientConfig::from_yaml(&yaml)
        }
        _ => Ok(ClientConfig::new()),
    }
}

/// Write `client.yaml` into the config directory.
pub fn save_client_config(config: &ClientConfig) -> Result<()> {
    let path = client_config_path().ok_or(ConfigError::NoConfigDir(crate::CONFIG_DIR_ENV))?;
    save_client_config_to(config, &path)
}

/// Write a client config, creating parent directories.
pub fn save_client_config_to(config: &ClientConfig, path: &Path) -> Result<()> {
    let write_error = |path: &Path, source| ConfigError::WriteFile {
        path: path.display().to_string(),
        source,
    };

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| write_error(parent, e))?;
    }
    std::fs::write(path, config.to_yaml()?).map_err(|e| write_error(path, e))?;
    tracing::debug!(path = %path.display(), "Saved client config");
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config() {
        let config = ClientConfig::new();
        assert_eq!(config.api_version, API_VERSION);
        assert_eq!(config.kind, KIND);
        assert!(config.current_context.is_none());
        assert!(config.contexts.is_empty());
        assert_eq!(config.defaults.timeout, 10);
    }

    #[test]
    fn test_parse_full_yaml() {
        let yaml = r#"
api-version: v1
kind: ClientConfig
current-context: staging

contexts:
  - name: local
    server: http://localhost:5000/api
  - name: staging
    server: https://events.staging.example.com/api
    timeout: 20

defaults:
  timeout: 15
"#;
        let config = ClientConfig::from_yaml(yaml).unwrap();

        assert_eq!(config.current_context.as_deref(), Some("staging"));
        assert_eq!(config.contexts.len(), 2);
        assert!(config.get_context("local").unwrap().timeout.is_none());
        assert_eq!(config.current().unwrap().timeout, Some(20));
        assert_eq!(config.defaults.timeout, 15);
    }

    #[test]
    fn test_set_and_remove_context() {
        let mut config = ClientConfig::new();
        config.set_context(Context::new("local", "http://localhost:5000/api"));
        config.set_context(Context::new("local", "http://localhost:6000/api"));
        assert_eq!(config.contexts.len(), 1);
        assert_eq!(config.contexts[0].server, "http://localhost:6000/api");

        config.use_context("local").unwrap();
        config.remove_context("local");
        assert!(config.current_context.is_none());
        assert!(config.remove_context("local").is_none());
    }

    #[test]
    fn test_use_unknown_context() {
        let mut config = ClientConfig::new();
        let err = config.use_context("nonexistent").unwrap_err();
        assert!(matches!(err, ConfigError::ContextNotFound(_)));
    }

    #[test]
    fn test_resolve_defaults() {
        let config = ClientConfig::new();
        let resolved = config.resolve_server_with_env(None, None, None).unwrap();
        assert_eq!(resolved.url, DEFAULT_API_URL);
        assert_eq!(resolved.timeout_secs, 10);
        assert_eq!(resolved.source, ServerSource::Default);
    }

    #[test]
    fn test_resolve_ignores_zero_timeout() {
        let mut config = ClientConfig::new();
        config.set_context(Context::new("local", "http://localhost:5000/api").with_timeout(0));
        config.use_context("local").unwrap();
        config.defaults.timeout = 25;
        let resolved = config.resolve_server_with_env(None, None, None).unwrap();
        assert_eq!(resolved.timeout_secs, 25);

        config.defaults.timeout = 0;
        let resolved = config.resolve_server_with_env(None, None, None).unwrap();
        assert_eq!(resolved.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn test_resolve_precedence() {
        let mut config = ClientConfig::new();
        config.set_context(Context::new("staging", "https://staging.example.com/api").with_timeout(20));
        config.use_context("staging").unwrap();

        let from_ctx = config.resolve_server_with_env(None, None, None).unwrap();
        assert_eq!(from_ctx.url, "https://staging.example.com/api");
        assert_eq!(from_ctx.timeout_secs, 20);
        assert_eq!(from_ctx.source, ServerSource::Context("staging".to_string()));

        let from_env = config
            .resolve_server_with_env(None, Some("http://env.example.com/api"), None)
            .unwrap();
        assert_eq!(from_env.url, "http://env.example.com/api");
        assert_eq!(from_env.source, ServerSource::Env);
        // Timeout still comes from the selected context
        assert_eq!(from_env.timeout_secs, 20);

        let explicit = config
            .resolve_server_with_env(
                Some("http://cli.example.com/api"),
                Some("http://env.example.com/api"),
                None,
            )
            .unwrap();
        assert_eq!(explicit.url, "http://cli.example.com/api");
        assert_eq!(explicit.source, ServerSource::Explicit);
    }

    #[test]
    fn test_resolve_blank_values_are_ignored() {
        let config = ClientConfig::new();
        let resolved = config
            .resolve_server_with_env(Some("  "), Some(""), None)
            .unwrap();
        assert_eq!(resolved.source, ServerSource::Default);
    }

    #[test]
    fn test_resolve_named_context_must_exist() {
        let config = ClientConfig::new();
        let err = config
            .resolve_server_with_env(None, None, Some("missing"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::ContextNotFound(name) if name == "missing"));
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("client.yaml");

        let mut config = ClientConfig::new();
        config.set_context(Context::new("local", "http://localhost:5000/api"));
        config.use_context("local").unwrap();
        save_client_config_to(&config, &path).unwrap();

        let loaded = load_client_config_from(Some(&path)).unwrap();
        assert_eq!(loaded.current_context.as_deref(), Some("local"));
        assert_eq!(loaded.contexts[0].server, "http://localhost:5000/api");
    }

    #[test]
    fn test_load_missing_file_gives_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_client_config_from(Some(&dir.path().join("absent.yaml"))).unwrap();
        assert!(config.contexts.is_empty());
    }
}
