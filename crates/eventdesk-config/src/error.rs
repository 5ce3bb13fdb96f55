//! Configuration error types.

/// Result alias for this crate.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Failures reading, writing or resolving client configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    ReadFile {
        path: String,
        source: std::io::Error,
    },

    #[error("cannot write {path}: {source}")]
    WriteFile {
        path: String,
        source: std::io::Error,
    },

    /// `client.yaml` is not valid YAML for [`crate::ClientConfig`].
    #[error("invalid client.yaml: {0}")]
    ParseYaml(String),

    /// A context was selected by a name that is not configured.
    #[error("no context named '{0}'")]
    ContextNotFound(String),

    /// Neither the env override nor a platform config dir is available.
    #[error("could not determine config directory (set {0})")]
    NoConfigDir(&'static str),
}
