//! CLI command handlers.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context as _, Result};
use eventdesk_client::{CancellationToken, EventDeskClient, FileSessionStore, Session};
use eventdesk_config::ResolvedServer;

pub mod auth;
pub mod bookings;
pub mod config;
pub mod events;

/// Shared context for all commands.
#[derive(Debug, Clone)]
pub struct Context {
    /// Backend URL given on the command line or through the environment.
    pub server: Option<String>,
    /// Named context selected with `--context`.
    pub context: Option<String>,
    /// Output as JSON for scripting.
    pub json_output: bool,
    /// Verbose output enabled.
    pub verbose: bool,
    /// Cancelled on Ctrl-C.
    pub cancel: CancellationToken,
}

impl Context {
    /// Work out which backend to talk to.
    pub fn resolve_server(&self) -> Result<ResolvedServer> {
        let config = eventdesk_config::load_client_config()?;
        Ok(config.resolve_server(self.server.as_deref(), self.context.as_deref())?)
    }

    /// The session persisted in the config directory.
    pub fn session(&self) -> Result<Session> {
        let path = eventdesk_config::session_file_path().with_context(|| {
            format!(
                "Could not determine config directory (set {})",
                eventdesk_config::CONFIG_DIR_ENV
            )
        })?;
        Ok(Session::new(Arc::new(FileSessionStore::new(path))))
    }

    /// A client bound to the persisted session and to Ctrl-C.
    pub fn client(&self) -> Result<EventDeskClient> {
        let server = self.resolve_server()?;
        tracing::debug!(url = %server.url, source = %server.source, "Using backend");

        let client = EventDeskClient::builder()
            .base_url(&server.url)
            .timeout(Duration::from_secs(server.timeout_secs))
            .session(self.session()?)
            .build()?;
        Ok(client.scoped(self.cancel.clone()))
    }

    /// A client for a protected command; fails before any request when
    /// nobody is logged in.
    pub fn authenticated_client(&self) -> Result<EventDeskClient> {
        let client = self.client()?;
        if !client.session().is_authenticated() {
            anyhow::bail!("Not logged in. Run 'eventdesk auth login' first.");
        }
        Ok(client)
    }
}
