//! Session provider: the bearer token and user profile, with change
//! notification.
//!
//! All reads and writes of the persisted session go through [`Session`].
//! Views that care about login state subscribe instead of re-reading
//! storage.

use std::sync::Arc;

use tokio::sync::watch;

use crate::error::Result;
use crate::store::{MemorySessionStore, SharedSessionStore, TOKEN_KEY, USER_KEY};
use crate::types::User;

/// Snapshot published to subscribers after every session change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    /// Whether a token is stored.
    pub authenticated: bool,
    /// Stored profile, if any.
    pub user: Option<User>,
}

/// Shared handle to the persisted session.
#[derive(Debug, Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

#[derive(Debug)]
struct SessionInner {
    store: SharedSessionStore,
    changes: watch::Sender<SessionState>,
}

impl Session {
    /// Create a session over the given store.
    pub fn new(store: SharedSessionStore) -> Self {
        let (changes, _) = watch::channel(SessionState::default());
        let session = Self {
            inner: Arc::new(SessionInner { store, changes }),
        };
        session.publish();
        session
    }

    /// Create a session that lives only in memory.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemorySessionStore::new()))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Token store
    // ─────────────────────────────────────────────────────────────────────────

    /// Read the stored token. An empty token counts as absent.
    pub fn token(&self) -> Result<Option<String>> {
        Ok(self
            .inner
            .store
            .get(TOKEN_KEY)?
            .filter(|token| !token.is_empty()))
    }

    /// Overwrite the stored token.
    pub fn set_token(&self, token: &str) -> Result<()> {
        self.inner.store.set(TOKEN_KEY, token)?;
        self.publish();
        Ok(())
    }

    /// Delete the stored token. Idempotent.
    pub fn remove_token(&self) -> Result<()> {
        self.inner.store.remove(TOKEN_KEY)?;
        self.publish();
        Ok(())
    }

    /// True iff a token is stored. No validation or expiry check.
    ///
    /// An unreadable store counts as not authenticated.
    pub fn is_authenticated(&self) -> bool {
        matches!(self.token(), Ok(Some(_)))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Session helpers
    // ─────────────────────────────────────────────────────────────────────────

    /// Persist a token. Does not talk to the backend.
    pub fn login(&self, token: &str) -> Result<()> {
        self.set_token(token)
    }

    /// Persist a token together with its profile in one write.
    pub fn login_with_profile(&self, token: &str, user: &User) -> Result<()> {
        let profile = serde_json::to_string(user)?;
        self.inner
            .store
            .set_many(&[(TOKEN_KEY, token), (USER_KEY, &profile)])?;
        tracing::info!(user = %user.email, role = %user.role, "Logged in");
        self.publish();
        Ok(())
    }

    /// Remove token and profile in one write.
    pub fn logout(&self) -> Result<()> {
        self.inner.store.remove_many(&[TOKEN_KEY, USER_KEY])?;
        tracing::info!("Logged out");
        self.publish();
        Ok(())
    }

    /// Read the stored profile.
    ///
    /// A profile that cannot be decoded is treated as absent.
    pub fn user(&self) -> Result<Option<User>> {
        let Some(raw) = self.inner.store.get(USER_KEY)? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(user) => Ok(Some(user)),
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring unreadable stored profile");
                Ok(None)
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Change notification
    // ─────────────────────────────────────────────────────────────────────────

    /// Subscribe to session changes. The receiver starts at the current state.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.inner.changes.subscribe()
    }

    /// Current snapshot.
    pub fn state(&self) -> SessionState {
        SessionState {
            authenticated: self.is_authenticated(),
            user: self.user().ok().flatten(),
        }
    }

    fn publish(&self) {
        let state = self.state();
        self.inner.changes.send_if_modified(|current| {
            if *current == state {
                false
            } else {
                *current = state;
                true
            }
        });
    }
}
