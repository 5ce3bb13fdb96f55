//! HTTP client SDK for the EventDesk booking API.
//!
//! This crate provides a typed client for the EventDesk REST backend,
//! plus the session (bearer token + user profile) it authenticates with.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use eventdesk_client::{Credentials, EventDeskClient, FileSessionStore, Result, Session};
//!
//! # async fn example() -> Result<()> {
//! // Persist the session across runs
//! let session = Session::new(Arc::new(FileSessionStore::new("/tmp/eventdesk/session.json")));
//!
//! let client = EventDeskClient::builder()
//!     .base_url("http://localhost:5000/api")
//!     .session(session.clone())
//!     .build()?;
//!
//! // Log in; the token is attached to every later request
//! let login = client.auth().login(&Credentials::new("ada@example.com", "secret")).await?;
//! println!("Welcome, {}", login.user.name);
//!
//! for event in client.events().list().await? {
//!     println!("{} on {}", event.title, event.day());
//! }
//!
//! client.bookings().create("65f1c2").await?;
//! session.logout()?;
//! # Ok(())
//! # }
//! ```
//!
//! # Request pipeline
//!
//! - **Request interceptor**: attaches `Authorization: Bearer <token>` when
//!   a token is stored, overwriting any caller-supplied value.
//! - **Response interceptor**: timeouts become [`Error::Timeout`]; a missing
//!   response becomes [`Error::NetworkUnreachable`] carrying the base
//!   address. Any received response passes through with its status.
//! - A 401 on a request that carried a token clears the session (see
//!   [`ClientBuilder::clear_session_on_unauthorized`]).
//! - Nothing is retried.
//!
//! # API Coverage
//!
//! - **Auth**: register, login, logout
//! - **Events**: list, get, create, update, delete
//! - **Bookings**: create, list mine

pub mod api;
pub mod client;
pub mod error;
mod interceptor;
pub mod session;
pub mod store;
pub mod types;

pub use client::{ApiResponse, ClientBuilder, EventDeskClient, RequestOptions};
pub use error::{Error, Result};
pub use session::{Session, SessionState};
pub use store::{FileSessionStore, MemorySessionStore, SessionStore, SharedSessionStore};
pub use tokio_util::sync::CancellationToken;
pub use types::*;
