//! Main client implementation.

use std::sync::Arc;
use std::time::Duration;

use eventdesk_config::{API_URL_ENV, DEFAULT_API_URL, DEFAULT_TIMEOUT_SECS};
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::api::{AuthApi, BookingsApi, EventsApi};
use crate::error::{Error, ErrorResponse, Result};
use crate::interceptor;
use crate::session::Session;

/// EventDesk API client.
///
/// Every request goes through the same pipeline: the stored bearer token
/// is attached, the request is sent with the configured timeout, and
/// transport failures are normalized. Responses with any HTTP status are
/// returned to the caller as [`ApiResponse`].
///
/// # Example
///
/// ```no_run
/// use eventdesk_client::{EventDeskClient, Session};
///
/// # async fn example() -> eventdesk_client::Result<()> {
/// let client = EventDeskClient::builder()
///     .base_url("http://localhost:5000/api")
///     .session(Session::in_memory())
///     .build()?;
///
/// let events = client.events().list().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct EventDeskClient {
    inner: Arc<ClientInner>,
    /// Cancellation applied to every request made through this handle.
    scope: Option<CancellationToken>,
}

struct ClientInner {
    http: reqwest::Client,
    /// Normalized base URL (always ends with `/`) used for joining.
    base_url: Url,
    /// Base address as configured, used in error messages.
    base_url_display: String,
    session: Session,
    clear_session_on_unauthorized: bool,
}

impl EventDeskClient {
    /// Create a new client builder.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Get the normalized base URL.
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Base address as configured.
    pub fn base_url_display(&self) -> &str {
        &self.inner.base_url_display
    }

    /// The session whose token this client attaches.
    pub fn session(&self) -> &Session {
        &self.inner.session
    }

    /// A handle whose requests are all cancelled when `token` fires.
    ///
    /// Bind one to each view or task and cancel it on teardown. A token
    /// passed in [`RequestOptions`] takes precedence.
    pub fn scoped(&self, token: CancellationToken) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            scope: Some(token),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // API accessors
    // ─────────────────────────────────────────────────────────────────────────

    /// Access the auth API.
    pub fn auth(&self) -> AuthApi {
        AuthApi::new(self.clone())
    }

    /// Access the events API.
    pub fn events(&self) -> EventsApi {
        EventsApi::new(self.clone())
    }

    /// Access the bookings API.
    pub fn bookings(&self) -> BookingsApi {
        BookingsApi::new(self.clone())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Raw HTTP verbs
    // ─────────────────────────────────────────────────────────────────────────

    /// Send a GET request.
    pub async fn get(&self, path: &str, options: RequestOptions) -> Result<ApiResponse> {
        self.send(Method::GET, path, None, options).await
    }

    /// Send a POST request with a JSON body.
    pub async fn post<B>(&self, path: &str, body: &B, options: RequestOptions) -> Result<ApiResponse>
    where
        B: Serialize + ?Sized,
    {
        let body = serde_json::to_vec(body)?;
        self.send(Method::POST, path, Some(body), options).await
    }

    /// Send a PUT request with a JSON body.
    pub async fn put<B>(&self, path: &str, body: &B, options: RequestOptions) -> Result<ApiResponse>
    where
        B: Serialize + ?Sized,
    {
        let body = serde_json::to_vec(body)?;
        self.send(Method::PUT, path, Some(body), options).await
    }

    /// Send a DELETE request.
    pub async fn delete(&self, path: &str, options: RequestOptions) -> Result<ApiResponse> {
        self.send(Method::DELETE, path, None, options).await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Pipeline
    // ─────────────────────────────────────────────────────────────────────────

    /// Build a URL for an API path relative to the base address.
    pub(crate) fn url(&self, path: &str) -> Result<Url> {
        let path = path.trim_start_matches('/');
        self.inner.base_url.join(path).map_err(Error::from)
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<Vec<u8>>,
        options: RequestOptions,
    ) -> Result<ApiResponse> {
        let url = self.url(path)?;
        let RequestOptions {
            mut headers,
            cancel,
            keep_session,
        } = options;
        let cancel = cancel.or_else(|| self.scope.clone());

        let attached = interceptor::authorize(&mut headers, &self.inner.session);
        tracing::debug!(%method, path, authorized = attached.is_some(), "Making request");

        let mut request = self.inner.http.request(method.clone(), url).headers(headers);
        if let Some(body) = body {
            request = request.body(body);
        }

        let exchange = async {
            let response = request.send().await?;
            let status = response.status();
            let body = response.bytes().await?;
            Ok::<_, reqwest::Error>((status, body.to_vec()))
        };

        let outcome = match cancel {
            Some(token) => tokio::select! {
                _ = token.cancelled() => {
                    tracing::debug!(%method, path, "Request cancelled");
                    return Err(Error::Cancelled);
                }
                outcome = exchange => outcome,
            },
            None => exchange.await,
        };

        let (status, body) = outcome
            .map_err(|e| interceptor::normalize_failure(e, &self.inner.base_url_display))?;

        tracing::debug!(%method, path, status = status.as_u16(), "Response received");

        if status == StatusCode::UNAUTHORIZED
            && !keep_session
            && let Some(rejected) = attached
        {
            self.expire_session(&rejected);
        }

        Ok(ApiResponse { status, body })
    }

    /// Forced logout after the backend rejected `rejected`.
    ///
    /// A session that was replaced while the request was in flight is kept.
    fn expire_session(&self, rejected: &str) {
        if !self.inner.clear_session_on_unauthorized {
            return;
        }
        match self.inner.session.token() {
            Ok(Some(current)) if current == rejected => {}
            Ok(_) => {
                tracing::debug!("Session changed since the rejected request; keeping it");
                return;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Could not read session before clearing it");
                return;
            }
        }
        tracing::warn!("Server rejected the stored token; clearing session");
        if let Err(e) = self.inner.session.logout() {
            tracing::warn!(error = %e, "Failed to clear rejected session");
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Typed helpers (for API implementations)
    // ─────────────────────────────────────────────────────────────────────────

    pub(crate) async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.get(path, RequestOptions::default())
            .await?
            .into_result()?
            .json()
    }

    pub(crate) async fn post_json<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.post(path, body, RequestOptions::default())
            .await?
            .into_result()?
            .json()
    }

    pub(crate) async fn put_json<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.put(path, body, RequestOptions::default())
            .await?
            .into_result()?
            .json()
    }

    pub(crate) async fn delete_unit(&self, path: &str) -> Result<()> {
        self.delete(path, RequestOptions::default())
            .await?
            .into_result()
            .map(|_| ())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Request options
// ─────────────────────────────────────────────────────────────────────────────

/// Per-request overrides.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    headers: HeaderMap,
    cancel: Option<CancellationToken>,
    keep_session: bool,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a header for this request.
    ///
    /// `Authorization` is overwritten whenever a session token is stored.
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Abandon the request with [`Error::Cancelled`] once `token` fires.
    pub fn cancel_on(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Do not clear the session if this request gets a 401.
    ///
    /// For endpoints where 401 means bad credentials, not a stale token.
    pub fn keep_session_on_unauthorized(mut self) -> Self {
        self.keep_session = true;
        self
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Response
// ─────────────────────────────────────────────────────────────────────────────

/// A response as received, whatever its status.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    status: StatusCode,
    body: Vec<u8>,
}

impl ApiResponse {
    /// HTTP status.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Whether the status is 2xx.
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Raw body bytes.
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Decode the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.body).map_err(Error::from)
    }

    /// The `message` field of a JSON error body, if any.
    pub fn message(&self) -> Option<String> {
        serde_json::from_slice::<ErrorResponse>(&self.body)
            .ok()
            .and_then(|e| e.message)
    }

    /// Keep 2xx responses; turn anything else into [`Error::Http`].
    pub fn into_result(self) -> Result<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(Error::Http {
                status: self.status.as_u16(),
                message: self.message(),
            })
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Builder
// ─────────────────────────────────────────────────────────────────────────────

/// Builder for creating an [`EventDeskClient`].
#[derive(Debug)]
pub struct ClientBuilder {
    base_url: Option<String>,
    session: Option<Session>,
    timeout: Duration,
    user_agent: Option<String>,
    clear_session_on_unauthorized: bool,
}

impl ClientBuilder {
    /// Create a new builder with defaults.
    pub fn new() -> Self {
        Self {
            base_url: None,
            session: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: None,
            clear_session_on_unauthorized: true,
        }
    }

    /// Set the base address. Defaults to `EVENTDESK_API_URL`, then
    /// `http://localhost:5000/api`.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the session whose token is attached to requests.
    pub fn session(mut self, session: Session) -> Self {
        self.session = Some(session);
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set a custom user agent.
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Whether a 401 on a request that carried a token logs the session out.
    pub fn clear_session_on_unauthorized(mut self, enabled: bool) -> Self {
        self.clear_session_on_unauthorized = enabled;
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<EventDeskClient> {
        let configured = self
            .base_url
            .or_else(|| std::env::var(API_URL_ENV).ok())
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let configured = configured.trim().to_string();

        // Parse and normalize base URL
        let mut base_url = Url::parse(&configured)?;
        if base_url.cannot_be_a_base() {
            return Err(Error::Config(format!("'{}' cannot be used as a base URL", configured)));
        }
        if !base_url.path().ends_with('/') {
            base_url.set_path(&format!("{}/", base_url.path()));
        }

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let user_agent = self
            .user_agent
            .unwrap_or_else(|| format!("eventdesk-client/{}", env!("CARGO_PKG_VERSION")));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(user_agent)
            .timeout(self.timeout)
            .build()?;

        tracing::debug!(base_url = %configured, timeout = ?self.timeout, "API client ready");

        Ok(EventDeskClient {
            inner: Arc::new(ClientInner {
                http,
                base_url,
                base_url_display: configured.trim_end_matches('/').to_string(),
                session: self.session.unwrap_or_else(Session::in_memory),
                clear_session_on_unauthorized: self.clear_session_on_unauthorized,
            }),
            scope: None,
        })
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
