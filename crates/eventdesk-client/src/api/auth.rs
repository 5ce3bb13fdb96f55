//! Auth API.

use crate::client::{EventDeskClient, RequestOptions};
use crate::error::Result;
use crate::types::{Credentials, LoginResponse, Registration};

/// Auth API client.
pub struct AuthApi {
    client: EventDeskClient,
}

impl AuthApi {
    pub(crate) fn new(client: EventDeskClient) -> Self {
        Self { client }
    }

    /// Create an account. Does not log in.
    pub async fn register(&self, registration: &Registration) -> Result<serde_json::Value> {
        registration.validate()?;
        let response = self
            .client
            .post("auth/register", registration, Self::options())
            .await?
            .into_result()?;
        // The created user is informational; tolerate an empty body.
        Ok(response.json().unwrap_or(serde_json::Value::Null))
    }

    /// Exchange credentials for a token and persist the new session.
    ///
    /// Any previous session is overwritten.
    pub async fn login(&self, credentials: &Credentials) -> Result<LoginResponse> {
        credentials.validate()?;
        tracing::debug!(email = %credentials.email, "Attempting login");
        let response: LoginResponse = self
            .client
            .post("auth/login", credentials, Self::options())
            .await?
            .into_result()?
            .json()?;
        self.client
            .session()
            .login_with_profile(&response.token, &response.user)?;
        Ok(response)
    }

    /// A 401 here means bad credentials; any stored session stays.
    fn options() -> RequestOptions {
        RequestOptions::new().keep_session_on_unauthorized()
    }

    /// Forget the stored session. No backend call is made.
    pub fn logout(&self) -> Result<()> {
        self.client.session().logout()
    }
}
