//! Request and response interceptors.
//!
//! Every request the client sends passes through [`authorize`] right
//! before transmission, and every transport failure through
//! [`normalize_failure`].

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};

use crate::error::Error;
use crate::session::Session;

/// Attach the stored bearer token, overwriting any caller-supplied value.
///
/// Best effort: if the token cannot be read or is not a valid header
/// value, the request goes out without an Authorization header. Returns
/// the token that was attached.
pub(crate) fn authorize(headers: &mut HeaderMap, session: &Session) -> Option<String> {
    let token = match session.token() {
        Ok(Some(token)) => token,
        Ok(None) => return None,
        Err(e) => {
            tracing::warn!(error = %e, "Could not read session token; sending request without it");
            return None;
        }
    };

    match HeaderValue::from_str(&format!("Bearer {}", token)) {
        Ok(mut value) => {
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
            Some(token)
        }
        Err(_) => {
            tracing::warn!("Stored token is not a valid header value; sending request without it");
            None
        }
    }
}

/// Map a transport failure to the client's error taxonomy.
///
/// Timeouts win over everything else; any other failure to get a
/// response at all is reported as unreachable with the configured base
/// address.
pub(crate) fn normalize_failure(err: reqwest::Error, base_url: &str) -> Error {
    if err.is_timeout() {
        tracing::warn!(error = %err, "Request timed out");
        return Error::Timeout;
    }

    if err.is_connect() || err.is_request() {
        tracing::warn!(error = %err, base_url, "No response from server");
        return Error::NetworkUnreachable {
            base_url: base_url.to_string(),
        };
    }

    tracing::error!(error = %err, "Request failed");
    Error::Transport(err)
}
