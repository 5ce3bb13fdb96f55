//! User-facing messages for failed API calls.
//!
//! Each command turns a client error into one line of text. The wording
//! differs per command, so each gets its own mapping.

use eventdesk_client::Error;

/// Message shown when logging in fails.
pub fn login_failure(err: &Error) -> String {
    match err {
        Error::Http { status: 401, .. } => "Invalid email or password".to_string(),
        Error::Http { status: 404, .. } => {
            "Login endpoint not found. Please check server configuration.".to_string()
        }
        Error::Http { status, message } => message
            .clone()
            .unwrap_or_else(|| format!("Server error ({status})")),
        Error::Timeout => "Request timed out. Please try again.".to_string(),
        Error::NetworkUnreachable { base_url } => format!(
            "Unable to connect to the server. Please check if the server is running at {base_url}"
        ),
        other => other.to_string(),
    }
}

/// Message shown when the event list cannot be loaded.
pub fn list_events_failure(err: &Error) -> String {
    match err {
        Error::Http { message, .. } => format!(
            "Error: {}",
            message.as_deref().unwrap_or("Failed to fetch events")
        ),
        Error::Timeout | Error::NetworkUnreachable { .. } => {
            "Unable to connect to the server. Please try again later.".to_string()
        }
        Error::Cancelled => err.to_string(),
        _ => "An unexpected error occurred. Please try again.".to_string(),
    }
}

/// The server's own message when it sent one, otherwise `fallback`.
///
/// Validation failures never reach the server and keep their own text.
pub fn server_message_or(err: &Error, fallback: &str) -> String {
    match err {
        Error::Http {
            message: Some(message),
            ..
        } => message.clone(),
        Error::Validation(_) | Error::Cancelled => err.to_string(),
        _ => fallback.to_string(),
    }
}
