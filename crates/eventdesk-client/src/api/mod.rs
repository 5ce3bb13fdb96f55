//! API endpoint implementations.

mod auth;
mod bookings;
mod events;

pub use auth::AuthApi;
pub use bookings::BookingsApi;
pub use events::EventsApi;

use crate::error::{Error, Result};

/// Build `<collection>/<id>`, refusing ids that would escape the path.
pub(crate) fn item_path(collection: &str, id: &str, field: &'static str) -> Result<String> {
    let id = id.trim();
    if id.is_empty() || id.contains(['/', '?', '#']) || id.contains(char::is_whitespace) {
        return Err(Error::Validation(field));
    }
    Ok(format!("{}/{}", collection, id))
}
