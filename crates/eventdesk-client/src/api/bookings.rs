//! Bookings API.

use crate::client::EventDeskClient;
use crate::error::{Error, Result};
use crate::types::{Booking, CreateBookingRequest};

/// Bookings API client. Every call needs a logged-in session.
pub struct BookingsApi {
    client: EventDeskClient,
}

impl BookingsApi {
    pub(crate) fn new(client: EventDeskClient) -> Self {
        Self { client }
    }

    /// Book attendance at an event.
    pub async fn create(&self, event_id: &str) -> Result<Booking> {
        let event_id = event_id.trim();
        if event_id.is_empty() {
            return Err(Error::Validation("event id"));
        }
        let request = CreateBookingRequest {
            event_id: event_id.to_string(),
        };
        self.client.post_json("bookings", &request).await
    }

    /// List the current user's bookings.
    pub async fn mine(&self) -> Result<Vec<Booking>> {
        self.client.get_json("bookings/me").await
    }
}
