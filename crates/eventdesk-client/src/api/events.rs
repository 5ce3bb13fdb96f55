//! Events API.

use super::item_path;
use crate::client::EventDeskClient;
use crate::error::Result;
use crate::types::{Event, EventInput};

/// Events API client.
///
/// Create, update and delete are admin operations; the backend decides.
pub struct EventsApi {
    client: EventDeskClient,
}

impl EventsApi {
    pub(crate) fn new(client: EventDeskClient) -> Self {
        Self { client }
    }

    /// List all events.
    ///
    /// A `null` body is read as no events.
    pub async fn list(&self) -> Result<Vec<Event>> {
        let events: Option<Vec<Event>> = self.client.get_json("events").await?;
        Ok(events.unwrap_or_default())
    }

    /// Get an event by ID.
    pub async fn get(&self, id: &str) -> Result<Event> {
        self.client
            .get_json(&item_path("events", id, "event id")?)
            .await
    }

    /// Create a new event.
    pub async fn create(&self, mut input: EventInput) -> Result<Event> {
        input.validate()?;
        self.client.post_json("events", &input).await
    }

    /// Replace an event's editable fields.
    pub async fn update(&self, id: &str, mut input: EventInput) -> Result<Event> {
        let path = item_path("events", id, "event id")?;
        input.validate()?;
        self.client.put_json(&path, &input).await
    }

    /// Delete an event.
    pub async fn delete(&self, id: &str) -> Result<()> {
        self.client
            .delete_unit(&item_path("events", id, "event id")?)
            .await
    }
}
