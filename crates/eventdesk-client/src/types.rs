//! Request and response types for the EventDesk API.
//!
//! These types mirror the backend's JSON contract. Record ids are accepted
//! as either `id` or `_id`.

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{Error, Result};

// ─────────────────────────────────────────────────────────────────────────────
// Users
// ─────────────────────────────────────────────────────────────────────────────

/// Authorization tier of a user.
///
/// Only a hint for which actions to offer. The backend enforces access.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    Admin,
    User,
    /// Any tier the client does not know about.
    Other(String),
}

impl From<String> for Role {
    fn from(value: String) -> Self {
        match value.as_str() {
            "admin" => Role::Admin,
            "user" => Role::User,
            _ => Role::Other(value),
        }
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.as_str().to_string()
    }
}

impl Role {
    pub fn as_str(&self) -> &str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
            Role::Other(other) => other,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User profile returned at login and kept with the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl User {
    /// Whether the profile claims the admin tier.
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Body of `POST /auth/login`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    /// Check required fields before anything is sent.
    pub fn validate(&self) -> Result<()> {
        require("email", &self.email)?;
        require("password", &self.password)
    }
}

/// Response of `POST /auth/login`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

/// Body of `POST /auth/register`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl Registration {
    /// Check required fields before anything is sent.
    pub fn validate(&self) -> Result<()> {
        require("name", &self.name)?;
        require("email", &self.email)?;
        require("password", &self.password)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Events
// ─────────────────────────────────────────────────────────────────────────────

/// An event as stored by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    #[serde(alias = "_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// ISO date or timestamp.
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub location: String,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub capacity: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default)]
    pub attendees: Vec<serde_json::Value>,
}

impl Event {
    /// Number of attendees the backend reported.
    pub fn attendee_count(&self) -> usize {
        self.attendees.len()
    }

    /// Seats left, when the capacity is known.
    pub fn seats_left(&self) -> Option<u32> {
        self.capacity
            .map(|c| c.saturating_sub(self.attendee_count() as u32))
    }

    /// The calendar date part of [`Event::date`].
    pub fn day(&self) -> &str {
        date_only(&self.date)
    }

    /// Editable fields of this event, for a full-replacement update.
    pub fn to_input(&self) -> EventInput {
        EventInput {
            title: self.title.clone(),
            description: self.description.clone(),
            date: self.day().to_string(),
            time: self.time.clone(),
            location: self.location.clone(),
            capacity: self.capacity,
            image_url: self.image_url.clone(),
        }
    }
}

/// Payload for `POST /events` and `PUT /events/:id`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventInput {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub date: String,
    pub time: String,
    pub location: String,
    pub capacity: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl EventInput {
    /// Check required fields and normalize the date before anything is sent.
    pub fn validate(&mut self) -> Result<()> {
        require("title", &self.title)?;
        require("date", &self.date)?;
        require("time", &self.time)?;
        require("location", &self.location)?;
        if self.capacity.is_none() {
            return Err(Error::Validation("capacity"));
        }
        self.date = date_only(&self.date).to_string();
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Bookings
// ─────────────────────────────────────────────────────────────────────────────

/// Body of `POST /bookings`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    pub event_id: String,
}

/// A booking of the current user.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    #[serde(alias = "_id")]
    pub id: String,
    /// The booked event; absent if the backend sent only its id.
    #[serde(default, deserialize_with = "embedded_event")]
    pub event: Option<Event>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────────────

fn require(field: &'static str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        Err(Error::Validation(field))
    } else {
        Ok(())
    }
}

/// Cut an ISO timestamp down to its `YYYY-MM-DD` part.
fn date_only(date: &str) -> &str {
    date.split('T').next().unwrap_or(date)
}

/// Accept a capacity sent as a number, a numeric string, or nothing.
fn lenient_u32<'de, D>(deserializer: D) -> std::result::Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u32),
        Text(String),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Number(n)) => Ok(Some(n)),
        Some(Raw::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(Raw::Text(s)) => s.trim().parse().map(Some).map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// Accept an embedded event object; a bare id reference yields `None`.
fn embedded_event<'de, D>(deserializer: D) -> std::result::Result<Option<Event>, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        value @ serde_json::Value::Object(_) => serde_json::from_value(value)
            .map(Some)
            .map_err(serde::de::Error::custom),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_event_accepts_mongo_ids_and_string_capacity() {
        let event: Event = serde_json::from_value(json!({
            "_id": "65f1c2",
            "title": "Rust Meetup",
            "description": "Talks",
            "date": "2026-11-02T00:00:00.000Z",
            "time": "18:30",
            "location": "Hall A",
            "capacity": "40",
            "imageUrl": "https://img.example.com/a.png",
            "attendees": ["u1", "u2"]
        }))
        .unwrap();

        assert_eq!(event.id, "65f1c2");
        assert_eq!(event.capacity, Some(40));
        assert_eq!(event.day(), "2026-11-02");
        assert_eq!(event.seats_left(), Some(38));
        assert_eq!(event.image_url.as_deref(), Some("https://img.example.com/a.png"));
    }

    #[test]
    fn test_event_minimal_fields() {
        let event: Event = serde_json::from_value(json!({
            "id": "e1",
            "title": "Bare",
            "capacity": null
        }))
        .unwrap();
        assert!(event.capacity.is_none());
        assert!(event.seats_left().is_none());
        assert_eq!(event.attendee_count(), 0);
    }

    #[test]
    fn test_event_input_validation_normalizes_date() {
        let mut input = EventInput {
            title: "Launch".to_string(),
            date: "2026-12-01T10:00:00Z".to_string(),
            time: "10:00".to_string(),
            location: "Online".to_string(),
            capacity: Some(100),
            ..Default::default()
        };
        input.validate().unwrap();
        assert_eq!(input.date, "2026-12-01");

        let body = serde_json::to_value(&input).unwrap();
        assert_eq!(body["capacity"], 100);
        assert!(body.get("imageUrl").is_none());
    }

    #[test]
    fn test_event_input_requires_fields() {
        let mut input = EventInput {
            title: "Launch".to_string(),
            ..Default::default()
        };
        assert!(matches!(input.validate(), Err(Error::Validation("date"))));

        input.date = "2026-12-01".to_string();
        input.time = "10:00".to_string();
        input.location = "Online".to_string();
        assert!(matches!(input.validate(), Err(Error::Validation("capacity"))));
    }

    #[test]
    fn test_credentials_validation() {
        assert!(Credentials::new("a@b.com", "pw").validate().is_ok());
        assert!(matches!(
            Credentials::new(" ", "pw").validate(),
            Err(Error::Validation("email"))
        ));
        assert!(matches!(
            Credentials::new("a@b.com", "").validate(),
            Err(Error::Validation("password"))
        ));
    }

    #[test]
    fn test_role_roundtrip_and_unknown_tier() {
        let user: User = serde_json::from_value(json!({
            "_id": "u1", "name": "Ada", "email": "ada@example.com", "role": "admin"
        }))
        .unwrap();
        assert!(user.is_admin());

        let organiser: Role = serde_json::from_value(json!("organiser")).unwrap();
        assert_eq!(organiser, Role::Other("organiser".to_string()));
        assert_eq!(serde_json::to_value(&Role::User).unwrap(), json!("user"));
    }

    #[test]
    fn test_booking_embeds_event() {
        let booking: Booking = serde_json::from_value(json!({
            "_id": "b1",
            "event": { "_id": "e1", "title": "Rust Meetup" },
            "createdAt": "2026-10-01T09:00:00Z"
        }))
        .unwrap();
        assert_eq!(booking.event.unwrap().title, "Rust Meetup");

        let unpopulated: Booking =
            serde_json::from_value(json!({ "_id": "b2", "event": "e1" })).unwrap();
        assert!(unpopulated.event.is_none());

        let request = serde_json::to_value(CreateBookingRequest {
            event_id: "e1".to_string(),
        })
        .unwrap();
        assert_eq!(request, json!({ "eventId": "e1" }));
    }
}
