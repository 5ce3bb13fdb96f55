//! Integration tests for the typed auth, events and bookings APIs.

use eventdesk_client::{
    ClientBuilder, Credentials, Error, EventDeskClient, EventInput, Registration, Role, Session,
    User,
};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer, session: &Session) -> EventDeskClient {
    ClientBuilder::new()
        .base_url(format!("{}/api", server.uri()))
        .session(session.clone())
        .build()
        .unwrap()
}

fn event_json(id: &str, title: &str) -> serde_json::Value {
    json!({
        "_id": id,
        "title": title,
        "description": "An evening of talks",
        "date": "2026-11-02T00:00:00.000Z",
        "time": "18:30",
        "location": "Hall A",
        "capacity": 40,
        "attendees": []
    })
}

fn launch_input() -> EventInput {
    EventInput {
        title: "Launch".to_string(),
        description: "Product launch".to_string(),
        date: "2026-12-01".to_string(),
        time: "10:00".to_string(),
        location: "Online".to_string(),
        capacity: Some(100),
        image_url: None,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Auth
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_login_persists_token_and_profile() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_json(json!({"email": "ada@example.com", "password": "secret"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "jwt-abc",
            "user": {"id": "u1", "name": "Ada", "email": "ada@example.com", "role": "admin"}
        })))
        .mount(&server)
        .await;

    let session = Session::in_memory();
    let client = client_for(&server, &session);

    let login = client
        .auth()
        .login(&Credentials::new("ada@example.com", "secret"))
        .await
        .unwrap();

    assert_eq!(login.user.role, Role::Admin);
    assert_eq!(session.token().unwrap().as_deref(), Some("jwt-abc"));
    assert_eq!(session.user().unwrap().unwrap().name, "Ada");
}

#[tokio::test]
async fn test_login_rejected_leaves_no_session() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "Invalid credentials"})))
        .mount(&server)
        .await;

    let session = Session::in_memory();
    let err = client_for(&server, &session)
        .auth()
        .login(&Credentials::new("a@b.com", "wrong"))
        .await
        .unwrap_err();

    assert!(err.is_auth_error());
    assert!(!session.is_authenticated());
}

#[tokio::test]
async fn test_failed_relogin_keeps_existing_session() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(header("authorization", "Bearer valid-token"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "Invalid credentials"})))
        .expect(1)
        .mount(&server)
        .await;

    let ada = User {
        id: "u1".to_string(),
        name: "Ada".to_string(),
        email: "ada@example.com".to_string(),
        role: Role::User,
    };
    let session = Session::in_memory();
    session.login_with_profile("valid-token", &ada).unwrap();

    let err = client_for(&server, &session)
        .auth()
        .login(&Credentials::new("ada@example.com", "typo"))
        .await
        .unwrap_err();

    assert!(err.is_auth_error());
    assert_eq!(session.token().unwrap().as_deref(), Some("valid-token"));
    assert_eq!(session.user().unwrap(), Some(ada));
}

#[tokio::test]
async fn test_validation_happens_before_network() {
    let server = MockServer::start().await;
    let session = Session::in_memory();
    let client = client_for(&server, &session);

    let err = client
        .auth()
        .login(&Credentials::new("", "pw"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Validation("email")));

    let err = client
        .auth()
        .register(&Registration {
            name: String::new(),
            email: "a@b.com".to_string(),
            password: "pw".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Validation("name")));

    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_register_surfaces_server_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/register"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({"message": "User already exists"})))
        .mount(&server)
        .await;

    let session = Session::in_memory();
    let err = client_for(&server, &session)
        .auth()
        .register(&Registration {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            password: "secret".to_string(),
        })
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(400));
    assert_eq!(err.server_message(), Some("User already exists"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Events
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_and_get_events() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/events"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            event_json("e1", "Rust Meetup"),
            event_json("e2", "Workshop")
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/events/e1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(event_json("e1", "Rust Meetup")))
        .mount(&server)
        .await;

    let session = Session::in_memory();
    let client = client_for(&server, &session);

    let events = client.events().list().await.unwrap();
    assert_eq!(events.len(), 2);
    assert_eq!(events[1].title, "Workshop");

    let event = client.events().get("e1").await.unwrap();
    assert_eq!(event.day(), "2026-11-02");
}

#[tokio::test]
async fn test_null_event_list_is_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/events"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(null)))
        .mount(&server)
        .await;

    let session = Session::in_memory();
    let events = client_for(&server, &session).events().list().await.unwrap();
    assert!(events.is_empty());
}

#[tokio::test]
async fn test_create_event_sends_token_and_payload() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/events"))
        .and(header("authorization", "Bearer admin-token"))
        .and(body_json(json!({
            "title": "Launch",
            "description": "Product launch",
            "date": "2026-12-01",
            "time": "10:00",
            "location": "Online",
            "capacity": 100
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(event_json("e9", "Launch")))
        .expect(1)
        .mount(&server)
        .await;

    let session = Session::in_memory();
    session.login("admin-token").unwrap();

    let created = client_for(&server, &session)
        .events()
        .create(launch_input())
        .await
        .unwrap();
    assert_eq!(created.id, "e9");
}

#[tokio::test]
async fn test_create_event_forbidden_for_non_admin() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/events"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({"message": "Not authorized as admin"})))
        .mount(&server)
        .await;

    let session = Session::in_memory();
    session.login("user-token").unwrap();

    let err = client_for(&server, &session)
        .events()
        .create(launch_input())
        .await
        .unwrap_err();
    assert!(err.is_forbidden());
    assert_eq!(err.server_message(), Some("Not authorized as admin"));
    // 403 is not a rejected token; the session stays
    assert!(session.is_authenticated());
}

#[tokio::test]
async fn test_update_and_delete_event() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/events/e1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(event_json("e1", "Launch")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/events/e1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "Event deleted"})))
        .expect(1)
        .mount(&server)
        .await;

    let session = Session::in_memory();
    session.login("admin-token").unwrap();
    let client = client_for(&server, &session);

    let updated = client.events().update("e1", launch_input()).await.unwrap();
    assert_eq!(updated.title, "Launch");
    client.events().delete("e1").await.unwrap();
}

#[tokio::test]
async fn test_missing_event_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/events/nope"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "Event not found"})))
        .mount(&server)
        .await;

    let session = Session::in_memory();
    let err = client_for(&server, &session)
        .events()
        .get("nope")
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

// ─────────────────────────────────────────────────────────────────────────────
// Bookings
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_book_and_list_my_bookings() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/bookings"))
        .and(header("authorization", "Bearer user-token"))
        .and(body_json(json!({"eventId": "e1"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"_id": "b1", "event": "e1"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/bookings/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"_id": "b1", "event": event_json("e1", "Rust Meetup")}
        ])))
        .mount(&server)
        .await;

    let session = Session::in_memory();
    session.login("user-token").unwrap();
    let client = client_for(&server, &session);

    let booking = client.bookings().create("e1").await.unwrap();
    assert_eq!(booking.id, "b1");

    let mine = client.bookings().mine().await.unwrap();
    assert_eq!(mine[0].event.as_ref().unwrap().title, "Rust Meetup");
}
