//! Relay Integration Tests
//!
//! Spawns the relay on an ephemeral port and talks to it over real
//! WebSocket connections.
//!
//! Run with: cargo test -p integration-tests --test relay_tests

use integration_tests::{wait_until, TestServer};
use reqwest::StatusCode;
use serde_json::json;

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    let server = TestServer::start().await.expect("Failed to start server");

    let response = server
        .client
        .get(format!("{}/health", server.base_url()))
        .send()
        .await
        .expect("Request failed");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.text().await.unwrap(), "OK");
}

// ============================================================================
// Connection Lifecycle Tests
// ============================================================================

#[tokio::test]
async fn test_handshake_assigns_distinct_ids() {
    let server = TestServer::start().await.expect("Failed to start server");

    let a = server.connect().await.unwrap();
    let b = server.connect().await.unwrap();

    assert_eq!(a.session_id.len(), 36);
    assert_eq!(b.session_id.len(), 36);
    assert_ne!(a.session_id, b.session_id);
    assert_eq!(server.connection_count(), 2);
    assert_eq!(server.session_count(), 2);
}

#[tokio::test]
async fn test_disconnect_releases_session() {
    let server = TestServer::start().await.expect("Failed to start server");

    let a = server.connect().await.unwrap();
    let mut b = server.connect().await.unwrap();

    a.close().await.unwrap();
    assert!(wait_until(|| server.connection_count() == 1 && server.session_count() == 1).await);

    // The remaining client is unaffected
    b.emit("message", json!("still here")).await.unwrap();
    assert_eq!(b.next_frame().await.unwrap().event, "my_response");
    assert_eq!(b.next_frame().await.unwrap().data, Some(json!("still here")));
    b.assert_quiet().await.unwrap();
}

#[tokio::test]
async fn test_reconnect_gets_new_id() {
    let server = TestServer::start().await.expect("Failed to start server");

    let first = server.connect().await.unwrap();
    let first_id = first.session_id.clone();
    first.close().await.unwrap();

    let second = server.connect().await.unwrap();
    assert_ne!(first_id, second.session_id);
}

// ============================================================================
// Relay Tests
// ============================================================================

#[tokio::test]
async fn test_message_acknowledged_and_broadcast() {
    let server = TestServer::start().await.expect("Failed to start server");

    let mut a = server.connect().await.unwrap();
    let mut b = server.connect().await.unwrap();

    a.emit("message", json!("hello")).await.unwrap();

    let ack = a.next_frame().await.unwrap();
    assert_eq!(ack.event, "my_response");
    assert_eq!(
        ack.data,
        Some(json!({ "data": format!("Server received your message! {}", a.session_id) }))
    );

    let own = a.next_frame().await.unwrap();
    assert_eq!(own.event, "message");
    assert_eq!(own.data, Some(json!("hello")));

    let relayed = b.next_frame().await.unwrap();
    assert_eq!(relayed.event, "message");
    assert_eq!(relayed.data, Some(json!("hello")));

    a.assert_quiet().await.unwrap();
    b.assert_quiet().await.unwrap();
}

#[tokio::test]
async fn test_message_payload_passes_through() {
    let server = TestServer::start().await.expect("Failed to start server");

    let mut a = server.connect().await.unwrap();
    let mut b = server.connect().await.unwrap();

    let payload = json!({"data": "eyJjaXBoZXIiOiIuLi4ifQ==", "v": [1, null, {"k": false}]});
    a.emit("message", payload.clone()).await.unwrap();

    assert_eq!(b.next_frame().await.unwrap().data, Some(payload));
}

#[tokio::test]
async fn test_typing_broadcast() {
    let server = TestServer::start().await.expect("Failed to start server");

    let mut x = server.connect().await.unwrap();
    let mut y = server.connect().await.unwrap();

    x.emit("typing", json!(true)).await.unwrap();

    let expected = json!({"uid": x.session_id, "typ": true});
    for client in [&mut x, &mut y] {
        let frame = client.next_frame().await.unwrap();
        assert_eq!(frame.event, "typing");
        assert_eq!(frame.data, Some(expected.clone()));
        client.assert_quiet().await.unwrap();
    }
}

#[tokio::test]
async fn test_sender_order_preserved() {
    let server = TestServer::start().await.expect("Failed to start server");

    let mut a = server.connect().await.unwrap();
    let mut b = server.connect().await.unwrap();

    for n in 1..=5 {
        a.emit("message", json!(format!("m{n}"))).await.unwrap();
    }

    for n in 1..=5 {
        let frame = b.next_frame().await.unwrap();
        assert_eq!(frame.data, Some(json!(format!("m{n}"))));
    }
}

#[tokio::test]
async fn test_unknown_events_are_ignored() {
    let server = TestServer::start().await.expect("Failed to start server");

    let mut a = server.connect().await.unwrap();

    a.emit("join", json!("room-1")).await.unwrap();
    a.emit("my_response", json!({"data": "spoofed"})).await.unwrap();
    a.emit("message", json!("after")).await.unwrap();

    // The first thing back is the acknowledgment for the real message
    let ack = a.next_frame().await.unwrap();
    assert_eq!(ack.event, "my_response");
    assert_ne!(ack.data, Some(json!({"data": "spoofed"})));
    assert_eq!(a.next_frame().await.unwrap().data, Some(json!("after")));
}

// ============================================================================
// Error Handling Tests
// ============================================================================

#[tokio::test]
async fn test_malformed_frame_closes_only_that_connection() {
    let server = TestServer::start().await.expect("Failed to start server");

    let mut bad = server.connect().await.unwrap();
    let mut good = server.connect().await.unwrap();

    bad.send_text("this is not json").await.unwrap();
    assert_eq!(bad.expect_closed().await.unwrap(), Some(4002));

    assert!(wait_until(|| server.connection_count() == 1).await);

    good.emit("typing", json!(false)).await.unwrap();
    let frame = good.next_frame().await.unwrap();
    assert_eq!(
        frame.data,
        Some(json!({"uid": good.session_id, "typ": false}))
    );
}

#[tokio::test]
async fn test_binary_frame_closes_only_that_connection() {
    let server = TestServer::start().await.expect("Failed to start server");

    let mut bad = server.connect().await.unwrap();
    let mut good = server.connect().await.unwrap();

    bad.send_binary(&[0x00, 0xff, 0x10]).await.unwrap();
    assert_eq!(bad.expect_closed().await.unwrap(), Some(4003));

    assert!(wait_until(|| server.connection_count() == 1 && server.session_count() == 1).await);

    good.emit("message", json!("still open")).await.unwrap();
    assert_eq!(good.next_frame().await.unwrap().event, "my_response");
    assert_eq!(good.next_frame().await.unwrap().data, Some(json!("still open")));
}
