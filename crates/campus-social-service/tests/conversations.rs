//! Conversation integration tests.

mod common;

use axum::http::StatusCode;
use common::{auth_header, TestHarness};
use serde_json::json;

use campus_social_core::{AccountId, ConversationId};
use campus_social_store::{keys, Fault};

async fn open(harness: &TestHarness, other: AccountId) -> String {
    let response = harness
        .server
        .post("/v1/conversations")
        .add_header("authorization", harness.user_auth_header())
        .json(&json!({ "participant_id": other.to_string() }))
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    body["id"].as_str().unwrap().to_string()
}

async fn send(
    harness: &TestHarness,
    sender: AccountId,
    conversation: &str,
    text: &str,
) -> StatusCode {
    harness
        .server
        .post(&format!("/v1/conversations/{conversation}/messages"))
        .add_header("authorization", auth_header(sender))
        .json(&json!({ "body": text }))
        .await
        .status_code()
}

#[tokio::test]
async fn open_is_shared_by_both_participants() {
    let harness = TestHarness::new();
    harness.register_self("jean@uni.edu", None).await;
    let marie = harness.other_user("marie@uni.edu").await;

    let id = open(&harness, marie).await;

    let from_marie: serde_json::Value = harness
        .server
        .post("/v1/conversations")
        .add_header("authorization", auth_header(marie))
        .json(&json!({ "participant_id": harness.test_user_id.to_string() }))
        .await
        .json();
    assert_eq!(from_marie["id"], id);
}

#[tokio::test]
async fn messages_round_trip_and_notify() {
    let harness = TestHarness::new();
    harness.register_self("jean@uni.edu", None).await;
    let marie = harness.other_user("marie@uni.edu").await;
    let id = open(&harness, marie).await;

    assert_eq!(send(&harness, harness.test_user_id, &id, "hello").await, StatusCode::OK);
    assert_eq!(send(&harness, marie, &id, "hi jean").await, StatusCode::OK);

    let listed: serde_json::Value = harness
        .server
        .get(&format!("/v1/conversations/{id}/messages"))
        .add_header("authorization", harness.user_auth_header())
        .await
        .json();
    assert_eq!(listed["count"], 2);

    let conversation: serde_json::Value = harness
        .server
        .get(&format!("/v1/conversations/{id}"))
        .add_header("authorization", harness.user_auth_header())
        .await
        .json();
    assert!(conversation["last_message"].is_string());

    let notifications: serde_json::Value = harness
        .server
        .get("/v1/notifications")
        .add_header("authorization", auth_header(marie))
        .await
        .json();
    assert_eq!(notifications["notifications"][0]["type"], "message");
    assert_eq!(notifications["notifications"][0]["related_id"], id);
}

#[tokio::test]
async fn outsiders_cannot_read_or_delete() {
    let harness = TestHarness::new();
    harness.register_self("jean@uni.edu", None).await;
    let marie = harness.other_user("marie@uni.edu").await;
    let id = open(&harness, marie).await;
    let outsider = harness.other_user("paul@uni.edu").await;

    harness
        .server
        .get(&format!("/v1/conversations/{id}"))
        .add_header("authorization", auth_header(outsider))
        .await
        .assert_status(StatusCode::FORBIDDEN);
    harness
        .server
        .delete(&format!("/v1/conversations/{id}"))
        .add_header("authorization", auth_header(outsider))
        .await
        .assert_status(StatusCode::FORBIDDEN);
    assert_eq!(send(&harness, outsider, &id, "hey").await, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn conversation_with_yourself_is_rejected() {
    let harness = TestHarness::new();
    harness.register_self("jean@uni.edu", None).await;

    let response = harness
        .server
        .post("/v1/conversations")
        .add_header("authorization", harness.user_auth_header())
        .json(&json!({ "participant_id": harness.test_user_id.to_string() }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn delete_removes_everything_and_is_idempotent() {
    let harness = TestHarness::new();
    harness.register_self("jean@uni.edu", None).await;
    let marie = harness.other_user("marie@uni.edu").await;
    let id = open(&harness, marie).await;
    for text in ["one", "two", "three"] {
        send(&harness, harness.test_user_id, &id, text).await;
    }

    let first: serde_json::Value = harness
        .server
        .delete(&format!("/v1/conversations/{id}"))
        .add_header("authorization", harness.user_auth_header())
        .await
        .json();
    assert_eq!(first["success"], true);
    assert_eq!(first["deleted"], 4);

    let second: serde_json::Value = harness
        .server
        .delete(&format!("/v1/conversations/{id}"))
        .add_header("authorization", auth_header(marie))
        .await
        .json();
    assert_eq!(second["success"], true);
    assert_eq!(second["deleted"], 0);

    harness
        .server
        .get(&format!("/v1/conversations/{id}"))
        .add_header("authorization", harness.user_auth_header())
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn partial_delete_reports_failure_and_blocks_writers() {
    let harness = TestHarness::new();
    harness.register_self("jean@uni.edu", None).await;
    let marie = harness.other_user("marie@uni.edu").await;
    let id = open(&harness, marie).await;
    for i in 0..5 {
        let text = format!("message {i}");
        send(&harness, harness.test_user_id, &id, &text).await;
    }
    let conversation_id: ConversationId = id.parse().unwrap();
    let root = keys::conversation_path(&conversation_id);

    harness.store.inject_fault(Fault::FailDeleteAfter(2));
    let response = harness
        .server
        .delete(&format!("/v1/conversations/{id}"))
        .add_header("authorization", harness.user_auth_header())
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["success"], false);
    assert_eq!(harness.store.count_within(&root), 4);

    let blocked = harness
        .server
        .post(&format!("/v1/conversations/{id}/messages"))
        .add_header("authorization", auth_header(marie))
        .json(&json!({ "body": "wait" }))
        .await;
    blocked.assert_status(StatusCode::CONFLICT);
    let blocked: serde_json::Value = blocked.json();
    assert_eq!(blocked["error"]["code"], "conversation_deleting");

    let retry: serde_json::Value = harness
        .server
        .delete(&format!("/v1/conversations/{id}"))
        .add_header("authorization", harness.user_auth_header())
        .await
        .json();
    assert_eq!(retry["success"], true);
    assert_eq!(harness.store.count_within(&root), 0);
}

#[tokio::test]
async fn empty_message_is_rejected() {
    let harness = TestHarness::new();
    harness.register_self("jean@uni.edu", None).await;
    let marie = harness.other_user("marie@uni.edu").await;
    let id = open(&harness, marie).await;

    assert_eq!(
        send(&harness, harness.test_user_id, &id, "   ").await,
        StatusCode::BAD_REQUEST
    );
}
