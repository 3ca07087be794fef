//! Follow graph integration tests.

mod common;

use axum::http::StatusCode;
use common::{auth_header, TestHarness};

use campus_social_core::AccountId;
use campus_social_store::{keys, Fault};

#[tokio::test]
async fn follow_is_visible_on_both_sides() {
    let harness = TestHarness::new();
    harness.register_self("jean@uni.edu", None).await;
    let marie = harness.other_user("marie@uni.edu").await;

    let response = harness
        .server
        .put(&format!("/v1/following/{marie}"))
        .add_header("authorization", harness.user_auth_header())
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["outcome"], "followed");

    let followers: serde_json::Value = harness
        .server
        .get(&format!("/v1/accounts/{marie}/followers"))
        .add_header("authorization", harness.user_auth_header())
        .await
        .json();
    assert_eq!(followers["count"], 1);
    assert_eq!(followers["accounts"][0], harness.test_user_id.to_string());

    let following: serde_json::Value = harness
        .server
        .get(&format!("/v1/accounts/{}/following", harness.test_user_id))
        .add_header("authorization", harness.user_auth_header())
        .await
        .json();
    assert_eq!(following["accounts"][0], marie.to_string());
}

#[tokio::test]
async fn double_follow_counts_once() {
    let harness = TestHarness::new();
    harness.register_self("jean@uni.edu", None).await;
    let marie = harness.other_user("marie@uni.edu").await;

    for _ in 0..2 {
        harness
            .server
            .put(&format!("/v1/following/{marie}"))
            .add_header("authorization", harness.user_auth_header())
            .await
            .assert_status_ok();
    }

    let account: serde_json::Value = harness
        .server
        .get(&format!("/v1/accounts/{marie}"))
        .add_header("authorization", harness.user_auth_header())
        .await
        .json();
    assert_eq!(account["follower_count"], 1);
}

#[tokio::test]
async fn unfollow_removes_the_edge() {
    let harness = TestHarness::new();
    harness.register_self("jean@uni.edu", None).await;
    let marie = harness.other_user("marie@uni.edu").await;
    let path = format!("/v1/following/{marie}");

    harness
        .server
        .put(&path)
        .add_header("authorization", harness.user_auth_header())
        .await
        .assert_status_ok();

    let response = harness
        .server
        .delete(&path)
        .add_header("authorization", harness.user_auth_header())
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["outcome"], "unfollowed");

    let followers: serde_json::Value = harness
        .server
        .get(&format!("/v1/accounts/{marie}/followers"))
        .add_header("authorization", harness.user_auth_header())
        .await
        .json();
    assert_eq!(followers["count"], 0);
}

#[tokio::test]
async fn self_follow_is_unchanged() {
    let harness = TestHarness::new();
    harness.register_self("jean@uni.edu", None).await;

    let response = harness
        .server
        .put(&format!("/v1/following/{}", harness.test_user_id))
        .add_header("authorization", harness.user_auth_header())
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["outcome"], "unchanged");
}

#[tokio::test]
async fn following_a_missing_account_is_not_found() {
    let harness = TestHarness::new();
    harness.register_self("jean@uni.edu", None).await;

    let response = harness
        .server
        .put(&format!("/v1/following/{}", AccountId::generate()))
        .add_header("authorization", harness.user_auth_header())
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn half_applied_follow_is_retryable() {
    let harness = TestHarness::new();
    harness.register_self("jean@uni.edu", None).await;
    let marie = harness.other_user("marie@uni.edu").await;
    harness
        .store
        .inject_fault(Fault::FailWritesAt(keys::account_path(&marie)));

    let response = harness
        .server
        .put(&format!("/v1/following/{marie}"))
        .add_header("authorization", harness.user_auth_header())
        .await;
    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"]["code"], "asymmetric_edge");
    assert_eq!(body["error"]["details"]["retry"], true);

    harness.store.clear_faults();
    harness
        .server
        .put(&format!("/v1/following/{marie}"))
        .add_header("authorization", harness.user_auth_header())
        .await
        .assert_status_ok();

    let followers: serde_json::Value = harness
        .server
        .get(&format!("/v1/accounts/{marie}/followers"))
        .add_header("authorization", auth_header(marie))
        .await
        .json();
    assert_eq!(followers["count"], 1);
}
