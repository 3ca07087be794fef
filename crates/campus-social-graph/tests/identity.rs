//! Username allocation scenarios.

mod common;

use campus_social_core::AccountId;
use campus_social_graph::{GraphError, Registration};
use futures::future::join_all;
use std::collections::HashSet;

#[tokio::test]
async fn explicit_names_are_granted_once() {
    let h = common::harness();

    let name = h
        .graph
        .identity
        .allocate_username(Some("jean"), "anything@x.com")
        .await
        .unwrap();
    assert_eq!(name.as_str(), "jean");

    h.register("first@x.com", Some("jean")).await;

    let err = h
        .graph
        .identity
        .allocate_username(Some("jean"), "second@x.com")
        .await
        .unwrap_err();
    assert!(matches!(err, GraphError::UsernameTaken { ref username } if username == "jean"));
}

#[tokio::test]
async fn derived_names_take_the_next_free_suffix() {
    let h = common::harness();
    h.register("a@x.com", Some("jean")).await;
    h.register("b@x.com", Some("jean1")).await;

    let name = h
        .graph
        .identity
        .allocate_username(None, "jean@x.com")
        .await
        .unwrap();
    assert_eq!(name.as_str(), "jean2");
}

#[tokio::test]
async fn registered_account_starts_with_empty_edges() {
    let h = common::harness();
    let account = h.register("Marie.Curie@uni.edu", None).await;

    assert_eq!(account.username.as_str(), "marie.curie");
    assert!(account.follower_ids.is_empty());
    assert!(account.following_ids.is_empty());

    let stored = h.account(account.id).await;
    assert_eq!(stored.username, account.username);
    assert_eq!(stored.email, "Marie.Curie@uni.edu");
}

#[tokio::test]
async fn sequential_registrations_from_one_seed_get_distinct_names() {
    let h = common::harness();

    let mut names = HashSet::new();
    for _ in 0..8 {
        let account = h
            .graph
            .identity
            .register_account(
                AccountId::generate(),
                Registration {
                    email: "jean@x.com".into(),
                    ..Registration::default()
                },
            )
            .await
            .unwrap();
        names.insert(account.username.as_str().to_string());
    }

    assert_eq!(names.len(), 8);
    assert!(names.contains("jean"));
    assert!(names.contains("jean7"));
}

// The uniqueness check is not atomic with the account write (see the
// `identity` module docs), so registrations that interleave between the two
// can be handed the same name.
#[tokio::test]
async fn concurrent_registrations_can_collide_on_a_username() {
    let h = common::yielding_harness();

    let attempts = (0..8).map(|_| {
        h.graph.identity.register_account(
            AccountId::generate(),
            Registration {
                email: "jean@x.com".into(),
                ..Registration::default()
            },
        )
    });
    let accounts: Vec<_> = join_all(attempts)
        .await
        .into_iter()
        .collect::<Result<_, _>>()
        .unwrap();

    let names: HashSet<&str> = accounts.iter().map(|a| a.username.as_str()).collect();
    assert_eq!(accounts.len(), 8);
    assert!(names.len() < accounts.len());
    assert!(names.contains("jean"));
}
