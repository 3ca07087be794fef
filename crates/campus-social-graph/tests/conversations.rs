//! Conversation lifecycle and deletion scenarios.

mod common;

use campus_social_core::{Message, NotificationType, DELETING_FIELD};
use campus_social_graph::GraphError;
use campus_social_store::{keys, to_record, Fault, FieldOp, Store};
use serde_json::Value;

#[tokio::test]
async fn sending_a_message_notifies_the_other_participant() {
    let h = common::harness();
    let a = h.register("alice@uni.edu", None).await;
    let b = h.register("bob@uni.edu", None).await;

    let conversation = h.graph.conversations.open(a.id, b.id).await.unwrap();
    h.graph
        .conversations
        .send_message(&conversation.id, a.id, "see you at the library")
        .await
        .unwrap();

    let notifications = h.graph.notifications.list(b.id, 10, false).await.unwrap();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].notification_type, NotificationType::Message);
    assert_eq!(
        notifications[0].related_id.as_deref(),
        Some(conversation.id.to_string().as_str())
    );
    let sent = h.graph.notifications.list(a.id, 10, false).await.unwrap();
    assert!(sent.is_empty());
}

#[tokio::test]
async fn interrupted_delete_is_finished_by_a_retry() {
    let h = common::harness();
    let a = h.register("alice@uni.edu", None).await;
    let b = h.register("bob@uni.edu", None).await;
    let conversation = h.graph.conversations.open(a.id, b.id).await.unwrap();
    let root = keys::conversation_path(&conversation.id);

    for i in 0..500 {
        let message = Message::new(if i % 2 == 0 { a.id } else { b.id }, format!("message {i}"));
        h.store
            .set(
                &keys::message_path(&conversation.id, &message.id),
                to_record(&message).unwrap(),
            )
            .await
            .unwrap();
    }
    assert_eq!(h.store.count_within(&root), 501);

    h.store.inject_fault(Fault::FailDeleteAfter(200));
    let first = h
        .graph
        .destroyer
        .delete_conversation(&conversation.id)
        .await;
    assert!(!first.success);
    assert_eq!(first.deleted, 0);
    assert_eq!(h.store.count_within(&root), 301);

    // The root survives and refuses new messages in the meantime.
    let err = h
        .graph
        .conversations
        .send_message(&conversation.id, a.id, "still there?")
        .await
        .unwrap_err();
    assert!(matches!(err, GraphError::ConversationDeleting { .. }));
    assert_eq!(h.store.count_within(&root), 301);

    let second = h
        .graph
        .destroyer
        .delete_conversation(&conversation.id)
        .await;
    assert!(second.success);
    assert_eq!(second.deleted, 301);
    assert_eq!(h.store.count_within(&root), 0);
}

#[tokio::test]
async fn deleting_twice_succeeds_both_times() {
    let h = common::harness();
    let a = h.register("alice@uni.edu", None).await;
    let b = h.register("bob@uni.edu", None).await;
    let conversation = h.graph.conversations.open(a.id, b.id).await.unwrap();
    h.graph
        .conversations
        .send_message(&conversation.id, a.id, "hi")
        .await
        .unwrap();

    let first = h
        .graph
        .destroyer
        .delete_conversation(&conversation.id)
        .await;
    assert!(first.success);
    assert_eq!(first.deleted, 2);

    let second = h
        .graph
        .destroyer
        .delete_conversation(&conversation.id)
        .await;
    assert!(second.success);
    assert_eq!(second.deleted, 0);

    assert!(matches!(
        h.graph.conversations.get(&conversation.id).await,
        Err(GraphError::ConversationNotFound { .. })
    ));
}

#[tokio::test]
async fn flagged_conversation_refuses_messages_and_reopening() {
    let h = common::harness();
    let a = h.register("alice@uni.edu", None).await;
    let b = h.register("bob@uni.edu", None).await;
    let conversation = h.graph.conversations.open(a.id, b.id).await.unwrap();

    h.store
        .update(
            &keys::conversation_path(&conversation.id),
            vec![(DELETING_FIELD.to_string(), FieldOp::Set(Value::Bool(true)))],
        )
        .await
        .unwrap();

    assert!(matches!(
        h.graph
            .conversations
            .send_message(&conversation.id, b.id, "hello")
            .await,
        Err(GraphError::ConversationDeleting { .. })
    ));
    assert!(matches!(
        h.graph.conversations.open(b.id, a.id).await,
        Err(GraphError::ConversationDeleting { .. })
    ));
    assert!(h
        .graph
        .conversations
        .list_messages(&conversation.id, 50)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn conversation_can_be_reopened_after_deletion() {
    let h = common::harness();
    let a = h.register("alice@uni.edu", None).await;
    let b = h.register("bob@uni.edu", None).await;
    let conversation = h.graph.conversations.open(a.id, b.id).await.unwrap();
    h.graph
        .conversations
        .send_message(&conversation.id, a.id, "old thread")
        .await
        .unwrap();
    let outcome = h
        .graph
        .destroyer
        .delete_conversation(&conversation.id)
        .await;
    assert!(outcome.success);

    let reopened = h.graph.conversations.open(b.id, a.id).await.unwrap();
    assert_eq!(reopened.id, conversation.id);
    assert!(!reopened.deleting);
    assert!(reopened.last_message.is_none());
    assert!(h
        .graph
        .conversations
        .list_messages(&reopened.id, 50)
        .await
        .unwrap()
        .is_empty());
}
