//! Core types and utilities for campus-social.
//!
//! This crate provides the foundational types shared by the identity and
//! social-graph layer:
//!
//! - **Identifiers**: `AccountId`, `NotificationId`, `MessageId`, `ConversationId`
//! - **Accounts**: `Account`, `Profile`, `Username`
//! - **Notifications**: `Notification`, `NotificationType`, `SenderSnapshot`
//! - **Conversations**: `Conversation`, `Message`
//!
//! # Follow graph
//!
//! The follow relation is stored twice: once in the follower's
//! `followingIds` and once in the followee's `followerIds`. The two lists
//! live on different records and are updated independently.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod account;
pub mod conversation;
pub mod ids;
pub mod notification;
pub mod username;

pub use account::{
    Account, Profile, FOLLOWER_IDS_FIELD, FOLLOWING_IDS_FIELD, UPDATED_AT_FIELD, USERNAME_FIELD,
};
pub use conversation::{Conversation, Message, DELETING_FIELD, PREVIEW_MAX_CHARS};
pub use ids::{AccountId, ConversationId, IdError, MessageId, NotificationId};
pub use notification::{
    Notification, NotificationType, SenderSnapshot, CREATED_AT_FIELD, READ_FIELD,
};
pub use username::{Username, UsernameError, MAX_USERNAME_LEN};
