//! Account types for campus-social.
//!
//! This module defines the account record, including the two denormalized
//! follow lists that together represent the follow graph.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{AccountId, Username};

/// Record field holding the accounts that follow this account.
pub const FOLLOWER_IDS_FIELD: &str = "followerIds";

/// Record field holding the accounts this account follows.
pub const FOLLOWING_IDS_FIELD: &str = "followingIds";

/// Record field holding the username.
pub const USERNAME_FIELD: &str = "username";

/// Record field holding the last-modified timestamp.
pub const UPDATED_AT_FIELD: &str = "updatedAt";

/// A registered user.
///
/// `follower_ids` and `following_ids` are stored as arrays but only ever
/// mutated through array-union and array-remove operations, so each entry
/// appears at most once. For any two accounts A and B, A is in B's
/// `follower_ids` exactly when B is in A's `following_ids`, except while a
/// follow or unfollow is half applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// The account ID (from the auth system).
    pub id: AccountId,

    /// Globally unique username, fixed at creation.
    pub username: Username,

    /// Contact email.
    pub email: String,

    /// Profile fields shown to other users.
    #[serde(default)]
    pub profile: Profile,

    /// Accounts that follow this account.
    #[serde(default)]
    pub follower_ids: Vec<AccountId>,

    /// Accounts this account follows.
    #[serde(default)]
    pub following_ids: Vec<AccountId>,

    /// When the account was created.
    pub created_at: DateTime<Utc>,

    /// When the account was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Create a new account with empty follow lists.
    #[must_use]
    pub fn new(id: AccountId, username: Username, email: String, profile: Profile) -> Self {
        let now = Utc::now();
        Self {
            id,
            username,
            email,
            profile,
            follower_ids: Vec::new(),
            following_ids: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Name shown next to this account's activity.
    ///
    /// Falls back to the username when no name is set.
    #[must_use]
    pub fn display_name(&self) -> String {
        let first = self.profile.first_name.as_deref().unwrap_or("").trim();
        let last = self.profile.last_name.as_deref().unwrap_or("").trim();
        let full = format!("{first} {last}");
        let full = full.trim();
        if full.is_empty() {
            self.username.to_string()
        } else {
            full.to_string()
        }
    }

    /// Whether `other` follows this account.
    #[must_use]
    pub fn is_followed_by(&self, other: AccountId) -> bool {
        self.follower_ids.contains(&other)
    }

    /// Whether this account follows `other`.
    #[must_use]
    pub fn follows(&self, other: AccountId) -> bool {
        self.following_ids.contains(&other)
    }
}

/// Editable profile fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    /// First name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,

    /// Last name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,

    /// Free-text bio.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,

    /// Avatar image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(profile: Profile) -> Account {
        Account::new(
            AccountId::generate(),
            Username::parse("jean").unwrap(),
            "jean@x.com".into(),
            profile,
        )
    }

    #[test]
    fn new_account_has_empty_follow_lists() {
        let account = account(Profile::default());
        assert!(account.follower_ids.is_empty());
        assert!(account.following_ids.is_empty());
        assert_eq!(account.created_at, account.updated_at);
    }

    #[test]
    fn display_name_prefers_full_name() {
        let named = account(Profile {
            first_name: Some("Jean".into()),
            last_name: Some("Dupont".into()),
            ..Profile::default()
        });
        assert_eq!(named.display_name(), "Jean Dupont");

        let first_only = account(Profile {
            first_name: Some("Jean".into()),
            ..Profile::default()
        });
        assert_eq!(first_only.display_name(), "Jean");

        assert_eq!(account(Profile::default()).display_name(), "jean");
    }

    #[test]
    fn record_uses_camel_case_list_fields() {
        let value = serde_json::to_value(account(Profile::default())).unwrap();
        assert!(value.get(FOLLOWER_IDS_FIELD).is_some());
        assert!(value.get(FOLLOWING_IDS_FIELD).is_some());
        assert_eq!(value[USERNAME_FIELD], "jean");
    }
}
