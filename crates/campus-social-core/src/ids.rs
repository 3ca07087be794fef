//! Identifier types for campus-social.
//!
//! Accounts are keyed by the UUID the auth provider assigns. Notifications and
//! messages use ULIDs so that lexicographic key order matches creation order.
//! Conversations are keyed by the ordered pair of their participants.
//!
//! # Macro-based ID Types
//!
//! The `ulid_id_type!` macro generates the time-ordered identifiers with
//! consistent serialization, parsing, and display implementations.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ulid::Ulid;

/// An account identifier (UUID format, assigned by the auth system).
///
/// Account IDs are extracted from JWT `sub` claims and never change.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccountId(uuid::Uuid);

impl AccountId {
    /// Create a new identifier from a UUID.
    #[must_use]
    pub const fn from_uuid(uuid: uuid::Uuid) -> Self {
        Self(uuid)
    }

    /// Generate a new random identifier (primarily for testing).
    #[must_use]
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4())
    }

    /// Return the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &uuid::Uuid {
        &self.0
    }
}

impl FromStr for AccountId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let uuid = uuid::Uuid::parse_str(s).map_err(|_| IdError::InvalidUuid)?;
        Ok(Self(uuid))
    }
}

impl fmt::Debug for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccountId({})", self.0)
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for AccountId {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<AccountId> for String {
    fn from(id: AccountId) -> Self {
        id.0.to_string()
    }
}

/// Macro to define a ULID-based identifier type with standard trait implementations.
///
/// This macro generates a newtype wrapper around `ulid::Ulid` with implementations for:
/// - `Clone`, `Copy`, `PartialEq`, `Eq`, `Ord`, `Hash`
/// - `Serialize`, `Deserialize` (as string)
/// - `FromStr`, `Display`, `Debug`
/// - `TryFrom<String>`, `Into<String>`
macro_rules! ulid_id_type {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(Ulid);

        impl $name {
            /// Create a new identifier from a ULID.
            #[must_use]
            pub const fn from_ulid(ulid: Ulid) -> Self {
                Self(ulid)
            }

            /// Generate a new identifier with the current timestamp.
            #[must_use]
            pub fn generate() -> Self {
                Self(Ulid::new())
            }

            /// Return the underlying ULID.
            #[must_use]
            pub const fn as_ulid(&self) -> &Ulid {
                &self.0
            }
        }

        impl FromStr for $name {
            type Err = IdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let ulid = Ulid::from_string(s).map_err(|_| IdError::InvalidUlid)?;
                Ok(Self(ulid))
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<String> for $name {
            type Error = IdError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                value.parse()
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0.to_string()
            }
        }
    };
}

ulid_id_type!(NotificationId, "A notification identifier (ULID, time-ordered).");
ulid_id_type!(
    MessageId,
    "A message identifier (ULID, time-ordered). Keys sort in write order."
);

/// A conversation identifier derived from its two participants.
///
/// The participants are ordered before formatting, so both sides of a first
/// contact resolve to the same identifier: `{lower}_{higher}`.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ConversationId {
    low: AccountId,
    high: AccountId,
}

impl ConversationId {
    /// Build the identifier for the conversation between `a` and `b`.
    ///
    /// # Errors
    ///
    /// Returns `IdError::SameParticipant` if `a == b`.
    pub fn for_pair(a: AccountId, b: AccountId) -> Result<Self, IdError> {
        match a.cmp(&b) {
            std::cmp::Ordering::Less => Ok(Self { low: a, high: b }),
            std::cmp::Ordering::Greater => Ok(Self { low: b, high: a }),
            std::cmp::Ordering::Equal => Err(IdError::SameParticipant),
        }
    }

    /// The two participants, lower identifier first.
    #[must_use]
    pub const fn participants(&self) -> (AccountId, AccountId) {
        (self.low, self.high)
    }

    /// Whether `account` is one of the two participants.
    #[must_use]
    pub fn includes(&self, account: AccountId) -> bool {
        self.low == account || self.high == account
    }

    /// The participant that is not `account`, if `account` participates.
    #[must_use]
    pub fn other(&self, account: AccountId) -> Option<AccountId> {
        if self.low == account {
            Some(self.high)
        } else if self.high == account {
            Some(self.low)
        } else {
            None
        }
    }
}

impl FromStr for ConversationId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (a, b) = s.split_once('_').ok_or(IdError::InvalidConversation)?;
        let a: AccountId = a.parse().map_err(|_| IdError::InvalidConversation)?;
        let b: AccountId = b.parse().map_err(|_| IdError::InvalidConversation)?;
        // Only the canonical ordering is a valid identifier.
        if a >= b {
            return Err(IdError::InvalidConversation);
        }
        Ok(Self { low: a, high: b })
    }
}

impl fmt::Debug for ConversationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ConversationId({self})")
    }
}

impl fmt::Display for ConversationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.low, self.high)
    }
}

impl TryFrom<String> for ConversationId {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ConversationId> for String {
    fn from(id: ConversationId) -> Self {
        id.to_string()
    }
}

/// Errors that can occur when parsing identifiers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdError {
    /// The input is not a valid UUID.
    #[error("invalid UUID format")]
    InvalidUuid,

    /// The input is not a valid ULID.
    #[error("invalid ULID format")]
    InvalidUlid,

    /// The input is not a canonical `{lower}_{higher}` conversation identifier.
    #[error("invalid conversation identifier")]
    InvalidConversation,

    /// A conversation needs two distinct participants.
    #[error("a conversation needs two distinct participants")]
    SameParticipant,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn account_id_roundtrip() {
        let id = AccountId::generate();
        let parsed = AccountId::from_str(&id.to_string()).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn account_id_rejects_garbage() {
        assert_eq!(AccountId::from_str("nope"), Err(IdError::InvalidUuid));
    }

    #[test]
    fn notification_id_serde_json() {
        let id = NotificationId::generate();
        let json = serde_json::to_string(&id).unwrap();
        let parsed: NotificationId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn message_ids_sort_by_creation() {
        let first = MessageId::generate();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let second = MessageId::generate();
        assert!(first.to_string() < second.to_string());
    }

    #[test]
    fn conversation_id_is_order_independent() {
        let a = AccountId::generate();
        let b = AccountId::generate();
        let ab = ConversationId::for_pair(a, b).unwrap();
        let ba = ConversationId::for_pair(b, a).unwrap();
        assert_eq!(ab, ba);
        assert_eq!(ab.to_string(), ba.to_string());
        assert!(ab.includes(a) && ab.includes(b));
        assert_eq!(ab.other(a), Some(b));
        assert_eq!(ab.other(AccountId::generate()), None);
    }

    #[test]
    fn conversation_id_rejects_self() {
        let a = AccountId::generate();
        assert_eq!(
            ConversationId::for_pair(a, a),
            Err(IdError::SameParticipant)
        );
    }

    #[test]
    fn conversation_id_parse_requires_canonical_order() {
        let a = AccountId::generate();
        let b = AccountId::generate();
        let id = ConversationId::for_pair(a, b).unwrap();
        let parsed: ConversationId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);

        let (low, high) = id.participants();
        let reversed = format!("{high}_{low}");
        assert_eq!(
            reversed.parse::<ConversationId>(),
            Err(IdError::InvalidConversation)
        );
    }
}
