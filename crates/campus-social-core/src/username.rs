//! Username rules.
//!
//! A username is 1 to 30 characters drawn from `[a-z0-9_.]`. Usernames are
//! chosen once at registration and never change afterwards.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum username length in characters.
pub const MAX_USERNAME_LEN: usize = 30;

/// Base used when a seed contains no usable characters.
pub const DEFAULT_USERNAME_BASE: &str = "user";

/// A validated, lower-case username.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

impl Username {
    /// Normalise (trim, lower-case) and validate a user-supplied username.
    ///
    /// # Errors
    ///
    /// Returns `UsernameError` if the normalised value is empty, too long, or
    /// contains a character outside `[a-z0-9_.]`.
    pub fn parse(raw: &str) -> Result<Self, UsernameError> {
        let normalised = raw.trim().to_lowercase();
        if normalised.is_empty() {
            return Err(UsernameError::Empty);
        }
        if normalised.chars().count() > MAX_USERNAME_LEN {
            return Err(UsernameError::TooLong {
                max: MAX_USERNAME_LEN,
            });
        }
        if let Some(c) = normalised.chars().find(|c| !is_username_char(*c)) {
            return Err(UsernameError::InvalidCharacter(c));
        }
        Ok(Self(normalised))
    }

    /// The username as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Username {
    type Error = UsernameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Username> for String {
    fn from(name: Username) -> Self {
        name.0
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Whether `c` may appear in a username.
#[must_use]
pub fn is_username_char(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '.'
}

/// Derive the candidate base from a fallback seed such as an email address.
///
/// Uses the text before the first `@` (the whole seed when there is none),
/// lower-cased and stripped to the username alphabet. Falls back to
/// [`DEFAULT_USERNAME_BASE`] when nothing usable remains.
#[must_use]
pub fn derive_base(seed: &str) -> String {
    let local = seed.split('@').next().unwrap_or_default();
    let base: String = local
        .to_lowercase()
        .chars()
        .filter(|c| is_username_char(*c))
        .take(MAX_USERNAME_LEN)
        .collect();

    if base.is_empty() {
        DEFAULT_USERNAME_BASE.to_string()
    } else {
        base
    }
}

/// The `n`-th candidate for `base`: `base` itself for 0, then `base1`, `base2`, ...
///
/// The base is shortened when needed so the suffix always fits within
/// [`MAX_USERNAME_LEN`].
///
/// # Errors
///
/// Returns `UsernameError` if `base` is not made of username characters.
pub fn candidate(base: &str, n: u32) -> Result<Username, UsernameError> {
    if n == 0 {
        return Username::parse(base);
    }
    let suffix = n.to_string();
    let keep = MAX_USERNAME_LEN.saturating_sub(suffix.len());
    let head: String = base.chars().take(keep).collect();
    Username::parse(&format!("{head}{suffix}"))
}

/// Username rule violations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UsernameError {
    /// Nothing left after trimming.
    #[error("username is empty")]
    Empty,

    /// Longer than the maximum.
    #[error("username longer than {max} characters")]
    TooLong {
        /// Maximum length.
        max: usize,
    },

    /// A character outside `[a-z0-9_.]`.
    #[error("username contains invalid character {0:?}")]
    InvalidCharacter(char),
}
