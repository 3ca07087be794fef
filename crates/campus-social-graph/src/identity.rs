//! Username allocation and account registration.
//!
//! Uniqueness is checked with a point-in-time query that is not atomic with
//! the account write that follows it. Two registrations racing for the same
//! candidate can both pass the check; nothing here closes that window.

use std::sync::Arc;

use campus_social_core::{username, Account, AccountId, Profile, Username, USERNAME_FIELD};
use campus_social_store::schema::collections;
use campus_social_store::{from_record, keys, to_record, Query, Store};

use crate::error::{GraphError, Result};

/// Default cap on derived candidates probed before giving up.
pub const DEFAULT_MAX_USERNAME_PROBES: u32 = 10_000;

/// Input for [`IdentityAllocator::register_account`].
#[derive(Debug, Clone, Default)]
pub struct Registration {
    /// Contact email; also the seed for a derived username.
    pub email: String,
    /// Username the user asked for, if any.
    pub desired_username: Option<String>,
    /// Initial profile fields.
    pub profile: Profile,
}

/// Assigns usernames and creates account records.
#[derive(Clone)]
pub struct IdentityAllocator {
    store: Arc<dyn Store>,
    max_probes: u32,
}

impl IdentityAllocator {
    /// Create an allocator over `store`.
    #[must_use]
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            store,
            max_probes: DEFAULT_MAX_USERNAME_PROBES,
        }
    }

    /// Limit the number of derived candidates probed.
    #[must_use]
    pub fn with_max_probes(mut self, max_probes: u32) -> Self {
        self.max_probes = max_probes.max(1);
        self
    }

    /// Whether any account currently holds `name`.
    ///
    /// # Errors
    ///
    /// Returns `GraphError::Store` if the query fails.
    pub async fn is_taken(&self, name: &Username) -> Result<bool> {
        let query = Query::collection(collections::ACCOUNTS)
            .filter_eq(USERNAME_FIELD, name.as_str())
            .limit(1);
        Ok(!self.store.query(&query).await?.is_empty())
    }

    /// Pick a username for a new account.
    ///
    /// An explicit `desired` name is used as-is (after normalisation) or
    /// rejected with `UsernameTaken`; it is never renamed. Without one, the
    /// base derived from `fallback_seed` is probed as `base`, `base1`,
    /// `base2`, ... and the first free candidate is returned. A blank
    /// `desired` counts as absent.
    ///
    /// Nothing is reserved: the caller must write the account afterwards.
    ///
    /// # Errors
    ///
    /// - `GraphError::InvalidUsername` if `desired` breaks the username rules.
    /// - `GraphError::UsernameTaken` if `desired` is in use.
    /// - `GraphError::UsernameExhausted` if every probed candidate is in use.
    /// - `GraphError::Store` if a uniqueness query fails.
    pub async fn allocate_username(
        &self,
        desired: Option<&str>,
        fallback_seed: &str,
    ) -> Result<Username> {
        if let Some(raw) = desired.filter(|d| !d.trim().is_empty()) {
            let name = Username::parse(raw)?;
            if self.is_taken(&name).await? {
                tracing::debug!(username = %name, "Requested username taken");
                return Err(GraphError::UsernameTaken {
                    username: name.to_string(),
                });
            }
            return Ok(name);
        }

        let base = username::derive_base(fallback_seed);
        for n in 0..self.max_probes {
            let candidate = username::candidate(&base, n)?;
            if !self.is_taken(&candidate).await? {
                tracing::debug!(
                    username = %candidate,
                    probes = n + 1,
                    "Derived username allocated"
                );
                return Ok(candidate);
            }
        }

        tracing::warn!(base = %base, probes = self.max_probes, "Username candidates exhausted");
        Err(GraphError::UsernameExhausted {
            base,
            probes: self.max_probes,
        })
    }

    /// Allocate a username and write a new account record for `id`.
    ///
    /// # Errors
    ///
    /// - `GraphError::AccountAlreadyExists` if `id` is already registered.
    /// - Any error from [`IdentityAllocator::allocate_username`].
    /// - `GraphError::Store` if the write fails.
    pub async fn register_account(
        &self,
        id: AccountId,
        registration: Registration,
    ) -> Result<Account> {
        let path = keys::account_path(&id);
        if self.store.get(&path).await?.is_some() {
            return Err(GraphError::AccountAlreadyExists { account_id: id });
        }

        let username = self
            .allocate_username(registration.desired_username.as_deref(), &registration.email)
            .await?;

        let account = Account::new(id, username, registration.email, registration.profile);
        self.store.set(&path, to_record(&account)?).await?;

        tracing::info!(account_id = %id, username = %account.username, "Account registered");

        Ok(account)
    }

    /// Read an account.
    ///
    /// # Errors
    ///
    /// - `GraphError::AccountNotFound` if there is no such account.
    /// - `GraphError::Store` if the read fails.
    pub async fn get_account(&self, id: AccountId) -> Result<Account> {
        load_account(self.store.as_ref(), id).await
    }
}

/// Read and decode an account record.
pub(crate) async fn load_account(store: &dyn Store, id: AccountId) -> Result<Account> {
    let record = store
        .get(&keys::account_path(&id))
        .await?
        .ok_or(GraphError::AccountNotFound { account_id: id })?;
    Ok(from_record(record)?)
}
