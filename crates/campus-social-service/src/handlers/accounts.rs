//! Account registration and lookup handlers.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use campus_social_core::{Account, AccountId, Profile, Username};
use campus_social_graph::Registration;

use super::parse_id;
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;

/// Account response.
#[derive(Debug, Serialize)]
pub struct AccountResponse {
    /// Account ID.
    pub id: String,
    /// Unique handle.
    pub username: String,
    /// Name shown to other users.
    pub display_name: String,
    /// Contact email; only returned to the owner.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// First name.
    pub first_name: Option<String>,
    /// Last name.
    pub last_name: Option<String>,
    /// Short bio.
    pub bio: Option<String>,
    /// Avatar URL.
    pub avatar_url: Option<String>,
    /// Number of followers.
    pub follower_count: usize,
    /// Number of accounts followed.
    pub following_count: usize,
    /// Created timestamp.
    pub created_at: String,
}

impl From<&Account> for AccountResponse {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id.to_string(),
            username: account.username.to_string(),
            display_name: account.display_name(),
            email: Some(account.email.clone()),
            first_name: account.profile.first_name.clone(),
            last_name: account.profile.last_name.clone(),
            bio: account.profile.bio.clone(),
            avatar_url: account.profile.avatar_url.clone(),
            follower_count: account.follower_ids.len(),
            following_count: account.following_ids.len(),
            created_at: account.created_at.to_rfc3339(),
        }
    }
}

impl AccountResponse {
    /// The view of an account given to anyone but its owner.
    #[must_use]
    pub fn public(account: &Account) -> Self {
        Self {
            email: None,
            ..Self::from(account)
        }
    }
}

/// Create account request.
#[derive(Debug, Deserialize)]
pub struct CreateAccountRequest {
    /// Contact email; seeds the username when none is requested.
    pub email: String,
    /// Requested username.
    #[serde(default)]
    pub username: Option<String>,
    /// First name.
    #[serde(default)]
    pub first_name: Option<String>,
    /// Last name.
    #[serde(default)]
    pub last_name: Option<String>,
    /// Short bio.
    #[serde(default)]
    pub bio: Option<String>,
    /// Avatar URL.
    #[serde(default)]
    pub avatar_url: Option<String>,
}

/// Register the caller's account.
pub async fn create_account(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(body): Json<CreateAccountRequest>,
) -> Result<Json<AccountResponse>, ApiError> {
    let email = body.email.trim();
    if email.is_empty() {
        return Err(ApiError::BadRequest("email is required".into()));
    }

    let registration = Registration {
        email: email.to_string(),
        desired_username: body.username,
        profile: Profile {
            first_name: body.first_name,
            last_name: body.last_name,
            bio: body.bio,
            avatar_url: body.avatar_url,
        },
    };

    let account = state
        .graph
        .identity
        .register_account(auth.account_id, registration)
        .await?;

    Ok(Json(AccountResponse::from(&account)))
}

/// Get the caller's account.
pub async fn get_me(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> Result<Json<AccountResponse>, ApiError> {
    let account = state.graph.identity.get_account(auth.account_id).await?;
    Ok(Json(AccountResponse::from(&account)))
}

/// Get any account by id.
pub async fn get_account(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<AccountResponse>, ApiError> {
    let id: AccountId = parse_id(&id, "account")?;
    let account = state.graph.identity.get_account(id).await?;

    if id == auth.account_id {
        Ok(Json(AccountResponse::from(&account)))
    } else {
        Ok(Json(AccountResponse::public(&account)))
    }
}

/// Username availability response.
#[derive(Debug, Serialize)]
pub struct UsernameAvailability {
    /// The normalised username that was checked.
    pub username: String,
    /// Whether no account currently holds it.
    pub available: bool,
}

/// Check whether a username is free right now.
///
/// The answer is advisory: registration checks again.
pub async fn check_username(
    State(state): State<Arc<AppState>>,
    _auth: AuthUser,
    Path(name): Path<String>,
) -> Result<Json<UsernameAvailability>, ApiError> {
    let username = Username::parse(&name)
        .map_err(|e| ApiError::BadRequest(format!("invalid username: {e}")))?;
    let taken = state.graph.identity.is_taken(&username).await?;

    Ok(Json(UsernameAvailability {
        username: username.to_string(),
        available: !taken,
    }))
}
