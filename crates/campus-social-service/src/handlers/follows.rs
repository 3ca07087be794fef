//! Follow graph handlers.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;

use campus_social_core::AccountId;
use campus_social_graph::FollowOutcome;

use super::parse_id;
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;

/// Follow / unfollow response.
#[derive(Debug, Serialize)]
pub struct FollowResponse {
    /// Account that was (un)followed.
    pub target_id: String,
    /// What happened.
    pub outcome: FollowOutcome,
}

/// Follow `target`.
pub async fn follow(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(target): Path<String>,
) -> Result<Json<FollowResponse>, ApiError> {
    set_following(&state, &auth, &target, true).await
}

/// Unfollow `target`.
pub async fn unfollow(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(target): Path<String>,
) -> Result<Json<FollowResponse>, ApiError> {
    set_following(&state, &auth, &target, false).await
}

async fn set_following(
    state: &AppState,
    auth: &AuthUser,
    target: &str,
    follow: bool,
) -> Result<Json<FollowResponse>, ApiError> {
    let target: AccountId = parse_id(target, "account")?;

    // An edge to a missing account could never be completed by a retry.
    if follow && target != auth.account_id {
        state.graph.identity.get_account(target).await?;
    }

    let outcome = state
        .graph
        .relationships
        .set_following(auth.account_id, target, follow)
        .await?;

    Ok(Json(FollowResponse {
        target_id: target.to_string(),
        outcome,
    }))
}

/// Follower or following list.
#[derive(Debug, Serialize)]
pub struct FollowListResponse {
    /// Account whose list this is.
    pub account_id: String,
    /// Account ids in the list.
    pub accounts: Vec<String>,
    /// Number of entries.
    pub count: usize,
}

impl FollowListResponse {
    fn new(account_id: AccountId, ids: &[AccountId]) -> Self {
        Self {
            account_id: account_id.to_string(),
            accounts: ids.iter().map(ToString::to_string).collect(),
            count: ids.len(),
        }
    }
}

/// Accounts following `id`.
pub async fn list_followers(
    State(state): State<Arc<AppState>>,
    _auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<FollowListResponse>, ApiError> {
    let id: AccountId = parse_id(&id, "account")?;
    let followers = state.graph.relationships.followers(id).await?;
    Ok(Json(FollowListResponse::new(id, &followers)))
}

/// Accounts `id` follows.
pub async fn list_following(
    State(state): State<Arc<AppState>>,
    _auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<FollowListResponse>, ApiError> {
    let id: AccountId = parse_id(&id, "account")?;
    let following = state.graph.relationships.following(id).await?;
    Ok(Json(FollowListResponse::new(id, &following)))
}
