//! Router configuration.
//!
//! This module sets up the Axum router with all routes and middleware.

use std::sync::Arc;
use std::time::Duration;

use axum::routing::{get, post, put};
use axum::Router;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{accounts, conversations, follows, health, notifications};
use crate::state::AppState;

/// Maximum concurrent requests for API endpoints.
const API_MAX_CONCURRENT_REQUESTS: usize = 100;

/// Create the service router with all routes and middleware.
///
/// # Routes
///
/// ## Public
/// - `GET /health` - Health check
///
/// ## Accounts
/// - `POST /v1/accounts` - Register the caller
/// - `GET /v1/accounts/me` - Caller's account
/// - `GET /v1/accounts/:id` - Any account
/// - `GET /v1/usernames/:name` - Username availability
///
/// ## Follow graph
/// - `PUT /v1/following/:target` - Follow
/// - `DELETE /v1/following/:target` - Unfollow
/// - `GET /v1/accounts/:id/followers`
/// - `GET /v1/accounts/:id/following`
///
/// ## Notifications
/// - `GET /v1/notifications?limit=&unread_only=`
/// - `POST /v1/notifications/:id/read`
/// - `POST /v1/notifications/read-all`
///
/// ## Conversations
/// - `POST /v1/conversations` - Open with `participant_id`
/// - `GET /v1/conversations/:id`
/// - `DELETE /v1/conversations/:id` - Delete with all messages
/// - `GET /v1/conversations/:id/messages`
/// - `POST /v1/conversations/:id/messages`
pub fn create_router(state: AppState) -> Router {
    let cors_origins = state.config.cors_origins.clone();
    let max_body_bytes = state.config.max_body_bytes;
    let request_timeout_seconds = state.config.request_timeout_seconds;

    let cors = build_cors_layer(&cors_origins);

    let state = Arc::new(state);

    let api_routes = Router::new()
        // Accounts
        .route("/accounts", post(accounts::create_account))
        .route("/accounts/me", get(accounts::get_me))
        .route("/accounts/:id", get(accounts::get_account))
        .route("/accounts/:id/followers", get(follows::list_followers))
        .route("/accounts/:id/following", get(follows::list_following))
        .route("/usernames/:name", get(accounts::check_username))
        // Follow graph
        .route(
            "/following/:target",
            put(follows::follow).delete(follows::unfollow),
        )
        // Notifications
        .route("/notifications", get(notifications::list_notifications))
        .route("/notifications/read-all", post(notifications::mark_all_read))
        .route("/notifications/:id/read", post(notifications::mark_read))
        // Conversations
        .route("/conversations", post(conversations::open_conversation))
        .route(
            "/conversations/:id",
            get(conversations::get_conversation).delete(conversations::delete_conversation),
        )
        .route(
            "/conversations/:id/messages",
            get(conversations::list_messages).post(conversations::send_message),
        )
        .layer(ConcurrencyLimitLayer::new(API_MAX_CONCURRENT_REQUESTS));

    Router::new()
        .route("/health", get(health::health))
        .nest("/v1", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .layer(TimeoutLayer::new(Duration::from_secs(
            request_timeout_seconds,
        )))
        .with_state(state)
}

/// Build the CORS layer from configured origins.
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}
