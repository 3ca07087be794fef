//! Campus Social HTTP API Service.
//!
//! This crate exposes the social graph over HTTP:
//!
//! - Account registration and username availability
//! - Follow / unfollow and follower lists
//! - Notifications
//! - Conversations, messages, and conversation deletion
//!
//! # Authentication
//!
//! Every `/v1` route requires a ZID JWT bearer token. The token subject is
//! the caller's account id.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// Allow some pedantic lints that are noisy for Axum handler functions
#![allow(clippy::missing_errors_doc)] // Axum handlers all return Result
#![allow(clippy::unused_async)] // Handlers are async by signature

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use config::{ServiceConfig, StorageBackend};
pub use error::ApiError;
pub use routes::create_router;
pub use state::{open_store, AppState};
