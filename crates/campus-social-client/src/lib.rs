//! Campus Social Client SDK.
//!
//! A typed client for the campus-social HTTP API.
//!
//! # Example
//!
//! ```no_run
//! use campus_social_client::{CampusSocialClient, RegisterRequest};
//! use campus_social_core::AccountId;
//!
//! # async fn example() -> Result<(), campus_social_client::ClientError> {
//! let client = CampusSocialClient::new("http://campus-social:8080", "user-jwt")?;
//!
//! let me = client
//!     .register(&RegisterRequest::with_email("jean@uni.edu"))
//!     .await?;
//! println!("registered as {}", me.username);
//!
//! let friend: AccountId = "8f14e45f-ceea-467f-a8ad-0e7e0b2c1c55".parse().unwrap();
//! client.follow(friend).await?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod client;
mod error;
mod types;

pub use client::{CampusSocialClient, ClientOptions};
pub use error::ClientError;
pub use types::*;
