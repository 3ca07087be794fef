//! Campus Social HTTP client implementation.

use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;

use campus_social_core::{AccountId, ConversationId, NotificationId};

use crate::error::ClientError;
use crate::types::{
    AccountResponse, ApiErrorResponse, ConversationResponse, DeleteConversationResponse,
    FollowListResponse, FollowResponse, HealthResponse, MarkAllReadResponse, MessageListResponse,
    MessageResponse, NotificationListResponse, OpenConversationRequest, RegisterRequest,
    SendMessageRequest, UsernameAvailability,
};

/// Campus Social API client.
///
/// Every call is made on behalf of the user whose bearer token the client
/// holds.
#[derive(Debug, Clone)]
pub struct CampusSocialClient {
    client: Client,
    base_url: String,
    token: String,
}

impl CampusSocialClient {
    /// Create a new client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Base URL of the service (e.g., `"http://campus-social:8080"`)
    /// * `token` - User JWT sent as a bearer token
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Configuration` if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Result<Self, ClientError> {
        Self::with_options(base_url, token, ClientOptions::default())
    }

    /// Create a new client with custom options.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Configuration` if the HTTP client cannot be built.
    pub fn with_options(
        base_url: impl Into<String>,
        token: impl Into<String>,
        options: ClientOptions,
    ) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(options.timeout_seconds))
            .build()
            .map_err(|e| ClientError::Configuration(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        })
    }

    /// Check service health (no authentication).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn health(&self) -> Result<HealthResponse, ClientError> {
        let response = self
            .client
            .get(format!("{}/health", self.base_url))
            .send()
            .await?;
        self.handle_response(response).await
    }

    /// Register the caller's account.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::UsernameTaken` if the requested username is in
    /// use, or another error if the request fails.
    pub async fn register(
        &self,
        request: &RegisterRequest,
    ) -> Result<AccountResponse, ClientError> {
        self.send(self.request(Method::POST, "/v1/accounts").json(request))
            .await
    }

    /// The caller's account.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn me(&self) -> Result<AccountResponse, ClientError> {
        let request = self.request(Method::GET, "/v1/accounts/me");
        self.send(request).await
    }

    /// Any account by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn get_account(&self, id: AccountId) -> Result<AccountResponse, ClientError> {
        self.send(self.request(Method::GET, &format!("/v1/accounts/{id}")))
            .await
    }

    /// Whether `username` is free right now.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn username_available(
        &self,
        username: &str,
    ) -> Result<UsernameAvailability, ClientError> {
        self.send(self.request(Method::GET, &format!("/v1/usernames/{username}")))
            .await
    }

    /// Follow `target`.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::AsymmetricEdge` if the follow was only half
    /// applied (repeat the call), or another error if the request fails.
    pub async fn follow(&self, target: AccountId) -> Result<FollowResponse, ClientError> {
        self.send(self.request(Method::PUT, &format!("/v1/following/{target}")))
            .await
    }

    /// Unfollow `target`.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::AsymmetricEdge` if the unfollow was only half
    /// applied (repeat the call), or another error if the request fails.
    pub async fn unfollow(&self, target: AccountId) -> Result<FollowResponse, ClientError> {
        self.send(self.request(Method::DELETE, &format!("/v1/following/{target}")))
            .await
    }

    /// Accounts following `id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn followers(&self, id: AccountId) -> Result<FollowListResponse, ClientError> {
        self.send(self.request(Method::GET, &format!("/v1/accounts/{id}/followers")))
            .await
    }

    /// Accounts `id` follows.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn following(&self, id: AccountId) -> Result<FollowListResponse, ClientError> {
        self.send(self.request(Method::GET, &format!("/v1/accounts/{id}/following")))
            .await
    }

    /// The caller's notifications, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn notifications(
        &self,
        limit: usize,
        unread_only: bool,
    ) -> Result<NotificationListResponse, ClientError> {
        let limit = limit.to_string();
        let unread_only = unread_only.to_string();
        self.send(
            self.request(Method::GET, "/v1/notifications")
                .query(&[("limit", limit.as_str()), ("unread_only", unread_only.as_str())]),
        )
        .await
    }

    /// Mark one notification as read.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::NotFound` if there is no such notification.
    pub async fn mark_read(&self, id: NotificationId) -> Result<(), ClientError> {
        let _: serde_json::Value = self
            .send(self.request(Method::POST, &format!("/v1/notifications/{id}/read")))
            .await?;
        Ok(())
    }

    /// Mark all notifications as read; returns how many changed.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn mark_all_read(&self) -> Result<usize, ClientError> {
        let response: MarkAllReadResponse = self
            .send(self.request(Method::POST, "/v1/notifications/read-all"))
            .await?;
        Ok(response.updated)
    }

    /// Open (or fetch) the conversation with `participant`.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::ConversationDeleting` while a previous
    /// conversation with the same participant is still being deleted.
    pub async fn open_conversation(
        &self,
        participant: AccountId,
    ) -> Result<ConversationResponse, ClientError> {
        let participant = participant.to_string();
        self.send(
            self.request(Method::POST, "/v1/conversations")
                .json(&OpenConversationRequest {
                    participant_id: &participant,
                }),
        )
        .await
    }

    /// A conversation.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn get_conversation(
        &self,
        id: &ConversationId,
    ) -> Result<ConversationResponse, ClientError> {
        self.send(self.request(Method::GET, &format!("/v1/conversations/{id}")))
            .await
    }

    /// Send a message.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::ConversationDeleting` if deletion has started.
    pub async fn send_message(
        &self,
        id: &ConversationId,
        body: &str,
    ) -> Result<MessageResponse, ClientError> {
        self.send(
            self.request(Method::POST, &format!("/v1/conversations/{id}/messages"))
                .json(&SendMessageRequest { body }),
        )
        .await
    }

    /// The latest `limit` messages, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn list_messages(
        &self,
        id: &ConversationId,
        limit: usize,
    ) -> Result<MessageListResponse, ClientError> {
        self.send(
            self.request(Method::GET, &format!("/v1/conversations/{id}/messages"))
                .query(&[("limit", limit)]),
        )
        .await
    }

    /// Delete a conversation and its messages.
    ///
    /// A response with `success == false` is not an error; call again.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn delete_conversation(
        &self,
        id: &ConversationId,
    ) -> Result<DeleteConversationResponse, ClientError> {
        self.send(self.request(Method::DELETE, &format!("/v1/conversations/{id}")))
            .await
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{}{path}", self.base_url))
            .bearer_auth(&self.token)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        let response = request.send().await?;
        self.handle_response(response).await
    }

    /// Handle API response and convert errors.
    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = response.status();

        if status.is_success() {
            return Ok(response.json().await?);
        }

        let Ok(api_error) = response.json::<ApiErrorResponse>().await else {
            return Err(ClientError::Api {
                code: "unknown".to_string(),
                message: format!("HTTP {status}"),
                status: status.as_u16(),
            });
        };

        let code = api_error.error.code;
        let message = api_error.error.message;
        let detail = |key: &str| {
            api_error
                .error
                .details
                .as_ref()
                .and_then(|d| d.get(key))
                .and_then(serde_json::Value::as_str)
                .map(str::to_string)
        };

        tracing::debug!(status = %status, code = %code, "campus-social API error");

        Err(match code.as_str() {
            "unauthorized" => ClientError::Unauthorized,
            "username_taken" => ClientError::UsernameTaken {
                username: detail("username").unwrap_or_default(),
            },
            "asymmetric_edge" => ClientError::AsymmetricEdge,
            "conversation_deleting" => ClientError::ConversationDeleting {
                conversation_id: detail("conversation_id").unwrap_or_default(),
            },
            "not_found" => ClientError::NotFound { message },
            _ => ClientError::Api {
                code,
                message,
                status: status.as_u16(),
            },
        })
    }
}

/// Client options for customization.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Request timeout in seconds (default: 30).
    pub timeout_seconds: u64,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
        }
    }
}
