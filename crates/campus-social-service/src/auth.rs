//! Authentication extractor.
//!
//! [`AuthUser`] validates a ZID JWT bearer token against the provider's JWKS
//! and yields the caller's [`AccountId`].

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};
use std::time::{Duration, Instant};

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use campus_social_core::AccountId;

use crate::error::ApiError;
use crate::state::AppState;

/// How long to cache JWKS keys before refreshing.
const JWKS_CACHE_DURATION: Duration = Duration::from_secs(3600);

/// Timeout for JWKS fetch requests.
const JWKS_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// An authenticated caller.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The caller's account id (may not be registered yet).
    pub account_id: AccountId,
    /// The raw subject claim from the JWT.
    pub subject: String,
}

#[async_trait::async_trait]
impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .ok_or(ApiError::Unauthorized)?;

        // Gated so the bypass never exists in production builds.
        #[cfg(any(test, feature = "test-auth"))]
        if let Some(subject) = token.strip_prefix("test-token:") {
            let account_id = subject
                .parse::<AccountId>()
                .map_err(|_| ApiError::Unauthorized)?;
            return Ok(AuthUser {
                account_id,
                subject: subject.to_string(),
            });
        }

        let claims = validate_jwt(token, state).await?;
        let account_id = claims
            .sub
            .parse::<AccountId>()
            .map_err(|_| ApiError::Unauthorized)?;

        Ok(AuthUser {
            account_id,
            subject: claims.sub,
        })
    }
}

/// JWT claims structure for ZID tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtClaims {
    /// Subject (account id).
    pub sub: String,
    /// Audience (can be string or array).
    #[serde(default)]
    pub aud: Option<serde_json::Value>,
    /// Issuer.
    pub iss: String,
    /// Expiration time.
    pub exp: i64,
    /// Issued at.
    pub iat: i64,
}

/// JWKS (JSON Web Key Set) response structure.
#[derive(Debug, Clone, Deserialize)]
pub struct Jwks {
    /// List of JWK keys.
    pub keys: Vec<Jwk>,
}

/// Single JSON Web Key.
#[derive(Debug, Clone, Deserialize)]
pub struct Jwk {
    /// Key type (e.g., "RSA").
    pub kty: String,
    /// Key ID.
    pub kid: Option<String>,
    /// RSA public key modulus (base64url encoded).
    pub n: Option<String>,
    /// RSA public key exponent (base64url encoded).
    pub e: Option<String>,
}

struct JwksCache {
    client: reqwest::Client,
    keys: HashMap<String, DecodingKey>,
    /// Used for tokens without a `kid`.
    default_key: Option<DecodingKey>,
    last_updated: Instant,
}

impl JwksCache {
    fn new() -> Self {
        let client = reqwest::Client::builder()
            .timeout(JWKS_FETCH_TIMEOUT)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            keys: HashMap::new(),
            default_key: None,
            // Start expired so the first request fetches.
            last_updated: Instant::now()
                .checked_sub(JWKS_CACHE_DURATION)
                .unwrap_or_else(Instant::now),
        }
    }

    fn is_expired(&self) -> bool {
        self.last_updated.elapsed() >= JWKS_CACHE_DURATION
    }

    fn lookup(&self, kid: Option<&str>) -> Option<DecodingKey> {
        match kid {
            Some(kid) => self.keys.get(kid).cloned(),
            None => self.default_key.clone(),
        }
    }
}

static JWKS_CACHE: OnceLock<RwLock<JwksCache>> = OnceLock::new();

fn jwks_cache() -> &'static RwLock<JwksCache> {
    JWKS_CACHE.get_or_init(|| RwLock::new(JwksCache::new()))
}

async fn validate_jwt(token: &str, state: &AppState) -> Result<JwtClaims, ApiError> {
    let header = decode_header(token).map_err(|e| {
        tracing::debug!(error = %e, "Failed to decode JWT header");
        ApiError::Unauthorized
    })?;

    let decoding_key = decoding_key(header.kid.as_deref(), state).await?;

    let mut validation = Validation::new(Algorithm::RS256);
    validation.set_audience(&[&state.config.auth_audience]);
    validation.set_issuer(&[&state.config.auth_base_url]);

    let token_data = decode::<JwtClaims>(token, &decoding_key, &validation).map_err(|e| {
        tracing::debug!(error = %e, "JWT validation failed");
        ApiError::Unauthorized
    })?;

    Ok(token_data.claims)
}

async fn decoding_key(kid: Option<&str>, state: &AppState) -> Result<DecodingKey, ApiError> {
    let cache = jwks_cache();

    {
        let cached = cache.read().await;
        if !cached.is_expired() {
            if let Some(key) = cached.lookup(kid) {
                return Ok(key);
            }
        }
    }

    let jwks = fetch_jwks(state).await?;

    let mut cached = cache.write().await;
    cached.keys.clear();
    cached.default_key = None;
    cached.last_updated = Instant::now();

    for jwk in &jwks.keys {
        if let Some(key) = jwk_to_decoding_key(jwk) {
            if let Some(ref key_kid) = jwk.kid {
                cached.keys.insert(key_kid.clone(), key.clone());
            }
            if cached.default_key.is_none() {
                cached.default_key = Some(key);
            }
        }
    }

    cached.lookup(kid).ok_or(ApiError::Unauthorized)
}

async fn fetch_jwks(state: &AppState) -> Result<Jwks, ApiError> {
    let jwks_url = format!("{}/.well-known/jwks.json", state.config.auth_base_url);

    tracing::debug!(url = %jwks_url, "Fetching JWKS");

    let client = jwks_cache().read().await.client.clone();

    let response = client.get(&jwks_url).send().await.map_err(|e| {
        tracing::error!(error = %e, url = %jwks_url, "Failed to fetch JWKS");
        ApiError::ExternalService("Failed to fetch authentication keys".into())
    })?;

    if !response.status().is_success() {
        tracing::error!(
            status = %response.status(),
            url = %jwks_url,
            "JWKS fetch returned non-success status"
        );
        return Err(ApiError::ExternalService(
            "Failed to fetch authentication keys".into(),
        ));
    }

    let jwks: Jwks = response.json().await.map_err(|e| {
        tracing::error!(error = %e, "Failed to parse JWKS response");
        ApiError::ExternalService("Failed to parse authentication keys".into())
    })?;

    tracing::info!(keys_count = jwks.keys.len(), "JWKS fetched");

    Ok(jwks)
}

/// Only RSA keys are supported.
fn jwk_to_decoding_key(jwk: &Jwk) -> Option<DecodingKey> {
    if jwk.kty != "RSA" {
        tracing::debug!(kty = %jwk.kty, "Skipping non-RSA JWK");
        return None;
    }

    let n = jwk.n.as_ref()?;
    let e = jwk.e.as_ref()?;

    DecodingKey::from_rsa_components(n, e).ok()
}
