//! OAuth2 client-credentials tokens, cached per scope
//!
//! Each partner API is authorized by its own scope. [`TokenCache`] keeps the
//! latest token granted for every scope and only goes back to the identity
//! provider when the cached one is missing or about to expire.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Duration;
use emploistore_core::{Clock, HttpRequest, HttpTransport};
use emploistore_domain::constants::DEFAULT_TOKEN_EXPIRES_IN_SECS;
use emploistore_domain::{AccessToken, ClientConfig, EmploiStoreError, Result};
use parking_lot::Mutex;
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

/// Trait for providing access tokens
///
/// This trait allows dependency injection and testing with mock providers.
pub trait AccessTokenProvider: Send + Sync {
    /// Get a bearer token valid for `scope`.
    ///
    /// # Errors
    /// Returns `Auth` when no token can be obtained.
    fn access_token(&self, scope: &str) -> Result<String>;
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    expires_in: Option<i64>,
}

/// In-memory scope → token cache in front of the identity provider.
pub struct TokenCache {
    transport: Arc<dyn HttpTransport>,
    clock: Arc<dyn Clock>,
    token_url: String,
    realm: String,
    client_id: String,
    client_secret: String,
    validity_margin: Duration,
    tokens: Mutex<HashMap<String, AccessToken>>,
}

impl TokenCache {
    pub fn new(
        config: &ClientConfig,
        transport: Arc<dyn HttpTransport>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            transport,
            clock,
            token_url: config.token_url.clone(),
            realm: config.realm.clone(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            validity_margin: config.token_validity_margin(),
            tokens: Mutex::new(HashMap::new()),
        }
    }

    /// Token currently cached for `scope`, expired or not.
    #[must_use]
    pub fn cached(&self, scope: &str) -> Option<AccessToken> {
        self.tokens.lock().get(scope).cloned()
    }

    fn request_token(&self, scope: &str) -> Result<AccessToken> {
        let request = HttpRequest::post(&self.token_url)
            .form("realm", &self.realm)
            .form("grant_type", "client_credentials")
            .form("client_id", &self.client_id)
            .form("client_secret", &self.client_secret)
            .form("scope", format!("application_{} {scope}", self.client_id));

        let response = self.transport.execute(request)?;
        if !response.is_success() {
            warn!(scope, status = response.status, "identity provider rejected token request");
            return Err(EmploiStoreError::Auth(format!(
                "{} returned status {}",
                response.url, response.status
            )));
        }

        let body: TokenResponse = response
            .json()
            .map_err(|e| EmploiStoreError::Auth(format!("unreadable token response: {e}")))?;
        let value = body.access_token.ok_or_else(|| {
            warn!(scope, "token response carries no access_token");
            EmploiStoreError::Auth(format!("no access_token granted for scope {scope}"))
        })?;
        let expires_in = body.expires_in.unwrap_or(DEFAULT_TOKEN_EXPIRES_IN_SECS);

        let token = AccessToken::new(scope, value, self.clock.now(), expires_in).ok_or_else(|| {
            warn!(scope, expires_in, "token lifetime out of range");
            EmploiStoreError::Auth(format!("token lifetime of {expires_in}s for scope {scope} is out of range"))
        })?;
        info!(scope, expires_in, expires_at = %token.expires_at, "access token refreshed");
        Ok(token)
    }
}

impl AccessTokenProvider for TokenCache {
    /// Cached token if it outlives the validity margin, a fresh one otherwise.
    ///
    /// The lock is held across the refresh so a scope is never refreshed
    /// twice concurrently.
    #[instrument(skip(self))]
    fn access_token(&self, scope: &str) -> Result<String> {
        let mut tokens = self.tokens.lock();

        if let Some(token) = tokens.get(scope) {
            if token.is_valid_at(self.clock.now(), self.validity_margin) {
                debug!(scope, expires_at = %token.expires_at, "reusing cached access token");
                return Ok(token.value.clone());
            }
        }

        let token = self.request_token(scope)?;
        let value = token.value.clone();
        tokens.insert(scope.to_string(), token);
        Ok(value)
    }
}

impl std::fmt::Debug for TokenCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCache")
            .field("token_url", &self.token_url)
            .field("client_id", &self.client_id)
            .field("scopes", &self.tokens.lock().keys().cloned().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}
