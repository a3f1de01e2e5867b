//! Client configuration structures

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_API_URL, DEFAULT_BATCH_SIZE, DEFAULT_REALM, DEFAULT_REQUEST_TIMEOUT_SECS,
    DEFAULT_TOKEN_URL, DEFAULT_TOKEN_VALIDITY_MARGIN_SECS,
};

/// Configuration for an Emploi Store client.
///
/// Only the credentials are required; every other field falls back to the
/// production defaults when omitted from a config file.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    pub client_id: String,

    pub client_secret: String,

    /// Base URL of the partner APIs
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// OAuth2 token endpoint
    #[serde(default = "default_token_url")]
    pub token_url: String,

    #[serde(default = "default_realm")]
    pub realm: String,

    /// A cached token is reused only if it stays valid this long
    #[serde(default = "default_token_validity_margin_secs")]
    pub token_validity_margin_secs: u64,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Records requested per `datastore_search` call
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

impl ClientConfig {
    /// Configuration with production defaults for the given credentials.
    #[must_use]
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            api_url: default_api_url(),
            token_url: default_token_url(),
            realm: default_realm(),
            token_validity_margin_secs: default_token_validity_margin_secs(),
            request_timeout_secs: default_request_timeout_secs(),
            batch_size: default_batch_size(),
        }
    }

    #[must_use]
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    #[must_use]
    pub fn with_token_url(mut self, token_url: impl Into<String>) -> Self {
        self.token_url = token_url.into();
        self
    }

    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    #[must_use]
    pub fn token_validity_margin(&self) -> chrono::Duration {
        i64::try_from(self.token_validity_margin_secs)
            .ok()
            .and_then(chrono::Duration::try_seconds)
            .unwrap_or(chrono::Duration::MAX)
    }
}

// Keep the secret out of logs and panic messages.
impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("api_url", &self.api_url)
            .field("token_url", &self.token_url)
            .field("realm", &self.realm)
            .field("token_validity_margin_secs", &self.token_validity_margin_secs)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("batch_size", &self.batch_size)
            .finish()
    }
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_token_url() -> String {
    DEFAULT_TOKEN_URL.to_string()
}

fn default_realm() -> String {
    DEFAULT_REALM.to_string()
}

const fn default_token_validity_margin_secs() -> u64 {
    DEFAULT_TOKEN_VALIDITY_MARGIN_SECS
}

const fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

const fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}
