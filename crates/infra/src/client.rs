//! Entry point of the library
//!
//! [`EmploiStoreClient`] owns the configuration, the transport, the token
//! cache and the API gateway. The catalog and partner API calls are
//! implemented on it in [`crate::catalog`] and [`crate::integrations`].

use std::collections::BTreeMap;
use std::sync::Arc;

use emploistore_core::{Clock, HttpTransport, SystemClock};
use emploistore_domain::constants::SCOPE_INFOTRAVAIL;
use emploistore_domain::{ClientConfig, PackageInfo, Result};
use parking_lot::Mutex;
use serde_json::Value;
use tracing::debug;

use crate::api::{AccessTokenProvider, ApiGateway, Params, TokenCache};
use crate::config;
use crate::http::HttpClient;

const INFOTRAVAIL_PREFIX: &str = "/infotravail/v1";

/// Client of the Emploi Store API.
///
/// Nothing is sent until data is requested. Cloning is cheap: clones share
/// the token cache and the package list.
#[derive(Clone)]
pub struct EmploiStoreClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    config: ClientConfig,
    tokens: Arc<TokenCache>,
    gateway: ApiGateway,
    packages: Mutex<BTreeMap<String, PackageInfo>>,
}

impl EmploiStoreClient {
    /// Client for the given credentials, read from `EMPLOI_STORE_CLIENT_ID`
    /// and `EMPLOI_STORE_CLIENT_SECRET` when not provided.
    ///
    /// # Errors
    /// Returns `Config` when a credential is missing or the HTTP client
    /// cannot be built.
    pub fn new(client_id: Option<&str>, client_secret: Option<&str>) -> Result<Self> {
        let (client_id, client_secret) =
            config::resolve_credentials(client_id, client_secret, |key| std::env::var(key).ok())?;
        Self::from_config(ClientConfig::new(client_id, client_secret))
    }

    /// Client configured entirely from the environment.
    ///
    /// # Errors
    /// See [`config::load_from_env`].
    pub fn from_env() -> Result<Self> {
        Self::from_config(config::load_from_env()?)
    }

    /// Client talking to the network through a `reqwest` blocking client.
    ///
    /// # Errors
    /// Returns `Config` for empty credentials, or the HTTP client build error.
    pub fn from_config(config: ClientConfig) -> Result<Self> {
        config::validate(&config)?;
        let http = HttpClient::builder()
            .timeout(config.request_timeout())
            .user_agent(concat!("emploistore/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::with_transport(config, Arc::new(http), Arc::new(SystemClock)))
    }

    /// Client over caller-provided transport and clock.
    pub fn with_transport(
        config: ClientConfig,
        transport: Arc<dyn HttpTransport>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let tokens = Arc::new(TokenCache::new(&config, Arc::clone(&transport), clock));
        let auth: Arc<dyn AccessTokenProvider> = tokens.clone();
        let gateway = ApiGateway::new(config.api_url.clone(), transport, auth);
        debug!(api_url = %config.api_url, client_id = %config.client_id, "client created");

        Self {
            inner: Arc::new(ClientInner {
                config,
                tokens,
                gateway,
                packages: Mutex::new(BTreeMap::new()),
            }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// Gateway for endpoints without a dedicated method.
    #[must_use]
    pub fn gateway(&self) -> &ApiGateway {
        &self.inner.gateway
    }

    /// Bearer token for `scope`, valid for at least the configured margin.
    ///
    /// # Errors
    /// Returns `Auth` when the identity provider refuses the credentials.
    pub fn access_token(&self, scope: &str) -> Result<String> {
        self.inner.tokens.access_token(scope)
    }

    /// Call an action of the `infotravail` v1 API, e.g. `/package_show`.
    ///
    /// Returns the envelope's `result`, or `None` when the API reports a
    /// failure.
    ///
    /// # Errors
    /// See [`ApiGateway::get_envelope`].
    pub fn api_get(&self, action: &str, params: &Params<'_>) -> Result<Option<Value>> {
        self.inner.gateway.get_envelope(
            SCOPE_INFOTRAVAIL,
            &format!("{INFOTRAVAIL_PREFIX}{action}"),
            params,
        )
    }

    pub(crate) fn package_cache(&self) -> &Mutex<BTreeMap<String, PackageInfo>> {
        &self.inner.packages
    }
}

impl std::fmt::Debug for EmploiStoreClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmploiStoreClient")
            .field("config", &self.inner.config)
            .field("gateway", &self.inner.gateway)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Arc;

    use emploistore_core::testing::{MockClock, MockTransport};
    use emploistore_core::Method;
    use emploistore_domain::ClientConfig;
    use serde_json::{json, Value};

    use super::EmploiStoreClient;

    pub const API_URL: &str = "https://api.test/partenaire";

    /// Client over a mock transport that grants any token request.
    pub fn mock_client() -> (EmploiStoreClient, MockTransport) {
        let transport = MockTransport::new();
        transport.respond(
            Method::Post,
            "/access_token",
            200,
            &json!({"access_token": "tok", "expires_in": 600}),
        );
        let config = ClientConfig::new("my-ID", "my-Secret")
            .with_api_url(API_URL)
            .with_token_url("https://auth.test/access_token");
        let client = EmploiStoreClient::with_transport(
            config,
            Arc::new(transport.clone()),
            Arc::new(MockClock::new()),
        );
        (client, transport)
    }

    /// `{success: true, result}` envelope.
    pub fn envelope(result: Value) -> Value {
        json!({"success": true, "result": result})
    }
}
