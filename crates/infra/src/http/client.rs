use std::time::Duration;

use emploistore_core::{HttpRequest, HttpResponse, HttpTransport, Method};
use emploistore_domain::{constants::DEFAULT_REQUEST_TIMEOUT_SECS, EmploiStoreError, Result};
use reqwest::blocking::Client as ReqwestClient;
use tracing::debug;

use crate::errors::InfraError;

/// Blocking HTTP client with a per-request timeout.
///
/// Every response the server produces is returned as-is, whatever its status;
/// status handling belongs to the callers.
#[derive(Clone)]
pub struct HttpClient {
    client: ReqwestClient,
}

impl HttpClient {
    /// Start building a new HTTP client.
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    /// Convenience constructor with default configuration.
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient").finish_non_exhaustive()
    }
}

impl HttpTransport for HttpClient {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
        };
        debug!(%method, url = %request.url, "sending HTTP request");

        let mut builder = self.client.request(method.clone(), &request.url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        if !request.form.is_empty() {
            builder = builder.form(&request.form);
        }

        let response = builder.send().map_err(into_domain)?;
        let status = response.status().as_u16();
        let url = response.url().to_string();
        debug!(%method, %url, status, "received HTTP response");

        let body = response.text().map_err(into_domain)?;
        Ok(HttpResponse { status, url, body })
    }
}

/// Builder for [`HttpClient`].
#[derive(Debug)]
pub struct HttpClientBuilder {
    timeout: Duration,
    user_agent: Option<String>,
    use_system_proxy: bool,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            user_agent: None,
            use_system_proxy: false,
        }
    }
}

impl HttpClientBuilder {
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Honor `HTTP_PROXY`-style environment variables. Off by default.
    pub fn use_system_proxy(mut self, enabled: bool) -> Self {
        self.use_system_proxy = enabled;
        self
    }

    pub fn build(self) -> Result<HttpClient> {
        let mut builder = ReqwestClient::builder().timeout(self.timeout);

        if !self.use_system_proxy {
            builder = builder.no_proxy();
        }

        if let Some(agent) = self.user_agent {
            builder = builder.user_agent(agent);
        }

        let client = builder.build().map_err(into_domain)?;

        Ok(HttpClient { client })
    }
}

fn into_domain(err: reqwest::Error) -> EmploiStoreError {
    InfraError::from(err).into()
}

#[cfg(test)]
mod tests {
    use std::net::TcpListener;

    use wiremock::matchers::{body_string_contains, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn client() -> HttpClient {
        HttpClient::builder().timeout(Duration::from_secs(5)).build().unwrap()
    }

    async fn execute(request: HttpRequest) -> Result<HttpResponse> {
        tokio::task::spawn_blocking(move || client().execute(request)).await.unwrap()
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn sends_query_and_headers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/infotravail/v1/datastore_search"))
            .and(query_param("id", "r-1"))
            .and(query_param("offset", "200"))
            .and(header("Authorization", "Bearer tok"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"success":true}"#))
            .expect(1)
            .mount(&server)
            .await;

        let request = HttpRequest::get(format!("{}/infotravail/v1/datastore_search", server.uri()))
            .queries([("id", "r-1"), ("offset", "200")])
            .bearer_auth("tok");
        let response = execute(request).await.unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(response.body, r#"{"success":true}"#);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn posts_url_encoded_form() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/oauth/token"))
            .and(body_string_contains("grant_type=client_credentials"))
            .and(body_string_contains("realm=%2Fpartenaire"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
            .expect(1)
            .mount(&server)
            .await;

        let request = HttpRequest::post(format!("{}/oauth/token", server.uri()))
            .form("realm", "/partenaire")
            .form("grant_type", "client_credentials");
        let response = execute(request).await.unwrap();

        assert_eq!(response.status, 200);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn error_statuses_are_returned_not_raised() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
            .mount(&server)
            .await;

        let response = execute(HttpRequest::get(format!("{}/x", server.uri()))).await.unwrap();

        assert_eq!(response.status, 503);
        assert!(response.url.ends_with("/x"));
        assert!(matches!(
            response.error_for_status(),
            Err(EmploiStoreError::Transport { status: 503, .. })
        ));
    }

    #[test]
    fn refused_connection_is_network_error() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let result = client().execute(HttpRequest::get(format!("http://{addr}/")));

        match result {
            Err(EmploiStoreError::Network(msg)) => assert!(msg.contains("HTTP connection")),
            other => panic!("expected network error, got {other:?}"),
        }
    }
}
