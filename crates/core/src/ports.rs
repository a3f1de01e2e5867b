//! Transport and clock ports
//!
//! The client never talks to the network or reads the wall clock directly;
//! it goes through these traits so that token expiry and pagination can be
//! tested deterministically.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use emploistore_domain::{EmploiStoreError, Result};
use serde::de::DeserializeOwned;

/// HTTP methods used by the partner APIs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// `GET`
    Get,
    /// `POST`
    Post,
}

/// Transport-agnostic description of one HTTP call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    /// HTTP method
    pub method: Method,
    /// Absolute URL, without query string
    pub url: String,
    /// Query parameters, in the order they are sent
    pub query: Vec<(String, String)>,
    /// Extra headers, e.g. `Authorization`
    pub headers: Vec<(String, String)>,
    /// URL-encoded form body; empty means no body
    pub form: Vec<(String, String)>,
}

impl HttpRequest {
    fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            query: Vec::new(),
            headers: Vec::new(),
            form: Vec::new(),
        }
    }

    /// `GET` request to `url`.
    #[must_use]
    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::Get, url)
    }

    /// `POST` request to `url`.
    #[must_use]
    pub fn post(url: impl Into<String>) -> Self {
        Self::new(Method::Post, url)
    }

    /// Append one query parameter.
    #[must_use]
    pub fn query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    /// Append several query parameters at once.
    #[must_use]
    pub fn queries<I, K, V>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.query.extend(params.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Append one header.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Set `Authorization: Bearer <token>`.
    #[must_use]
    pub fn bearer_auth(self, token: &str) -> Self {
        self.header("Authorization", format!("Bearer {token}"))
    }

    /// Append one form field to the body.
    #[must_use]
    pub fn form(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.form.push((name.into(), value.into()));
        self
    }

    /// Header lookup, case-insensitive on the name.
    #[must_use]
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// First query parameter named `name`.
    #[must_use]
    pub fn query_value(&self, name: &str) -> Option<&str> {
        lookup(&self.query, name)
    }

    /// First form field named `name`.
    #[must_use]
    pub fn form_value(&self, name: &str) -> Option<&str> {
        lookup(&self.form, name)
    }
}

fn lookup<'a>(pairs: &'a [(String, String)], name: &str) -> Option<&'a str> {
    pairs.iter().find(|(k, _)| k == name).map(|(_, v)| v.as_str())
}

/// Status and body of a completed HTTP call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: u16,
    /// Final request URL, kept for diagnostics
    pub url: String,
    /// Raw response body
    pub body: String,
}

impl HttpResponse {
    /// Whether the status is 2xx.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Turn a non-2xx response into [`EmploiStoreError::Transport`].
    ///
    /// # Errors
    /// Returns `Transport { status, url }` when the status is not 2xx.
    pub fn error_for_status(self) -> Result<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(EmploiStoreError::Transport { status: self.status, url: self.url })
        }
    }

    /// Decode the body as JSON.
    ///
    /// # Errors
    /// Returns `Decode` when the body is not valid JSON for `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_str(&self.body)
            .map_err(|e| EmploiStoreError::Decode(format!("{}: {e}", self.url)))
    }
}

/// Blocking HTTP transport.
///
/// Implementations return `Ok` for every response the server produced,
/// whatever its status; only failures to get a response at all are errors.
pub trait HttpTransport: Send + Sync {
    /// Execute one request and wait for the full response body.
    ///
    /// # Errors
    /// Returns `Network` when no response could be obtained.
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse>;
}

impl<T: HttpTransport + ?Sized> HttpTransport for Arc<T> {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        (**self).execute(request)
    }
}

/// Wall-clock source used for token expiry decisions.
pub trait Clock: Send + Sync {
    /// Current UTC time.
    fn now(&self) -> DateTime<Utc>;
}

/// Real system clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

impl<T: Clock + ?Sized> Clock for Arc<T> {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}
