//! In-memory test doubles for the transport and clock ports
//!
//! Enabled for this crate's own tests and, through the `test-utils`
//! feature, for downstream crates.

use std::collections::VecDeque;
use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use emploistore_domain::{EmploiStoreError, Result};
use parking_lot::Mutex;
use serde_json::Value;

use crate::ports::{Clock, HttpRequest, HttpResponse, HttpTransport, Method};

struct Route {
    method: Method,
    url_suffix: String,
    responses: VecDeque<(u16, String)>,
}

/// Scripted transport that records every request it receives.
///
/// Responses are matched on method and URL suffix. Responses queued for the
/// same route are served in order and the last one keeps being served.
#[derive(Clone, Default)]
pub struct MockTransport {
    routes: Arc<Mutex<Vec<Route>>>,
    requests: Arc<Mutex<Vec<HttpRequest>>>,
}

impl MockTransport {
    /// Transport with no routes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a JSON response for `method` requests whose URL ends with
    /// `url_suffix`.
    pub fn respond(&self, method: Method, url_suffix: &str, status: u16, body: &Value) {
        self.respond_raw(method, url_suffix, status, body.to_string());
    }

    /// Queue a raw-body response.
    pub fn respond_raw(&self, method: Method, url_suffix: &str, status: u16, body: impl Into<String>) {
        let mut routes = self.routes.lock();
        let response = (status, body.into());
        if let Some(route) =
            routes.iter_mut().find(|r| r.method == method && r.url_suffix == url_suffix)
        {
            route.responses.push_back(response);
        } else {
            routes.push(Route {
                method,
                url_suffix: url_suffix.to_string(),
                responses: VecDeque::from([response]),
            });
        }
    }

    /// Every request received so far, oldest first.
    #[must_use]
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().clone()
    }

    /// Requests whose URL ends with `url_suffix`.
    #[must_use]
    pub fn requests_to(&self, url_suffix: &str) -> Vec<HttpRequest> {
        self.requests.lock().iter().filter(|r| r.url.ends_with(url_suffix)).cloned().collect()
    }

    /// Number of requests received so far.
    #[must_use]
    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }

    /// Forget the recorded requests, keeping the routes.
    pub fn clear_requests(&self) {
        self.requests.lock().clear();
    }
}

impl HttpTransport for MockTransport {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        self.requests.lock().push(request.clone());

        let mut routes = self.routes.lock();
        let route = routes
            .iter_mut()
            .filter(|r| r.method == request.method && request.url.ends_with(&r.url_suffix))
            .max_by_key(|r| r.url_suffix.len())
            .ok_or_else(|| {
                EmploiStoreError::Network(format!(
                    "no mock route for {:?} {}",
                    request.method, request.url
                ))
            })?;

        let next = if route.responses.len() > 1 {
            route.responses.pop_front()
        } else {
            route.responses.front().cloned()
        };
        let (status, body) = next.ok_or_else(|| {
            EmploiStoreError::Network(format!("no mock response for {}", request.url))
        })?;

        Ok(HttpResponse { status, url: request.url, body })
    }
}

/// Manually driven clock.
#[derive(Debug, Clone)]
pub struct MockClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl MockClock {
    /// Clock frozen at 2016-03-11T00:00:00Z.
    #[must_use]
    pub fn new() -> Self {
        Self::at(Utc.timestamp_opt(1_457_654_400, 0).single().unwrap_or_default())
    }

    /// Clock frozen at `start`.
    #[must_use]
    pub fn at(start: DateTime<Utc>) -> Self {
        Self { now: Arc::new(Mutex::new(start)) }
    }

    /// Simulate `duration` passing.
    pub fn advance(&self, duration: Duration) {
        *self.now.lock() += duration;
    }
}

impl Default for MockClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MockClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock()
    }
}
