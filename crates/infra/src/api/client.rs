//! Authenticated JSON calls against the partner API base URL

use std::sync::Arc;

use emploistore_core::{HttpRequest, HttpResponse, HttpTransport};
use emploistore_domain::Result;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, instrument, warn};

use super::auth::AccessTokenProvider;

/// Query parameters, in the order they are sent.
pub type Params<'a> = [(&'a str, String)];

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    success: Option<Value>,
    #[serde(default)]
    result: Option<Value>,
}

/// Sends authenticated requests and decodes their JSON bodies.
///
/// No retry: every failure surfaces to the caller on the first attempt.
pub struct ApiGateway {
    transport: Arc<dyn HttpTransport>,
    auth: Arc<dyn AccessTokenProvider>,
    base_url: String,
}

impl ApiGateway {
    pub fn new(
        base_url: impl Into<String>,
        transport: Arc<dyn HttpTransport>,
        auth: Arc<dyn AccessTokenProvider>,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { transport, auth, base_url }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET an endpoint wrapped in a `{success, result}` envelope.
    ///
    /// Returns `Ok(None)` when `success` is absent or falsy (`false`, `null`,
    /// zero, or an empty string, array or object);
    /// that is a soft failure, not an error.
    ///
    /// # Errors
    /// Returns `Transport` on a non-2xx status, `Decode` when the body is not
    /// an envelope, plus any token or network failure.
    #[instrument(skip(self, params))]
    pub fn get_envelope(&self, scope: &str, path: &str, params: &Params<'_>) -> Result<Option<Value>> {
        let request = HttpRequest::get(self.url(path)).queries(owned(params));
        let envelope: Envelope = self.send(scope, request)?.json()?;

        if !envelope.success.as_ref().is_some_and(is_truthy) {
            warn!(path, "API answered without success");
            return Ok(None);
        }
        Ok(envelope.result)
    }

    /// GET an endpoint returning bare JSON.
    ///
    /// # Errors
    /// Returns `Transport` on a non-2xx status, `Decode` on a non-JSON body,
    /// plus any token or network failure.
    #[instrument(skip(self, params, headers))]
    pub fn get_json(
        &self,
        scope: &str,
        path: &str,
        params: &Params<'_>,
        headers: &[(&str, &str)],
    ) -> Result<Value> {
        let mut request = HttpRequest::get(self.url(path)).queries(owned(params));
        for (name, value) in headers {
            request = request.header(*name, *value);
        }
        self.send(scope, request)?.json()
    }

    /// POST to an endpoint taking its arguments in the query string.
    ///
    /// # Errors
    /// Same as [`ApiGateway::get_json`].
    #[instrument(skip(self, params))]
    pub fn post_json(&self, scope: &str, path: &str, params: &Params<'_>) -> Result<Value> {
        let request = HttpRequest::post(self.url(path)).queries(owned(params));
        self.send(scope, request)?.json()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn send(&self, scope: &str, request: HttpRequest) -> Result<HttpResponse> {
        let token = self.auth.access_token(scope)?;
        let response = self.transport.execute(request.bearer_auth(&token))?;

        if response.is_success() {
            debug!(status = response.status, url = %response.url, "API call succeeded");
        } else {
            warn!(status = response.status, url = %response.url, "API call failed");
        }
        response.error_for_status()
    }
}

impl std::fmt::Debug for ApiGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiGateway").field("base_url", &self.base_url).finish_non_exhaustive()
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n.abs() > 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(fields) => !fields.is_empty(),
    }
}

fn owned<'a>(params: &'a Params<'_>) -> impl Iterator<Item = (&'a str, String)> {
    params.iter().map(|(name, value)| (*name, value.clone()))
}

#[cfg(test)]
mod tests {
    use emploistore_core::testing::MockTransport;
    use emploistore_core::Method;
    use emploistore_domain::EmploiStoreError;
    use serde_json::json;

    use super::*;

    struct MockAuthProvider {
        token: String,
    }

    impl AccessTokenProvider for MockAuthProvider {
        fn access_token(&self, _scope: &str) -> Result<String> {
            Ok(self.token.clone())
        }
    }

    struct FailingAuthProvider;

    impl AccessTokenProvider for FailingAuthProvider {
        fn access_token(&self, scope: &str) -> Result<String> {
            Err(EmploiStoreError::Auth(format!("no token for {scope}")))
        }
    }

    fn gateway(transport: &MockTransport) -> ApiGateway {
        let auth = Arc::new(MockAuthProvider { token: "test-token".to_string() });
        ApiGateway::new("https://api.test/partenaire/", Arc::new(transport.clone()), auth)
    }

    #[test]
    fn envelope_result_is_unwrapped() {
        let transport = MockTransport::new();
        transport.respond(
            Method::Get,
            "/infotravail/v1/package_show",
            200,
            &json!({"success": true, "result": {"name": "bmo"}}),
        );

        let result = gateway(&transport)
            .get_envelope("api_infotravailv1", "/infotravail/v1/package_show", &[("id", "p-1".to_string())])
            .unwrap();

        assert_eq!(result, Some(json!({"name": "bmo"})));
        let request = &transport.requests()[0];
        assert_eq!(request.url, "https://api.test/partenaire/infotravail/v1/package_show");
        assert_eq!(request.query_value("id"), Some("p-1"));
        assert_eq!(request.header_value("Authorization"), Some("Bearer test-token"));
    }

    #[test]
    fn unsuccessful_envelope_is_soft_failure() {
        let transport = MockTransport::new();
        transport.respond(Method::Get, "/resource_show", 200, &json!({"success": false}));

        let result = gateway(&transport).get_envelope("api_infotravailv1", "/resource_show", &[]).unwrap();

        assert_eq!(result, None);
    }

    #[test]
    fn envelope_without_success_flag_is_soft_failure() {
        let transport = MockTransport::new();
        transport.respond(Method::Get, "/resource_show", 200, &json!({"result": {"id": "r"}}));

        let result = gateway(&transport).get_envelope("api_infotravailv1", "/resource_show", &[]).unwrap();

        assert_eq!(result, None);
    }

    #[test]
    fn falsy_success_flags_are_soft_failures() {
        for flag in [json!(null), json!(0), json!(""), json!([]), json!({})] {
            let transport = MockTransport::new();
            transport.respond(Method::Get, "/resource_show", 200, &json!({"success": flag, "result": null}));

            let result =
                gateway(&transport).get_envelope("api_infotravailv1", "/resource_show", &[]).unwrap();

            assert_eq!(result, None, "success = {flag}");
        }
    }

    #[test]
    fn truthy_non_boolean_success_flag_unwraps_result() {
        let transport = MockTransport::new();
        transport.respond(Method::Get, "/resource_show", 200, &json!({"success": 1, "result": {"id": "r"}}));

        let result = gateway(&transport).get_envelope("api_infotravailv1", "/resource_show", &[]).unwrap();

        assert_eq!(result, Some(json!({"id": "r"})));
    }

    #[test]
    fn error_status_is_transport_error() {
        let transport = MockTransport::new();
        transport.respond(Method::Get, "/datastore_search", 500, &json!({"error": "boom"}));

        let result = gateway(&transport).get_envelope("api_infotravailv1", "/datastore_search", &[]);

        match result {
            Err(EmploiStoreError::Transport { status, url }) => {
                assert_eq!(status, 500);
                assert_eq!(url, "https://api.test/partenaire/datastore_search");
            }
            other => panic!("expected transport error, got {other:?}"),
        }
    }

    #[test]
    fn non_json_body_is_decode_error() {
        let transport = MockTransport::new();
        transport.respond_raw(Method::Get, "/rank", 200, "<html>oops</html>");

        let result = gateway(&transport).get_json("scope", "/rank", &[], &[]);

        assert!(matches!(result, Err(EmploiStoreError::Decode(_))));
    }

    #[test]
    fn get_json_forwards_extra_headers() {
        let transport = MockTransport::new();
        transport.respond(Method::Get, "/salonsenligne", 200, &json!([{"titre": "Salon"}]));

        let result = gateway(&transport)
            .get_json("api_evenementsv1 evenements", "/salonsenligne", &[], &[("Accept", "application/json")])
            .unwrap();

        assert_eq!(result, json!([{"titre": "Salon"}]));
        assert_eq!(transport.requests()[0].header_value("accept"), Some("application/json"));
    }

    #[test]
    fn post_json_sends_query_without_body() {
        let transport = MockTransport::new();
        transport.respond(Method::Post, "/job_skills", 200, &json!({"skills": {}}));

        gateway(&transport).post_json("scope", "/job_skills", &[("code", "A1204".to_string())]).unwrap();

        let request = &transport.requests()[0];
        assert_eq!(request.method, Method::Post);
        assert_eq!(request.query_value("code"), Some("A1204"));
        assert!(request.form.is_empty());
    }

    #[test]
    fn token_failure_skips_the_call() {
        let transport = MockTransport::new();
        let gateway = ApiGateway::new(
            "https://api.test",
            Arc::new(transport.clone()),
            Arc::new(FailingAuthProvider),
        );

        let result = gateway.get_json("api_labonneboitev1", "/company/", &[], &[]);

        assert!(matches!(result, Err(EmploiStoreError::Auth(_))));
        assert_eq!(transport.request_count(), 0);
    }
}
