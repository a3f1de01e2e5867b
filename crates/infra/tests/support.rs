//! Shared helpers for infra integration tests.
//!
//! The client is blocking: build, use and drop it inside
//! `tokio::task::spawn_blocking`, never directly on the test runtime.

use emploistore_domain::ClientConfig;
use emploistore_infra::EmploiStoreClient;
use serde_json::{json, Value};
use tracing_subscriber::EnvFilter;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TOKEN_PATH: &str = "/connexion/oauth2/access_token";
pub const INFOTRAVAIL: &str = "/partenaire/infotravail/v1";

/// Route test logs through the test harness; `RUST_LOG` selects the level.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Configuration pointing both the API and the identity provider at `base_uri`.
pub fn config_for(base_uri: &str) -> ClientConfig {
    ClientConfig::new("my-ID", "my-Secret")
        .with_api_url(format!("{base_uri}/partenaire"))
        .with_token_url(format!("{base_uri}{TOKEN_PATH}"))
}

/// Real client over `reqwest`. Call from a blocking context only.
pub fn client_for(base_uri: &str) -> EmploiStoreClient {
    EmploiStoreClient::from_config(config_for(base_uri)).expect("client should build")
}

/// Grant `token` for `scope`, expecting exactly `calls` token requests.
pub async fn mount_token_endpoint(server: &MockServer, scope: &str, token: &str, calls: u64) {
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .and(body_string_contains("grant_type=client_credentials"))
        .and(body_string_contains(scope))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"access_token": token, "expires_in": 1500})),
        )
        .expect(calls)
        .mount(server)
        .await;
}

/// `{success: true, result}` envelope of the `infotravail` API.
pub fn envelope(result: Value) -> Value {
    json!({"success": true, "result": result})
}

/// One `datastore_search` page of `(code, label)` rows.
pub fn datastore_page(total: u64, rows: &[(&str, &str)]) -> Value {
    let records: Vec<Value> = rows
        .iter()
        .enumerate()
        .map(|(index, (code, label))| {
            json!({"_id": index + 1, "\u{feff}CODE": code, "LIBELLE": label})
        })
        .collect();
    envelope(json!({"total": total, "records": records}))
}
