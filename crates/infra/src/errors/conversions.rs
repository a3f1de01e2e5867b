//! Conversions from external infrastructure errors into domain errors.

use emploistore_domain::EmploiStoreError;
use reqwest::Error as HttpError;
use toml::de::Error as TomlError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub EmploiStoreError);

impl From<InfraError> for EmploiStoreError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<EmploiStoreError> for InfraError {
    fn from(value: EmploiStoreError) -> Self {
        Self(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoEmploiStoreError {
    fn into_emploistore(self) -> EmploiStoreError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → EmploiStoreError */
/* -------------------------------------------------------------------------- */

impl IntoEmploiStoreError for HttpError {
    fn into_emploistore(self) -> EmploiStoreError {
        let url = self.url().map(ToString::to_string).unwrap_or_default();

        if self.is_timeout() {
            return EmploiStoreError::Network(format!("HTTP request to {url} timed out"));
        }

        if self.is_connect() {
            return EmploiStoreError::Network(format!("HTTP connection to {url} failed"));
        }

        if let Some(status) = self.status() {
            return EmploiStoreError::Transport { status: status.as_u16(), url };
        }

        if self.is_builder() {
            return EmploiStoreError::InvalidInput(format!("malformed HTTP request: {self}"));
        }

        if self.is_decode() {
            return EmploiStoreError::Decode(format!("{url}: {self}"));
        }

        EmploiStoreError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        Self(value.into_emploistore())
    }
}

/* -------------------------------------------------------------------------- */
/* toml::de::Error → EmploiStoreError */
/* -------------------------------------------------------------------------- */

impl IntoEmploiStoreError for TomlError {
    fn into_emploistore(self) -> EmploiStoreError {
        EmploiStoreError::Config(format!("Invalid TOML format: {}", self.message()))
    }
}

impl From<TomlError> for InfraError {
    fn from(value: TomlError) -> Self {
        Self(value.into_emploistore())
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */

#[cfg(test)]
mod tests {
    use std::net::TcpListener;
    use std::time::Duration;

    use reqwest::blocking::Client;

    use super::*;

    #[test]
    fn refused_connection_maps_to_network_error() {
        let client = Client::builder()
            .no_proxy()
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap();
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener); // release the port so that requests fail with ECONNREFUSED

        let error = client.get(format!("http://{addr}/")).send().unwrap_err();

        let mapped: EmploiStoreError = InfraError::from(error).into();
        match mapped {
            EmploiStoreError::Network(msg) => assert!(msg.contains("127.0.0.1")),
            other => panic!("expected network error, got {other:?}"),
        }
    }

    #[test]
    fn invalid_url_maps_to_invalid_input() {
        let client = Client::builder().no_proxy().build().unwrap();
        let error = client.get("not a url").send().unwrap_err();

        let mapped: EmploiStoreError = InfraError::from(error).into();
        assert!(matches!(mapped, EmploiStoreError::InvalidInput(_)), "got {mapped:?}");
    }

    #[test]
    fn toml_syntax_error_maps_to_config_error() {
        let error = toml::from_str::<toml::Table>("client_id = ").unwrap_err();

        let mapped: EmploiStoreError = InfraError::from(error).into();
        match mapped {
            EmploiStoreError::Config(msg) => assert!(msg.starts_with("Invalid TOML format")),
            other => panic!("expected config error, got {other:?}"),
        }
    }
}
