//! Emploi Store service catalogue

use emploistore_domain::constants::SCOPE_SERVICES_CATALOGUE;
use emploistore_domain::Result;
use serde_json::Value;

use crate::client::EmploiStoreClient;

const SERVICES_PATH: &str = "/cataloguedesservicesemploistore/v1/api-emploistore/fichesservices";

impl EmploiStoreClient {
    /// Every service listed in the Emploi Store catalogue.
    ///
    /// # Errors
    /// Gateway errors.
    pub fn list_emploistore_services(&self) -> Result<Value> {
        self.gateway().get_json(SCOPE_SERVICES_CATALOGUE, SERVICES_PATH, &[], &[])
    }

    /// Full description of one service, with or without its images.
    ///
    /// # Errors
    /// Gateway errors.
    pub fn describe_emploistore_service(&self, service_id: &str, with_images: bool) -> Result<Value> {
        let path = format!("{SERVICES_PATH}/{service_id}/{with_images}");
        self.gateway().get_json(SCOPE_SERVICES_CATALOGUE, &path, &[], &[])
    }
}

#[cfg(test)]
mod tests {
    use emploistore_core::Method;
    use serde_json::json;

    use super::*;
    use crate::client::testing::mock_client;

    #[test]
    fn lists_services_with_catalogue_scope() {
        let (client, transport) = mock_client();
        transport.respond(Method::Get, "/fichesservices", 200, &json!([{"identifiantService": "bob"}]));

        let services = client.list_emploistore_services().unwrap();

        assert_eq!(services[0]["identifiantService"], "bob");
        assert_eq!(
            transport.requests_to("/access_token")[0].form_value("scope"),
            Some("application_my-ID api_cataloguedesservicesemploistorev1 emploistoreusagers")
        );
    }

    #[test]
    fn describe_encodes_image_flag_in_path() {
        let (client, transport) = mock_client();
        transport.respond(Method::Get, "/fichesservices/bob/false", 200, &json!({"nom": "Bob"}));

        let service = client.describe_emploistore_service("bob", false).unwrap();

        assert_eq!(service["nom"], "Bob");
        assert_eq!(transport.requests_to("/fichesservices/bob/false").len(), 1);
    }
}
