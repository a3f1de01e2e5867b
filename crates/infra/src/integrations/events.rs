//! Online recruitment fairs

use emploistore_domain::constants::SCOPE_EVENTS;
use emploistore_domain::Result;
use serde_json::Value;

use crate::client::EmploiStoreClient;

const ONLINE_EVENTS_PATH: &str = "/evenements/v1/salonsenligne";

impl EmploiStoreClient {
    /// Upcoming online recruitment fairs.
    ///
    /// # Errors
    /// Gateway errors.
    pub fn list_online_events(&self) -> Result<Value> {
        self.gateway().get_json(SCOPE_EVENTS, ONLINE_EVENTS_PATH, &[], &[("Accept", "application/json")])
    }
}
