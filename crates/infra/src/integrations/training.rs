//! Return-to-employment rate after a training

use emploistore_domain::constants::SCOPE_RETOUR_EMPLOI_FORMATION;
use emploistore_domain::{EmploiStoreError, Record, Result};
use serde_json::Value;

use crate::client::EmploiStoreClient;

const RANK_PATH: &str = "/retouralemploisuiteformation/v1/rank";

impl EmploiStoreClient {
    /// Employment-rate ranking of a training (`formacode`) in a city (INSEE
    /// code).
    ///
    /// # Errors
    /// Returns `Decode` when the answer is not a non-empty array of objects,
    /// plus gateway errors.
    pub fn get_employment_rate_rank_for_training(&self, formacode: &str, city_id: &str) -> Result<Record> {
        let params = [("formacode", formacode.to_string()), ("codeinseeville", city_id.to_string())];
        let response = self.gateway().get_json(SCOPE_RETOUR_EMPLOI_FORMATION, RANK_PATH, &params, &[])?;

        match response {
            Value::Array(entries) => match entries.into_iter().next() {
                Some(Value::Object(rank)) => Ok(rank),
                Some(other) => Err(EmploiStoreError::Decode(format!("unexpected rank entry: {other}"))),
                None => Err(EmploiStoreError::Decode(format!(
                    "no rank for formacode {formacode} in {city_id}"
                ))),
            },
            other => Err(EmploiStoreError::Decode(format!("expected a rank array, got {other}"))),
        }
    }
}
