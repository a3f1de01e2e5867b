//! La Bonne Boite: companies likely to hire in a given area

use emploistore_domain::constants::SCOPE_LA_BONNE_BOITE;
use emploistore_domain::{EmploiStoreError, Record, Result};
use serde::Deserialize;
use tracing::debug;

use crate::client::EmploiStoreClient;

const COMPANIES_PATH: &str = "/labonneboite/v1/company/";
const DEFAULT_DISTANCE_KM: f64 = 10.0;

/// Search around a city or a coordinate pair.
#[derive(Debug, Clone, PartialEq)]
pub struct CompanySearch {
    /// INSEE code of the city; takes precedence over coordinates unless empty
    pub city_id: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Search radius in kilometers
    pub distance: f64,
    /// ROME job codes
    pub rome_codes: Vec<String>,
    /// NAF activity codes
    pub naf_codes: Vec<String>,
    /// Contract type, e.g. `"alternance"`
    pub contract: Option<String>,
}

impl Default for CompanySearch {
    fn default() -> Self {
        Self {
            city_id: None,
            latitude: None,
            longitude: None,
            distance: DEFAULT_DISTANCE_KM,
            rome_codes: Vec::new(),
            naf_codes: Vec::new(),
            contract: None,
        }
    }
}

impl CompanySearch {
    #[must_use]
    pub fn in_city(city_id: impl Into<String>) -> Self {
        Self { city_id: Some(city_id.into()), ..Self::default() }
    }

    #[must_use]
    pub fn near(latitude: f64, longitude: f64) -> Self {
        Self { latitude: Some(latitude), longitude: Some(longitude), ..Self::default() }
    }

    #[must_use]
    pub const fn distance(mut self, kilometers: f64) -> Self {
        self.distance = kilometers;
        self
    }

    #[must_use]
    pub fn rome_codes<I, S>(mut self, codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rome_codes = codes.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn naf_codes<I, S>(mut self, codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.naf_codes = codes.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn contract(mut self, contract: impl Into<String>) -> Self {
        self.contract = Some(contract.into());
        self
    }

    /// Query parameters of the search.
    ///
    /// # Errors
    /// Returns `InvalidInput` when neither a city nor both coordinates are set.
    pub fn to_params(&self) -> Result<Vec<(&'static str, String)>> {
        let mut params = vec![("distance", self.distance.to_string())];

        let city_id = self.city_id.as_deref().filter(|city_id| !city_id.is_empty());
        match (city_id, self.latitude, self.longitude) {
            (Some(city_id), _, _) => params.push(("commune_id", city_id.to_string())),
            (None, Some(latitude), Some(longitude)) => {
                params.push(("latitude", latitude.to_string()));
                params.push(("longitude", longitude.to_string()));
            }
            _ => {
                return Err(EmploiStoreError::InvalidInput(
                    "Company search needs a city_id or both latitude and longitude".to_string(),
                ))
            }
        }

        if !self.rome_codes.is_empty() {
            params.push(("rome_codes", self.rome_codes.join(",")));
        }
        if !self.naf_codes.is_empty() {
            params.push(("naf_codes", self.naf_codes.join(",")));
        }
        if let Some(contract) = &self.contract {
            params.push(("contract", contract.clone()));
        }
        Ok(params)
    }
}

#[derive(Debug, Deserialize)]
struct CompaniesResponse {
    #[serde(default)]
    companies: Option<Vec<Record>>,
}

impl EmploiStoreClient {
    /// Companies matching `search`, as returned by La Bonne Boite.
    ///
    /// # Errors
    /// Returns `InvalidInput`, without any request, when the search has no
    /// location; otherwise gateway errors.
    pub fn get_lbb_companies(&self, search: &CompanySearch) -> Result<Vec<Record>> {
        let params = search.to_params()?;
        let response = self.gateway().get_json(SCOPE_LA_BONNE_BOITE, COMPANIES_PATH, &params, &[])?;
        let companies = serde_json::from_value::<CompaniesResponse>(response)?
            .companies
            .unwrap_or_default();
        debug!(companies = companies.len(), "La Bonne Boite companies fetched");
        Ok(companies)
    }
}
