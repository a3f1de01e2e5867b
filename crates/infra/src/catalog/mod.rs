//! Datasets published in the `infotravail` catalog
//!
//! The catalog groups resources (paginated datasets) into packages. A
//! [`Package`] resolves human-readable resource names to ids; a [`Resource`]
//! streams its records and exports them to CSV.

mod package;
mod resource;

use std::collections::BTreeMap;

use emploistore_domain::constants::CATALOG_ORGANIZATION;
use emploistore_domain::{EmploiStoreError, PackageInfo, Result};
use serde::Deserialize;
use tracing::{debug, info};

pub use package::{Package, ResourceQuery};
pub use resource::{ExportOptions, RecordsQuery, Resource, ResourceRecords};

use crate::client::EmploiStoreClient;

#[derive(Debug, Default, Deserialize)]
struct OrganizationSummary {
    #[serde(default)]
    packages: Vec<PackageInfo>,
}

impl EmploiStoreClient {
    /// Packages published by the catalog organization, keyed by name.
    ///
    /// The list is fetched once and then served from memory; an empty answer
    /// is not cached.
    ///
    /// # Errors
    /// Propagates gateway errors; `Decode` when the summary is malformed.
    pub fn list_packages(&self) -> Result<BTreeMap<String, PackageInfo>> {
        let mut cache = self.package_cache().lock();
        if !cache.is_empty() {
            debug!(packages = cache.len(), "using cached package list");
            return Ok(cache.clone());
        }

        let summary: OrganizationSummary = self
            .api_get("/organization_show", &[("id", CATALOG_ORGANIZATION.to_string())])?
            .map(serde_json::from_value)
            .transpose()?
            .unwrap_or_default();

        *cache = summary.packages.into_iter().map(|p| (p.name.clone(), p)).collect();
        info!(packages = cache.len(), "package list fetched");
        Ok(cache.clone())
    }

    /// Package with the given name, e.g. `"bmo"`, `"imt"` or `"rome"`.
    ///
    /// # Errors
    /// Returns `Lookup` listing the known names when `name` is not one of them.
    pub fn get_package(&self, name: &str) -> Result<Package> {
        let packages = self.list_packages()?;
        let id = packages.get(name).map(|p| p.id.clone()).ok_or_else(|| EmploiStoreError::Lookup {
            query: format!("package \"{name}\""),
            available: packages.keys().cloned().collect(),
        })?;
        self.get_package_by_id(&id)
    }

    /// Package with the given id.
    ///
    /// A soft failure of `package_show` yields a package with no resources.
    ///
    /// # Errors
    /// Propagates gateway errors; `Decode` when the description is malformed.
    pub fn get_package_by_id(&self, id: &str) -> Result<Package> {
        let info = match self.api_get("/package_show", &[("id", id.to_string())])? {
            Some(result) => serde_json::from_value(result)?,
            None => PackageInfo { id: id.to_string(), ..PackageInfo::default() },
        };
        debug!(package = %info.name, resources = info.resources.len(), "package described");
        Ok(Package::new(info, self.clone()))
    }
}
