use emploistore_domain::{EmploiStoreError, PackageInfo, ResourceDescriptor, ResourceInfo, Result};
use regex::Regex;
use tracing::debug;

use super::resource::Resource;
use crate::client::EmploiStoreClient;

/// Criteria selecting one resource of a package.
///
/// An id is used as-is. Otherwise the first resource, in package order,
/// whose name equals `name` or starts with a match of `pattern` is picked,
/// provided its `pe_version` equals the requested one when set.
#[derive(Debug, Clone, Default)]
pub struct ResourceQuery {
    id: Option<String>,
    name: Option<String>,
    pattern: Option<Regex>,
    pe_version: Option<String>,
}

impl ResourceQuery {
    #[must_use]
    pub fn by_id(id: impl Into<String>) -> Self {
        Self { id: Some(id.into()), ..Self::default() }
    }

    #[must_use]
    pub fn by_name(name: impl Into<String>) -> Self {
        Self { name: Some(name.into()), ..Self::default() }
    }

    /// Select by regular expression, matched at the start of the name.
    #[must_use]
    pub fn matching(pattern: Regex) -> Self {
        Self { pattern: Some(pattern), ..Self::default() }
    }

    /// Like [`ResourceQuery::matching`], compiling `pattern` first.
    ///
    /// # Errors
    /// Returns `InvalidInput` when `pattern` is not a valid expression.
    pub fn matching_str(pattern: &str) -> Result<Self> {
        let pattern = Regex::new(pattern)
            .map_err(|e| EmploiStoreError::InvalidInput(format!("invalid resource pattern: {e}")))?;
        Ok(Self::matching(pattern))
    }

    /// Also accept resources with this exact name.
    #[must_use]
    pub fn or_named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Only accept resources tagged with this `pe_version`.
    #[must_use]
    pub fn pe_version(mut self, version: impl Into<String>) -> Self {
        self.pe_version = Some(version.into());
        self
    }

    fn is_empty(&self) -> bool {
        self.id.is_none() && self.name.is_none() && self.pattern.is_none()
    }

    fn accepts(&self, resource: &ResourceDescriptor) -> bool {
        let good_version =
            self.pe_version.is_none() || self.pe_version == resource.pe_version;
        let named = self.name.as_deref() == Some(resource.name.as_str());
        let matched = self
            .pattern
            .as_ref()
            .and_then(|pattern| pattern.find(&resource.name))
            .is_some_and(|m| m.start() == 0);
        good_version && (named || matched)
    }

    fn describe(&self) -> String {
        let mut parts = Vec::new();
        if let Some(name) = &self.name {
            parts.push(format!("resource named \"{name}\""));
        }
        if let Some(pattern) = &self.pattern {
            parts.push(format!("resource matching \"{}\"", pattern.as_str()));
        }
        let mut description = parts.join(" or ");
        if let Some(version) = &self.pe_version {
            description.push_str(&format!(" with pe_version \"{version}\""));
        }
        description
    }
}

/// A catalog package and the resources it groups.
#[derive(Clone)]
pub struct Package {
    info: PackageInfo,
    client: EmploiStoreClient,
}

impl Package {
    pub(crate) const fn new(info: PackageInfo, client: EmploiStoreClient) -> Self {
        Self { info, client }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.info.name
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.info.id
    }

    #[must_use]
    pub const fn info(&self) -> &PackageInfo {
        &self.info
    }

    /// Names of every resource in the package, in server order.
    #[must_use]
    pub fn list_resources(&self) -> Vec<String> {
        self.info.resource_names()
    }

    /// Id of the first resource accepted by `query`.
    ///
    /// # Errors
    /// Returns `Lookup` listing the resource names when nothing matches.
    pub fn find_resource_id(&self, query: &ResourceQuery) -> Result<String> {
        if let Some(id) = &query.id {
            return Ok(id.clone());
        }
        self.info
            .resources
            .iter()
            .find(|resource| query.accepts(resource))
            .map(|resource| resource.id.clone())
            .ok_or_else(|| EmploiStoreError::Lookup {
                query: query.describe(),
                available: self.list_resources(),
            })
    }

    /// Resolve `query` and describe the resource with `resource_show`.
    ///
    /// A soft failure of `resource_show` still yields a usable resource
    /// bound to the resolved id.
    ///
    /// # Errors
    /// Returns `InvalidInput` for a query without id, name or pattern,
    /// `Lookup` when nothing matches, and gateway errors.
    pub fn get_resource(&self, query: &ResourceQuery) -> Result<Resource> {
        if query.is_empty() {
            return Err(EmploiStoreError::InvalidInput(
                "One of resource id, name or pattern must be set".to_string(),
            ));
        }
        let id = self.find_resource_id(query)?;
        debug!(package = %self.info.name, resource = %id, "resource resolved");

        let info = match self.client.api_get("/resource_show", &[("id", id.clone())])? {
            Some(result) => serde_json::from_value(result)?,
            None => ResourceInfo { id, name: None },
        };
        Ok(Resource::new(info, self.client.clone()))
    }
}

impl std::fmt::Debug for Package {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Package").field("info", &self.info).finish_non_exhaustive()
    }
}
