//! Catalog payloads: packages and the resources they group

use serde::{Deserialize, Serialize};

/// Package as described by `package_show` (or summarized by
/// `organization_show`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageInfo {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub id: String,

    /// Resources in server order. Absent in some summaries.
    #[serde(default)]
    pub resources: Vec<ResourceDescriptor>,
}

impl PackageInfo {
    /// Names of all resources, in server order.
    #[must_use]
    pub fn resource_names(&self) -> Vec<String> {
        self.resources.iter().map(|r| r.name.clone()).collect()
    }
}

/// Entry of a package's resource list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceDescriptor {
    pub name: String,

    pub id: String,

    /// Pôle Emploi version tag, used to pick one yearly edition among
    /// resources sharing a name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pe_version: Option<String>,
}

/// Resource as described by `resource_show`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceInfo {
    pub id: String,

    #[serde(default)]
    pub name: Option<String>,
}
