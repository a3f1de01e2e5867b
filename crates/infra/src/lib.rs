//! # Emploi Store Infrastructure
//!
//! Network-facing half of the Emploi Store client.
//!
//! This crate contains:
//! - A blocking `reqwest` implementation of the transport port
//! - OAuth2 token caching and authenticated API calls
//! - The `infotravail` catalog: packages, resources, CSV export
//! - Partner APIs (La Bonne Boite, training outcomes, soft skills, service
//!   catalogue, online events)
//! - Configuration loading from the environment or files
//!
//! ## Architecture
//! - Implements traits defined in `emploistore-core`
//! - Contains all "impure" code (network, filesystem, environment)
//!
//! ```no_run
//! use emploistore_infra::{EmploiStoreClient, ExportOptions, ResourceQuery};
//!
//! # fn main() -> emploistore_domain::Result<()> {
//! let client = EmploiStoreClient::new(None, None)?;
//! let package = client.get_package("bmo")?;
//! let resource =
//!     package.get_resource(&ResourceQuery::by_name("Référentiel des familles de métier"))?;
//! resource.to_csv("ref_fap.csv", &ExportOptions::default())?;
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod catalog;
pub mod client;
pub mod config;
pub mod errors;
pub mod http;
pub mod integrations;

// Re-export commonly used items
pub use api::{AccessTokenProvider, ApiGateway, Params, TokenCache};
pub use catalog::{ExportOptions, Package, RecordsQuery, Resource, ResourceQuery, ResourceRecords};
pub use client::EmploiStoreClient;
pub use errors::InfraError;
pub use http::{HttpClient, HttpClientBuilder};
pub use integrations::CompanySearch;
