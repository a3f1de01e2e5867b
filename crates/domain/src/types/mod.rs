//! Domain types and models

pub mod auth;
pub mod catalog;
pub mod record;

pub use auth::AccessToken;
pub use catalog::{PackageInfo, ResourceDescriptor, ResourceInfo};
pub use record::{strip_bom, Record};
