//! # Emploi Store Domain
//!
//! Domain types and models for the Emploi Store Dev client.
//!
//! This crate contains:
//! - Catalog data types (packages, resource descriptors, records)
//! - OAuth access token model
//! - Client configuration structures
//! - Domain error types and Result definitions
//! - API constants (URLs, scopes, environment variable names)
//!
//! ## Architecture
//! - No dependencies on other workspace crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
