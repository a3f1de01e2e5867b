//! # Emploi Store Core
//!
//! Pure client logic - no HTTP or filesystem implementations.
//!
//! This crate contains:
//! - [`pagination`]: lazy offset-based iteration over a remote datastore
//! - [`export`]: CSV serialization of paginated records
//! - [`ports`]: transport and clock interfaces implemented by `emploistore-infra`
//!
//! ## Architecture Principles
//! - Only depends on `emploistore-domain`
//! - All I/O reaches this crate through traits or `std::io::Write` sinks
//! - Strictly sequential: one batch request in flight at a time

pub mod export;
pub mod pagination;
pub mod ports;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use export::{infer_field_names, render_value, with_progress, RecordSource, TabularExporter};
pub use pagination::{Batch, PaginatedFetcher};
pub use ports::{Clock, HttpRequest, HttpResponse, HttpTransport, Method, SystemClock};
