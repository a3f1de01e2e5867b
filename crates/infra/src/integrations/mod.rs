//! Partner APIs outside the `infotravail` catalog
//!
//! Each API is authorized by its own scope and answers with bare JSON. The
//! calls are methods of [`crate::EmploiStoreClient`].

pub mod events;
pub mod labonneboite;
pub mod services;
pub mod soft_skills;
pub mod training;

pub use labonneboite::CompanySearch;
