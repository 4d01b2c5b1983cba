//! PostgreSQL implementations of the store traits.

pub mod license;
pub mod profile;
pub mod row;

pub use license::LicenseRepository;
pub use profile::ProfileRepository;
