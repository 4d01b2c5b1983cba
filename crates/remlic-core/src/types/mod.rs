//! Core type definitions shared across the RemLic workspace.

pub mod id;
pub mod limit;

pub use id::{LicenseId, UserId};
pub use limit::LicenseLimit;
