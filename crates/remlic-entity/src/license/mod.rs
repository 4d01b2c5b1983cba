//! License record entities.

pub mod kind;
pub mod model;
pub mod status;

pub use kind::LicenseType;
pub use model::{LicenseRecord, NewLicense};
pub use status::{EXPIRING_SOON_DAYS, ExpiryStatus};
