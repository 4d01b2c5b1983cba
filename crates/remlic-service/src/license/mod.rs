//! Record orchestration: create, renew, pause and delete.

pub mod renewal;
pub mod search;
pub mod service;

pub use renewal::{auto_dash, parse_renewal_date};
pub use search::matches_search;
pub use service::{CreateOutcome, LicenseService, PauseOutcome};
