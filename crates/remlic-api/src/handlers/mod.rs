//! Route handlers organized by domain.

pub mod contact;
pub mod dashboard;
pub mod health;
pub mod license;
pub mod limit;
pub mod psira;
