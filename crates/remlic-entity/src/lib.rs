//! # remlic-entity
//!
//! Domain entity models for RemLic. License types and subscription tiers
//! are closed enums with exhaustive lookups; records and profiles mirror
//! the backend's tables.

pub mod license;
pub mod user;
