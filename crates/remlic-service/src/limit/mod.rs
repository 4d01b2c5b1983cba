//! Tier-based record limits.

pub mod engine;
pub mod service;

pub use engine::{LimitCheck, can_add, check};
pub use service::LimitService;
