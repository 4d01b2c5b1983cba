//! # remlic-database
//!
//! Persistence seam for RemLic. [`store`] defines the traits the service
//! layer depends on; [`repositories`] implements them against the
//! backend's PostgreSQL schema and [`memory`] keeps everything in
//! process for development and tests.

pub mod connection;
pub mod memory;
pub mod repositories;
pub mod store;
pub mod stores;

pub use connection::DatabasePool;
pub use memory::MemoryStore;
pub use store::{LicenseStore, ProfileStore};
pub use stores::Stores;
