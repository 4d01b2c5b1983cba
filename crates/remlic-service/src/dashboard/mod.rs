//! Dashboard loading and view state.

pub mod entry;
pub mod service;
pub mod state;

pub use entry::{DashboardView, RecordView, TypeEntry};
pub use service::DashboardService;
pub use state::DashboardState;
