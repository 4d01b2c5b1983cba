//! # remlic-service
//!
//! Business logic for RemLic. Services receive their store handles and
//! configuration through constructor injection (`Arc` references) and are
//! shared by the HTTP layer, the worker and the CLI.

pub mod contact;
pub mod context;
pub mod dashboard;
pub mod license;
pub mod limit;
pub mod psira;
pub mod reminder;
pub mod subscription;

pub use contact::{ContactMessage, ContactService};
pub use context::RequestContext;
pub use dashboard::{DashboardService, DashboardState, DashboardView, TypeEntry};
pub use license::LicenseService;
pub use limit::{LimitCheck, LimitService};
pub use psira::{PsiraClient, PsiraLookup, PsiraOutcome};
pub use reminder::{ReminderReport, ReminderService};
pub use subscription::{SubscriptionService, SweepReport};
