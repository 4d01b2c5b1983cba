//! User profile and subscription entities.

pub mod profile;
pub mod reminder;
pub mod tier;

pub use profile::Profile;
pub use reminder::{ReminderFrequency, ReminderSetting};
pub use tier::Tier;
