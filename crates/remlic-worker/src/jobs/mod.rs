//! Built-in job handler implementations.

pub mod notification;
pub mod subscription;

pub use notification::NotificationJobHandler;
pub use subscription::SubscriptionSweepHandler;
