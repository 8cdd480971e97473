pub mod bell;
pub mod config;
pub mod console;
pub mod models;
pub mod services;
pub mod source;

#[cfg(test)]
mod testing;

pub use bell::{BellState, ClickBus, ClickTarget, MountedBell, NotificationBell};
pub use models::{Notification, NotificationKind, NotificationSnapshot};
pub use services::FetchMode;
pub use source::{HttpNotificationSource, NotificationSource};
