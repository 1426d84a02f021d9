//! Shared data types.

pub mod announcement;
pub mod message;

pub use announcement::{Announcement, DispatchReport, RenderedNotification, RenderedTitle};
pub use message::{Message, Notification, Sound, Title};
