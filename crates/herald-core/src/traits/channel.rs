//! Delivery traits.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{Announcement, DispatchReport};

/// A single recipient of announcements (console, webhook, ...).
#[async_trait]
pub trait Channel: Send + Sync {
    fn name(&self) -> &str;

    async fn send(&self, announcement: &Announcement) -> Result<()>;
}

/// Receives every announcement the scheduler fires.
///
/// Implementations report individual recipient failures through the
/// returned [`DispatchReport`]; an `Err` means the dispatch could not be
/// attempted at all.
#[async_trait]
pub trait Dispatcher: Send + Sync {
    async fn dispatch(&self, announcement: &Announcement) -> Result<DispatchReport>;
}
