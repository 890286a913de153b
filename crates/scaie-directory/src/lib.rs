//! Paginated contact listing kept in sync with the backend.
//!
//! [`ContactDirectory`] owns the current page, the aggregate stats and the
//! search query. Every successful write is followed by a full reload of both
//! the page and the stats before the write's result reaches the caller.

mod directory;
mod observer;

pub use directory::ContactDirectory;
pub use observer::{DirectoryEvent, SubscriptionId};

#[cfg(test)]
mod tests;
