//! Callback registration for directory state changes.

use std::fmt;

/// A state change a UI layer may want to react to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectoryEvent {
  /// A page load started (`true`) or finished (`false`).
  LoadingChanged(bool),
  PageLoaded { page_number: u32, total_count: u64 },
  StatsLoaded { total: u64 },
  /// An operation failed; `message` is what `last_error()` now returns.
  Failed { message: String },
}

/// Handle returned by [`crate::ContactDirectory::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Callback = Box<dyn FnMut(&DirectoryEvent) + Send>;

/// Registered callbacks, invoked in subscription order.
#[derive(Default)]
pub(crate) struct Observers {
  next_id: u64,
  entries: Vec<(SubscriptionId, Callback)>,
}

impl Observers {
  pub fn subscribe(&mut self, callback: Callback) -> SubscriptionId {
    let id = SubscriptionId(self.next_id);
    self.next_id += 1;
    self.entries.push((id, callback));
    id
  }

  pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
    let before = self.entries.len();
    self.entries.retain(|(entry, _)| *entry != id);
    self.entries.len() != before
  }

  pub fn emit(&mut self, event: &DirectoryEvent) {
    for (_, callback) in &mut self.entries {
      callback(event);
    }
  }
}

impl fmt::Debug for Observers {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Observers")
      .field("count", &self.entries.len())
      .finish()
  }
}
