//! Pagination, aggregate stats and search state.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::contact::{Contact, InterestLevel};

/// Page size used until a caller asks for another.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

// ─── Request ─────────────────────────────────────────────────────────────────

/// Parameters for `GET /contacts/?page&size&search`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
  /// 1-based page number.
  pub page:   u32,
  pub size:   u32,
  /// Free-text filter; empty means unfiltered and is not sent.
  pub search: String,
}

impl PageRequest {
  /// Build a request, clamping `page` and `size` to at least 1.
  pub fn new(page: u32, size: u32, search: impl Into<String>) -> Self {
    Self {
      page:   page.max(1),
      size:   size.max(1),
      search: search.into(),
    }
  }

  /// Query-string pairs in wire order. `search` is omitted when empty.
  pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
    let mut pairs = vec![
      ("page", self.page.to_string()),
      ("size", self.size.to_string()),
    ];
    if !self.search.is_empty() {
      pairs.push(("search", self.search.clone()));
    }
    pairs
  }
}

impl Default for PageRequest {
  fn default() -> Self {
    Self::new(1, DEFAULT_PAGE_SIZE, String::new())
  }
}

// ─── Page ────────────────────────────────────────────────────────────────────

/// One bounded slice of the contact collection plus the total count needed
/// to compute page bounds.
///
/// `page_number * page_size` may exceed `total_count` only on the last page.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
  pub items:       Vec<Contact>,
  pub total_count: u64,
  pub page_number: u32,
  pub page_size:   u32,
}

impl Page {
  /// An empty first page of the default size.
  pub fn empty() -> Self {
    Self {
      items:       Vec::new(),
      total_count: 0,
      page_number: 1,
      page_size:   DEFAULT_PAGE_SIZE,
    }
  }

  /// `ceil(total_count / page_size)`; zero when there are no contacts.
  pub fn total_pages(&self) -> u64 {
    self.total_count.div_ceil(u64::from(self.page_size.max(1)))
  }

  /// Whether `n` lies in `[1, total_pages]`.
  pub fn contains(&self, n: u32) -> bool {
    n >= 1 && u64::from(n) <= self.total_pages()
  }

  /// More contacts exist beyond this page.
  pub fn has_next(&self) -> bool {
    u64::from(self.page_number) * u64::from(self.page_size) < self.total_count
  }

  pub fn has_prev(&self) -> bool {
    self.page_number > 1
  }
}

impl Default for Page {
  fn default() -> Self {
    Self::empty()
  }
}

// ─── Stats ───────────────────────────────────────────────────────────────────

/// Response of `GET /contacts/stats`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
  #[serde(default)]
  pub total:                    u64,
  #[serde(rename = "interest_level_distribution", default)]
  pub counts_by_interest_level: BTreeMap<String, u64>,
}

impl Stats {
  /// Count for a well-known level; absent levels read as zero.
  pub fn count(&self, level: InterestLevel) -> u64 {
    self.count_named(level.as_str())
  }

  /// Count for an arbitrary level name; absent levels read as zero.
  pub fn count_named(&self, level: &str) -> u64 {
    self
      .counts_by_interest_level
      .get(level)
      .copied()
      .unwrap_or_default()
  }
}

// ─── Search ──────────────────────────────────────────────────────────────────

/// Current free-text filter. An empty query means no filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchState {
  pub query: String,
}

impl SearchState {
  pub fn is_active(&self) -> bool {
    !self.query.is_empty()
  }
}
