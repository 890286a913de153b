//! The contact directory state holder.

use bytes::Bytes;
use scaie_core::{
  Result, TransportError,
  api::ContactsApi,
  contact::{
    Contact, ContactDraft, ContactId, DeleteOutcome, ImportFile, ImportOutcome,
  },
  page::{Page, PageRequest, SearchState, Stats},
};
use tracing::{debug, warn};

use crate::observer::{DirectoryEvent, Observers, SubscriptionId};

// ─── ContactDirectory ─────────────────────────────────────────────────────────

/// Current page of contacts, aggregate stats and search query, synchronised
/// with a [`ContactsApi`].
///
/// Driven from a single task: every method takes `&mut self`, and overlapping
/// loads are not coordinated (the last response to arrive wins). Errors are
/// returned to the caller and also kept as [`Self::last_error`] for display.
#[derive(Debug)]
pub struct ContactDirectory<A> {
  api:        A,
  page:       Page,
  stats:      Stats,
  search:     SearchState,
  loading:    bool,
  last_error: Option<String>,
  observers:  Observers,
}

impl<A: ContactsApi> ContactDirectory<A> {
  /// A directory positioned on page 1 with the default page size and no
  /// data loaded yet.
  pub fn new(api: A) -> Self {
    Self {
      api,
      page: Page::empty(),
      stats: Stats::default(),
      search: SearchState::default(),
      loading: false,
      last_error: None,
      observers: Observers::default(),
    }
  }

  /// Use `size` for subsequent loads. Takes effect on the next reload.
  pub fn with_page_size(mut self, size: u32) -> Self {
    self.page.page_size = size.max(1);
    self
  }

  // ── Getters ───────────────────────────────────────────────────────────────

  pub fn api(&self) -> &A {
    &self.api
  }

  pub fn page(&self) -> &Page {
    &self.page
  }

  pub fn contacts(&self) -> &[Contact] {
    &self.page.items
  }

  pub fn stats(&self) -> &Stats {
    &self.stats
  }

  pub fn search_query(&self) -> &str {
    &self.search.query
  }

  pub fn total_pages(&self) -> u64 {
    self.page.total_pages()
  }

  pub fn is_loading(&self) -> bool {
    self.loading
  }

  /// Message of the most recent failure; cleared when the next operation
  /// starts.
  pub fn last_error(&self) -> Option<&str> {
    self.last_error.as_deref()
  }

  // ── Observers ─────────────────────────────────────────────────────────────

  /// Register `callback` for every subsequent [`DirectoryEvent`].
  pub fn subscribe(
    &mut self,
    callback: impl FnMut(&DirectoryEvent) + Send + 'static,
  ) -> SubscriptionId {
    self.observers.subscribe(Box::new(callback))
  }

  /// Returns `false` if `id` was not registered.
  pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
    self.observers.unsubscribe(id)
  }

  // ── Loading ───────────────────────────────────────────────────────────────

  /// Fetch page `page` of size `page_size` matching `query` (empty means
  /// unfiltered) and make it the current page.
  ///
  /// The stored search query is not changed; use [`Self::search`] for that.
  pub async fn load(
    &mut self,
    page: u32,
    page_size: u32,
    query: &str,
  ) -> Result<&Page> {
    let request = PageRequest::new(page, page_size, query);
    debug!(page = request.page, size = request.size, search = %request.search, "loading contacts");

    self.last_error = None;
    self.set_loading(true);
    let result = self.api.list(request).await;
    self.set_loading(false);

    let page = self.settle(result)?;
    self.page = page;
    self.observers.emit(&DirectoryEvent::PageLoaded {
      page_number: self.page.page_number,
      total_count: self.page.total_count,
    });
    Ok(&self.page)
  }

  /// Reload the current page with the current size and search query.
  pub async fn reload(&mut self) -> Result<&Page> {
    let query = self.search.query.clone();
    self.load(self.page.page_number, self.page.page_size, &query).await
  }

  /// Fetch the aggregate stats.
  pub async fn load_stats(&mut self) -> Result<&Stats> {
    self.last_error = None;
    let result = self.api.stats().await;
    let stats = self.settle(result)?;
    self.stats = stats;
    self.observers.emit(&DirectoryEvent::StatsLoaded {
      total: self.stats.total,
    });
    Ok(&self.stats)
  }

  // ── Single-record reads ───────────────────────────────────────────────────

  /// Fetch one contact. Does not touch the current page.
  pub async fn fetch(&mut self, id: ContactId) -> Result<Contact> {
    self.last_error = None;
    let result = self.api.get(id).await;
    self.settle(result)
  }

  /// Download the backend's export of the whole collection.
  pub async fn export(&mut self) -> Result<Bytes> {
    self.last_error = None;
    let result = self.api.export().await;
    self.settle(result)
  }

  // ── Mutations ─────────────────────────────────────────────────────────────
  //
  // Each write runs the mutation, then reloads the page and the stats in that
  // order. A failed mutation skips the reload. A failed reload after a
  // successful mutation returns the reload's error; the write has still
  // happened server-side.

  pub async fn create(&mut self, draft: ContactDraft) -> Result<Contact> {
    self.last_error = None;
    let result = self.api.create(draft).await;
    let created = self.settle(result)?;
    debug!(id = created.id, "contact created");
    self.refresh().await?;
    Ok(created)
  }

  pub async fn update(
    &mut self,
    id: ContactId,
    draft: ContactDraft,
  ) -> Result<Contact> {
    self.last_error = None;
    let result = self.api.update(id, draft).await;
    let updated = self.settle(result)?;
    debug!(id, "contact updated");
    self.refresh().await?;
    Ok(updated)
  }

  pub async fn delete(&mut self, id: ContactId) -> Result<DeleteOutcome> {
    self.last_error = None;
    let result = self.api.delete(id).await;
    let outcome = self.settle(result)?;
    debug!(id, "contact deleted");
    self.refresh().await?;
    Ok(outcome)
  }

  pub async fn import(&mut self, file: ImportFile) -> Result<ImportOutcome> {
    self.last_error = None;
    let file_name = file.file_name.clone();
    let result = self.api.import(file).await;
    let outcome = self.settle(result)?;
    debug!(file = %file_name, imported = outcome.imported_count, "contacts imported");
    self.refresh().await?;
    Ok(outcome)
  }

  // ── Search ────────────────────────────────────────────────────────────────

  /// Filter by `query` and jump back to page 1.
  pub async fn search(&mut self, query: impl Into<String>) -> Result<&Page> {
    self.search.query = query.into();
    self.page.page_number = 1;
    self.reload().await
  }

  /// Clear the filter and jump back to page 1.
  pub async fn reset_search(&mut self) -> Result<&Page> {
    self.search.query.clear();
    self.page.page_number = 1;
    self.reload().await
  }

  // ── Navigation ────────────────────────────────────────────────────────────

  /// Load page `n` if it lies in `[1, total_pages]`. Out-of-range requests
  /// leave everything untouched and return `Ok(false)`.
  pub async fn go_to_page(&mut self, n: u32) -> Result<bool> {
    if !self.page.contains(n) {
      debug!(requested = n, total_pages = self.total_pages(), "page out of range");
      return Ok(false);
    }
    self.load_page(n).await
  }

  /// Advance one page unless the current page is the last.
  pub async fn next_page(&mut self) -> Result<bool> {
    if !self.page.has_next() {
      return Ok(false);
    }
    self.load_page(self.page.page_number + 1).await
  }

  /// Go back one page unless on the first.
  pub async fn prev_page(&mut self) -> Result<bool> {
    if !self.page.has_prev() {
      return Ok(false);
    }
    self.load_page(self.page.page_number - 1).await
  }

  // ── Internals ─────────────────────────────────────────────────────────────

  async fn load_page(&mut self, n: u32) -> Result<bool> {
    let query = self.search.query.clone();
    self.load(n, self.page.page_size, &query).await?;
    Ok(true)
  }

  /// Reload the page, then the stats.
  async fn refresh(&mut self) -> Result<()> {
    self.reload().await?;
    self.load_stats().await?;
    Ok(())
  }

  fn set_loading(&mut self, loading: bool) {
    self.loading = loading;
    self.observers.emit(&DirectoryEvent::LoadingChanged(loading));
  }

  /// Record a failure as `last_error` and notify observers before handing
  /// the result back.
  fn settle<T>(&mut self, result: Result<T>) -> Result<T> {
    result.map_err(|err| self.fail(err))
  }

  fn fail(&mut self, err: TransportError) -> TransportError {
    let message = err.to_string();
    warn!(error = %message, "contacts operation failed");
    self.last_error = Some(message.clone());
    self.observers.emit(&DirectoryEvent::Failed { message });
    err
  }
}
