//! Tests for `ContactDirectory` against a scripted in-memory collaborator.

use std::{
  collections::HashMap,
  sync::{Arc, Mutex},
};

use bytes::Bytes;
use scaie_core::{
  Result, TransportError,
  api::ContactsApi,
  contact::{
    Contact, ContactDraft, ContactId, DeleteOutcome, ImportFile, ImportOutcome,
  },
  page::{Page, PageRequest, Stats},
};
use serde_json::{Value, json};

use crate::{ContactDirectory, DirectoryEvent};

// ─── Mock collaborator ───────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
enum Call {
  List(PageRequest),
  Stats,
  Get(ContactId),
  Create,
  Update(ContactId),
  Delete(ContactId),
  Import(String),
  Export,
}

/// Serves `total` synthetic contacts and records every call.
#[derive(Debug, Default)]
struct MockApi {
  total:    Mutex<u64>,
  calls:    Mutex<Vec<Call>>,
  /// Operation name → `(status, detail)` to fail with.
  failures: Mutex<HashMap<&'static str, (u16, Option<String>)>>,
  /// JSON body `import` answers with, decoded like a real response.
  import_reply: Mutex<Option<Value>>,
}

impl MockApi {
  fn with_total(total: u64) -> Self {
    let api = Self::default();
    *api.total.lock().unwrap() = total;
    api
  }

  fn fail(&self, op: &'static str, status: u16, detail: Option<&str>) {
    self
      .failures
      .lock()
      .unwrap()
      .insert(op, (status, detail.map(str::to_owned)));
  }

  fn heal(&self, op: &'static str) {
    self.failures.lock().unwrap().remove(op);
  }

  fn calls(&self) -> Vec<Call> {
    self.calls.lock().unwrap().clone()
  }

  fn clear_calls(&self) {
    self.calls.lock().unwrap().clear();
  }

  fn list_calls(&self) -> usize {
    self
      .calls()
      .iter()
      .filter(|c| matches!(c, Call::List(_)))
      .count()
  }

  /// Record `call`, then fail if `op` is scripted to.
  fn enter(&self, op: &'static str, call: Call) -> Result<()> {
    self.calls.lock().unwrap().push(call);
    match self.failures.lock().unwrap().get(op) {
      Some((status, detail)) => {
        Err(TransportError::from_status(*status, detail.clone()))
      }
      None => Ok(()),
    }
  }

  fn contact(id: ContactId) -> Contact {
    serde_json::from_value(json!({
      "id": id,
      "name": format!("Contact {id}"),
      "phone": format!("+52{id:08}"),
    }))
    .unwrap()
  }
}

impl ContactsApi for MockApi {
  async fn list(&self, request: PageRequest) -> Result<Page> {
    self.enter("list", Call::List(request.clone()))?;
    let total = *self.total.lock().unwrap();
    let start = u64::from(request.page - 1) * u64::from(request.size);
    let end = (start + u64::from(request.size)).min(total);
    let items = (start..end).map(|i| Self::contact(i as i64 + 1)).collect();
    Ok(Page {
      items,
      total_count: total,
      page_number: request.page,
      page_size: request.size,
    })
  }

  async fn stats(&self) -> Result<Stats> {
    self.enter("stats", Call::Stats)?;
    let total = *self.total.lock().unwrap();
    Ok(Stats {
      total,
      counts_by_interest_level: [("interesado".to_string(), total)].into(),
    })
  }

  async fn get(&self, id: ContactId) -> Result<Contact> {
    self.enter("get", Call::Get(id))?;
    Ok(Self::contact(id))
  }

  async fn create(&self, _draft: ContactDraft) -> Result<Contact> {
    self.enter("create", Call::Create)?;
    let mut total = self.total.lock().unwrap();
    *total += 1;
    Ok(Self::contact(*total as i64))
  }

  async fn update(&self, id: ContactId, _draft: ContactDraft) -> Result<Contact> {
    self.enter("update", Call::Update(id))?;
    Ok(Self::contact(id))
  }

  async fn delete(&self, id: ContactId) -> Result<DeleteOutcome> {
    self.enter("delete", Call::Delete(id))?;
    let mut total = self.total.lock().unwrap();
    *total = total.saturating_sub(1);
    Ok(DeleteOutcome {
      message: "Contact deleted successfully".into(),
    })
  }

  async fn import(&self, file: ImportFile) -> Result<ImportOutcome> {
    self.enter("import", Call::Import(file.file_name))?;
    *self.total.lock().unwrap() += 3;
    let reply = self.import_reply.lock().unwrap().clone().unwrap_or_else(|| {
      json!({ "success": true, "message": "imported", "imported_count": 3 })
    });
    serde_json::from_value::<ImportOutcome>(reply).map_err(TransportError::decode)
  }

  async fn export(&self) -> Result<Bytes> {
    self.enter("export", Call::Export)?;
    Ok(Bytes::from_static(b"id,name\n"))
  }
}

/// A directory over `total` contacts with the first page already loaded.
async fn loaded(total: u64, page_size: u32) -> ContactDirectory<MockApi> {
  let mut dir =
    ContactDirectory::new(MockApi::with_total(total)).with_page_size(page_size);
  dir.reload().await.unwrap();
  dir.api().clear_calls();
  dir
}

// ─── Loading ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn load_stores_page_size_and_total() {
  let mut dir = ContactDirectory::new(MockApi::with_total(25));

  let page = dir.load(2, 10, "").await.unwrap();
  assert_eq!(page.page_number, 2);
  assert_eq!(page.items.len(), 10);

  assert_eq!(dir.page().page_size, 10);
  assert_eq!(dir.page().total_count, 25);
  assert_eq!(dir.contacts()[0].id, 11);
  assert_eq!(dir.total_pages(), 3);
  assert!(!dir.is_loading());
}

#[tokio::test]
async fn load_with_query_leaves_stored_search_alone() {
  let mut dir = ContactDirectory::new(MockApi::with_total(5));

  dir.load(1, 10, "ana").await.unwrap();

  assert_eq!(dir.search_query(), "");
  assert_eq!(dir.api().calls(), vec![Call::List(PageRequest::new(
    1, 10, "ana"
  ))]);
}

#[tokio::test]
async fn load_failure_keeps_previous_page_and_records_error() {
  let mut dir = loaded(25, 10).await;
  dir.api().fail("list", 503, None);

  let err = dir.load(2, 10, "").await.unwrap_err();

  assert_eq!(err.to_string(), "HTTP error! status: 503");
  assert_eq!(dir.last_error(), Some("HTTP error! status: 503"));
  assert_eq!(dir.page().page_number, 1);
  assert!(!dir.is_loading());
}

#[tokio::test]
async fn successful_operation_clears_last_error() {
  let mut dir = loaded(25, 10).await;
  dir.api().fail("stats", 500, Some("boom"));
  dir.load_stats().await.unwrap_err();
  assert_eq!(dir.last_error(), Some("boom"));

  dir.api().heal("stats");
  dir.load_stats().await.unwrap();
  assert_eq!(dir.last_error(), None);
  assert_eq!(dir.stats().total, 25);
}

// ─── Pagination bounds ───────────────────────────────────────────────────────

#[tokio::test]
async fn go_to_page_respects_bounds() {
  let mut dir = loaded(25, 10).await;

  assert!(!dir.go_to_page(4).await.unwrap());
  assert_eq!(dir.page().page_number, 1);
  assert!(dir.api().calls().is_empty());

  assert!(dir.go_to_page(3).await.unwrap());
  assert_eq!(dir.page().page_number, 3);
  assert_eq!(dir.contacts().len(), 5);
}

#[tokio::test]
async fn go_to_page_out_of_range_is_noop_for_any_shape() {
  for total in [0_u64, 1, 9, 10, 11, 25, 100] {
    for size in [1_u32, 3, 10, 25] {
      let mut dir = loaded(total, size).await;
      let last = total.div_ceil(u64::from(size)) as u32;
      let before = dir.page().clone();

      assert!(!dir.go_to_page(0).await.unwrap());
      assert!(!dir.go_to_page(last + 1).await.unwrap());

      assert_eq!(dir.page(), &before, "total={total} size={size}");
      assert!(dir.api().calls().is_empty());
    }
  }
}

#[tokio::test]
async fn empty_directory_has_no_pages_to_visit() {
  let mut dir = loaded(0, 10).await;
  assert!(!dir.go_to_page(1).await.unwrap());
  assert!(!dir.next_page().await.unwrap());
  assert!(!dir.prev_page().await.unwrap());
}

#[tokio::test]
async fn next_page_stops_at_last_page() {
  let mut dir = loaded(25, 10).await;

  assert!(dir.next_page().await.unwrap());
  assert!(dir.next_page().await.unwrap());
  assert_eq!(dir.page().page_number, 3);

  dir.api().clear_calls();
  assert!(!dir.next_page().await.unwrap());
  assert_eq!(dir.page().page_number, 3);
  assert!(dir.api().calls().is_empty());
}

#[tokio::test]
async fn next_page_on_exact_multiple() {
  let mut dir = loaded(20, 10).await;
  assert!(dir.next_page().await.unwrap());
  assert!(!dir.next_page().await.unwrap());
}

#[tokio::test]
async fn prev_page_stops_at_first_page() {
  let mut dir = loaded(25, 10).await;
  assert!(!dir.prev_page().await.unwrap());

  dir.go_to_page(3).await.unwrap();
  assert!(dir.prev_page().await.unwrap());
  assert_eq!(dir.page().page_number, 2);
}

// ─── Search ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn search_resets_to_first_page() {
  let mut dir = loaded(25, 10).await;
  dir.go_to_page(3).await.unwrap();
  dir.api().clear_calls();

  dir.search("x").await.unwrap();

  assert_eq!(dir.page().page_number, 1);
  assert_eq!(dir.search_query(), "x");
  assert_eq!(dir.api().calls(), vec![Call::List(PageRequest::new(
    1, 10, "x"
  ))]);
}

#[tokio::test]
async fn search_query_carries_into_navigation() {
  let mut dir = loaded(25, 10).await;
  dir.search("ana").await.unwrap();
  dir.api().clear_calls();

  dir.next_page().await.unwrap();

  assert_eq!(dir.api().calls(), vec![Call::List(PageRequest::new(
    2, 10, "ana"
  ))]);
}

#[tokio::test]
async fn reset_search_clears_query_and_page() {
  let mut dir = loaded(25, 10).await;
  dir.search("ana").await.unwrap();
  dir.next_page().await.unwrap();
  dir.api().clear_calls();

  dir.reset_search().await.unwrap();

  assert_eq!(dir.search_query(), "");
  assert_eq!(dir.page().page_number, 1);
  assert_eq!(dir.api().calls(), vec![Call::List(PageRequest::new(
    1, 10, ""
  ))]);
}

// ─── Mutations ───────────────────────────────────────────────────────────────

/// The calls a mutation on page `page` should produce after `first`.
fn mutate_then_refresh(first: Call, page: u32) -> Vec<Call> {
  vec![first, Call::List(PageRequest::new(page, 10, "")), Call::Stats]
}

#[tokio::test]
async fn create_reloads_page_then_stats() {
  let mut dir = loaded(25, 10).await;
  dir.go_to_page(3).await.unwrap();
  dir.api().clear_calls();

  let created = dir.create(ContactDraft::new("Ana", "+52")).await.unwrap();

  assert_eq!(created.id, 26);
  assert_eq!(dir.api().calls(), mutate_then_refresh(Call::Create, 3));
  assert_eq!(dir.page().total_count, 26);
  assert_eq!(dir.stats().total, 26);
  assert_eq!(dir.contacts().len(), 6);
}

#[tokio::test]
async fn update_reloads_page_then_stats() {
  let mut dir = loaded(25, 10).await;
  dir.update(4, ContactDraft::default()).await.unwrap();
  assert_eq!(dir.api().calls(), mutate_then_refresh(Call::Update(4), 1));
}

#[tokio::test]
async fn delete_reloads_page_then_stats() {
  let mut dir = loaded(25, 10).await;
  let outcome = dir.delete(4).await.unwrap();
  assert_eq!(outcome.message, "Contact deleted successfully");
  assert_eq!(dir.api().calls(), mutate_then_refresh(Call::Delete(4), 1));
  assert_eq!(dir.stats().total, 24);
}

#[tokio::test]
async fn import_reloads_page_then_stats() {
  let mut dir = loaded(25, 10).await;
  let outcome = dir
    .import(ImportFile::new("leads.csv", b"name,phone\n".to_vec()))
    .await
    .unwrap();
  assert_eq!(outcome.imported_count, 3);
  assert_eq!(
    dir.api().calls(),
    mutate_then_refresh(Call::Import("leads.csv".into()), 1)
  );
  assert_eq!(dir.stats().total, 28);
}

#[tokio::test]
async fn import_with_null_count_still_refreshes() {
  let mut dir = loaded(25, 10).await;
  *dir.api().import_reply.lock().unwrap() = Some(json!({
    "success": true,
    "message": "Imported 0 contacts",
    "imported_count": null
  }));

  let outcome = dir
    .import(ImportFile::new("leads.json", b"[]".to_vec()))
    .await
    .unwrap();
  assert_eq!(outcome.imported_count, 0);
  assert_eq!(
    dir.api().calls(),
    mutate_then_refresh(Call::Import("leads.json".into()), 1)
  );
  assert_eq!(dir.last_error(), None);
}

#[tokio::test]
async fn failed_mutation_skips_reload() {
  let mut dir = loaded(25, 10).await;
  dir.api().fail("create", 500, Some("server error"));

  let err = dir.create(ContactDraft::new("Ana", "+52")).await.unwrap_err();

  assert_eq!(err.to_string(), "server error");
  assert_eq!(dir.last_error(), Some("server error"));
  assert_eq!(dir.api().calls(), vec![Call::Create]);
}

#[tokio::test]
async fn failed_reload_after_mutation_propagates_reload_error() {
  let mut dir = loaded(25, 10).await;
  dir.api().fail("list", 502, Some("bad gateway"));

  let err = dir.delete(1).await.unwrap_err();

  assert_eq!(err.to_string(), "bad gateway");
  assert_eq!(dir.api().calls(), vec![
    Call::Delete(1),
    Call::List(PageRequest::new(1, 10, "")),
  ]);
  // The delete went through even though the caller saw an error.
  assert_eq!(*dir.api().total.lock().unwrap(), 24);
}

#[tokio::test]
async fn failed_stats_after_mutation_propagates() {
  let mut dir = loaded(25, 10).await;
  dir.api().fail("stats", 500, None);

  let err = dir.update(2, ContactDraft::default()).await.unwrap_err();

  assert_eq!(err.status(), Some(500));
  assert_eq!(dir.api().list_calls(), 1);
}

// ─── Reads that do not reload ────────────────────────────────────────────────

#[tokio::test]
async fn fetch_and_export_do_not_reload() {
  let mut dir = loaded(25, 10).await;

  assert_eq!(dir.fetch(7).await.unwrap().id, 7);
  assert_eq!(&dir.export().await.unwrap()[..], b"id,name\n");
  assert_eq!(dir.api().calls(), vec![Call::Get(7), Call::Export]);
}

// ─── Observers ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn observers_see_loading_page_and_failure_events() {
  let mut dir = ContactDirectory::new(MockApi::with_total(3));
  let seen = Arc::new(Mutex::new(Vec::new()));
  let sink = Arc::clone(&seen);
  let id = dir.subscribe(move |event| sink.lock().unwrap().push(event.clone()));

  dir.reload().await.unwrap();
  dir.api().fail("stats", 500, Some("down"));
  dir.load_stats().await.unwrap_err();

  assert_eq!(*seen.lock().unwrap(), vec![
    DirectoryEvent::LoadingChanged(true),
    DirectoryEvent::LoadingChanged(false),
    DirectoryEvent::PageLoaded {
      page_number: 1,
      total_count: 3,
    },
    DirectoryEvent::Failed {
      message: "down".into(),
    },
  ]);

  assert!(dir.unsubscribe(id));
  assert!(!dir.unsubscribe(id));
  seen.lock().unwrap().clear();
  dir.reload().await.unwrap();
  assert!(seen.lock().unwrap().is_empty());
}
