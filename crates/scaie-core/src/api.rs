//! The `ContactsApi` trait: the REST boundary the directory talks to.
//!
//! Implemented over HTTP by `scaie-http`. The directory depends on this
//! abstraction only, so tests can substitute a scripted collaborator.

use std::future::Future;

use bytes::Bytes;

use crate::{
  Result,
  contact::{
    Contact, ContactDraft, ContactId, DeleteOutcome, ImportFile, ImportOutcome,
  },
  page::{Page, PageRequest, Stats},
};

/// Abstraction over the contacts backend.
///
/// Every call is attempted exactly once; there are no retries. All methods
/// return `Send` futures so implementations can be driven from a
/// multi-threaded tokio runtime.
pub trait ContactsApi: Send + Sync {
  /// `GET /contacts/?page&size[&search]`
  ///
  /// The returned page echoes the requested page number and size.
  fn list(
    &self,
    request: PageRequest,
  ) -> impl Future<Output = Result<Page>> + Send + '_;

  /// `GET /contacts/stats`
  fn stats(&self) -> impl Future<Output = Result<Stats>> + Send + '_;

  /// `GET /contacts/{id}`
  fn get(
    &self,
    id: ContactId,
  ) -> impl Future<Output = Result<Contact>> + Send + '_;

  /// `POST /contacts/`
  fn create(
    &self,
    draft: ContactDraft,
  ) -> impl Future<Output = Result<Contact>> + Send + '_;

  /// `PUT /contacts/{id}`
  fn update(
    &self,
    id: ContactId,
    draft: ContactDraft,
  ) -> impl Future<Output = Result<Contact>> + Send + '_;

  /// `DELETE /contacts/{id}`
  fn delete(
    &self,
    id: ContactId,
  ) -> impl Future<Output = Result<DeleteOutcome>> + Send + '_;

  /// `POST /contacts/import` with multipart field `file`.
  fn import(
    &self,
    file: ImportFile,
  ) -> impl Future<Output = Result<ImportOutcome>> + Send + '_;

  /// `GET /contacts/export`, returned as raw bytes.
  fn export(&self) -> impl Future<Output = Result<Bytes>> + Send + '_;
}
