//! Async HTTP client wrapping the contacts JSON API.

use std::time::Duration;

use bytes::Bytes;
use reqwest::{Client, RequestBuilder, Response, multipart};
use scaie_core::{
  Result, TransportError,
  api::ContactsApi,
  contact::{
    Contact, ContactDraft, ContactId, DeleteOutcome, ImportFile, ImportOutcome,
  },
  page::{Page, PageRequest, Stats},
};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::wire::{ContactList, ErrorBody};

/// Where the backend is mounted when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api";

/// Connection settings for the contacts API.
#[derive(Debug, Clone)]
pub struct HttpConfig {
  /// Base URL including the API prefix, e.g. `http://host:8000/api`.
  pub base_url: String,
  pub timeout:  Duration,
}

impl Default for HttpConfig {
  fn default() -> Self {
    Self {
      base_url: DEFAULT_BASE_URL.to_string(),
      timeout:  Duration::from_secs(30),
    }
  }
}

/// Async HTTP client for the contacts REST API.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Debug, Clone)]
pub struct HttpContactsApi {
  client: Client,
  config: HttpConfig,
}

impl HttpContactsApi {
  pub fn new(config: HttpConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(config.timeout)
      .build()
      .map_err(TransportError::network)?;
    Ok(Self { client, config })
  }

  pub fn base_url(&self) -> &str {
    &self.config.base_url
  }

  fn url(&self, path: &str) -> String {
    format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
  }

  /// Send `req` and hand back the response if its status is a success.
  ///
  /// Non-success responses become [`TransportError::Status`] carrying the
  /// body's `detail` when there is one.
  async fn dispatch(&self, label: &str, req: RequestBuilder) -> Result<Response> {
    debug!(request = label, "sending");
    let resp = req.send().await.map_err(|e| {
      warn!(request = label, error = %e, "request did not complete");
      TransportError::network(e)
    })?;

    let status = resp.status();
    if status.is_success() {
      return Ok(resp);
    }

    let detail = resp
      .json::<ErrorBody>()
      .await
      .ok()
      .and_then(ErrorBody::into_detail);
    warn!(request = label, status = status.as_u16(), ?detail, "request rejected");
    Err(TransportError::from_status(status.as_u16(), detail))
  }

  async fn send_json<T: DeserializeOwned>(
    &self,
    label: &str,
    req: RequestBuilder,
  ) -> Result<T> {
    self
      .dispatch(label, req)
      .await?
      .json()
      .await
      .map_err(TransportError::decode)
  }
}

impl ContactsApi for HttpContactsApi {
  // ── Reads ─────────────────────────────────────────────────────────────────

  async fn list(&self, request: PageRequest) -> Result<Page> {
    let req = self
      .client
      .get(self.url("/contacts/"))
      .query(&request.query_pairs());
    let body: ContactList = self.send_json("GET /contacts/", req).await?;
    Ok(Page {
      items:       body.contacts,
      total_count: body.total,
      page_number: request.page,
      page_size:   request.size,
    })
  }

  async fn stats(&self) -> Result<Stats> {
    let req = self.client.get(self.url("/contacts/stats"));
    self.send_json("GET /contacts/stats", req).await
  }

  async fn get(&self, id: ContactId) -> Result<Contact> {
    let req = self.client.get(self.url(&format!("/contacts/{id}")));
    self.send_json("GET /contacts/{id}", req).await
  }

  async fn export(&self) -> Result<Bytes> {
    let req = self.client.get(self.url("/contacts/export"));
    self
      .dispatch("GET /contacts/export", req)
      .await?
      .bytes()
      .await
      .map_err(TransportError::network)
  }

  // ── Writes ────────────────────────────────────────────────────────────────

  async fn create(&self, draft: ContactDraft) -> Result<Contact> {
    let req = self.client.post(self.url("/contacts/")).json(&draft);
    self.send_json("POST /contacts/", req).await
  }

  async fn update(&self, id: ContactId, draft: ContactDraft) -> Result<Contact> {
    let req = self
      .client
      .put(self.url(&format!("/contacts/{id}")))
      .json(&draft);
    self.send_json("PUT /contacts/{id}", req).await
  }

  async fn delete(&self, id: ContactId) -> Result<DeleteOutcome> {
    let req = self.client.delete(self.url(&format!("/contacts/{id}")));
    self.send_json("DELETE /contacts/{id}", req).await
  }

  async fn import(&self, file: ImportFile) -> Result<ImportOutcome> {
    let mime = file.mime_type().to_owned();
    let part = multipart::Part::bytes(file.bytes)
      .file_name(file.file_name)
      .mime_str(&mime)
      .map_err(TransportError::request)?;
    let form = multipart::Form::new().part("file", part);
    let req = self.client.post(self.url("/contacts/import")).multipart(form);
    self.send_json("POST /contacts/import", req).await
  }
}
