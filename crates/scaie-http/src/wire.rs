//! Response envelopes that only exist on the wire.

use scaie_core::contact::Contact;
use serde::Deserialize;

/// Body of `GET /contacts/`. Missing fields read as empty.
#[derive(Debug, Deserialize)]
pub struct ContactList {
  #[serde(default)]
  pub contacts: Vec<Contact>,
  #[serde(default)]
  pub total:    u64,
}

/// Body of a non-2xx response.
///
/// `detail` is usually a string, but request validation failures carry a
/// list of problems instead; those are rendered as compact JSON.
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
  #[serde(default)]
  detail: Option<serde_json::Value>,
}

impl ErrorBody {
  pub fn into_detail(self) -> Option<String> {
    match self.detail? {
      serde_json::Value::Null => None,
      serde_json::Value::String(s) => Some(s),
      other => Some(other.to_string()),
    }
  }
}
