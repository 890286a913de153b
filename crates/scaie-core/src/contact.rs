//! Contact records as the backend returns them, and the request bodies used
//! to create or edit them.
//!
//! The full record shape is owned by the backend. Known fields are typed for
//! convenience; anything else is kept in [`Contact::extra`] and written back
//! unchanged when the record is re-serialised.

use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

/// Backend-assigned contact identifier.
pub type ContactId = i64;

// ─── Interest level ──────────────────────────────────────────────────────────

/// Categorical tag used for stats aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterestLevel {
  Interesado,
  Contactado,
  NoInteresado,
}

impl InterestLevel {
  pub const ALL: [InterestLevel; 3] = [
    InterestLevel::Interesado,
    InterestLevel::Contactado,
    InterestLevel::NoInteresado,
  ];

  /// The wire name, as used in `interest_level_distribution`.
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Interesado => "interesado",
      Self::Contactado => "contactado",
      Self::NoInteresado => "no_interesado",
    }
  }
}

impl fmt::Display for InterestLevel {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for InterestLevel {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Self::ALL
      .into_iter()
      .find(|level| level.as_str() == s)
      .ok_or_else(|| {
        format!("unknown interest level {s:?} (expected interesado, contactado or no_interesado)")
      })
  }
}

// ─── Contact ─────────────────────────────────────────────────────────────────

/// A CRM record representing a lead or customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
  pub id:             ContactId,
  pub name:           Option<String>,
  pub phone:          Option<String>,
  pub email:          Option<String>,
  pub company:        Option<String>,
  pub notes:          Option<String>,
  /// Kept as a string: the backend may grow levels this client doesn't know.
  pub interest_level: Option<String>,
  /// Raw backend timestamp; see [`Contact::created`].
  pub created_at:     Option<String>,
  pub updated_at:     Option<String>,
  /// Fields this client does not interpret.
  #[serde(flatten)]
  pub extra:          serde_json::Map<String, serde_json::Value>,
}

impl Contact {
  /// Name for display, falling back to `#<id>`.
  pub fn display_name(&self) -> String {
    match self.name.as_deref() {
      Some(name) if !name.trim().is_empty() => name.to_owned(),
      _ => format!("#{}", self.id),
    }
  }

  pub fn created(&self) -> Option<NaiveDateTime> {
    self.created_at.as_deref().and_then(parse_timestamp)
  }

  pub fn updated(&self) -> Option<NaiveDateTime> {
    self.updated_at.as_deref().and_then(parse_timestamp)
  }
}

/// Parse a backend timestamp. Accepts offset-qualified
/// (`2024-05-01T10:00:00Z`) and naive (`2024-05-01T10:00:00.123456`,
/// `2024-05-01 10:00:00`) forms; offsets are normalised to UTC. Anything else
/// reads as `None`.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
  let raw = raw.trim();
  if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
    return Some(dt.naive_utc());
  }
  ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
    .into_iter()
    .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}

// ─── ContactDraft ────────────────────────────────────────────────────────────

/// Body for `POST /contacts/` and `PUT /contacts/{id}`.
///
/// Unset fields are omitted from the JSON so an update only touches what the
/// caller provided. Creation requires `name` and `phone`; the backend
/// enforces that, not this type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactDraft {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub name:           Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub phone:          Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub email:          Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub company:        Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub notes:          Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub interest_level: Option<InterestLevel>,
}

impl ContactDraft {
  /// Convenience constructor for the two fields creation requires.
  pub fn new(name: impl Into<String>, phone: impl Into<String>) -> Self {
    Self {
      name: Some(name.into()),
      phone: Some(phone.into()),
      ..Self::default()
    }
  }

  pub fn is_empty(&self) -> bool {
    *self == Self::default()
  }
}

// ─── Import / delete results ─────────────────────────────────────────────────

/// A file uploaded to `POST /contacts/import` as the multipart field `file`.
///
/// The backend picks the parser from the file name's extension (`csv` or
/// `json`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportFile {
  pub file_name: String,
  pub bytes:     Vec<u8>,
  pub mime_type: Option<String>,
}

impl ImportFile {
  pub fn new(file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
    Self {
      file_name: file_name.into(),
      bytes:     bytes.into(),
      mime_type: None,
    }
  }

  /// Guess a MIME type from the extension when none was given.
  pub fn mime_type(&self) -> &str {
    if let Some(mime) = &self.mime_type {
      return mime;
    }
    match self.file_name.rsplit_once('.').map(|(_, ext)| ext) {
      Some(ext) if ext.eq_ignore_ascii_case("csv") => "text/csv",
      Some(ext) if ext.eq_ignore_ascii_case("json") => "application/json",
      _ => "application/octet-stream",
    }
  }
}

/// Response of `POST /contacts/import`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportOutcome {
  pub success:        bool,
  pub message:        String,
  /// The backend may send `null`; that reads as zero.
  #[serde(deserialize_with = "null_as_default")]
  pub imported_count: u64,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
  D: Deserializer<'de>,
  T: Default + Deserialize<'de>,
{
  Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Response of `DELETE /contacts/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeleteOutcome {
  pub message: String,
}
