//! Error type shared by every contacts operation.

use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// The one error kind surfaced by the contacts collaborator.
///
/// Covers both HTTP-level failures (the backend answered with a non-success
/// status) and transport-level failures (the request never completed).
/// There is no retriable/fatal split; callers surface the message as-is.
#[derive(Debug, Error)]
pub enum TransportError {
  /// Non-2xx response. `message` is the body's `detail` field when present.
  #[error("{message}")]
  Status { status: u16, message: String },

  /// The request could not be built from the caller's input; nothing was
  /// sent.
  #[error("invalid request: {0}")]
  Request(#[source] BoxError),

  /// The request never completed (connect failure, timeout, reset).
  #[error("request failed: {0}")]
  Network(#[source] BoxError),

  /// A success response whose body could not be decoded.
  #[error("unexpected response body: {0}")]
  Decode(#[source] BoxError),
}

impl TransportError {
  /// Build a status error from an optional `detail` message, falling back to
  /// a generic message that names the status code.
  pub fn from_status(status: u16, detail: Option<String>) -> Self {
    let message = detail
      .filter(|d| !d.is_empty())
      .unwrap_or_else(|| format!("HTTP error! status: {status}"));
    Self::Status { status, message }
  }

  pub fn request(err: impl Into<BoxError>) -> Self {
    Self::Request(err.into())
  }

  pub fn network(err: impl Into<BoxError>) -> Self {
    Self::Network(err.into())
  }

  pub fn decode(err: impl Into<BoxError>) -> Self {
    Self::Decode(err.into())
  }

  /// The HTTP status, if the backend answered at all.
  pub fn status(&self) -> Option<u16> {
    match self {
      Self::Status { status, .. } => Some(*status),
      _ => None,
    }
  }
}

pub type Result<T, E = TransportError> = std::result::Result<T, E>;
