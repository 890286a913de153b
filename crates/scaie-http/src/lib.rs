//! HTTP implementation of [`scaie_core::api::ContactsApi`].
//!
//! Serialises requests as JSON (or multipart for imports) and normalises
//! every failure into a [`scaie_core::TransportError`].

mod client;
mod wire;

pub use client::{DEFAULT_BASE_URL, HttpConfig, HttpContactsApi};
