//! Core types and trait definitions for the SCAIE contact directory.
//!
//! This crate is deliberately free of HTTP and filesystem dependencies.
//! The HTTP collaborator (`scaie-http`), the directory state holder
//! (`scaie-directory`) and the binary (`scaie-cli`) all depend on it.

pub mod agent;
pub mod api;
pub mod contact;
pub mod error;
pub mod page;

pub use error::{Result, TransportError};
