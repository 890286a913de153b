//! Chat-agent settings and the `ConfigStore` capability that persists them.
//!
//! The store is an explicit capability rather than a global: anything that
//! can keep a single document (a file, a keychain entry, memory) can back it.

use std::{path::PathBuf, sync::Mutex};

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ─── AgentConfig ─────────────────────────────────────────────────────────────

/// Persona and sampling parameters for the chat agent.
///
/// Deserialisation is lenient: any missing field takes its default, so a
/// partially-written document still loads. The camelCase aliases accept
/// documents written by the browser frontend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
  pub name:        String,
  pub personality: String,
  pub tone:        String,
  pub goal:        String,
  pub temperature: f64,
  #[serde(alias = "maxTokens")]
  pub max_tokens:  u32,
  #[serde(alias = "topP")]
  pub top_p:       f64,
  #[serde(alias = "topK")]
  pub top_k:       u32,
}

impl Default for AgentConfig {
  fn default() -> Self {
    Self {
      name:        "SCAI".into(),
      personality: "amigable, empático, profesional, persuasivo".into(),
      tone:        "coloquial pero respetuoso".into(),
      goal:        "ayudar a los usuarios a entender los beneficios de SCAIE de \
                    manera natural"
        .into(),
      temperature: 0.8,
      max_tokens:  1024,
      top_p:       0.9,
      top_k:       30,
    }
  }
}

impl AgentConfig {
  /// Merge the fields set in `update` onto this config.
  pub fn apply(&mut self, update: AgentConfigUpdate) {
    let AgentConfigUpdate {
      name,
      personality,
      tone,
      goal,
      temperature,
      max_tokens,
      top_p,
      top_k,
    } = update;
    if let Some(v) = name {
      self.name = v;
    }
    if let Some(v) = personality {
      self.personality = v;
    }
    if let Some(v) = tone {
      self.tone = v;
    }
    if let Some(v) = goal {
      self.goal = v;
    }
    if let Some(v) = temperature {
      self.temperature = v;
    }
    if let Some(v) = max_tokens {
      self.max_tokens = v;
    }
    if let Some(v) = top_p {
      self.top_p = v;
    }
    if let Some(v) = top_k {
      self.top_k = v;
    }
  }

  /// The greeting the agent opens a conversation with under this persona.
  /// Rendered locally; no backend call.
  pub fn greeting(&self) -> String {
    format!(
      "¡Hola! Soy {}, tu asistente virtual. Estoy configurado para ser {} y \
       mi objetivo es {}. ¿En qué puedo ayudarte hoy?",
      self.name, self.personality, self.goal
    )
  }
}

/// A partial [`AgentConfig`]; `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfigUpdate {
  pub name:        Option<String>,
  pub personality: Option<String>,
  pub tone:        Option<String>,
  pub goal:        Option<String>,
  pub temperature: Option<f64>,
  pub max_tokens:  Option<u32>,
  pub top_p:       Option<f64>,
  pub top_k:       Option<u32>,
}

// ─── ConfigStore ─────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigStoreError {
  #[error("failed to read agent config at {}: {source}", .path.display())]
  Read {
    path:   PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("failed to write agent config at {}: {source}", .path.display())]
  Write {
    path:   PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("failed to parse agent config at {}: {message}", .path.display())]
  Parse { path: PathBuf, message: String },

  #[error("failed to encode agent config: {0}")]
  Encode(String),

  #[error("agent config store is unavailable")]
  Unavailable,
}

/// Persistence for a single [`AgentConfig`] document.
pub trait ConfigStore: Send + Sync {
  /// The saved config, or the defaults when nothing has been saved.
  fn load(&self) -> Result<AgentConfig, ConfigStoreError>;

  fn save(&self, config: &AgentConfig) -> Result<(), ConfigStoreError>;

  /// Discard the saved config and return the defaults.
  fn reset(&self) -> Result<AgentConfig, ConfigStoreError>;
}

/// A [`ConfigStore`] that keeps the document in memory.
#[derive(Debug, Default)]
pub struct MemoryConfigStore {
  saved: Mutex<Option<AgentConfig>>,
}

impl MemoryConfigStore {
  pub fn new() -> Self {
    Self::default()
  }
}

impl ConfigStore for MemoryConfigStore {
  fn load(&self) -> Result<AgentConfig, ConfigStoreError> {
    let saved = self.saved.lock().map_err(|_| ConfigStoreError::Unavailable)?;
    Ok(saved.clone().unwrap_or_default())
  }

  fn save(&self, config: &AgentConfig) -> Result<(), ConfigStoreError> {
    let mut saved =
      self.saved.lock().map_err(|_| ConfigStoreError::Unavailable)?;
    *saved = Some(config.clone());
    Ok(())
  }

  fn reset(&self) -> Result<AgentConfig, ConfigStoreError> {
    let mut saved =
      self.saved.lock().map_err(|_| ConfigStoreError::Unavailable)?;
    *saved = None;
    Ok(AgentConfig::default())
  }
}
