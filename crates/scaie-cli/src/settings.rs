//! Layered settings: defaults, then an optional TOML file, then `SCAIE_*`
//! environment variables, then command-line flags.

use std::{
  path::{Path, PathBuf},
  time::Duration,
};

use anyhow::Context as _;
use scaie_core::page::DEFAULT_PAGE_SIZE;
use scaie_http::{DEFAULT_BASE_URL, HttpConfig};
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
  /// Base URL of the backend API, including the `/api` prefix.
  pub base_url:     String,
  pub timeout_secs: u64,
  pub page_size:    u32,
  /// Where `scaie agent` keeps the agent config. `~` is expanded.
  pub agent_config: PathBuf,
}

impl Default for Settings {
  fn default() -> Self {
    Self {
      base_url:     DEFAULT_BASE_URL.to_string(),
      timeout_secs: 30,
      page_size:    DEFAULT_PAGE_SIZE,
      agent_config: PathBuf::from("~/.config/scaie/agent.toml"),
    }
  }
}

impl Settings {
  /// Read `path` (if it exists) and the environment on top of the defaults.
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    Self::load_with_env(path, None)
  }

  /// As [`Settings::load`], reading `SCAIE_*` variables from `env` instead
  /// of the process environment when it is given.
  fn load_with_env(
    path: &Path,
    env: Option<config::Map<String, String>>,
  ) -> anyhow::Result<Self> {
    let raw = config::Config::builder()
      .add_source(config::File::from(path.to_path_buf()).required(false))
      .add_source(config::Environment::with_prefix("SCAIE").source(env))
      .build()
      .with_context(|| format!("failed to read settings from {}", path.display()))?;

    raw
      .try_deserialize()
      .context("failed to deserialise settings")
  }

  pub fn http(&self) -> HttpConfig {
    HttpConfig {
      base_url: self.base_url.clone(),
      timeout:  Duration::from_secs(self.timeout_secs),
    }
  }

  pub fn agent_config_path(&self) -> PathBuf {
    expand_tilde(&self.agent_config)
  }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
