//! A [`ConfigStore`] backed by a TOML file on disk.

use std::{
  fs, io,
  path::{Path, PathBuf},
};

use scaie_core::agent::{AgentConfig, ConfigStore, ConfigStoreError};
use tracing::debug;
use uuid::Uuid;

/// Keeps the agent config as a single TOML document at `path`.
///
/// Writes go to a sibling temp file that is then renamed over the target, so
/// a crash mid-write never leaves a truncated config behind.
#[derive(Debug, Clone)]
pub struct TomlFileConfigStore {
  path: PathBuf,
}

impl TomlFileConfigStore {
  pub fn new(path: impl Into<PathBuf>) -> Self {
    Self { path: path.into() }
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  fn write_error(&self, source: io::Error) -> ConfigStoreError {
    ConfigStoreError::Write {
      path: self.path.clone(),
      source,
    }
  }
}

impl ConfigStore for TomlFileConfigStore {
  fn load(&self) -> Result<AgentConfig, ConfigStoreError> {
    let raw = match fs::read_to_string(&self.path) {
      Ok(raw) => raw,
      Err(e) if e.kind() == io::ErrorKind::NotFound => {
        return Ok(AgentConfig::default());
      }
      Err(source) => {
        return Err(ConfigStoreError::Read {
          path: self.path.clone(),
          source,
        });
      }
    };
    toml::from_str(&raw).map_err(|e| ConfigStoreError::Parse {
      path:    self.path.clone(),
      message: e.to_string(),
    })
  }

  fn save(&self, config: &AgentConfig) -> Result<(), ConfigStoreError> {
    let encoded = toml::to_string_pretty(config)
      .map_err(|e| ConfigStoreError::Encode(e.to_string()))?;

    if let Some(parent) = self.path.parent()
      && !parent.as_os_str().is_empty()
    {
      fs::create_dir_all(parent).map_err(|e| self.write_error(e))?;
    }

    let tmp = self
      .path
      .with_extension(format!("{}.tmp", Uuid::new_v4().simple()));
    fs::write(&tmp, encoded).map_err(|e| self.write_error(e))?;
    if let Err(e) = fs::rename(&tmp, &self.path) {
      fs::remove_file(&tmp).ok();
      return Err(self.write_error(e));
    }

    debug!(path = %self.path.display(), "agent config saved");
    Ok(())
  }

  fn reset(&self) -> Result<AgentConfig, ConfigStoreError> {
    match fs::remove_file(&self.path) {
      Ok(()) => debug!(path = %self.path.display(), "agent config removed"),
      Err(e) if e.kind() == io::ErrorKind::NotFound => {}
      Err(e) => return Err(self.write_error(e)),
    }
    Ok(AgentConfig::default())
  }
}
