use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::constants::constants;

/// Preferences persisted in `prefs.toml`.
#[derive(Serialize, Deserialize, Default, Debug, Clone, PartialEq)]
pub struct Config {
  pub theme_name: Option<String>,
  pub backend_url: Option<String>,
  pub thumbnails: Option<String>,
}

fn prefs_path() -> Option<PathBuf> {
  ProjectDirs::from("", "", "tvguide").map(|dirs| dirs.config_dir().join("prefs.toml"))
}

impl Config {
  /// Saved preferences, or defaults when the file is missing or unreadable.
  pub fn load() -> Self {
    prefs_path().map(|path| Self::load_from(&path)).unwrap_or_default()
  }

  fn load_from(path: &Path) -> Self {
    let Ok(content) = std::fs::read_to_string(path) else { return Self::default() };
    match toml::from_str(&content) {
      Ok(config) => config,
      Err(e) => {
        warn!(path = %path.display(), err = %e, "prefs: ignoring malformed file");
        Self::default()
      }
    }
  }

  /// Write preferences; failures are logged and otherwise ignored.
  pub fn save(&self) {
    let Some(path) = prefs_path() else {
      warn!("prefs: no config directory, not saving");
      return;
    };
    if let Err(e) = self.save_to(&path) {
      warn!(path = %path.display(), err = %format!("{:#}", e), "prefs: save failed");
    }
  }

  fn save_to(&self, path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
      std::fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;
    }
    let content = toml::to_string(self).context("Failed to serialize preferences")?;
    std::fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
  }

  /// Backend URL: explicit flag or env var first, then prefs, then the built-in default.
  pub fn resolve_backend_url(&self, cli: Option<&str>) -> String {
    cli
      .map(str::trim)
      .filter(|s| !s.is_empty())
      .or(self.backend_url.as_deref().map(str::trim).filter(|s| !s.is_empty()))
      .unwrap_or(constants().default_backend_url.as_str())
      .to_string()
  }
}
