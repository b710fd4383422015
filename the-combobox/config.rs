use std::{
  path::Path,
  time::Duration,
};

use serde::{
  Deserialize,
  Serialize,
};

use crate::error::ConfigError;

/// What an input that is empty after trimming does.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EmptyQueryPolicy {
  /// The empty string is a regular query.
  #[default]
  Fetch,
  /// Pending work is cancelled, results are cleared and the popup closes.
  Close,
}

/// Visibility of the popup when a query settles without any option.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NoResultsPolicy {
  #[default]
  Close,
  OpenEmpty,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct ComboboxConfig {
  pub debounce_ms:   u64,
  pub blur_grace_ms: u64,
  pub empty_query:   EmptyQueryPolicy,
  pub no_results:    NoResultsPolicy,
}

impl Default for ComboboxConfig {
  fn default() -> Self {
    Self {
      debounce_ms:   0,
      blur_grace_ms: 100,
      empty_query:   EmptyQueryPolicy::Fetch,
      no_results:    NoResultsPolicy::Close,
    }
  }
}

impl ComboboxConfig {
  pub fn debounce(&self) -> Duration {
    Duration::from_millis(self.debounce_ms)
  }

  pub fn blur_grace(&self) -> Duration {
    Duration::from_millis(self.blur_grace_ms)
  }

  pub fn from_toml(source: &str) -> Result<Self, ConfigError> {
    Ok(toml::from_str(source)?)
  }

  pub fn load(path: &Path) -> Result<Self, ConfigError> {
    let source = std::fs::read_to_string(path)?;
    Self::from_toml(&source)
  }
}

/// Element identifiers of the bound input and its popup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct Bindings {
  pub input_id: String,
  pub popup_id: String,
}

impl Default for Bindings {
  fn default() -> Self {
    Self::new("combobox-input", "combobox-popup")
  }
}

impl Bindings {
  pub fn new(input_id: impl Into<String>, popup_id: impl Into<String>) -> Self {
    Self {
      input_id: input_id.into(),
      popup_id: popup_id.into(),
    }
  }
}
