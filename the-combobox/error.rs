use thiserror::Error;

/// Failure reported by a result source. Never fatal to the controller: it
/// empties the result set and surfaces as a failed load.
#[derive(Debug, Error)]
pub enum SourceError {
  #[error("source request failed: {0}")]
  Transport(String),
  #[error("failed to decode source payload: {0}")]
  Decode(#[from] serde_json::Error),
  #[error("failed to read source: {0}")]
  Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("failed to parse combobox config: {0}")]
  Parse(#[from] toml::de::Error),
  #[error("failed to read combobox config: {0}")]
  Io(#[from] std::io::Error),
}
