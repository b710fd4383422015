//! Result source backed by a JSON item file.

use std::{
  path::Path,
  time::Duration,
};

use async_trait::async_trait;
use the_combobox::{
  Source,
  SourceError,
  SourceItem,
  option::parse_items,
};

pub struct JsonSource {
  items:   Vec<SourceItem>,
  latency: Duration,
}

impl JsonSource {
  pub fn new(items: Vec<SourceItem>, latency: Duration) -> Self {
    Self { items, latency }
  }

  pub fn load(path: &Path, latency: Duration) -> Result<Self, SourceError> {
    let json = std::fs::read_to_string(path)?;
    Ok(Self::new(parse_items(&json)?, latency))
  }

  fn matching(&self, query: &str) -> Vec<SourceItem> {
    let needle = query.trim().to_lowercase();
    self
      .items
      .iter()
      .filter(|item| item.text.to_lowercase().contains(&needle))
      .cloned()
      .collect()
  }
}

#[async_trait]
impl Source for JsonSource {
  async fn fetch(&self, query: &str) -> Result<Vec<SourceItem>, SourceError> {
    if !self.latency.is_zero() {
      tokio::time::sleep(self.latency).await;
    }
    Ok(self.matching(query))
  }
}
