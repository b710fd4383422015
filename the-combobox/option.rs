//! Candidate results as the controller sees them.

use std::fmt;

use serde::{
  Deserialize,
  Serialize,
};

use crate::error::SourceError;

/// Opaque handle of an option. Unique for the lifetime of a controller, so a
/// handle from a replaced result set never matches a fresh option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OptionId(u64);

impl OptionId {
  pub(crate) const fn from_raw(raw: u64) -> Self {
    Self(raw)
  }

  pub const fn get(self) -> u64 {
    self.0
  }
}

impl fmt::Display for OptionId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

/// Raw item as delivered by a source. An item carrying an `href` is a link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceItem {
  pub text:     String,
  #[serde(default)]
  pub disabled: bool,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub href:     Option<String>,
}

impl SourceItem {
  pub fn new(text: impl Into<String>) -> Self {
    Self {
      text:     text.into(),
      disabled: false,
      href:     None,
    }
  }

  pub fn disabled(mut self) -> Self {
    self.disabled = true;
    self
  }

  pub fn link(mut self, href: impl Into<String>) -> Self {
    self.href = Some(href.into());
    self
  }
}

/// Decodes a JSON array of [`SourceItem`]s.
pub fn parse_items(json: &str) -> Result<Vec<SourceItem>, SourceError> {
  Ok(serde_json::from_str(json)?)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComboOption {
  pub id:       OptionId,
  pub text:     String,
  pub disabled: bool,
  pub href:     Option<String>,
}

impl ComboOption {
  pub fn is_link(&self) -> bool {
    self.href.is_some()
  }

  pub fn is_enabled(&self) -> bool {
    !self.disabled
  }
}

/// Ordered options of one completed query. Replaced wholesale, never merged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultSet {
  options: Vec<ComboOption>,
}

impl ResultSet {
  pub fn empty() -> Self {
    Self::default()
  }

  pub fn options(&self) -> &[ComboOption] {
    &self.options
  }

  pub fn len(&self) -> usize {
    self.options.len()
  }

  pub fn is_empty(&self) -> bool {
    self.options.is_empty()
  }

  pub fn get(&self, index: usize) -> Option<&ComboOption> {
    self.options.get(index)
  }

  pub fn position(&self, id: OptionId) -> Option<usize> {
    self.options.iter().position(|option| option.id == id)
  }

  pub fn find(&self, id: OptionId) -> Option<&ComboOption> {
    self.options.iter().find(|option| option.id == id)
  }

  pub fn iter(&self) -> impl Iterator<Item = &ComboOption> {
    self.options.iter()
  }
}

/// Hands out option handles for one controller.
#[derive(Debug)]
pub struct OptionIds {
  next: u64,
}

impl Default for OptionIds {
  fn default() -> Self {
    Self { next: 1 }
  }
}

impl OptionIds {
  pub fn next_id(&mut self) -> OptionId {
    let id = OptionId::from_raw(self.next);
    self.next = self.next.saturating_add(1);
    id
  }

  pub fn build(&mut self, items: Vec<SourceItem>) -> ResultSet {
    let options = items
      .into_iter()
      .map(|item| {
        ComboOption {
          id:       self.next_id(),
          text:     item.text,
          disabled: item.disabled,
          href:     item.href,
        }
      })
      .collect();
    ResultSet { options }
  }
}
