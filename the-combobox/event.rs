use std::fmt;

use serde::{
  Deserialize,
  Serialize,
};

/// Identity of a started query. Strictly increasing per controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuerySeq(pub(crate) u64);

impl QuerySeq {
  pub const fn get(self) -> u64 {
    self.0
  }
}

impl fmt::Display for QuerySeq {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "#{}", self.0)
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LoadOutcome {
  Success { count: usize },
  Failed { reason: String },
  Canceled,
}

/// Notifications observers can rely on. Dispatched after the attributes of
/// the transition that produced them were applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ComboboxEvent {
  LoadStart {
    seq:   QuerySeq,
    query: String,
  },
  /// Exactly one per started query.
  LoadEnd {
    seq:     QuerySeq,
    outcome: LoadOutcome,
  },
  Toggled {
    open: bool,
  },
  /// Exactly one per successful non-link commit.
  ValueCommitted {
    value:          String,
    related_target: String,
  },
  /// A link option was activated; following it is up to the host.
  LinkActivated {
    href: String,
  },
}
