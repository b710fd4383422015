//! Resolution of a commit request into what the controller must do.

use crate::{
  controller::ComboboxState,
  option::{
    OptionId,
    ResultSet,
  },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitTrigger {
  EnterKey,
  /// Pointer activation (click) of a specific option.
  OptionActivation(OptionId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
  Closed,
  NoSelection,
  UnknownOption,
  Disabled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitOutcome {
  Committed { value: String },
  Navigated { href: String },
  Ignored(IgnoreReason),
}

impl CommitOutcome {
  pub fn is_ignored(&self) -> bool {
    matches!(self, Self::Ignored(_))
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Resolution {
  Value(String),
  Link(String),
  Ignored(IgnoreReason),
}

pub(crate) fn resolve(
  trigger: CommitTrigger,
  state: &ComboboxState,
  results: &ResultSet,
) -> Resolution {
  if !state.open {
    return Resolution::Ignored(IgnoreReason::Closed);
  }
  let id = match trigger {
    CommitTrigger::EnterKey => {
      match state.selection {
        Some(id) => id,
        None => return Resolution::Ignored(IgnoreReason::NoSelection),
      }
    },
    CommitTrigger::OptionActivation(id) => id,
  };
  let Some(option) = results.find(id) else {
    return Resolution::Ignored(IgnoreReason::UnknownOption);
  };
  if option.disabled {
    return Resolution::Ignored(IgnoreReason::Disabled);
  }
  match &option.href {
    Some(href) => Resolution::Link(href.clone()),
    None => Resolution::Value(option.text.clone()),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::option::{
    OptionIds,
    SourceItem,
  };

  fn fixture() -> ResultSet {
    OptionIds::default().build(vec![
      SourceItem::new("first"),
      SourceItem::new("fourth").disabled(),
      SourceItem::new("fifth").link("#hash"),
    ])
  }

  fn open_with(selection: Option<OptionId>) -> ComboboxState {
    ComboboxState {
      open: true,
      selection,
      ..ComboboxState::default()
    }
  }

  #[test]
  fn enter_without_selection_is_ignored() {
    let results = fixture();
    assert_eq!(
      resolve(CommitTrigger::EnterKey, &open_with(None), &results),
      Resolution::Ignored(IgnoreReason::NoSelection)
    );
  }

  #[test]
  fn enter_resolves_selected_text_or_link() {
    let results = fixture();
    let first = results.get(0).unwrap().id;
    let link = results.get(2).unwrap().id;
    assert_eq!(
      resolve(CommitTrigger::EnterKey, &open_with(Some(first)), &results),
      Resolution::Value("first".to_string())
    );
    assert_eq!(
      resolve(CommitTrigger::EnterKey, &open_with(Some(link)), &results),
      Resolution::Link("#hash".to_string())
    );
  }

  #[test]
  fn activation_rejects_disabled_unknown_and_closed() {
    let results = fixture();
    let disabled = results.get(1).unwrap().id;
    let state = open_with(None);
    assert_eq!(
      resolve(CommitTrigger::OptionActivation(disabled), &state, &results),
      Resolution::Ignored(IgnoreReason::Disabled)
    );
    assert_eq!(
      resolve(
        CommitTrigger::OptionActivation(OptionId::from_raw(999)),
        &state,
        &results
      ),
      Resolution::Ignored(IgnoreReason::UnknownOption)
    );
    let first = results.get(0).unwrap().id;
    assert_eq!(
      resolve(
        CommitTrigger::OptionActivation(first),
        &ComboboxState::default(),
        &results
      ),
      Resolution::Ignored(IgnoreReason::Closed)
    );
  }
}
