//! Projection of controller state onto DOM attributes.
//!
//! [`project`] is a pure function of state, results and bindings; the
//! controller never writes attributes from anywhere else.

use std::collections::BTreeMap;

use crate::{
  config::Bindings,
  controller::ComboboxState,
  option::{
    OptionId,
    ResultSet,
  },
};

pub type Attributes = BTreeMap<&'static str, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Target {
  Input,
  Popup,
  Option(OptionId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributePatch {
  Set {
    target: Target,
    name:   &'static str,
    value:  String,
  },
  Remove {
    target: Target,
    name:   &'static str,
  },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeSet {
  pub input:   Attributes,
  pub popup:   Attributes,
  /// In result-set order.
  pub options: Vec<(OptionId, Attributes)>,
}

/// DOM id of an option element, referenced by `aria-activedescendant`.
pub fn option_element_id(popup_id: &str, id: OptionId) -> String {
  format!("{popup_id}-option-{id}")
}

pub fn project(state: &ComboboxState, results: &ResultSet, bindings: &Bindings) -> AttributeSet {
  let selection = if state.open { state.selection } else { None };

  let mut input = Attributes::new();
  input.insert("role", "combobox".to_string());
  input.insert("aria-autocomplete", "list".to_string());
  input.insert("aria-controls", bindings.popup_id.clone());
  input.insert("aria-owns", bindings.popup_id.clone());
  input.insert("aria-expanded", state.open.to_string());

  let mut popup = Attributes::new();
  popup.insert("id", bindings.popup_id.clone());
  popup.insert("role", "listbox".to_string());
  if !state.open {
    popup.insert("hidden", String::new());
  }

  let options = results
    .iter()
    .map(|option| {
      let selected = !option.disabled && selection == Some(option.id);
      let element_id = option_element_id(&bindings.popup_id, option.id);
      if selected {
        input.insert("aria-activedescendant", element_id.clone());
      }

      let mut attrs = Attributes::new();
      attrs.insert("id", element_id);
      attrs.insert("role", "option".to_string());
      attrs.insert("aria-selected", selected.to_string());
      if option.disabled {
        attrs.insert("aria-disabled", "true".to_string());
      }
      (option.id, attrs)
    })
    .collect();

  AttributeSet {
    input,
    popup,
    options,
  }
}

impl AttributeSet {
  pub fn attributes(&self, target: Target) -> Option<&Attributes> {
    match target {
      Target::Input => Some(&self.input),
      Target::Popup => Some(&self.popup),
      Target::Option(id) => {
        self
          .options
          .iter()
          .find(|(option, _)| *option == id)
          .map(|(_, attrs)| attrs)
      },
    }
  }

  pub fn get(&self, target: Target, name: &str) -> Option<&str> {
    self
      .attributes(target)
      .and_then(|attrs| attrs.get(name))
      .map(String::as_str)
  }

  pub fn is_popup_hidden(&self) -> bool {
    self.popup.contains_key("hidden")
  }

  pub fn is_expanded(&self) -> bool {
    self.get(Target::Input, "aria-expanded") == Some("true")
  }

  /// Options currently carrying `aria-selected="true"`.
  pub fn selected_options(&self) -> impl Iterator<Item = OptionId> + '_ {
    self
      .options
      .iter()
      .filter(|(_, attrs)| attrs.get("aria-selected").map(String::as_str) == Some("true"))
      .map(|(id, _)| *id)
  }

  fn targets(&self) -> impl Iterator<Item = (Target, &Attributes)> {
    [(Target::Input, &self.input), (Target::Popup, &self.popup)]
      .into_iter()
      .chain(
        self
          .options
          .iter()
          .map(|(id, attrs)| (Target::Option(*id), attrs)),
      )
  }

  /// Minimal patches turning `previous` into `self`. Targets that vanished
  /// (options of a replaced result set) are left to the host, which drops
  /// their elements wholesale.
  pub fn diff(&self, previous: Option<&AttributeSet>) -> Vec<AttributePatch> {
    let mut patches = Vec::new();
    for (target, attrs) in self.targets() {
      let before = previous.and_then(|previous| previous.attributes(target));
      for (&name, value) in attrs {
        if before.and_then(|before| before.get(name)) != Some(value) {
          patches.push(AttributePatch::Set {
            target,
            name,
            value: value.clone(),
          });
        }
      }
      if let Some(before) = before {
        for &name in before.keys() {
          if !attrs.contains_key(name) {
            patches.push(AttributePatch::Remove { target, name });
          }
        }
      }
    }
    patches
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::option::{
    OptionIds,
    SourceItem,
  };

  fn results() -> ResultSet {
    OptionIds::default().build(vec![
      SourceItem::new("first"),
      SourceItem::new("second").disabled(),
      SourceItem::new("third"),
    ])
  }

  #[test]
  fn static_attributes_are_projected_when_closed() {
    let set = project(&ComboboxState::default(), &ResultSet::empty(), &Bindings::new("q", "popup"));
    assert_eq!(set.get(Target::Input, "role"), Some("combobox"));
    assert_eq!(set.get(Target::Input, "aria-autocomplete"), Some("list"));
    assert_eq!(set.get(Target::Input, "aria-controls"), Some("popup"));
    assert_eq!(set.get(Target::Input, "aria-owns"), Some("popup"));
    assert_eq!(set.get(Target::Input, "aria-expanded"), Some("false"));
    assert!(set.is_popup_hidden());
  }

  #[test]
  fn selection_is_reflected_on_option_and_input() {
    let results = results();
    let third = results.get(2).unwrap().id;
    let state = ComboboxState {
      open: true,
      selection: Some(third),
      ..ComboboxState::default()
    };
    let set = project(&state, &results, &Bindings::new("q", "popup"));

    assert!(!set.is_popup_hidden());
    assert!(set.is_expanded());
    assert_eq!(set.selected_options().collect::<Vec<_>>(), vec![third]);
    assert_eq!(
      set.get(Target::Input, "aria-activedescendant"),
      Some(option_element_id("popup", third).as_str())
    );
    let disabled = results.get(1).unwrap().id;
    assert_eq!(set.get(Target::Option(disabled), "aria-disabled"), Some("true"));
    assert_eq!(set.get(Target::Option(disabled), "aria-selected"), Some("false"));
  }

  #[test]
  fn disabled_or_closed_selection_is_never_projected() {
    let results = results();
    let disabled = results.get(1).unwrap().id;
    let state = ComboboxState {
      open: true,
      selection: Some(disabled),
      ..ComboboxState::default()
    };
    let set = project(&state, &results, &Bindings::default());
    assert_eq!(set.selected_options().count(), 0);
    assert_eq!(set.get(Target::Input, "aria-activedescendant"), None);

    let first = results.get(0).unwrap().id;
    let closed = ComboboxState {
      open: false,
      selection: Some(first),
      ..ComboboxState::default()
    };
    let set = project(&closed, &results, &Bindings::default());
    assert_eq!(set.selected_options().count(), 0);
  }

  #[test]
  fn diff_emits_only_changes() {
    let results = results();
    let bindings = Bindings::default();
    let closed = project(&ComboboxState::default(), &results, &bindings);
    let open = project(
      &ComboboxState {
        open: true,
        ..ComboboxState::default()
      },
      &results,
      &bindings,
    );

    let patches = open.diff(Some(&closed));
    assert_eq!(patches, vec![
      AttributePatch::Set {
        target: Target::Input,
        name:   "aria-expanded",
        value:  "true".to_string(),
      },
      AttributePatch::Remove {
        target: Target::Popup,
        name:   "hidden",
      },
    ]);
    assert!(open.diff(Some(&open)).is_empty());
    assert!(!open.diff(None).is_empty());
  }

  quickcheck::quickcheck! {
      fn at_most_one_option_is_selected(disabled: Vec<bool>, pick: usize, open: bool) -> bool {
          let items = disabled
              .iter()
              .map(|&disabled| {
                  let item = SourceItem::new("x");
                  if disabled { item.disabled() } else { item }
              })
              .collect();
          let results = OptionIds::default().build(items);
          let selection = if results.is_empty() {
              None
          } else {
              results.get(pick % results.len()).map(|option| option.id)
          };
          let state = ComboboxState { open, selection, ..ComboboxState::default() };
          let set = project(&state, &results, &Bindings::default());
          set.selected_options().count() <= 1 && set.is_popup_hidden() != open
      }
  }
}
