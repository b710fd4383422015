//! Plain-text rendering of controller output.

use std::fmt::Write as _;

use the_combobox::{
  AttributePatch,
  AttributeSet,
  ComboboxEvent,
  KeyEvent,
  KeyOutcome,
  Target,
};

fn target_label(target: Target) -> String {
  match target {
    Target::Input => "input".to_string(),
    Target::Popup => "popup".to_string(),
    Target::Option(id) => format!("option#{id}"),
  }
}

pub fn patch(patch: &AttributePatch) -> String {
  match patch {
    AttributePatch::Set {
      target,
      name,
      value,
    } => format!("  set    {} {name}={value:?}", target_label(*target)),
    AttributePatch::Remove { target, name } => {
      format!("  remove {} {name}", target_label(*target))
    },
  }
}

pub fn event(event: &ComboboxEvent) -> String {
  match serde_json::to_string(event) {
    Ok(json) => format!("event {json}"),
    Err(err) => format!("event {event:?} (unserializable: {err})"),
  }
}

pub fn key(key: &KeyEvent, outcome: KeyOutcome) -> String {
  let verdict = if outcome.is_handled() {
    "handled"
  } else {
    "default action"
  };
  format!("key {:?} -> {verdict}", key.key)
}

/// Full dump of the current projection, one element per line.
pub fn state(attributes: &AttributeSet) -> String {
  let mut out = String::new();
  let mut element = |label: String, attrs: &the_combobox::aria::Attributes| {
    let _ = write!(out, "{label:<10}");
    for (name, value) in attrs {
      let _ = write!(out, " {name}={value:?}");
    }
    out.push('\n');
  };
  element(target_label(Target::Input), &attributes.input);
  element(target_label(Target::Popup), &attributes.popup);
  for (index, (id, attrs)) in attributes.options.iter().enumerate() {
    element(format!("[{index}] #{id}"), attrs);
  }
  out
}

#[cfg(test)]
mod tests {
  use the_combobox::{
    Key,
    LoadOutcome,
  };

  use super::*;

  #[test]
  fn events_render_as_tagged_json() {
    let line = event(&ComboboxEvent::Toggled { open: true });
    assert_eq!(line, r#"event {"kind":"toggled","open":true}"#);
    let line = event(&ComboboxEvent::LoadEnd {
      seq:     serde_json::from_str("3").unwrap(),
      outcome: LoadOutcome::Canceled,
    });
    assert!(line.contains(r#""status":"canceled""#));
  }

  #[test]
  fn key_outcomes_are_labelled() {
    assert_eq!(
      key(&KeyEvent::new(Key::Tab), KeyOutcome::Continue),
      "key Tab -> default action"
    );
  }

  #[test]
  fn state_lists_every_element() {
    let dump = state(&AttributeSet::default());
    assert_eq!(dump.lines().count(), 2);
    assert!(dump.starts_with("input"));
  }
}
