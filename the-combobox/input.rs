//! Keyboard input delivered by the host.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers {
  bits: u8,
}

impl Modifiers {
  pub const CTRL: u8 = 0b0000_0001;
  pub const ALT: u8 = 0b0000_0010;
  pub const META: u8 = 0b0000_0100;

  #[must_use]
  pub const fn empty() -> Self {
    Self { bits: 0 }
  }

  #[must_use]
  pub const fn from_bits(bits: u8) -> Self {
    Self { bits }
  }

  #[must_use]
  pub const fn ctrl(self) -> bool {
    (self.bits & Self::CTRL) != 0
  }

  #[must_use]
  pub const fn alt(self) -> bool {
    (self.bits & Self::ALT) != 0
  }

  #[must_use]
  pub const fn meta(self) -> bool {
    (self.bits & Self::META) != 0
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
  Char(char),
  Enter,
  NumpadEnter,
  Escape,
  Tab,
  Up,
  Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
  pub key:       Key,
  pub modifiers: Modifiers,
}

impl KeyEvent {
  pub const fn new(key: Key) -> Self {
    Self {
      key,
      modifiers: Modifiers::empty(),
    }
  }

  pub const fn with_modifiers(key: Key, modifiers: Modifiers) -> Self {
    Self { key, modifiers }
  }
}

impl From<Key> for KeyEvent {
  fn from(key: Key) -> Self {
    Self::new(key)
  }
}

/// Whether the controller consumed a key. A handled key must have its default
/// action prevented by the host, a continued key propagates untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyOutcome {
  #[default]
  Continue,
  Handled,
}

impl KeyOutcome {
  pub fn is_handled(self) -> bool {
    self == Self::Handled
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn modifier_bits_are_independent() {
    let ctrl_alt = Modifiers::from_bits(Modifiers::CTRL | Modifiers::ALT);
    assert!(ctrl_alt.ctrl());
    assert!(ctrl_alt.alt());
    assert!(!ctrl_alt.meta());

    let plain = KeyEvent::from(Key::Tab);
    assert_eq!(plain.modifiers, Modifiers::empty());
    assert!(!plain.modifiers.ctrl());
  }
}
