//! Open/close transitions and the blur-grace rule.
//!
//! A pointer-down inside the popup precedes the input's blur when the user
//! clicks an option. The guard armed on pointer-down swallows that one blur
//! so the click can still land on an open popup.

use std::time::{
  Duration,
  Instant,
};

use crate::controller::ComboboxState;

/// Opens the popup. Reopening always starts without a selection; opening an
/// open popup changes nothing. Returns whether `open` flipped.
pub fn open(state: &mut ComboboxState) -> bool {
  if state.open {
    return false;
  }
  state.open = true;
  state.selection = None;
  true
}

/// Closes the popup and clears the selection. Returns whether `open` flipped.
pub fn close(state: &mut ComboboxState) -> bool {
  state.selection = None;
  if !state.open {
    return false;
  }
  state.open = false;
  true
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlurDecision {
  Ignore,
  Close,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BlurGuard {
  armed_until: Option<Instant>,
}

impl BlurGuard {
  pub fn arm(&mut self, now: Instant, grace: Duration) {
    self.armed_until = Some(now + grace);
  }

  pub fn disarm(&mut self) {
    self.armed_until = None;
  }

  pub fn is_armed(&self, now: Instant) -> bool {
    self.armed_until.is_some_and(|until| now < until)
  }

  /// Decides what a blur at `now` does. An armed guard absorbs exactly one
  /// blur; an expired one is dropped.
  pub fn on_blur(&mut self, now: Instant) -> BlurDecision {
    let armed = self.is_armed(now);
    self.armed_until = None;
    if armed {
      BlurDecision::Ignore
    } else {
      BlurDecision::Close
    }
  }
}
