//! Keyboard navigation over a result set.
//!
//! Scans are pure functions over the option slice: disabled options are
//! skipped but keep their index, and nothing wraps around.

use crate::option::ComboOption;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
  Down,
  Up,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavState {
  Closed,
  OpenNoSelection,
  OpenSelected(usize),
}

impl NavState {
  pub fn is_open(self) -> bool {
    !matches!(self, Self::Closed)
  }

  pub fn selected(self) -> Option<usize> {
    match self {
      Self::OpenSelected(index) => Some(index),
      _ => None,
    }
  }

  /// Moves one step in `direction`. Returns `None` when the key is not
  /// consumed, i.e. the popup is closed and there is nothing to show.
  pub fn step(self, direction: Direction, options: &[ComboOption]) -> Option<NavState> {
    let next = match (self, direction) {
      (Self::Closed, _) => {
        if options.is_empty() {
          return None;
        }
        Self::OpenNoSelection
      },
      (Self::OpenNoSelection, Direction::Down) => {
        first_enabled(options).map_or(self, Self::OpenSelected)
      },
      (Self::OpenNoSelection, Direction::Up) => {
        last_enabled(options).map_or(self, Self::OpenSelected)
      },
      (Self::OpenSelected(index), Direction::Down) => {
        next_enabled(options, index).map_or(self, Self::OpenSelected)
      },
      (Self::OpenSelected(index), Direction::Up) => {
        prev_enabled(options, index).map_or(Self::OpenNoSelection, Self::OpenSelected)
      },
    };
    Some(next)
  }
}

pub fn first_enabled(options: &[ComboOption]) -> Option<usize> {
  options.iter().position(ComboOption::is_enabled)
}

pub fn last_enabled(options: &[ComboOption]) -> Option<usize> {
  options.iter().rposition(ComboOption::is_enabled)
}

/// First enabled option strictly after `index`.
pub fn next_enabled(options: &[ComboOption], index: usize) -> Option<usize> {
  let start = index.checked_add(1)?;
  options
    .get(start..)?
    .iter()
    .position(ComboOption::is_enabled)
    .map(|offset| start + offset)
}

/// Last enabled option strictly before `index`.
pub fn prev_enabled(options: &[ComboOption], index: usize) -> Option<usize> {
  let end = index.min(options.len());
  options[..end].iter().rposition(ComboOption::is_enabled)
}
