//! Line commands read from stdin.

use std::time::Duration;

use the_combobox::{
  Key,
  KeyEvent,
  Modifiers,
};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
  /// Replace the input text.
  Type(String),
  Key(KeyEvent),
  Focus,
  Blur,
  /// Pointer down on the nth visible option.
  Press(usize),
  /// Click on the nth visible option.
  Click(usize),
  Wait(Duration),
  State,
  Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
  #[error("unknown command `{0}`")]
  Unknown(String),
  #[error("`{command}` expects {expected}")]
  Argument {
    command:  &'static str,
    expected: &'static str,
  },
}

impl Command {
  pub fn parse(line: &str) -> Result<Option<Self>, CommandError> {
    let line = line.trim_end_matches(['\r', '\n']);
    let (name, rest) = line
      .trim_start()
      .split_once(' ')
      .unwrap_or((line.trim_start(), ""));

    let command = match name {
      "" => return Ok(None),
      // the text after `type ` is taken verbatim, spaces included
      "type" => Self::Type(rest.to_string()),
      "down" => Self::Key(Key::Down.into()),
      "up" => Self::Key(Key::Up.into()),
      "enter" => Self::Key(Key::Enter.into()),
      "esc" => Self::Key(Key::Escape.into()),
      "tab" => Self::Key(Key::Tab.into()),
      "ctrl-n" => Self::Key(ctrl('n')),
      "ctrl-p" => Self::Key(ctrl('p')),
      "focus" => Self::Focus,
      "blur" => Self::Blur,
      "press" => Self::Press(index("press", rest)?),
      "click" => Self::Click(index("click", rest)?),
      "wait" => {
        let ms = rest.trim().parse().map_err(|_| {
          CommandError::Argument {
            command:  "wait",
            expected: "a duration in milliseconds",
          }
        })?;
        Self::Wait(Duration::from_millis(ms))
      },
      "state" => Self::State,
      "quit" | "q" => Self::Quit,
      other => return Err(CommandError::Unknown(other.to_string())),
    };
    Ok(Some(command))
  }
}

fn ctrl(c: char) -> KeyEvent {
  KeyEvent::with_modifiers(Key::Char(c), Modifiers::from_bits(Modifiers::CTRL))
}

fn index(command: &'static str, rest: &str) -> Result<usize, CommandError> {
  rest.trim().parse().map_err(|_| {
    CommandError::Argument {
      command,
      expected: "an option index",
    }
  })
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_keys_and_text() {
    assert_eq!(
      Command::parse("type hub  x").unwrap(),
      Some(Command::Type("hub  x".into()))
    );
    assert_eq!(Command::parse("type").unwrap(), Some(Command::Type(String::new())));
    assert_eq!(
      Command::parse("down\n").unwrap(),
      Some(Command::Key(KeyEvent::new(Key::Down)))
    );
    assert_eq!(Command::parse("ctrl-p").unwrap(), Some(Command::Key(ctrl('p'))));
    assert_eq!(Command::parse("   ").unwrap(), None);
  }

  #[test]
  fn parses_arguments() {
    assert_eq!(Command::parse("click 2").unwrap(), Some(Command::Click(2)));
    assert_eq!(
      Command::parse("wait 150").unwrap(),
      Some(Command::Wait(Duration::from_millis(150)))
    );
    assert_eq!(
      Command::parse("press x"),
      Err(CommandError::Argument {
        command:  "press",
        expected: "an option index",
      })
    );
  }

  #[test]
  fn rejects_unknown_commands() {
    assert_eq!(
      Command::parse("jump"),
      Err(CommandError::Unknown("jump".into()))
    );
  }
}
