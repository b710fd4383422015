//! Proof-of-life terminal client for the-combobox.
//!
//! Reads line commands from stdin, feeds them to a tokio-driven combobox
//! backed by a JSON item file and prints every notification and attribute
//! change the controller produces.

mod command;
mod render;
mod source;

use std::{
  path::PathBuf,
  time::Duration,
};

use anyhow::{
  Context,
  Result,
};
use clap::{
  ArgAction,
  Parser,
};
use the_combobox::{
  AttributeSet,
  Bindings,
  ComboboxConfig,
  ComboboxDriver,
  DriverEvent,
  DriverOutput,
  Key,
  OptionId,
  SourceItem,
};
use tokio::{
  io::{
    AsyncBufReadExt,
    BufReader,
  },
  sync::mpsc::{
    Sender,
    UnboundedReceiver,
  },
  time::Instant,
};

use crate::{
  command::Command,
  source::JsonSource,
};

#[derive(Debug, Parser)]
#[command(name = "the-combobox-term")]
#[command(about = "Drive an autocomplete combobox from the terminal")]
struct Cli {
  /// JSON array of items (`{"text": .., "disabled": .., "href": ..}`)
  #[arg(long, value_name = "FILE")]
  items: Option<PathBuf>,

  /// Load configuration from a TOML file
  #[arg(short = 'c', long = "config", value_name = "FILE")]
  config: Option<PathBuf>,

  /// Simulated source latency
  #[arg(long, value_name = "MS", default_value_t = 0)]
  latency_ms: u64,

  /// Increase logging verbosity (repeat for more detail)
  #[arg(short = 'v', action = ArgAction::Count)]
  verbosity: u8,
}

fn init_logging(verbosity: u8) {
  let level = match verbosity {
    0 => log::LevelFilter::Warn,
    1 => log::LevelFilter::Info,
    2 => log::LevelFilter::Debug,
    _ => log::LevelFilter::Trace,
  };
  env_logger::Builder::new()
    .filter_level(level)
    .parse_default_env()
    .init();
}

fn demo_items() -> Vec<SourceItem> {
  vec![
    SourceItem::new("first"),
    SourceItem::new("second"),
    SourceItem::new("third"),
    SourceItem::new("fourth").disabled(),
    SourceItem::new("fifth").link("#hash"),
  ]
}

/// Terminal side of the combobox: the last projection it rendered.
#[derive(Default)]
struct View {
  attributes: Option<AttributeSet>,
}

impl View {
  fn option(&self, index: usize) -> Option<OptionId> {
    self
      .attributes
      .as_ref()?
      .options
      .get(index)
      .map(|(id, _)| *id)
  }

  /// Driver event for a command that targets the combobox. Option indices
  /// refer to the last rendered projection.
  fn event_for(&self, command: Command) -> Result<DriverEvent, String> {
    let option = |index| {
      self
        .option(index)
        .ok_or_else(|| format!("no option at index {index}"))
    };
    let event = match command {
      Command::Type(text) => DriverEvent::Input(text),
      Command::Key(key) => DriverEvent::Key(key),
      Command::Focus => DriverEvent::Focus,
      Command::Blur => DriverEvent::Blur,
      Command::Press(index) => {
        option(index)?;
        DriverEvent::PointerDown
      },
      Command::Click(index) => DriverEvent::Activate(option(index)?),
      Command::Quit | Command::Wait(_) | Command::State => {
        return Err(format!("{command:?} is handled by the terminal"));
      },
    };
    Ok(event)
  }

  /// Prints `output` and returns the host default action it triggers.
  fn show(&mut self, output: DriverOutput) -> Option<DriverEvent> {
    match output {
      DriverOutput::Attributes(attributes) => {
        for patch in attributes.diff(self.attributes.as_ref()) {
          println!("{}", render::patch(&patch));
        }
        self.attributes = Some(attributes);
        None
      },
      DriverOutput::Event(event) => {
        println!("{}", render::event(&event));
        None
      },
      DriverOutput::Key { key, outcome } => {
        println!("{}", render::key(&key, outcome));
        // an unhandled tab moves focus away from the input
        (key.key == Key::Tab && !outcome.is_handled()).then_some(DriverEvent::Blur)
      },
    }
  }
}

async fn send(events: &Sender<DriverEvent>, event: DriverEvent) -> Result<()> {
  events
    .send(event)
    .await
    .context("combobox driver stopped")
}

async fn run(events: Sender<DriverEvent>, mut outputs: UnboundedReceiver<DriverOutput>) -> Result<()> {
  let mut view = View::default();
  let mut lines = BufReader::new(tokio::io::stdin()).lines();
  let mut waiting: Option<Instant> = None;

  loop {
    tokio::select! {
      biased;
      Some(output) = outputs.recv() => {
        if let Some(event) = view.show(output) {
          send(&events, event).await?;
        }
      }
      _ = tokio::time::sleep_until(waiting.unwrap_or_else(Instant::now)), if waiting.is_some() => {
        waiting = None;
      }
      line = lines.next_line(), if waiting.is_none() => {
        let Some(line) = line.context("failed to read stdin")? else {
          break;
        };
        let command = match Command::parse(&line) {
          Ok(Some(command)) => command,
          Ok(None) => continue,
          Err(err) => {
            eprintln!("error: {err}");
            continue;
          },
        };
        let event = match command {
          Command::Quit => break,
          Command::Wait(duration) => {
            waiting = Some(Instant::now() + duration);
            continue;
          },
          Command::State => {
            if let Some(attributes) = &view.attributes {
              print!("{}", render::state(attributes));
            }
            continue;
          },
          command => {
            match view.event_for(command) {
              Ok(event) => event,
              Err(err) => {
                eprintln!("error: {err}");
                continue;
              },
            }
          },
        };
        send(&events, event).await?;
      }
    }
  }

  // drain what the last commands produced
  drop(events);
  while let Ok(output) = outputs.try_recv() {
    view.show(output);
  }
  Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
  let cli = Cli::parse();
  init_logging(cli.verbosity);

  let latency = Duration::from_millis(cli.latency_ms);
  let source = match &cli.items {
    Some(path) => {
      JsonSource::load(path, latency)
        .with_context(|| format!("failed to load items from {}", path.display()))?
    },
    None => JsonSource::new(demo_items(), latency),
  };
  let config = match &cli.config {
    Some(path) => {
      ComboboxConfig::load(path)
        .with_context(|| format!("failed to load config from {}", path.display()))?
    },
    None => ComboboxConfig::default(),
  };
  log::info!("starting combobox with {config:?}");

  let (events, outputs) = ComboboxDriver::spawn(config, Bindings::default(), source);
  run(events, outputs).await
}

#[cfg(test)]
mod tests {
  use the_combobox::aria::Attributes;

  use super::*;

  fn view_with_options(count: u64) -> View {
    let options = (1..=count)
      .map(|raw| (serde_json::from_str(&raw.to_string()).unwrap(), Attributes::new()))
      .collect();
    View {
      attributes: Some(AttributeSet {
        options,
        ..AttributeSet::default()
      }),
    }
  }

  #[test]
  fn press_and_click_need_a_rendered_option() {
    let view = view_with_options(2);
    assert!(matches!(
      view.event_for(Command::Press(1)),
      Ok(DriverEvent::PointerDown)
    ));
    assert!(view.event_for(Command::Press(2)).is_err());
    assert!(matches!(
      view.event_for(Command::Click(0)),
      Ok(DriverEvent::Activate(id)) if id.get() == 1
    ));
    assert!(view.event_for(Command::Click(5)).is_err());
    assert!(View::default().event_for(Command::Press(0)).is_err());
  }

  #[test]
  fn terminal_commands_are_not_forwarded() {
    assert!(View::default().event_for(Command::State).is_err());
  }
}
