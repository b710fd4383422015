//! Runs a [`Combobox`] on tokio against an async [`Source`].
//!
//! The driver is an [`AsyncHook`]: host events arrive on its channel, the
//! controller's debounce deadline becomes the hook deadline, and fetches run
//! as cancelable futures whose results are fed back on the same channel.

use std::sync::Arc;

use async_trait::async_trait;
use the_combobox_event::{
  AsyncHook,
  cancelable_future,
  channel,
};
use tokio::{
  sync::mpsc::{
    self,
    Sender,
    UnboundedReceiver,
    UnboundedSender,
    WeakSender,
  },
  time::Instant,
};

use crate::{
  aria::AttributeSet,
  clock::TokioClock,
  config::{
    Bindings,
    ComboboxConfig,
  },
  controller::{
    Combobox,
    ComboboxHost,
  },
  error::SourceError,
  event::{
    ComboboxEvent,
    QuerySeq,
  },
  input::{
    KeyEvent,
    KeyOutcome,
  },
  option::{
    OptionId,
    SourceItem,
  },
  scheduler::QueryRequest,
};

/// Produces candidate items for a query.
#[async_trait]
pub trait Source: Send + Sync + 'static {
  async fn fetch(&self, query: &str) -> Result<Vec<SourceItem>, SourceError>;
}

#[derive(Debug)]
pub enum DriverEvent {
  Input(String),
  Key(KeyEvent),
  Focus,
  Blur,
  PointerDown,
  Activate(OptionId),
  Open,
  Close,
  Response {
    seq:    QuerySeq,
    result: Result<Vec<SourceItem>, SourceError>,
  },
}

#[derive(Debug, Clone)]
pub enum DriverOutput {
  Attributes(AttributeSet),
  Event(ComboboxEvent),
  Key { key: KeyEvent, outcome: KeyOutcome },
}

/// Forwards controller output to an unbounded channel.
#[derive(Debug, Clone)]
pub struct ChannelHost {
  tx: UnboundedSender<DriverOutput>,
}

impl ChannelHost {
  pub fn new(tx: UnboundedSender<DriverOutput>) -> Self {
    Self { tx }
  }

  fn send(&self, output: DriverOutput) {
    if self.tx.send(output).is_err() {
      log::trace!("driver output receiver dropped");
    }
  }
}

impl ComboboxHost for ChannelHost {
  fn apply_attributes(&mut self, attributes: &AttributeSet) {
    self.send(DriverOutput::Attributes(attributes.clone()));
  }

  fn dispatch(&mut self, event: &ComboboxEvent) {
    self.send(DriverOutput::Event(event.clone()));
  }
}

pub struct ComboboxDriver<S> {
  combobox: Combobox<ChannelHost>,
  source:   Arc<S>,
  events:   WeakSender<DriverEvent>,
}

impl<S: Source> ComboboxDriver<S> {
  /// Spawns a driver on the current tokio runtime. Returns the event sender
  /// and the receiver of everything the controller outputs.
  pub fn spawn(
    config: ComboboxConfig,
    bindings: Bindings,
    source: S,
  ) -> (Sender<DriverEvent>, UnboundedReceiver<DriverOutput>) {
    let (out_tx, out_rx) = mpsc::unbounded_channel();
    let (tx, rx) = channel();
    let driver = Self {
      combobox: Combobox::with_clock(
        config,
        bindings,
        ChannelHost::new(out_tx),
        Arc::new(TokioClock),
      ),
      source:   Arc::new(source),
      events:   tx.downgrade(),
    };
    (driver.spawn_on(tx, rx), out_rx)
  }

  fn deadline(&self) -> Option<Instant> {
    self.combobox.next_deadline().map(Instant::from_std)
  }

  fn start_queries(&mut self) {
    if let Some(request) = self.combobox.poll() {
      self.fetch(request);
    }
  }

  fn fetch(&self, request: QueryRequest) {
    let source = Arc::clone(&self.source);
    let events = self.events.clone();
    tokio::spawn(async move {
      let QueryRequest { seq, query, handle } = request;
      let fetch = async { source.fetch(&query).await };
      let Some(result) = cancelable_future(fetch, &handle).await else {
        log::debug!("query {seq} cancelled before the source answered");
        return;
      };
      let Some(events) = events.upgrade() else {
        return;
      };
      if events.send(DriverEvent::Response { seq, result }).await.is_err() {
        log::warn!("combobox driver stopped before query {seq} settled");
      }
    });
  }
}

impl<S: Source> AsyncHook for ComboboxDriver<S> {
  type Event = DriverEvent;

  fn handle_event(&mut self, event: DriverEvent, _timeout: Option<Instant>) -> Option<Instant> {
    match event {
      DriverEvent::Input(text) => self.combobox.handle_input(text),
      DriverEvent::Key(key) => {
        let outcome = self.combobox.handle_key(key);
        self
          .combobox
          .host()
          .send(DriverOutput::Key { key, outcome });
      },
      DriverEvent::Focus => self.combobox.handle_focus(),
      DriverEvent::Blur => self.combobox.handle_blur(),
      DriverEvent::PointerDown => self.combobox.handle_pointer_down(),
      DriverEvent::Activate(id) => {
        self.combobox.activate_option(id);
      },
      DriverEvent::Open => self.combobox.open(),
      DriverEvent::Close => self.combobox.close(),
      DriverEvent::Response { seq, result } => {
        self.combobox.handle_response(seq, result);
      },
    }
    // a zero debounce is due right away
    self.start_queries();
    self.deadline()
  }

  fn finish_debounce(&mut self) -> Option<Instant> {
    self.start_queries();
    self.deadline()
  }
}

#[cfg(test)]
mod tests {
  use std::time::Duration;

  use super::*;
  use crate::event::LoadOutcome;

  struct Echo;

  #[async_trait]
  impl Source for Echo {
    async fn fetch(&self, query: &str) -> Result<Vec<SourceItem>, SourceError> {
      tokio::time::sleep(Duration::from_millis(10)).await;
      Ok(vec![SourceItem::new(format!("{query}!"))])
    }
  }

  async fn next_event(rx: &mut UnboundedReceiver<DriverOutput>) -> ComboboxEvent {
    loop {
      match rx.recv().await.expect("driver alive") {
        DriverOutput::Event(event) => return event,
        _ => continue,
      }
    }
  }

  #[tokio::test(start_paused = true)]
  async fn debounced_input_fetches_once() {
    let config = ComboboxConfig {
      debounce_ms: 50,
      ..ComboboxConfig::default()
    };
    let (tx, mut rx) = ComboboxDriver::spawn(config, Bindings::default(), Echo);

    tx.send(DriverEvent::Input("h".into())).await.unwrap();
    tx.send(DriverEvent::Input("hu".into())).await.unwrap();
    tx.send(DriverEvent::Input("hub".into())).await.unwrap();

    let ComboboxEvent::LoadStart { seq, query } = next_event(&mut rx).await else {
      panic!("expected load start");
    };
    assert_eq!(query, "hub");
    assert_eq!(next_event(&mut rx).await, ComboboxEvent::Toggled { open: true });
    assert_eq!(next_event(&mut rx).await, ComboboxEvent::LoadEnd {
      seq,
      outcome: LoadOutcome::Success { count: 1 },
    });
  }

  #[tokio::test(start_paused = true)]
  async fn close_cancels_in_flight_fetch() {
    let (tx, mut rx) = ComboboxDriver::spawn(ComboboxConfig::default(), Bindings::default(), Echo);

    tx.send(DriverEvent::Input("hub".into())).await.unwrap();
    let ComboboxEvent::LoadStart { seq, .. } = next_event(&mut rx).await else {
      panic!("expected load start");
    };
    tx.send(DriverEvent::Close).await.unwrap();
    assert_eq!(next_event(&mut rx).await, ComboboxEvent::LoadEnd {
      seq,
      outcome: LoadOutcome::Canceled,
    });

    tokio::time::sleep(Duration::from_millis(50)).await;
    while let Ok(output) = rx.try_recv() {
      if let DriverOutput::Event(event) = output {
        panic!("unexpected event after cancellation: {event:?}");
      }
    }
  }
}
