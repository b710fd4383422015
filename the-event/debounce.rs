//! Deadline-driven async hooks.
//!
//! A hook owns some state and receives events over a bounded channel. After
//! each event it may arm a deadline; when the deadline passes without a new
//! event the runner calls [`AsyncHook::finish_debounce`], which can arm the
//! next deadline in turn.

use tokio::{
  sync::mpsc::{
    self,
    Receiver,
    Sender,
  },
  time::Instant,
};

/// Capacity of hook channels. Typing bursts should never fill it, the
/// headroom only matters when the runtime is starved.
pub const CHANNEL_CAPACITY: usize = 256;

pub trait AsyncHook: Sync + Send + 'static + Sized {
  type Event: Sync + Send + 'static;

  /// Called immediately whenever an event is received. Returns the deadline
  /// the runner should wait for, `timeout` being the currently armed one.
  fn handle_event(&mut self, event: Self::Event, timeout: Option<Instant>) -> Option<Instant>;

  /// Called once the armed deadline is reached. May arm another deadline,
  /// for instance when work is due slightly later than the timer fired.
  fn finish_debounce(&mut self) -> Option<Instant>;

  /// Spawns the hook on a fresh channel and returns its sender.
  fn spawn(self) -> Sender<Self::Event> {
    let (tx, rx) = channel();
    self.spawn_on(tx, rx)
  }

  /// Spawns the hook on an existing channel. Useful when the hook needs a
  /// (weak) handle to its own sender before it starts running.
  fn spawn_on(self, tx: Sender<Self::Event>, rx: Receiver<Self::Event>) -> Sender<Self::Event> {
    // only spawn worker if we are inside a runtime so unrelated unit tests
    // don't have to build one
    if tokio::runtime::Handle::try_current().is_ok() {
      tokio::spawn(run(self, rx));
    } else {
      log::warn!("async hook created outside of a tokio runtime, events will be dropped");
    }
    tx
  }
}

pub fn channel<T>() -> (Sender<T>, Receiver<T>) {
  mpsc::channel(CHANNEL_CAPACITY)
}

async fn run<Hook: AsyncHook>(mut hook: Hook, mut rx: Receiver<Hook::Event>) {
  let mut deadline = None;
  loop {
    let event = match deadline {
      Some(deadline_) => {
        match tokio::time::timeout_at(deadline_, rx.recv()).await {
          Ok(event) => event,
          Err(_) => {
            deadline = hook.finish_debounce();
            continue;
          },
        }
      },
      None => rx.recv().await,
    };
    let Some(event) = event else {
      break;
    };
    deadline = hook.handle_event(event, deadline);
  }
}
