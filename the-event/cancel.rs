//! Cooperative cancellation for background tasks.
//!
//! A [`TaskController`] hands out one [`TaskHandle`] per task it starts.
//! Restarting or cancelling the controller trips the previous handle; a
//! future wrapped with [`cancelable_future`] then resolves to `None` at its
//! next suspension point. Cancellation is best effort: callers that must
//! never observe a superseded result still need their own identity check.

use std::{
  borrow::Borrow,
  future::Future,
};

use tokio_util::sync::CancellationToken;

#[derive(Debug, Default)]
pub struct TaskController {
  current: Option<CancellationToken>,
}

impl TaskController {
  pub fn new() -> Self {
    Self::default()
  }

  /// Cancels the running task (if any) and returns a handle for a new one.
  pub fn restart(&mut self) -> TaskHandle {
    self.cancel();
    let token = CancellationToken::new();
    self.current = Some(token.clone());
    TaskHandle { token }
  }

  /// Cancels the running task. Returns whether there was one to cancel.
  pub fn cancel(&mut self) -> bool {
    match self.current.take() {
      Some(token) => {
        let running = !token.is_cancelled();
        token.cancel();
        running
      },
      None => false,
    }
  }

  /// Forgets the current task without cancelling it, used once it settled.
  pub fn finish(&mut self) {
    self.current = None;
  }

  #[cfg(test)]
  fn is_running(&self) -> bool {
    self
      .current
      .as_ref()
      .is_some_and(|token| !token.is_cancelled())
  }
}

#[derive(Debug, Clone)]
pub struct TaskHandle {
  token: CancellationToken,
}

impl TaskHandle {
  pub fn is_canceled(&self) -> bool {
    self.token.is_cancelled()
  }

  /// Resolves once the task was cancelled.
  pub async fn canceled(&self) {
    self.token.cancelled().await
  }
}

/// Runs `future` until it completes or `handle` is cancelled.
pub async fn cancelable_future<T>(
  future: impl Future<Output = T>,
  handle: impl Borrow<TaskHandle>,
) -> Option<T> {
  let handle = handle.borrow();
  tokio::select! {
    biased;
    _ = handle.canceled() => None,
    res = future => Some(res),
  }
}
