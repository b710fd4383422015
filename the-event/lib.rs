//! Async plumbing shared by the combobox crates: debounced hooks running on
//! tokio and cooperative task cancellation.

mod cancel;
mod debounce;

pub use cancel::{
  TaskController,
  TaskHandle,
  cancelable_future,
};
pub use debounce::{
  AsyncHook,
  CHANNEL_CAPACITY,
  channel,
};
