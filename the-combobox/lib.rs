//! Headless autocomplete combobox controller.
//!
//! The controller turns typing into a debounced query lifecycle against a
//! result source, keeps keyboard navigation and selection consistent with
//! the latest result set, and projects its state onto ARIA attributes. Hosts
//! feed it input, key, focus and pointer events and receive attribute sets
//! and notifications through [`ComboboxHost`]; [`driver`] wires it to tokio.

pub mod aria;
pub mod clock;
pub mod commit;
pub mod config;
pub mod controller;
pub mod driver;
pub mod error;
pub mod event;
pub mod input;
pub mod navigation;
pub mod option;
pub mod scheduler;
pub mod visibility;

pub use aria::{
  AttributePatch,
  AttributeSet,
  Target,
};
pub use clock::{
  Clock,
  ManualClock,
  SystemClock,
  TokioClock,
};
pub use commit::{
  CommitOutcome,
  CommitTrigger,
  IgnoreReason,
};
pub use config::{
  Bindings,
  ComboboxConfig,
  EmptyQueryPolicy,
  NoResultsPolicy,
};
pub use controller::{
  Combobox,
  ComboboxHost,
  ComboboxState,
  ResponseOutcome,
};
pub use driver::{
  ComboboxDriver,
  DriverEvent,
  DriverOutput,
  Source,
};
pub use error::{
  ConfigError,
  SourceError,
};
pub use event::{
  ComboboxEvent,
  LoadOutcome,
  QuerySeq,
};
pub use input::{
  Key,
  KeyEvent,
  KeyOutcome,
  Modifiers,
};
pub use option::{
  ComboOption,
  OptionId,
  ResultSet,
  SourceItem,
};
pub use scheduler::QueryRequest;
