//! The combobox controller.
//!
//! Every entry point mutates [`ComboboxState`], then hands the projected
//! attributes to the host and only afterwards dispatches the notifications
//! the transition produced. Handlers run to completion; time is read from
//! the injected [`Clock`].

use std::sync::Arc;

use crate::{
  aria::{
    self,
    AttributeSet,
  },
  clock::{
    Clock,
    SystemClock,
  },
  commit::{
    self,
    CommitOutcome,
    CommitTrigger,
    Resolution,
  },
  config::{
    Bindings,
    ComboboxConfig,
    EmptyQueryPolicy,
    NoResultsPolicy,
  },
  error::SourceError,
  event::{
    ComboboxEvent,
    LoadOutcome,
    QuerySeq,
  },
  input::{
    Key,
    KeyEvent,
    KeyOutcome,
  },
  navigation::{
    Direction,
    NavState,
  },
  option::{
    OptionId,
    OptionIds,
    ResultSet,
    SourceItem,
  },
  scheduler::{
    QueryRequest,
    QueryScheduler,
  },
  visibility::{
    self,
    BlurDecision,
    BlurGuard,
  },
};

/// Receives the observable output of a controller.
pub trait ComboboxHost {
  /// Called after every transition with the full projection.
  fn apply_attributes(&mut self, attributes: &AttributeSet);
  fn dispatch(&mut self, event: &ComboboxEvent);
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComboboxState {
  pub open:            bool,
  /// Text of the bound input.
  pub query:           String,
  pub committed_value: String,
  pub selection:       Option<OptionId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseOutcome {
  Applied,
  /// The response belongs to a superseded or cancelled query.
  Stale,
}

pub struct Combobox<H> {
  config:     ComboboxConfig,
  bindings:   Bindings,
  clock:      Arc<dyn Clock>,
  host:       H,
  state:      ComboboxState,
  results:    ResultSet,
  ids:        OptionIds,
  scheduler:  QueryScheduler,
  focused:    bool,
  blur_guard: BlurGuard,
  queued:     Vec<ComboboxEvent>,
}

impl<H: ComboboxHost> Combobox<H> {
  pub fn new(config: ComboboxConfig, bindings: Bindings, host: H) -> Self {
    Self::with_clock(config, bindings, host, Arc::new(SystemClock))
  }

  pub fn with_clock(
    config: ComboboxConfig,
    bindings: Bindings,
    host: H,
    clock: Arc<dyn Clock>,
  ) -> Self {
    let scheduler = QueryScheduler::new(config.debounce());
    let mut combobox = Self {
      config,
      bindings,
      clock,
      host,
      state: ComboboxState::default(),
      results: ResultSet::empty(),
      ids: OptionIds::default(),
      scheduler,
      focused: false,
      blur_guard: BlurGuard::default(),
      queued: Vec::new(),
    };
    combobox.flush();
    combobox
  }

  pub fn value(&self) -> &str {
    &self.state.committed_value
  }

  pub fn is_open(&self) -> bool {
    self.state.open
  }

  pub fn query(&self) -> &str {
    &self.state.query
  }

  pub fn selection(&self) -> Option<OptionId> {
    self.state.selection
  }

  pub fn state(&self) -> &ComboboxState {
    &self.state
  }

  pub fn results(&self) -> &ResultSet {
    &self.results
  }

  pub fn bindings(&self) -> &Bindings {
    &self.bindings
  }

  pub fn is_loading(&self) -> bool {
    self.scheduler.in_flight().is_some()
  }

  pub fn host(&self) -> &H {
    &self.host
  }

  pub fn host_mut(&mut self) -> &mut H {
    &mut self.host
  }

  pub fn attributes(&self) -> AttributeSet {
    aria::project(&self.state, &self.results, &self.bindings)
  }

  pub fn nav_state(&self) -> NavState {
    if !self.state.open {
      return NavState::Closed;
    }
    self
      .state
      .selection
      .and_then(|id| self.results.position(id))
      .map_or(NavState::OpenNoSelection, NavState::OpenSelected)
  }

  /// When the host should call [`Combobox::poll`] next.
  pub fn next_deadline(&self) -> Option<std::time::Instant> {
    self.scheduler.next_deadline()
  }

  /// The bound input's text changed.
  pub fn handle_input(&mut self, text: impl Into<String>) {
    let text = text.into();
    self.focused = true;
    if text.trim().is_empty() && self.config.empty_query == EmptyQueryPolicy::Close {
      log::trace!("empty query, closing without fetch");
      self.state.query = text;
      self.cancel_queries();
      self.results = ResultSet::empty();
      self.set_closed();
    } else {
      self.scheduler.input_changed(&text, self.clock.now());
      self.state.query = text;
    }
    self.flush();
  }

  /// Starts the debounced query once its deadline passed. The returned
  /// request must be fetched by the host and settled through
  /// [`Combobox::handle_response`].
  pub fn poll(&mut self) -> Option<QueryRequest> {
    let started = self.scheduler.poll(self.clock.now())?;
    if let Some(seq) = started.superseded {
      self.queued.push(ComboboxEvent::LoadEnd {
        seq,
        outcome: LoadOutcome::Canceled,
      });
    }
    self.queued.push(ComboboxEvent::LoadStart {
      seq:   started.request.seq,
      query: started.request.query.clone(),
    });
    self.flush();
    Some(started.request)
  }

  pub fn handle_response(
    &mut self,
    seq: QuerySeq,
    result: Result<Vec<SourceItem>, SourceError>,
  ) -> ResponseOutcome {
    if !self.scheduler.complete(seq) {
      log::debug!("discarding stale response for query {seq}");
      return ResponseOutcome::Stale;
    }

    let outcome = match result {
      Ok(items) => {
        self.results = self.ids.build(items);
        LoadOutcome::Success {
          count: self.results.len(),
        }
      },
      Err(err) => {
        log::warn!("query {seq} failed: {err}");
        self.results = ResultSet::empty();
        LoadOutcome::Failed {
          reason: err.to_string(),
        }
      },
    };

    // a new result set never keeps a selection
    self.state.selection = None;
    let show = self.focused
      && (!self.results.is_empty() || self.config.no_results == NoResultsPolicy::OpenEmpty);
    if show {
      self.set_open();
    } else {
      self.set_closed();
    }

    self.queued.push(ComboboxEvent::LoadEnd { seq, outcome });
    self.flush();
    ResponseOutcome::Applied
  }

  pub fn handle_key(&mut self, key: KeyEvent) -> KeyOutcome {
    let outcome = self.route_key(key);
    log::trace!("key {:?} -> {:?}", key.key, outcome);
    self.flush();
    outcome
  }

  fn route_key(&mut self, key: KeyEvent) -> KeyOutcome {
    if key.modifiers.alt() || key.modifiers.meta() {
      return KeyOutcome::Continue;
    }
    let direction = match key.key {
      Key::Down => Some(Direction::Down),
      Key::Up => Some(Direction::Up),
      Key::Char('n') if key.modifiers.ctrl() => Some(Direction::Down),
      Key::Char('p') if key.modifiers.ctrl() => Some(Direction::Up),
      _ => None,
    };
    if let Some(direction) = direction {
      return self.navigate(direction);
    }
    if key.modifiers.ctrl() {
      return KeyOutcome::Continue;
    }

    match key.key {
      Key::Enter | Key::NumpadEnter => {
        if self.state.selection.is_none() {
          return KeyOutcome::Continue;
        }
        if self.commit(CommitTrigger::EnterKey).is_ignored() {
          KeyOutcome::Continue
        } else {
          KeyOutcome::Handled
        }
      },
      Key::Escape if self.state.open => {
        self.dismiss();
        KeyOutcome::Handled
      },
      _ => KeyOutcome::Continue,
    }
  }

  fn navigate(&mut self, direction: Direction) -> KeyOutcome {
    let Some(next) = self.nav_state().step(direction, self.results.options()) else {
      return KeyOutcome::Continue;
    };
    self.set_open();
    self.state.selection = next
      .selected()
      .and_then(|index| self.results.get(index))
      .map(|option| option.id);
    KeyOutcome::Handled
  }

  pub fn handle_focus(&mut self) {
    self.focused = true;
  }

  pub fn handle_blur(&mut self) {
    match self.blur_guard.on_blur(self.clock.now()) {
      BlurDecision::Ignore => {
        log::trace!("blur ignored while an option is being clicked");
      },
      BlurDecision::Close => {
        self.focused = false;
        self.dismiss();
        self.flush();
      },
    }
  }

  /// A pointer went down inside the popup.
  pub fn handle_pointer_down(&mut self) {
    let now = self.clock.now();
    self.blur_guard.arm(now, self.config.blur_grace());
  }

  /// An option was clicked.
  pub fn activate_option(&mut self, id: OptionId) -> CommitOutcome {
    self.blur_guard.disarm();
    let outcome = self.commit(CommitTrigger::OptionActivation(id));
    self.flush();
    outcome
  }

  pub fn open(&mut self) {
    self.set_open();
    self.flush();
  }

  /// Closes the popup and drops pending and in-flight queries.
  pub fn close(&mut self) {
    self.dismiss();
    self.flush();
  }

  fn commit(&mut self, trigger: CommitTrigger) -> CommitOutcome {
    match commit::resolve(trigger, &self.state, &self.results) {
      Resolution::Ignored(reason) => {
        log::trace!("commit ignored: {reason:?}");
        CommitOutcome::Ignored(reason)
      },
      Resolution::Link(href) => {
        self.dismiss();
        self.queued.push(ComboboxEvent::LinkActivated { href: href.clone() });
        CommitOutcome::Navigated { href }
      },
      Resolution::Value(value) => {
        self.state.committed_value = value.clone();
        self.state.query = value.clone();
        self.dismiss();
        self.queued.push(ComboboxEvent::ValueCommitted {
          value:          value.clone(),
          related_target: self.bindings.input_id.clone(),
        });
        CommitOutcome::Committed { value }
      },
    }
  }

  fn dismiss(&mut self) {
    self.cancel_queries();
    self.set_closed();
  }

  fn cancel_queries(&mut self) {
    if let Some(seq) = self.scheduler.cancel() {
      self.queued.push(ComboboxEvent::LoadEnd {
        seq,
        outcome: LoadOutcome::Canceled,
      });
    }
  }

  fn set_open(&mut self) {
    if visibility::open(&mut self.state) {
      self.queued.push(ComboboxEvent::Toggled { open: true });
    }
  }

  fn set_closed(&mut self) {
    if visibility::close(&mut self.state) {
      self.queued.push(ComboboxEvent::Toggled { open: false });
    }
  }

  fn flush(&mut self) {
    let attributes = self.attributes();
    self.host.apply_attributes(&attributes);
    for event in std::mem::take(&mut self.queued) {
      self.host.dispatch(&event);
    }
  }
}
