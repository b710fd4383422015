//! Debounced query scheduling with soft cancellation.
//!
//! Input changes arm a deadline; once it passes without a newer change the
//! query starts under a fresh sequence number. The cancel token of the
//! previous query is tripped, but the sequence number compared at completion
//! time is what actually keeps superseded responses out.

use std::time::{
  Duration,
  Instant,
};

use the_combobox_event::{
  TaskController,
  TaskHandle,
};

use crate::event::QuerySeq;

/// A query the host has to fetch. Its result goes back through
/// `Combobox::handle_response` tagged with `seq`.
#[derive(Debug, Clone)]
pub struct QueryRequest {
  pub seq:    QuerySeq,
  pub query:  String,
  pub handle: TaskHandle,
}

#[derive(Debug)]
pub struct Started {
  pub request:    QueryRequest,
  /// In-flight query that was superseded by this one.
  pub superseded: Option<QuerySeq>,
}

#[derive(Debug, Clone)]
struct Debounced {
  query:    String,
  deadline: Instant,
}

#[derive(Debug, Clone)]
struct PendingQuery {
  seq:   QuerySeq,
  query: String,
}

#[derive(Debug)]
pub struct QueryScheduler {
  debounce:  Duration,
  debounced: Option<Debounced>,
  in_flight: Option<PendingQuery>,
  tasks:     TaskController,
  next_seq:  u64,
}

impl QueryScheduler {
  pub fn new(debounce: Duration) -> Self {
    Self {
      debounce,
      debounced: None,
      in_flight: None,
      tasks: TaskController::new(),
      next_seq: 1,
    }
  }

  /// Re-arms the debounce deadline for `query`, replacing any query that did
  /// not start yet.
  pub fn input_changed(&mut self, query: &str, now: Instant) {
    self.debounced = Some(Debounced {
      query:    query.to_owned(),
      deadline: now + self.debounce,
    });
  }

  pub fn next_deadline(&self) -> Option<Instant> {
    self.debounced.as_ref().map(|debounced| debounced.deadline)
  }

  /// Starts the debounced query if its deadline has passed.
  pub fn poll(&mut self, now: Instant) -> Option<Started> {
    if self.debounced.as_ref()?.deadline > now {
      return None;
    }
    let debounced = self.debounced.take()?;

    let superseded = self.in_flight.take().map(|pending| {
      log::debug!("query {} superseded by a newer input", pending.seq);
      pending.seq
    });
    let handle = self.tasks.restart();
    let seq = QuerySeq(self.next_seq);
    self.next_seq = self.next_seq.saturating_add(1);
    self.in_flight = Some(PendingQuery {
      seq,
      query: debounced.query.clone(),
    });

    Some(Started {
      request: QueryRequest {
        seq,
        query: debounced.query,
        handle,
      },
      superseded,
    })
  }

  /// Settles the query `seq`. Returns false for anything but the current
  /// in-flight query, whose response must then be discarded.
  pub fn complete(&mut self, seq: QuerySeq) -> bool {
    match &self.in_flight {
      Some(pending) if pending.seq == seq => {
        self.in_flight = None;
        self.tasks.finish();
        true
      },
      _ => false,
    }
  }

  /// Drops the debounced input and cancels the in-flight query. Returns the
  /// cancelled query so its load can be reported as ended.
  pub fn cancel(&mut self) -> Option<QuerySeq> {
    self.debounced = None;
    self.tasks.cancel();
    self.in_flight.take().map(|pending| pending.seq)
  }

  pub fn in_flight(&self) -> Option<QuerySeq> {
    self.in_flight.as_ref().map(|pending| pending.seq)
  }

  #[cfg(test)]
  fn in_flight_query(&self) -> Option<&str> {
    self.in_flight.as_ref().map(|pending| pending.query.as_str())
  }

  #[cfg(test)]
  fn is_idle(&self) -> bool {
    self.debounced.is_none() && self.in_flight.is_none()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  const DEBOUNCE: Duration = Duration::from_millis(50);

  #[test]
  fn rapid_changes_coalesce_into_one_query() {
    let start = Instant::now();
    let mut scheduler = QueryScheduler::new(DEBOUNCE);

    scheduler.input_changed("h", start);
    scheduler.input_changed("hu", start + Duration::from_millis(20));
    assert!(scheduler.poll(start + Duration::from_millis(60)).is_none());

    let started = scheduler
      .poll(start + Duration::from_millis(70))
      .expect("query starts after the quiet period");
    assert_eq!(started.request.query, "hu");
    assert_eq!(started.superseded, None);
    assert!(scheduler.poll(start + Duration::from_secs(1)).is_none());
  }

  #[test]
  fn zero_debounce_still_coalesces_before_poll() {
    let now = Instant::now();
    let mut scheduler = QueryScheduler::new(Duration::ZERO);
    scheduler.input_changed("a", now);
    scheduler.input_changed("ab", now);
    let started = scheduler.poll(now).unwrap();
    assert_eq!(started.request.query, "ab");
    assert_eq!(started.request.seq.get(), 1);
  }

  #[test]
  fn newer_query_supersedes_and_cancels_in_flight() {
    let now = Instant::now();
    let mut scheduler = QueryScheduler::new(Duration::ZERO);

    scheduler.input_changed("a", now);
    let first = scheduler.poll(now).unwrap().request;
    scheduler.input_changed("ab", now);
    let second = scheduler.poll(now).unwrap();

    assert_eq!(second.superseded, Some(first.seq));
    assert!(first.handle.is_canceled());
    assert!(second.request.seq > first.seq);

    assert!(!scheduler.complete(first.seq));
    assert!(scheduler.complete(second.request.seq));
    assert!(!scheduler.complete(second.request.seq));
    assert!(!second.request.handle.is_canceled());
  }

  #[test]
  fn cancel_drops_debounced_input_without_a_started_query() {
    let now = Instant::now();
    let mut scheduler = QueryScheduler::new(DEBOUNCE);
    scheduler.input_changed("a", now);
    assert_eq!(scheduler.cancel(), None);
    assert!(scheduler.is_idle());
    assert!(scheduler.poll(now + DEBOUNCE).is_none());
  }

  #[test]
  fn cancel_reports_in_flight_query() {
    let now = Instant::now();
    let mut scheduler = QueryScheduler::new(Duration::ZERO);
    scheduler.input_changed("a", now);
    let request = scheduler.poll(now).unwrap().request;
    assert_eq!(scheduler.in_flight_query(), Some("a"));
    assert_eq!(scheduler.cancel(), Some(request.seq));
    assert!(request.handle.is_canceled());
    assert!(!scheduler.complete(request.seq));
  }
}
