use std::fmt::Debug;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use crate::context::Context;
use crate::logger::Logger;
use crate::state::Transaction;

/// One transition recorded by an [`AuditLog`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionRecord<S> {
    /// Position in the log, starting at 1.
    pub sequence: usize,
    /// State the transaction moved into.
    pub state: S,
    /// When the transition was logged.
    pub logged_at: Instant,
}

/// In-memory logger keeping every transition it is handed.
///
/// Safe to share between executions through an `Arc`; records from
/// concurrent runs interleave in arrival order.
#[derive(Debug)]
pub struct AuditLog<S> {
    records: Mutex<Vec<TransitionRecord<S>>>,
}

impl<S> Default for AuditLog<S> {
    fn default() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
        }
    }
}

impl<S: Copy + Debug> AuditLog<S> {
    /// Create a new empty audit log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record(&self, state: S) {
        let mut records = self.lock();
        let sequence = records.len() + 1;
        records.push(TransitionRecord {
            sequence,
            state,
            logged_at: Instant::now(),
        });
    }

    /// Snapshot of all records.
    #[must_use]
    pub fn records(&self) -> Vec<TransitionRecord<S>> {
        self.lock().clone()
    }

    /// States in the order they were logged.
    #[must_use]
    pub fn states(&self) -> Vec<S> {
        self.lock().iter().map(|record| record.state).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// One line per transition, for display.
    #[must_use]
    pub fn summary(&self) -> String {
        self.lock()
            .iter()
            .map(|record| format!("{}. {:?}", record.sequence, record.state))
            .collect::<Vec<_>>()
            .join("\n")
    }

    // A panic elsewhere while holding the lock leaves the records intact.
    fn lock(&self) -> MutexGuard<'_, Vec<TransitionRecord<S>>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T, E> Logger<T, E> for AuditLog<T::State>
where
    T: Transaction,
{
    fn log(&self, _ctx: &Context, tx: &T) -> Result<(), E> {
        self.record(tx.current_state());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    enum Step {
        Reserved,
        Charged,
        Refunded,
    }

    struct Tx(Step);

    impl Transaction for Tx {
        type State = Step;

        fn current_state(&self) -> Step {
            self.0
        }
    }

    #[test]
    fn new_audit_log_is_empty() {
        let log = AuditLog::<Step>::new();

        assert!(log.is_empty());
        assert_eq!(log.len(), 0);
        assert!(log.records().is_empty());
    }

    #[test]
    fn record_assigns_increasing_sequence_numbers() {
        let log = AuditLog::new();
        log.record(Step::Reserved);
        log.record(Step::Charged);

        let records = log.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].sequence, 1);
        assert_eq!(records[0].state, Step::Reserved);
        assert_eq!(records[1].sequence, 2);
        assert_eq!(records[1].state, Step::Charged);
        assert!(records[0].logged_at <= records[1].logged_at);
    }

    #[test]
    fn logging_a_transaction_records_its_state() {
        let log = AuditLog::<Step>::new();
        let ctx = Context::new();

        let first: Result<(), ()> = log.log(&ctx, &Tx(Step::Charged));
        let second: Result<(), ()> = log.log(&ctx, &Tx(Step::Refunded));

        assert!(first.is_ok());
        assert!(second.is_ok());
        assert_eq!(log.states(), vec![Step::Charged, Step::Refunded]);
    }

    #[test]
    fn summary_lists_every_transition() {
        let log = AuditLog::new();
        log.record(Step::Reserved);
        log.record(Step::Refunded);

        assert_eq!(log.summary(), "1. Reserved\n2. Refunded");
    }
}
