use std::fmt::Debug;

use thiserror::Error;

use crate::state::Transaction;

/// Error from building or running a saga.
///
/// `S` is the saga's state type and `E` the error type returned by actions
/// and loggers. Errors from actions and loggers are kept verbatim as the
/// source, tagged with the state that identifies the failing step.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SagaError<S: Debug, E> {
    /// The saga was configured without any activity.
    #[error("saga has no activities")]
    NoActivity,

    /// An activity was configured without its forward action.
    #[error("activity {index} has no forward action")]
    MissingAction {
        /// Position of the activity in the configured list.
        index: usize,
    },

    /// Two registrations claim the same input state.
    #[error("state {state:?} is registered more than once")]
    DuplicateState {
        /// The contested state.
        state: S,
    },

    /// No transaction was supplied to the executor.
    #[error("no transaction to execute")]
    MissingTransaction,

    /// Nothing is registered to run from the transaction's state.
    #[error("no action registered for state {state:?}")]
    NoAction {
        /// State the transaction was in.
        state: S,
    },

    /// An action produced a state outside its declared transitions.
    #[error("invalid state change from {from:?} to {to:?}")]
    InvalidStateChange {
        /// State the action was registered for.
        from: S,
        /// State the action produced.
        to: S,
    },

    /// The action registered for a state returned an error.
    #[error("action for state {state:?} failed")]
    Action {
        /// State the action was registered for.
        state: S,
        /// The action's error.
        #[source]
        source: E,
    },

    /// The logger failed to persist a transition.
    #[error("failed to log transition to state {state:?}")]
    Logger {
        /// State of the transaction that could not be logged.
        state: S,
        /// The logger's error.
        #[source]
        source: E,
    },
}

impl<S: Debug, E> SagaError<S, E> {
    /// Whether the error was raised while building the transition graph.
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::NoActivity | Self::MissingAction { .. } | Self::DuplicateState { .. }
        )
    }
}

/// A saga run that stopped before reaching a final state.
///
/// Carries the last transaction known to be valid so the caller can inspect
/// its state, retry, or reconcile by hand.
#[derive(Debug, Error)]
#[error("saga halted before reaching a final state")]
pub struct Halted<T: Transaction, E> {
    transaction: Option<T>,
    #[source]
    error: SagaError<T::State, E>,
}

impl<T: Transaction, E> Halted<T, E> {
    pub(crate) fn new(transaction: Option<T>, error: SagaError<T::State, E>) -> Self {
        Self { transaction, error }
    }

    /// The last valid transaction. `None` only when no transaction was given.
    #[must_use]
    pub fn transaction(&self) -> Option<&T> {
        self.transaction.as_ref()
    }

    #[must_use]
    pub fn error(&self) -> &SagaError<T::State, E> {
        &self.error
    }

    #[must_use]
    pub fn into_parts(self) -> (Option<T>, SagaError<T::State, E>) {
        (self.transaction, self.error)
    }
}
