use tracing::debug;

use crate::context::Context;
use crate::error::SagaError;
use crate::graph::TransitionGraph;
use crate::state::Transaction;

/// Advances a transaction by exactly one registered action.
///
/// Holds nothing but the read-only graph, so [`Engine::run`] can be called
/// from any number of threads at once.
pub struct Engine<T: Transaction, E> {
    graph: TransitionGraph<T, E>,
}

impl<T: Transaction, E> Engine<T, E> {
    #[must_use]
    pub fn new(graph: TransitionGraph<T, E>) -> Self {
        Self { graph }
    }

    #[must_use]
    pub fn graph(&self) -> &TransitionGraph<T, E> {
        &self.graph
    }

    /// Run the action registered for the transaction's state.
    ///
    /// The engine does not retry. Side effects of an action whose result is
    /// rejected are not undone here.
    ///
    /// # Errors
    ///
    /// Returns [`SagaError::NoAction`] if nothing is registered for the
    /// current state, [`SagaError::Action`] wrapping the action's own error,
    /// or [`SagaError::InvalidStateChange`] if the action produced a state
    /// outside its declared transitions.
    pub fn run(&self, ctx: &Context, tx: &T) -> Result<T, SagaError<T::State, E>> {
        let from = tx.current_state();
        let registration = self
            .graph
            .lookup(from)
            .ok_or(SagaError::NoAction { state: from })?;
        let action = registration
            .action
            .as_ref()
            .ok_or(SagaError::NoAction { state: from })?;

        debug!(state = ?from, action = action.name(), "running saga action");
        let next = action
            .execute(ctx, tx)
            .map_err(|source| SagaError::Action { state: from, source })?;

        let to = next.current_state();
        if !registration.next.contains(&to) {
            return Err(SagaError::InvalidStateChange { from, to });
        }

        debug!(from = ?from, to = ?to, "saga action completed");
        Ok(next)
    }
}
