use std::collections::BTreeSet;

use tracing::{info, warn};

use crate::builder::ExecutorBuilder;
use crate::context::Context;
use crate::engine::Engine;
use crate::error::{Halted, SagaError};
use crate::graph::TransitionGraph;
use crate::logger::Logger;
use crate::state::Transaction;

/// Drives transactions through a saga until they reach a final state.
///
/// An executor is immutable once built. The same executor can run any number
/// of independent transactions, sequentially or from several threads, as long
/// as the configured actions and logger tolerate concurrent calls.
pub struct Executor<T: Transaction, E> {
    engine: Engine<T, E>,
    final_states: BTreeSet<T::State>,
    logger: Box<dyn Logger<T, E>>,
}

impl<T: Transaction, E> Executor<T, E> {
    /// Start configuring a saga that begins at `initial_state`.
    #[must_use]
    pub fn builder(initial_state: T::State) -> ExecutorBuilder<T, E> {
        ExecutorBuilder::new(initial_state)
    }

    pub(crate) fn from_parts(
        engine: Engine<T, E>,
        final_states: BTreeSet<T::State>,
        logger: Box<dyn Logger<T, E>>,
    ) -> Self {
        Self {
            engine,
            final_states,
            logger,
        }
    }

    /// Run `tx` until it reaches a final state.
    ///
    /// Each step runs the action registered for the current state, checks the
    /// resulting state against the graph, and logs the new transaction.
    /// Steps run one at a time on the calling thread; nothing is retried.
    ///
    /// To resume after a crash, pass a transaction rebuilt from whatever the
    /// logger persisted. Accepts `Option<T>` so an empty store surfaces as
    /// [`SagaError::MissingTransaction`].
    ///
    /// # Errors
    ///
    /// Returns [`Halted`] with the last valid transaction when a step fails.
    /// If the logger fails, the step itself has happened but the returned
    /// transaction is the one from before it.
    pub fn execute(&self, ctx: &Context, tx: impl Into<Option<T>>) -> Result<T, Halted<T, E>> {
        let Some(mut tx) = tx.into() else {
            return Err(Halted::new(None, SagaError::MissingTransaction));
        };

        loop {
            let state = tx.current_state();
            if self.is_final(state) {
                info!(state = ?state, "saga reached final state");
                return Ok(tx);
            }

            let next = match self.engine.run(ctx, &tx) {
                Ok(next) => next,
                Err(error) => {
                    warn!(state = ?state, error = %error, "saga step failed");
                    return Err(Halted::new(Some(tx), error));
                }
            };

            if let Err(source) = self.logger.log(ctx, &next) {
                let logged = next.current_state();
                warn!(from = ?state, to = ?logged, "failed to log saga transition");
                return Err(Halted::new(
                    Some(tx),
                    SagaError::Logger {
                        state: logged,
                        source,
                    },
                ));
            }

            tx = next;
        }
    }

    #[must_use]
    pub fn final_states(&self) -> &BTreeSet<T::State> {
        &self.final_states
    }

    #[must_use]
    pub fn is_final(&self, state: T::State) -> bool {
        self.final_states.contains(&state)
    }

    /// The single-step engine, for driving a transaction by hand.
    #[must_use]
    pub fn engine(&self) -> &Engine<T, E> {
        &self.engine
    }

    #[must_use]
    pub fn graph(&self) -> &TransitionGraph<T, E> {
        self.engine.graph()
    }
}
