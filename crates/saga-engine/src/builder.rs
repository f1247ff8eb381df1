use std::collections::BTreeSet;

use crate::activity::Activity;
use crate::engine::Engine;
use crate::error::SagaError;
use crate::executor::Executor;
use crate::graph::TransitionGraph;
use crate::logger::{Logger, NopLogger};
use crate::state::Transaction;

/// Builder for an [`Executor`].
///
/// Collects the initial state, the ordered activities and an optional
/// logger. [`ExecutorBuilder::build`] validates the whole configuration at
/// once; an executor is never handed out half-built.
pub struct ExecutorBuilder<T: Transaction, E> {
    initial_state: T::State,
    activities: Vec<Activity<T, E>>,
    logger: Option<Box<dyn Logger<T, E>>>,
}

impl<T: Transaction, E> ExecutorBuilder<T, E> {
    /// Create a builder for a saga starting at `initial_state`.
    #[must_use]
    pub fn new(initial_state: T::State) -> Self {
        Self {
            initial_state,
            activities: Vec::new(),
            logger: None,
        }
    }

    /// Append the next activity.
    #[must_use]
    pub fn activity(mut self, activity: Activity<T, E>) -> Self {
        self.activities.push(activity);
        self
    }

    /// Append several activities, in order.
    #[must_use]
    pub fn activities(mut self, activities: impl IntoIterator<Item = Activity<T, E>>) -> Self {
        self.activities.extend(activities);
        self
    }

    /// Persist each transition through `logger`. Defaults to [`NopLogger`].
    #[must_use]
    pub fn logger(mut self, logger: impl Logger<T, E> + 'static) -> Self {
        self.logger = Some(Box::new(logger));
        self
    }

    /// Build the transition graph and the executor around it.
    ///
    /// The final states are the first activity's failure and rolled-back
    /// states and the last activity's success state.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the activity list is empty, an
    /// activity lacks its forward action, or an input state is registered
    /// twice.
    pub fn build(self) -> Result<Executor<T, E>, SagaError<T::State, E>> {
        let graph = TransitionGraph::from_activities(self.initial_state, &self.activities)?;

        let final_states: BTreeSet<T::State> =
            match (self.activities.first(), self.activities.last()) {
                (Some(first), Some(last)) => [
                    first.failure_state(),
                    first.rolled_back_state(),
                    last.success_state(),
                ]
                .into_iter()
                .collect(),
                _ => return Err(SagaError::NoActivity),
            };

        let logger = self.logger.unwrap_or_else(|| Box::new(NopLogger));

        Ok(Executor::from_parts(Engine::new(graph), final_states, logger))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::action_fn;
    use crate::context::Context;

    #[derive(Debug, thiserror::Error)]
    #[error("test failure")]
    struct TestError;

    struct Tx(u8);

    impl Transaction for Tx {
        type State = u8;

        fn current_state(&self) -> u8 {
            self.0
        }
    }

    fn step(success: u8, failure: u8, rolled_back: u8) -> Activity<Tx, TestError> {
        Activity::new(success, failure, rolled_back)
            .with_action(action_fn("step", move |_: &Context, _: &Tx| Ok(Tx(success))))
    }

    #[test]
    fn builder_rejects_empty_saga() {
        let result = ExecutorBuilder::<Tx, TestError>::new(0).build();

        assert!(matches!(result, Err(SagaError::NoActivity)));
    }

    #[test]
    fn builder_collects_final_states() -> anyhow::Result<()> {
        let executor = ExecutorBuilder::new(0)
            .activity(step(1, 2, 3))
            .activities([step(4, 5, 6), step(7, 8, 9)])
            .build()?;

        let finals: Vec<u8> = executor.final_states().iter().copied().collect();
        assert_eq!(finals, vec![2, 3, 7]);
        Ok(())
    }

    #[test]
    fn single_activity_saga_has_three_final_states() -> anyhow::Result<()> {
        let executor = ExecutorBuilder::new(0).activity(step(1, 2, 3)).build()?;

        assert!(executor.is_final(1));
        assert!(executor.is_final(2));
        assert!(executor.is_final(3));
        assert!(!executor.is_final(0));
        assert_eq!(executor.graph().len(), 1);
        Ok(())
    }
}
