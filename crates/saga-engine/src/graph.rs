use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use tracing::debug;

use crate::action::Action;
use crate::activity::Activity;
use crate::error::SagaError;
use crate::state::Transaction;

pub(crate) struct Registration<T: Transaction, E> {
    pub(crate) action: Option<Arc<dyn Action<T, E>>>,
    pub(crate) next: BTreeSet<T::State>,
}

/// Which action runs from each state, and which states it may produce.
///
/// Built once from an ordered activity list and read-only afterwards, so a
/// single graph can serve any number of concurrent executions.
///
/// Forward edges chain the activities: the initial state runs the first
/// forward action, its success state runs the second, and so on. Each
/// forward action may produce either its activity's success or failure
/// state. Compensation edges run backwards: the failure and rolled-back
/// states of activity `i` both trigger the compensation of activity `i - 1`,
/// which must produce that activity's rolled-back state. A failure anywhere
/// therefore unwinds every earlier activity, one at a time, down to the
/// first.
pub struct TransitionGraph<T: Transaction, E> {
    initial_state: T::State,
    registrations: HashMap<T::State, Registration<T, E>>,
}

impl<T: Transaction, E> TransitionGraph<T, E> {
    /// Build the graph for `activities`, starting at `initial_state`.
    ///
    /// A missing compensation is not an error here. The states that would
    /// trigger it are still registered, and reaching them at run time fails
    /// with [`SagaError::NoAction`]. Such an empty slot never conflicts with
    /// a later registration of the same state; the later one replaces it.
    ///
    /// # Errors
    ///
    /// Returns [`SagaError::NoActivity`] for an empty list,
    /// [`SagaError::MissingAction`] if an activity has no forward action, and
    /// [`SagaError::DuplicateState`] if a state that already runs an action
    /// is registered again.
    pub fn from_activities(
        initial_state: T::State,
        activities: &[Activity<T, E>],
    ) -> Result<Self, SagaError<T::State, E>> {
        if activities.is_empty() {
            return Err(SagaError::NoActivity);
        }
        if let Some(index) = activities.iter().position(|a| !a.has_action()) {
            return Err(SagaError::MissingAction { index });
        }

        let mut graph = Self {
            initial_state,
            registrations: HashMap::new(),
        };

        let mut cursor = initial_state;
        for activity in activities {
            graph.register(
                cursor,
                activity.action(),
                [activity.success_state(), activity.failure_state()],
            )?;
            cursor = activity.success_state();
        }

        for pair in activities.windows(2) {
            let (previous, current) = (&pair[0], &pair[1]);
            for trigger in [current.failure_state(), current.rolled_back_state()] {
                graph.register(
                    trigger,
                    previous.compensation(),
                    [previous.rolled_back_state()],
                )?;
            }
        }

        Ok(graph)
    }

    fn register(
        &mut self,
        state: T::State,
        action: Option<&Arc<dyn Action<T, E>>>,
        next: impl IntoIterator<Item = T::State>,
    ) -> Result<(), SagaError<T::State, E>> {
        if self
            .registrations
            .get(&state)
            .is_some_and(|existing| existing.action.is_some())
        {
            return Err(SagaError::DuplicateState { state });
        }

        let next: BTreeSet<_> = next.into_iter().collect();
        debug!(
            state = ?state,
            action = action.map(|a| a.name()),
            next = ?next,
            "registered saga transition"
        );
        self.registrations.insert(
            state,
            Registration {
                action: action.cloned(),
                next,
            },
        );
        Ok(())
    }

    pub(crate) fn lookup(&self, state: T::State) -> Option<&Registration<T, E>> {
        self.registrations.get(&state)
    }

    #[must_use]
    pub fn initial_state(&self) -> T::State {
        self.initial_state
    }

    /// Whether anything is registered to run from `state`.
    #[must_use]
    pub fn contains(&self, state: T::State) -> bool {
        self.registrations.contains_key(&state)
    }

    /// States the action registered at `state` may produce.
    #[must_use]
    pub fn legal_next(&self, state: T::State) -> Option<&BTreeSet<T::State>> {
        self.registrations.get(&state).map(|r| &r.next)
    }

    /// Registered input states, sorted.
    #[must_use]
    pub fn states(&self) -> Vec<T::State> {
        let mut states: Vec<_> = self.registrations.keys().copied().collect();
        states.sort_unstable();
        states
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }
}
