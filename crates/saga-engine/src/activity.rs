use std::fmt;
use std::sync::Arc;

use crate::action::Action;
use crate::state::Transaction;

/// One step of a saga: a forward action, the three states it can lead to,
/// and an optional compensation.
///
/// Activities form an ordered list. The success state of one activity is
/// the input state of the next, and the rolled-back state is what its
/// compensation produces.
pub struct Activity<T: Transaction, E> {
    success_state: T::State,
    failure_state: T::State,
    rolled_back_state: T::State,
    action: Option<Arc<dyn Action<T, E>>>,
    compensation: Option<Arc<dyn Action<T, E>>>,
}

impl<T: Transaction, E> Activity<T, E> {
    /// An activity with no actions attached yet.
    ///
    /// The forward action must be set with [`Activity::with_action`] before
    /// the saga can be built.
    #[must_use]
    pub fn new(
        success_state: T::State,
        failure_state: T::State,
        rolled_back_state: T::State,
    ) -> Self {
        Self {
            success_state,
            failure_state,
            rolled_back_state,
            action: None,
            compensation: None,
        }
    }

    #[must_use]
    pub fn with_action(mut self, action: impl Action<T, E> + 'static) -> Self {
        self.action = Some(Arc::new(action));
        self
    }

    /// Set the action that undoes this activity when a later one fails.
    #[must_use]
    pub fn with_compensation(mut self, compensation: impl Action<T, E> + 'static) -> Self {
        self.compensation = Some(Arc::new(compensation));
        self
    }

    #[must_use]
    pub fn success_state(&self) -> T::State {
        self.success_state
    }

    #[must_use]
    pub fn failure_state(&self) -> T::State {
        self.failure_state
    }

    #[must_use]
    pub fn rolled_back_state(&self) -> T::State {
        self.rolled_back_state
    }

    #[must_use]
    pub fn has_action(&self) -> bool {
        self.action.is_some()
    }

    #[must_use]
    pub fn has_compensation(&self) -> bool {
        self.compensation.is_some()
    }

    pub(crate) fn action(&self) -> Option<&Arc<dyn Action<T, E>>> {
        self.action.as_ref()
    }

    pub(crate) fn compensation(&self) -> Option<&Arc<dyn Action<T, E>>> {
        self.compensation.as_ref()
    }
}

impl<T: Transaction, E> Clone for Activity<T, E> {
    fn clone(&self) -> Self {
        Self {
            success_state: self.success_state,
            failure_state: self.failure_state,
            rolled_back_state: self.rolled_back_state,
            action: self.action.clone(),
            compensation: self.compensation.clone(),
        }
    }
}

impl<T: Transaction, E> fmt::Debug for Activity<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Activity")
            .field("success_state", &self.success_state)
            .field("failure_state", &self.failure_state)
            .field("rolled_back_state", &self.rolled_back_state)
            .field("action", &self.action.as_ref().map(|a| a.name()))
            .field("compensation", &self.compensation.as_ref().map(|a| a.name()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::action_fn;
    use crate::context::Context;

    struct Tx(u8);

    impl Transaction for Tx {
        type State = u8;

        fn current_state(&self) -> u8 {
            self.0
        }
    }

    #[test]
    fn new_activity_has_no_actions() {
        let activity = Activity::<Tx, ()>::new(1, 2, 3);

        assert_eq!(activity.success_state(), 1);
        assert_eq!(activity.failure_state(), 2);
        assert_eq!(activity.rolled_back_state(), 3);
        assert!(!activity.has_action());
        assert!(!activity.has_compensation());
    }

    #[test]
    fn clone_shares_actions() {
        let activity = Activity::<Tx, ()>::new(1, 2, 3)
            .with_action(action_fn("forward", |_: &Context, _: &Tx| Ok(Tx(1))))
            .with_compensation(action_fn("undo", |_: &Context, _: &Tx| Ok(Tx(3))));

        let copy = activity.clone();

        assert!(copy.has_action());
        assert!(copy.has_compensation());
        let original = activity.action().expect("action set");
        let cloned = copy.action().expect("action set");
        assert!(Arc::ptr_eq(original, cloned));
    }

    #[test]
    fn debug_shows_action_names() {
        let activity = Activity::<Tx, ()>::new(1, 2, 3)
            .with_action(action_fn("book_hotel", |_: &Context, _: &Tx| Ok(Tx(1))));

        let rendered = format!("{activity:?}");

        assert!(rendered.contains("book_hotel"));
        assert!(rendered.contains("compensation: None"));
    }
}
