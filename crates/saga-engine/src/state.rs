use std::fmt::Debug;
use std::hash::Hash;

/// Label for a point in a saga's lifecycle.
///
/// States key the transition graph, so they must be cheap to copy, ordered
/// and hashable. Implemented for every type that meets the bounds; enums and
/// small integers are the usual choices.
pub trait State: Copy + Eq + Ord + Hash + Debug + Send + Sync + 'static {}

impl<S> State for S where S: Copy + Eq + Ord + Hash + Debug + Send + Sync + 'static {}

/// A saga transaction.
///
/// Transactions are treated as immutable values: each action returns a new
/// transaction describing the state after it ran.
pub trait Transaction {
    type State: crate::State;

    /// The state this transaction is in. Must be free of side effects.
    fn current_state(&self) -> Self::State;
}
