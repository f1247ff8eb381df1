use std::sync::Arc;

use crate::context::Context;

/// One step of a saga, either forward or compensating.
///
/// The action borrows the current transaction and returns a new one in the
/// next state. Forward actions and compensations share this contract; the
/// transition graph decides which role an action plays.
///
/// Actions may be invoked more than once for the same transaction, including
/// with a context that is already cancelled, so implementations own their
/// idempotency and should return promptly once [`Context::check`] fails.
pub trait Action<T, E>: Send + Sync {
    /// Execute the step.
    ///
    /// # Errors
    ///
    /// Returns an error if the step could not run. The error reaches the
    /// caller of [`Executor::execute`](crate::Executor::execute) unchanged.
    fn execute(&self, ctx: &Context, tx: &T) -> Result<T, E>;

    /// Human-readable name used in diagnostics.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

impl<T, E, A> Action<T, E> for Arc<A>
where
    A: Action<T, E> + ?Sized,
{
    fn execute(&self, ctx: &Context, tx: &T) -> Result<T, E> {
        (**self).execute(ctx, tx)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// An [`Action`] backed by a closure. Created with [`action_fn`].
pub struct FnAction<F> {
    name: &'static str,
    f: F,
}

/// Wrap a closure as a named [`Action`].
///
/// ```
/// use saga_engine::{Action, Context, Transaction, action_fn};
///
/// struct Order(u8);
///
/// impl Transaction for Order {
///     type State = u8;
///     fn current_state(&self) -> u8 {
///         self.0
///     }
/// }
///
/// let reserve = action_fn("reserve_stock", |_ctx: &Context, _tx: &Order| {
///     Ok::<_, std::io::Error>(Order(1))
/// });
///
/// let next = reserve.execute(&Context::new(), &Order(0)).expect("reserved");
/// assert_eq!(next.current_state(), 1);
/// assert_eq!(reserve.name(), "reserve_stock");
/// ```
pub fn action_fn<F>(name: &'static str, f: F) -> FnAction<F> {
    FnAction { name, f }
}

impl<T, E, F> Action<T, E> for FnAction<F>
where
    F: Fn(&Context, &T) -> Result<T, E> + Send + Sync,
{
    fn execute(&self, ctx: &Context, tx: &T) -> Result<T, E> {
        (self.f)(ctx, tx)
    }

    fn name(&self) -> &str {
        self.name
    }
}
