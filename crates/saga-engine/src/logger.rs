use std::sync::Arc;

use tracing::info;

use crate::context::Context;
use crate::state::Transaction;

/// Persists saga transitions, normally for auditing or crash recovery.
///
/// The executor calls [`Logger::log`] exactly once per successful step, with
/// the transaction produced by that step.
pub trait Logger<T, E>: Send + Sync {
    /// # Errors
    ///
    /// Returns an error if the transition could not be stored. The executor
    /// stops and hands the error back to its caller.
    fn log(&self, ctx: &Context, tx: &T) -> Result<(), E>;
}

impl<T, E, L> Logger<T, E> for Arc<L>
where
    L: Logger<T, E> + ?Sized,
{
    fn log(&self, ctx: &Context, tx: &T) -> Result<(), E> {
        (**self).log(ctx, tx)
    }
}

/// Logger that discards every transition. Used when none is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NopLogger;

impl<T, E> Logger<T, E> for NopLogger {
    fn log(&self, _ctx: &Context, _tx: &T) -> Result<(), E> {
        Ok(())
    }
}

/// Logger that emits one `tracing` event per transition.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl<T: Transaction, E> Logger<T, E> for TracingLogger {
    fn log(&self, _ctx: &Context, tx: &T) -> Result<(), E> {
        info!(state = ?tx.current_state(), "saga transition");
        Ok(())
    }
}

/// A [`Logger`] backed by a closure. Created with [`logger_fn`].
pub struct FnLogger<F> {
    f: F,
}

pub fn logger_fn<F>(f: F) -> FnLogger<F> {
    FnLogger { f }
}

impl<T, E, F> Logger<T, E> for FnLogger<F>
where
    F: Fn(&Context, &T) -> Result<(), E> + Send + Sync,
{
    fn log(&self, ctx: &Context, tx: &T) -> Result<(), E> {
        (self.f)(ctx, tx)
    }
}
