//! Orchestrated sagas driven by a state transition graph.
//!
//! A saga is an ordered list of [`Activity`] values. Each activity binds a
//! forward [`Action`] to the states it may produce, plus an optional
//! compensation. The [`Executor`] turns the list into a [`TransitionGraph`]
//! once, then drives a [`Transaction`] through it one action at a time until
//! the transaction lands in a final state. When a forward action reports a
//! failure state, compensations run in reverse order back to the first
//! activity.

mod action;
mod activity;
mod audit;
mod builder;
mod context;
mod engine;
mod error;
mod executor;
mod graph;
mod logger;
mod state;

pub use action::{Action, FnAction, action_fn};
pub use activity::Activity;
pub use audit::{AuditLog, TransitionRecord};
pub use builder::ExecutorBuilder;
pub use context::{Context, Interrupted};
pub use engine::Engine;
pub use error::{Halted, SagaError};
pub use executor::Executor;
pub use graph::TransitionGraph;
pub use logger::{FnLogger, Logger, NopLogger, TracingLogger, logger_fn};
pub use state::{State, Transaction};
