//! # Instrumentation
//!
//! Compile-time configurable logging of operation calls, built on `tracing`.
//!
//! - `Instrumented<F, false>`: no instrumentation code is generated; the
//!   wrapper calls straight through.
//! - `Instrumented<F, true>`: each call runs inside a `trace`-level span
//!   carrying the operation's name and arity, and emits an event with the
//!   elapsed time when it returns.
//!
//! [`AutoInstrumented`] picks one or the other via `debug_assertions`.
//!
//! ```rust
//! use fallible_core::prelude::*;
//!
//! let double = |x: i32| x * 2;
//! let logged = double.instrumented_as("double");
//! assert_eq!(logged.apply((21,)), 42);
//! assert_eq!(logged.name(), "double");
//! ```

use std::any::type_name;
use std::time::Instant;

use crate::operation::{Arguments, Operation};

/// An operation wrapped with optional call logging.
///
/// The const generic `ENABLED` decides at compile time whether calls are
/// logged. The output is the inner operation's output either way.
#[derive(Debug, Clone, Copy)]
pub struct Instrumented<F, const ENABLED: bool> {
    inner: F,
    name: &'static str,
}

impl<F, const ENABLED: bool> Instrumented<F, ENABLED> {
    /// Wrap an operation, naming it after its type.
    pub fn new(inner: F) -> Self {
        Self::named(inner, type_name::<F>())
    }

    /// Wrap an operation under an explicit name.
    pub fn named(inner: F, name: &'static str) -> Self {
        Self { inner, name }
    }

    /// Name recorded on the span.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Get a reference to the inner operation.
    pub fn inner(&self) -> &F {
        &self.inner
    }

    /// Unwrap and return the inner operation.
    pub fn into_inner(self) -> F {
        self.inner
    }
}

impl<Args, F> Operation<Args> for Instrumented<F, false>
where
    F: Operation<Args>,
{
    type Output = F::Output;

    #[inline]
    fn apply(&self, args: Args) -> Self::Output {
        self.inner.apply(args)
    }
}

impl<Args, F> Operation<Args> for Instrumented<F, true>
where
    Args: Arguments,
    F: Operation<Args>,
{
    type Output = F::Output;

    fn apply(&self, args: Args) -> Self::Output {
        let span = tracing::trace_span!("apply", operation = self.name, arity = Args::ARITY);
        let _entered = span.enter();

        let start = Instant::now();
        let output = self.inner.apply(args);
        tracing::trace!(elapsed = ?start.elapsed(), "operation returned");
        output
    }
}

/// Instrumentation in debug builds, a plain pass-through in release builds.
#[cfg(debug_assertions)]
pub type AutoInstrumented<F> = Instrumented<F, true>;

/// Instrumentation in debug builds, a plain pass-through in release builds.
#[cfg(not(debug_assertions))]
pub type AutoInstrumented<F> = Instrumented<F, false>;

/// Extension trait for wrapping operations with optional instrumentation.
pub trait InstrumentExt<Args>: Operation<Args> + Sized {
    /// Wrap with instrumentation enabled.
    fn instrumented(self) -> Instrumented<Self, true> {
        Instrumented::new(self)
    }

    /// Wrap with instrumentation enabled, under an explicit name.
    fn instrumented_as(self, name: &'static str) -> Instrumented<Self, true> {
        Instrumented::named(self, name)
    }

    /// Wrap with instrumentation disabled.
    fn uninstrumented(self) -> Instrumented<Self, false> {
        Instrumented::new(self)
    }

    /// Wrap with build-dependent instrumentation (debug = on, release = off).
    fn auto_instrumented(self) -> AutoInstrumented<Self> {
        Instrumented::new(self)
    }
}

impl<Args, F: Operation<Args>> InstrumentExt<Args> for F {}
