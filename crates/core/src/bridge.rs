//! # Bridge - From Fallible to Total Operations
//!
//! A fallible operation returns `Result<R, E>` for some concrete failure type
//! `E`. Code that composes operations generically usually cannot name `E`.
//! The bridge turns such an operation into one returning
//! `Result<R, Unchecked>`, using one of three strategies:
//!
//! | Strategy    | Recoverable failure                    | Fatal failure |
//! |-------------|----------------------------------------|---------------|
//! | [`nest`]    | mapped (default: [`BridgeError::Nested`]) | unchanged  |
//! | [`recover`] | replaced by a fallback's result        | unchanged     |
//! | [`sneaky`]  | unchanged, type erased only            | unchanged     |
//!
//! "Unchanged" means the `Unchecked` holds the original failure value, so
//! `downcast::<E>()` gives it back with its type and message intact.
//!
//! ```rust
//! use fallible_core::prelude::*;
//! use fallible_core::operation::constant;
//!
//! fn parse(s: &str) -> Result<i64, std::num::ParseIntError> {
//!     s.parse()
//! }
//!
//! let nested = nest(parse);
//! let err = nested.apply(("x",)).unwrap_err();
//! assert!(err.is::<BridgeError>());
//!
//! let lenient = recover(parse, |_: &std::num::ParseIntError| Some(constant(0)));
//! assert_eq!(lenient.apply(("x",)).unwrap(), 0);
//! ```
//!
//! Which failures are fatal is decided by the [`FatalPolicy`] the [`Bridge`]
//! carries; the free functions use [`Classified`].

use std::any::type_name;
use std::error::Error;

use crate::error::{BridgeError, Unchecked};
use crate::operation::Operation;
use crate::severity::{Classified, Classify, FatalPolicy};

// ============================================================================
// Failure Mappers
// ============================================================================

/// Turns a recoverable failure into the error `nest` returns.
pub trait MapFailure<E> {
    /// The mapped error.
    type Error: Error + Send + Sync + 'static;

    /// Map one failure.
    fn map_failure(&self, failure: E) -> Self::Error;
}

/// The default mapper: wrap into [`BridgeError::Nested`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Nesting;

impl<E> MapFailure<E> for Nesting
where
    E: Error + Send + Sync + 'static,
{
    type Error = BridgeError;

    fn map_failure(&self, failure: E) -> BridgeError {
        BridgeError::nested(failure)
    }
}

impl<E, U, M> MapFailure<E> for M
where
    M: Fn(E) -> U,
    U: Error + Send + Sync + 'static,
{
    type Error = U;

    fn map_failure(&self, failure: E) -> U {
        self(failure)
    }
}

// ============================================================================
// Bridge
// ============================================================================

/// Builds bridged operations under one fatal-failure policy.
///
/// ```rust
/// use fallible_core::bridge::Bridge;
/// use fallible_core::operation::Operation;
/// use std::io;
///
/// // Only permission errors are considered unrecoverable here.
/// let bridge = Bridge::with_policy(|e: &io::Error| e.kind() == io::ErrorKind::PermissionDenied);
///
/// let read = |path: &str| -> Result<usize, io::Error> {
///     Err(io::Error::new(io::ErrorKind::NotFound, path.to_string()))
/// };
/// let err = bridge.nest(read).apply(("config.toml",)).unwrap_err();
/// assert!(!err.severity().is_fatal());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Bridge<P = Classified> {
    policy: P,
}

impl Bridge<Classified> {
    /// A bridge that asks each failure for its own severity.
    pub fn new() -> Self {
        Self { policy: Classified }
    }
}

impl<P> Bridge<P> {
    /// A bridge using a custom fatal-failure policy.
    pub fn with_policy(policy: P) -> Self {
        Self { policy }
    }

    /// The policy in use.
    pub fn policy(&self) -> &P {
        &self.policy
    }
}

impl<P: Clone> Bridge<P> {
    /// Nest recoverable failures into [`BridgeError::Nested`].
    pub fn nest<Args, F, R, E>(&self, op: F) -> Nest<F, P>
    where
        F: Operation<Args, Output = Result<R, E>>,
        E: Error + Send + Sync + 'static,
        P: FatalPolicy<E>,
    {
        self.nest_with(op, Nesting)
    }

    /// Nest recoverable failures with a caller-supplied mapper.
    pub fn nest_with<Args, F, M, R, E>(&self, op: F, mapper: M) -> Nest<F, P, M>
    where
        F: Operation<Args, Output = Result<R, E>>,
        E: Error + Send + Sync + 'static,
        P: FatalPolicy<E>,
        M: MapFailure<E>,
    {
        Nest {
            op,
            policy: self.policy.clone(),
            mapper,
        }
    }

    /// Replace recoverable failures with the result of a fallback operation.
    ///
    /// `provider` sees the failure and returns the fallback, which is called
    /// with the same arguments the failed call received. Returning `None` is
    /// reported as [`BridgeError::InvalidRecovery`].
    pub fn recover<Args, F, G, H, R, E>(&self, op: F, provider: G) -> Recover<F, P, G>
    where
        Args: Clone,
        F: Operation<Args, Output = Result<R, E>>,
        E: Error + Send + Sync + 'static,
        P: FatalPolicy<E>,
        G: Fn(&E) -> Option<H>,
        H: Operation<Args, Output = R>,
    {
        Recover {
            op,
            policy: self.policy.clone(),
            provider,
        }
    }

    /// Erase the failure type without wrapping the failure.
    pub fn sneaky<Args, F, R, E>(&self, op: F) -> Sneaky<F, P>
    where
        F: Operation<Args, Output = Result<R, E>>,
        E: Error + Send + Sync + 'static,
        P: FatalPolicy<E>,
    {
        Sneaky {
            op,
            policy: self.policy.clone(),
        }
    }
}

/// [`Bridge::nest`] under the [`Classified`] policy.
pub fn nest<Args, F, R, E>(op: F) -> Nest<F>
where
    F: Operation<Args, Output = Result<R, E>>,
    E: Error + Classify + Send + Sync + 'static,
{
    Bridge::new().nest(op)
}

/// [`Bridge::nest_with`] under the [`Classified`] policy.
pub fn nest_with<Args, F, M, R, E>(op: F, mapper: M) -> Nest<F, Classified, M>
where
    F: Operation<Args, Output = Result<R, E>>,
    E: Error + Classify + Send + Sync + 'static,
    M: MapFailure<E>,
{
    Bridge::new().nest_with(op, mapper)
}

/// [`Bridge::recover`] under the [`Classified`] policy.
pub fn recover<Args, F, G, H, R, E>(op: F, provider: G) -> Recover<F, Classified, G>
where
    Args: Clone,
    F: Operation<Args, Output = Result<R, E>>,
    E: Error + Classify + Send + Sync + 'static,
    G: Fn(&E) -> Option<H>,
    H: Operation<Args, Output = R>,
{
    Bridge::new().recover(op, provider)
}

/// [`Bridge::sneaky`] under the [`Classified`] policy.
pub fn sneaky<Args, F, R, E>(op: F) -> Sneaky<F>
where
    F: Operation<Args, Output = Result<R, E>>,
    E: Error + Classify + Send + Sync + 'static,
{
    Bridge::new().sneaky(op)
}

fn propagate_fatal<E>(failure: E) -> Unchecked
where
    E: Error + Send + Sync + 'static,
{
    tracing::warn!(
        failure_type = type_name::<E>(),
        failure = %failure,
        "propagating fatal failure unchanged"
    );
    Unchecked::fatal(failure)
}

// ============================================================================
// Nest
// ============================================================================

/// See [`Bridge::nest`].
#[derive(Debug, Clone, Copy)]
pub struct Nest<F, P = Classified, M = Nesting> {
    op: F,
    policy: P,
    mapper: M,
}

impl<F, P, M> Nest<F, P, M> {
    /// The wrapped operation.
    pub fn inner(&self) -> &F {
        &self.op
    }

    /// Unwrap and return the wrapped operation.
    pub fn into_inner(self) -> F {
        self.op
    }
}

impl<Args, F, P, M, R, E> Operation<Args> for Nest<F, P, M>
where
    F: Operation<Args, Output = Result<R, E>>,
    E: Error + Send + Sync + 'static,
    P: FatalPolicy<E>,
    M: MapFailure<E>,
{
    type Output = Result<R, Unchecked>;

    fn apply(&self, args: Args) -> Result<R, Unchecked> {
        self.op.apply(args).map_err(|failure| {
            if self.policy.is_fatal(&failure) {
                return propagate_fatal(failure);
            }
            tracing::debug!(
                failure_type = type_name::<E>(),
                failure = %failure,
                "nesting recoverable failure"
            );
            Unchecked::new(self.mapper.map_failure(failure))
        })
    }
}

// ============================================================================
// Recover
// ============================================================================

/// See [`Bridge::recover`].
#[derive(Debug, Clone, Copy)]
pub struct Recover<F, P, G> {
    op: F,
    policy: P,
    provider: G,
}

impl<F, P, G> Recover<F, P, G> {
    /// The wrapped operation.
    pub fn inner(&self) -> &F {
        &self.op
    }

    /// Unwrap and return the wrapped operation.
    pub fn into_inner(self) -> F {
        self.op
    }
}

impl<Args, F, P, G, H, R, E> Operation<Args> for Recover<F, P, G>
where
    Args: Clone,
    F: Operation<Args, Output = Result<R, E>>,
    E: Error + Send + Sync + 'static,
    P: FatalPolicy<E>,
    G: Fn(&E) -> Option<H>,
    H: Operation<Args, Output = R>,
{
    type Output = Result<R, Unchecked>;

    fn apply(&self, args: Args) -> Result<R, Unchecked> {
        // The fallback must see exactly what the failed call saw.
        let retained = args.clone();
        let failure = match self.op.apply(args) {
            Ok(value) => return Ok(value),
            Err(failure) => failure,
        };

        if self.policy.is_fatal(&failure) {
            return Err(propagate_fatal(failure));
        }

        match (self.provider)(&failure) {
            Some(fallback) => {
                tracing::debug!(
                    failure_type = type_name::<E>(),
                    failure = %failure,
                    "recovering with fallback operation"
                );
                Ok(fallback.apply(retained))
            }
            None => {
                tracing::error!(
                    failure_type = type_name::<E>(),
                    failure = %failure,
                    "recovery provider returned no operation"
                );
                Err(Unchecked::classified(BridgeError::invalid_recovery(
                    &failure,
                )))
            }
        }
    }
}

// ============================================================================
// Sneaky
// ============================================================================

/// See [`Bridge::sneaky`].
#[derive(Debug, Clone, Copy)]
pub struct Sneaky<F, P = Classified> {
    op: F,
    policy: P,
}

impl<F, P> Sneaky<F, P> {
    /// The wrapped operation.
    pub fn inner(&self) -> &F {
        &self.op
    }

    /// Unwrap and return the wrapped operation.
    pub fn into_inner(self) -> F {
        self.op
    }
}

impl<Args, F, P, R, E> Operation<Args> for Sneaky<F, P>
where
    F: Operation<Args, Output = Result<R, E>>,
    E: Error + Send + Sync + 'static,
    P: FatalPolicy<E>,
{
    type Output = Result<R, Unchecked>;

    fn apply(&self, args: Args) -> Result<R, Unchecked> {
        self.op.apply(args).map_err(|failure| {
            if self.policy.is_fatal(&failure) {
                return propagate_fatal(failure);
            }
            tracing::trace!(
                failure_type = type_name::<E>(),
                failure = %failure,
                "erasing failure type"
            );
            Unchecked::new(failure)
        })
    }
}
