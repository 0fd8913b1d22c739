//! # Operations
//!
//! One generic trait stands in for the whole family of functional shapes
//! (suppliers, functions, bi-functions, consumers, predicates and their
//! throwing variants). The arity lives in the argument tuple, the result in
//! the associated `Output`:
//!
//! | Shape          | Rust form                                  |
//! |----------------|--------------------------------------------|
//! | supplier       | `Operation<()>`                            |
//! | function       | `Operation<(A,)>`                          |
//! | bi-function    | `Operation<(A, B)>`                        |
//! | consumer       | `Output = ()`                              |
//! | predicate      | `Output = bool`                            |
//! | throwing form  | `Output = Result<R, E>`                    |
//!
//! Every `Fn` of arity 0 to 3 is an operation, so plain functions and
//! closures plug in directly:
//!
//! ```rust
//! use fallible_core::operation::{constant, Operation};
//!
//! fn add(a: i32, b: i32) -> i32 {
//!     a + b
//! }
//!
//! assert_eq!(add.apply((2, 3)), 5);
//! assert_eq!(add.arity(), 2);
//! assert_eq!(constant('x').apply((1, 2, 3)), 'x');
//! ```

use std::fmt;

/// Argument tuples an operation can be called with.
pub trait Arguments {
    /// Number of arguments in the tuple.
    const ARITY: usize;
}

/// Argument tuples of exactly two elements.
///
/// Used by adapters that only make sense for binary operations
/// (argument swapping, partial application).
pub trait Binary: Arguments {
    /// Type of the first argument.
    type First;
    /// Type of the second argument.
    type Second;
}

impl<A, B> Binary for (A, B) {
    type First = A;
    type Second = B;
}

/// A callable taking the argument tuple `Args`.
pub trait Operation<Args> {
    /// The value produced by a call.
    type Output;

    /// Invoke the operation.
    fn apply(&self, args: Args) -> Self::Output;

    /// Number of arguments this operation takes.
    fn arity(&self) -> usize
    where
        Args: Arguments,
    {
        Args::ARITY
    }
}

macro_rules! impl_arity {
    ($arity:expr; $($ty:ident $val:ident),*) => {
        impl<$($ty),*> Arguments for ($($ty,)*) {
            const ARITY: usize = $arity;
        }

        impl<Func, Ret, $($ty),*> Operation<($($ty,)*)> for Func
        where
            Func: Fn($($ty),*) -> Ret,
        {
            type Output = Ret;

            #[inline]
            fn apply(&self, ($($val,)*): ($($ty,)*)) -> Ret {
                self($($val),*)
            }
        }
    };
}

impl_arity!(0;);
impl_arity!(1; A a);
impl_arity!(2; A a, B b);
impl_arity!(3; A a, B b, C c);

// ============================================================================
// Factories
// ============================================================================

/// Pin a value as an operation over `Args`.
///
/// Useful to fix the argument types of a closure at the point of definition.
pub fn of<Args, F>(op: F) -> F
where
    F: Operation<Args>,
{
    op
}

/// Invoke an operation with an argument tuple.
pub fn call<Args, F>(op: &F, args: Args) -> F::Output
where
    F: Operation<Args>,
{
    op.apply(args)
}

/// An operation that ignores its arguments and returns a clone of a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Constant<T> {
    value: T,
}

/// Create an operation of any arity that always returns `value`.
pub fn constant<T: Clone>(value: T) -> Constant<T> {
    Constant { value }
}

impl<T> Constant<T> {
    /// The value returned on every call.
    pub fn value(&self) -> &T {
        &self.value
    }
}

impl<T: Clone, Args: Arguments> Operation<Args> for Constant<T> {
    type Output = T;

    fn apply(&self, _args: Args) -> T {
        self.value.clone()
    }
}

/// The unary operation returning its argument unchanged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Identity;

/// Create the identity operation.
pub fn identity() -> Identity {
    Identity
}

impl<A> Operation<(A,)> for Identity {
    type Output = A;

    fn apply(&self, (a,): (A,)) -> A {
        a
    }
}

/// A binary operation that forwards its first argument and drops the second.
#[derive(Debug, Clone, Copy)]
pub struct OnlyFirst<F> {
    inner: F,
}

/// Lift a unary operation into a binary one that ignores the second argument.
pub fn only_first<F>(inner: F) -> OnlyFirst<F> {
    OnlyFirst { inner }
}

impl<F, A, B> Operation<(A, B)> for OnlyFirst<F>
where
    F: Operation<(A,)>,
{
    type Output = F::Output;

    fn apply(&self, (a, _): (A, B)) -> Self::Output {
        self.inner.apply((a,))
    }
}

/// A binary operation that forwards its second argument and drops the first.
#[derive(Debug, Clone, Copy)]
pub struct OnlySecond<F> {
    inner: F,
}

/// Lift a unary operation into a binary one that ignores the first argument.
pub fn only_second<F>(inner: F) -> OnlySecond<F> {
    OnlySecond { inner }
}

impl<F, A, B> Operation<(A, B)> for OnlySecond<F>
where
    F: Operation<(B,)>,
{
    type Output = F::Output;

    fn apply(&self, (_, b): (A, B)) -> Self::Output {
        self.inner.apply((b,))
    }
}

// ============================================================================
// Boxed Operations
// ============================================================================

/// A type-erased operation.
///
/// Lets operations of different concrete types share one type, e.g. to be
/// stored together or returned from branches of a `match`.
pub struct BoxedOperation<'a, Args, R> {
    inner: Box<dyn Operation<Args, Output = R> + Send + Sync + 'a>,
}

impl<'a, Args, R> BoxedOperation<'a, Args, R> {
    /// Erase the concrete type of an operation.
    pub fn new<F>(op: F) -> Self
    where
        F: Operation<Args, Output = R> + Send + Sync + 'a,
    {
        Self {
            inner: Box::new(op),
        }
    }
}

impl<Args, R> Operation<Args> for BoxedOperation<'_, Args, R> {
    type Output = R;

    fn apply(&self, args: Args) -> R {
        self.inner.apply(args)
    }
}

impl<Args, R> fmt::Debug for BoxedOperation<'_, Args, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoxedOperation").finish_non_exhaustive()
    }
}
