//! # Composition
//!
//! Adapters that build new operations out of existing ones. Every adapter is
//! a plain struct holding its parts, so a composed pipeline is a value that
//! can be stored, cloned and passed around before anything runs.
//!
//! ```rust
//! use fallible_core::prelude::*;
//!
//! let parse = |s: &str| s.len();
//! let pipeline = parse.and_then(|n: usize| n * 10);
//! assert_eq!(pipeline.apply(("abc",)), 30);
//!
//! let is_even = |n: i32| n % 2 == 0;
//! assert!(is_even.negate().apply((3,)));
//!
//! let minus = |a: i32, b: i32| a - b;
//! assert_eq!(minus.reversed().apply((1, 10)), 9);
//! assert_eq!(minus.apply_first(100).apply((1,)), 99);
//! ```
//!
//! Composition laws hold observably: composing with
//! [`identity`](crate::operation::identity) on either side changes nothing.

use std::marker::PhantomData;

use crate::operation::{Binary, BoxedOperation, Operation};

/// Composition adapters, available on every [`Operation`].
pub trait OperationExt<Args>: Operation<Args> + Sized {
    /// Feed this operation's output into `after`.
    fn and_then<G, T>(self, after: G) -> AndThen<Self, G>
    where
        G: Fn(Self::Output) -> T,
    {
        AndThen { first: self, after }
    }

    /// Run `before` first and call this operation with its output.
    ///
    /// `before` must produce this operation's whole argument tuple.
    fn compose<B, Pre>(self, before: B) -> Compose<Self, B>
    where
        B: Operation<Pre, Output = Args>,
    {
        Compose {
            inner: self,
            before,
        }
    }

    /// Logical negation of a predicate.
    fn negate(self) -> Negate<Self>
    where
        Self: Operation<Args, Output = bool>,
    {
        Negate { inner: self }
    }

    /// Short-circuiting conjunction of two predicates over the same arguments.
    fn and<G>(self, other: G) -> And<Self, G>
    where
        Self: Operation<Args, Output = bool>,
        G: Operation<Args, Output = bool>,
        Args: Clone,
    {
        And {
            left: self,
            right: other,
        }
    }

    /// Short-circuiting disjunction of two predicates over the same arguments.
    fn or<G>(self, other: G) -> Or<Self, G>
    where
        Self: Operation<Args, Output = bool>,
        G: Operation<Args, Output = bool>,
        Args: Clone,
    {
        Or {
            left: self,
            right: other,
        }
    }

    /// Exclusive disjunction of two predicates over the same arguments.
    fn xor<G>(self, other: G) -> Xor<Self, G>
    where
        Self: Operation<Args, Output = bool>,
        G: Operation<Args, Output = bool>,
        Args: Clone,
    {
        Xor {
            left: self,
            right: other,
        }
    }

    /// Run this consumer, then `other`, with the same arguments.
    fn also<G>(self, other: G) -> Also<Self, G>
    where
        Self: Operation<Args, Output = ()>,
        G: Operation<Args, Output = ()>,
        Args: Clone,
    {
        Also {
            first: self,
            second: other,
        }
    }

    /// Swap the two arguments of a binary operation.
    fn reversed(self) -> Reversed<Self>
    where
        Args: Binary,
    {
        Reversed { inner: self }
    }

    /// Fix the first argument of a binary operation.
    fn apply_first(self, first: Args::First) -> ApplyFirst<Self, Args::First>
    where
        Args: Binary,
    {
        ApplyFirst { inner: self, first }
    }

    /// Fix the second argument of a binary operation.
    fn apply_second(self, second: Args::Second) -> ApplySecond<Self, Args::Second>
    where
        Args: Binary,
    {
        ApplySecond {
            inner: self,
            second,
        }
    }

    /// Convert the output with `Into`, e.g. widening `i32` to `i64` or boxing.
    fn convert<U>(self) -> Convert<Self, U>
    where
        Self::Output: Into<U>,
    {
        Convert {
            inner: self,
            _target: PhantomData,
        }
    }

    /// Map the success value of a fallible operation.
    fn map_ok<G, R, E, T>(self, f: G) -> MapOk<Self, G>
    where
        Self: Operation<Args, Output = Result<R, E>>,
        G: Fn(R) -> T,
    {
        MapOk { inner: self, f }
    }

    /// Map the failure of a fallible operation.
    fn map_err<G, R, E, U>(self, f: G) -> MapErr<Self, G>
    where
        Self: Operation<Args, Output = Result<R, E>>,
        G: Fn(E) -> U,
    {
        MapErr { inner: self, f }
    }

    /// Erase the concrete type of this operation.
    fn boxed<'a>(self) -> BoxedOperation<'a, Args, Self::Output>
    where
        Self: Send + Sync + 'a,
    {
        BoxedOperation::new(self)
    }
}

impl<Args, F: Operation<Args>> OperationExt<Args> for F {}

// ============================================================================
// Sequencing
// ============================================================================

/// `after(first(args))`. See [`OperationExt::and_then`].
#[derive(Debug, Clone, Copy)]
pub struct AndThen<F, G> {
    first: F,
    after: G,
}

impl<Args, F, G, T> Operation<Args> for AndThen<F, G>
where
    F: Operation<Args>,
    G: Fn(F::Output) -> T,
{
    type Output = T;

    fn apply(&self, args: Args) -> T {
        (self.after)(self.first.apply(args))
    }
}

/// `inner(before(pre))`. See [`OperationExt::compose`].
#[derive(Debug, Clone, Copy)]
pub struct Compose<F, B> {
    inner: F,
    before: B,
}

impl<Pre, Args, F, B> Operation<Pre> for Compose<F, B>
where
    B: Operation<Pre, Output = Args>,
    F: Operation<Args>,
{
    type Output = F::Output;

    fn apply(&self, args: Pre) -> Self::Output {
        self.inner.apply(self.before.apply(args))
    }
}

/// Both consumers in order. See [`OperationExt::also`].
#[derive(Debug, Clone, Copy)]
pub struct Also<F, G> {
    first: F,
    second: G,
}

impl<Args, F, G> Operation<Args> for Also<F, G>
where
    Args: Clone,
    F: Operation<Args, Output = ()>,
    G: Operation<Args, Output = ()>,
{
    type Output = ();

    fn apply(&self, args: Args) {
        self.first.apply(args.clone());
        self.second.apply(args);
    }
}

// ============================================================================
// Predicate Logic
// ============================================================================

/// See [`OperationExt::negate`].
#[derive(Debug, Clone, Copy)]
pub struct Negate<F> {
    inner: F,
}

impl<Args, F> Operation<Args> for Negate<F>
where
    F: Operation<Args, Output = bool>,
{
    type Output = bool;

    fn apply(&self, args: Args) -> bool {
        !self.inner.apply(args)
    }
}

/// See [`OperationExt::and`].
#[derive(Debug, Clone, Copy)]
pub struct And<F, G> {
    left: F,
    right: G,
}

impl<Args, F, G> Operation<Args> for And<F, G>
where
    Args: Clone,
    F: Operation<Args, Output = bool>,
    G: Operation<Args, Output = bool>,
{
    type Output = bool;

    fn apply(&self, args: Args) -> bool {
        self.left.apply(args.clone()) && self.right.apply(args)
    }
}

/// See [`OperationExt::or`].
#[derive(Debug, Clone, Copy)]
pub struct Or<F, G> {
    left: F,
    right: G,
}

impl<Args, F, G> Operation<Args> for Or<F, G>
where
    Args: Clone,
    F: Operation<Args, Output = bool>,
    G: Operation<Args, Output = bool>,
{
    type Output = bool;

    fn apply(&self, args: Args) -> bool {
        self.left.apply(args.clone()) || self.right.apply(args)
    }
}

/// See [`OperationExt::xor`].
#[derive(Debug, Clone, Copy)]
pub struct Xor<F, G> {
    left: F,
    right: G,
}

impl<Args, F, G> Operation<Args> for Xor<F, G>
where
    Args: Clone,
    F: Operation<Args, Output = bool>,
    G: Operation<Args, Output = bool>,
{
    type Output = bool;

    fn apply(&self, args: Args) -> bool {
        self.left.apply(args.clone()) ^ self.right.apply(args)
    }
}

// ============================================================================
// Binary Adapters
// ============================================================================

/// See [`OperationExt::reversed`].
#[derive(Debug, Clone, Copy)]
pub struct Reversed<F> {
    inner: F,
}

impl<A, B, F> Operation<(B, A)> for Reversed<F>
where
    F: Operation<(A, B)>,
{
    type Output = F::Output;

    fn apply(&self, (b, a): (B, A)) -> Self::Output {
        self.inner.apply((a, b))
    }
}

/// See [`OperationExt::apply_first`].
#[derive(Debug, Clone, Copy)]
pub struct ApplyFirst<F, A> {
    inner: F,
    first: A,
}

impl<A, B, F> Operation<(B,)> for ApplyFirst<F, A>
where
    A: Clone,
    F: Operation<(A, B)>,
{
    type Output = F::Output;

    fn apply(&self, (b,): (B,)) -> Self::Output {
        self.inner.apply((self.first.clone(), b))
    }
}

/// See [`OperationExt::apply_second`].
#[derive(Debug, Clone, Copy)]
pub struct ApplySecond<F, B> {
    inner: F,
    second: B,
}

impl<A, B, F> Operation<(A,)> for ApplySecond<F, B>
where
    B: Clone,
    F: Operation<(A, B)>,
{
    type Output = F::Output;

    fn apply(&self, (a,): (A,)) -> Self::Output {
        self.inner.apply((a, self.second.clone()))
    }
}

// ============================================================================
// Output Adapters
// ============================================================================

/// See [`OperationExt::convert`].
#[derive(Debug)]
pub struct Convert<F, U> {
    inner: F,
    _target: PhantomData<fn() -> U>,
}

impl<F: Clone, U> Clone for Convert<F, U> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            _target: PhantomData,
        }
    }
}

impl<Args, F, U> Operation<Args> for Convert<F, U>
where
    F: Operation<Args>,
    F::Output: Into<U>,
{
    type Output = U;

    fn apply(&self, args: Args) -> U {
        self.inner.apply(args).into()
    }
}

/// See [`OperationExt::map_ok`].
#[derive(Debug, Clone, Copy)]
pub struct MapOk<F, G> {
    inner: F,
    f: G,
}

impl<Args, F, G, R, E, T> Operation<Args> for MapOk<F, G>
where
    F: Operation<Args, Output = Result<R, E>>,
    G: Fn(R) -> T,
{
    type Output = Result<T, E>;

    fn apply(&self, args: Args) -> Result<T, E> {
        self.inner.apply(args).map(&self.f)
    }
}

/// See [`OperationExt::map_err`].
#[derive(Debug, Clone, Copy)]
pub struct MapErr<F, G> {
    inner: F,
    f: G,
}

impl<Args, F, G, R, E, U> Operation<Args> for MapErr<F, G>
where
    F: Operation<Args, Output = Result<R, E>>,
    G: Fn(E) -> U,
{
    type Output = Result<R, U>;

    fn apply(&self, args: Args) -> Result<R, U> {
        self.inner.apply(args).map_err(&self.f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operation::{identity, only_first};
    use std::cell::RefCell;

    fn square(x: i32) -> i32 {
        x * x
    }

    fn divide(a: i32, b: i32) -> Result<i32, String> {
        if b == 0 {
            Err("division by zero".to_string())
        } else {
            Ok(a / b)
        }
    }

    #[test]
    fn test_and_then_runs_in_order() {
        let op = square.and_then(|x: i32| x + 1);
        assert_eq!(op.apply((3,)), 10);
    }

    #[test]
    fn test_compose_runs_before_first() {
        let op = square.compose(|x: i32| (x + 1,));
        assert_eq!(op.apply((3,)), 16);

        let sum = |a: i32, b: i32| a + b;
        let split = sum.compose(|x: i32| (x, x * 10));
        assert_eq!(split.apply((2,)), 22);
    }

    #[test]
    fn test_identity_is_neutral() {
        // `compose` feeds whole argument tuples, so identity sees `(x,)`.
        let left = square.compose(identity());
        let right = square.and_then(|x: i32| identity().apply((x,)));

        for x in -5..5 {
            assert_eq!(left.apply(((x,),)), square(x));
            assert_eq!(right.apply((x,)), square(x));
        }
    }

    #[test]
    fn test_predicate_logic() {
        let positive = |x: i32| x > 0;
        let even = |x: i32| x % 2 == 0;

        assert!(positive.and(even).apply((4,)));
        assert!(!positive.and(even).apply((3,)));
        assert!(positive.or(even).apply((-2,)));
        assert!(!positive.or(even).apply((-3,)));
        assert!(positive.xor(even).apply((3,)));
        assert!(!positive.xor(even).apply((4,)));
        assert!(positive.negate().apply((0,)));
    }

    #[test]
    fn test_and_short_circuits() {
        let calls = RefCell::new(0);
        let never = |_x: i32| false;
        let counted = |_x: i32| {
            *calls.borrow_mut() += 1;
            true
        };

        assert!(!never.and(&counted).apply((1,)));
        assert_eq!(*calls.borrow(), 0);
        assert!(counted.or(never).apply((1,)));
        assert_eq!(*calls.borrow(), 1);
    }

    #[test]
    fn test_also_runs_both_consumers() {
        let log = RefCell::new(Vec::new());
        let first = |x: i32| log.borrow_mut().push(format!("first {}", x));
        let second = |x: i32| log.borrow_mut().push(format!("second {}", x));

        first.also(second).apply((7,));
        assert_eq!(*log.borrow(), vec!["first 7", "second 7"]);
    }

    #[test]
    fn test_reversed_and_partial_application() {
        let pair = |a: &str, b: i32| format!("{}{}", a, b);

        assert_eq!(pair.reversed().apply((1, "x")), "x1");
        assert_eq!(pair.apply_first("y").apply((2,)), "y2");
        assert_eq!(pair.apply_second(3).apply(("z",)), "z3");
        assert_eq!(pair.apply_first("y").arity(), 1);
    }

    #[test]
    fn test_convert_widens_output() {
        let small = |x: u8| x;
        let wide = small.convert::<u64>();
        assert_eq!(wide.apply((255,)), 255u64);

        let five = || 5i32;
        let boxed = five.convert::<Box<i32>>();
        assert_eq!(*boxed.apply(()), 5);
    }

    #[test]
    fn test_map_ok_and_map_err() {
        let doubled = divide.map_ok(|q: i32| q * 2);
        assert_eq!(doubled.apply((10, 2)), Ok(10));

        let coded = divide.map_err(|e: String| e.len());
        assert_eq!(coded.apply((1, 0)), Err(16));
    }

    #[test]
    fn test_boxed_keeps_behavior() {
        let boxed = only_first(square).boxed();
        assert_eq!(boxed.apply((4, ())), 16);
    }
}
