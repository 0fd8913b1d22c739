//! # Failure Severity
//!
//! Bridging only ever intercepts *recoverable* failures. A *fatal* failure
//! signals that the process itself is compromised (allocation failure being
//! the canonical case) and is always handed back unchanged: never nested,
//! never passed to a recovery provider.
//!
//! Which failures count as fatal is a policy:
//!
//! - [`Classified`] asks the failure itself through [`Classify`] (the default)
//! - [`NeverFatal`] treats everything as recoverable
//! - any `Fn(&E) -> bool` can be plugged in as a custom predicate
//!
//! Panics are outside every policy. No combinator in this crate catches an
//! unwinding panic, so panics always propagate straight through.

use std::collections::TryReserveError;
use std::convert::Infallible;
use std::{fmt, io, num, str, string};

/// How a failure must be treated when it crosses a bridge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum Severity {
    /// Eligible for nesting and recovery.
    #[default]
    Recoverable,
    /// Always propagated unchanged.
    Fatal,
}

impl Severity {
    /// Whether this severity forbids interception.
    pub fn is_fatal(self) -> bool {
        matches!(self, Severity::Fatal)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Recoverable => write!(f, "recoverable"),
            Severity::Fatal => write!(f, "fatal"),
        }
    }
}

/// Failures that know their own severity.
///
/// The default method classifies a failure as recoverable, so an error type
/// opts in with an empty impl and overrides `severity` only for the variants
/// that must never be intercepted.
///
/// ```rust
/// use fallible_core::severity::{Classify, Severity};
///
/// #[derive(Debug)]
/// enum StoreError {
///     Missing,
///     Exhausted,
/// }
///
/// impl Classify for StoreError {
///     fn severity(&self) -> Severity {
///         match self {
///             StoreError::Missing => Severity::Recoverable,
///             StoreError::Exhausted => Severity::Fatal,
///         }
///     }
/// }
///
/// assert!(StoreError::Exhausted.is_fatal());
/// assert!(!StoreError::Missing.is_fatal());
/// ```
pub trait Classify {
    /// Severity of this failure.
    fn severity(&self) -> Severity {
        Severity::Recoverable
    }

    /// Shorthand for `self.severity().is_fatal()`.
    fn is_fatal(&self) -> bool {
        self.severity().is_fatal()
    }
}

impl Classify for TryReserveError {
    fn severity(&self) -> Severity {
        Severity::Fatal
    }
}

impl Classify for io::Error {
    fn severity(&self) -> Severity {
        match self.kind() {
            io::ErrorKind::OutOfMemory => Severity::Fatal,
            _ => Severity::Recoverable,
        }
    }
}

impl Classify for Infallible {}
impl Classify for fmt::Error {}
impl Classify for num::ParseIntError {}
impl Classify for num::ParseFloatError {}
impl Classify for num::TryFromIntError {}
impl Classify for str::ParseBoolError {}
impl Classify for str::Utf8Error {}
impl Classify for string::FromUtf8Error {}
impl Classify for std::char::ParseCharError {}

// ============================================================================
// Policies
// ============================================================================

/// Decides whether a failure of type `E` is fatal.
pub trait FatalPolicy<E: ?Sized> {
    /// `true` if `failure` must be propagated unchanged.
    fn is_fatal(&self, failure: &E) -> bool;
}

/// Defer to the failure's own [`Classify`] impl.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Classified;

impl<E: Classify + ?Sized> FatalPolicy<E> for Classified {
    fn is_fatal(&self, failure: &E) -> bool {
        Classify::is_fatal(failure)
    }
}

/// Treat every failure as recoverable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NeverFatal;

impl<E: ?Sized> FatalPolicy<E> for NeverFatal {
    fn is_fatal(&self, _failure: &E) -> bool {
        false
    }
}

impl<E: ?Sized, F> FatalPolicy<E> for F
where
    F: Fn(&E) -> bool,
{
    fn is_fatal(&self, failure: &E) -> bool {
        self(failure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Plain;

    impl Classify for Plain {}

    #[test]
    fn test_default_classification_is_recoverable() {
        assert_eq!(Plain.severity(), Severity::Recoverable);
        assert!(!Plain.is_fatal());
        assert_eq!(Severity::default(), Severity::Recoverable);
    }

    #[test]
    fn test_io_out_of_memory_is_fatal() {
        let oom = io::Error::from(io::ErrorKind::OutOfMemory);
        let missing = io::Error::from(io::ErrorKind::NotFound);

        assert!(oom.is_fatal());
        assert!(!missing.is_fatal());
    }

    #[test]
    fn test_try_reserve_failure_is_fatal() {
        let mut buf: Vec<u64> = Vec::new();
        let failure = buf.try_reserve(usize::MAX).unwrap_err();
        assert_eq!(failure.severity(), Severity::Fatal);
    }

    #[test]
    fn test_parse_failures_are_recoverable() {
        let failure = "nope".parse::<i32>().unwrap_err();
        assert!(!failure.is_fatal());
    }

    #[test]
    fn test_policies() {
        let oom = io::Error::from(io::ErrorKind::OutOfMemory);

        assert!(Classified.is_fatal(&oom));
        assert!(!NeverFatal.is_fatal(&oom));

        let by_kind = |e: &io::Error| e.kind() == io::ErrorKind::PermissionDenied;
        assert!(FatalPolicy::is_fatal(
            &by_kind,
            &io::Error::from(io::ErrorKind::PermissionDenied)
        ));
        assert!(!FatalPolicy::is_fatal(&by_kind, &oom));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_severity_serializes_lowercase() {
        let json = serde_json::to_string(&Severity::Fatal).unwrap();
        assert_eq!(json, "\"fatal\"");

        let back: Severity = serde_json::from_str("\"recoverable\"").unwrap();
        assert_eq!(back, Severity::Recoverable);
    }

    #[test]
    fn test_severity_display() {
        assert_eq!(Severity::Fatal.to_string(), "fatal");
        assert_eq!(Severity::Recoverable.to_string(), "recoverable");
    }
}
