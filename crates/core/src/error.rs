//! # Error Types
//!
//! Two kinds of errors leave a bridge:
//!
//! - [`BridgeError`]: failures produced by the bridge itself (a nested
//!   failure, or a recovery provider that had nothing to offer)
//! - [`Unchecked`]: the type-erased carrier every bridged operation returns.
//!   It holds either a `BridgeError`, a caller-mapped error, or the original
//!   failure untouched, and can be downcast back to any of them.
//!
//! `Unchecked` is what lets generic code stay free of the wrapped
//! operation's failure type while a specific caller can still recover the
//! exact original failure with [`Unchecked::downcast`].

use std::any::type_name;
use std::collections::TryReserveError;
use std::error::Error;
use std::{fmt, io};

use thiserror::Error;

use crate::severity::{Classify, Severity};

/// Boxed error accepted as a cause.
pub type BoxError = Box<dyn Error + Send + Sync + 'static>;

/// Errors raised by the bridge itself.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// A recoverable failure wrapped by `nest`.
    ///
    /// The message is the original failure's message; the original failure
    /// is the `source`.
    #[error("{message}")]
    Nested {
        message: String,
        #[source]
        cause: BoxError,
    },

    /// A recovery provider returned no operation for a failure.
    #[error("Invalid recovery: provider returned no operation for {failure_type}: {message}")]
    InvalidRecovery {
        failure_type: &'static str,
        message: String,
    },
}

impl BridgeError {
    /// Wrap a failure, keeping its message.
    pub fn nested<E>(failure: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        Self::Nested {
            message: failure.to_string(),
            cause: Box::new(failure),
        }
    }

    /// Report that no recovery was available for `failure`.
    pub fn invalid_recovery<E>(failure: &E) -> Self
    where
        E: Error + ?Sized,
    {
        Self::InvalidRecovery {
            failure_type: type_name::<E>(),
            message: failure.to_string(),
        }
    }

    /// The wrapped failure, if this is a nesting error.
    pub fn cause(&self) -> Option<&(dyn Error + Send + Sync + 'static)> {
        match self {
            Self::Nested { cause, .. } => Some(cause.as_ref()),
            Self::InvalidRecovery { .. } => None,
        }
    }
}

impl Classify for BridgeError {
    fn severity(&self) -> Severity {
        match self {
            Self::Nested { .. } => Severity::Recoverable,
            // A broken recovery provider is a programming error; an
            // enclosing `recover` must not be able to paper over it.
            Self::InvalidRecovery { .. } => Severity::Fatal,
        }
    }
}

// ============================================================================
// Unchecked
// ============================================================================

/// A type-erased error that remembers its severity.
///
/// `Display` and `source()` are those of the wrapped error. Erasing a value
/// that already is an `Unchecked` yields it back unchanged rather than
/// wrapping it twice.
pub struct Unchecked {
    inner: BoxError,
    severity: Severity,
}

impl Unchecked {
    /// Erase a recoverable error.
    ///
    /// If `error` already is an `Unchecked`, it is returned as is, severity
    /// included.
    pub fn new<E>(error: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        Self::erase(error, None)
    }

    /// Erase an error that must never be intercepted.
    pub fn fatal<E>(error: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        Self::erase(error, Some(Severity::Fatal))
    }

    /// Erase an error using its own classification.
    pub fn classified<E>(error: E) -> Self
    where
        E: Error + Classify + Send + Sync + 'static,
    {
        let severity = error.severity();
        Self::erase(error, Some(severity))
    }

    fn erase<E>(error: E, severity: Option<Severity>) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        let boxed: BoxError = Box::new(error);
        match boxed.downcast::<Unchecked>() {
            Ok(already) => {
                let mut unchecked = *already;
                if let Some(severity) = severity {
                    unchecked.severity = severity;
                }
                unchecked
            }
            Err(inner) => Self {
                inner,
                severity: severity.unwrap_or_default(),
            },
        }
    }

    /// Severity recorded when the error was erased.
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// `true` if the wrapped error is a `T`.
    pub fn is<T: Error + 'static>(&self) -> bool {
        self.inner.is::<T>()
    }

    /// Borrow the wrapped error as a `T`.
    pub fn downcast_ref<T: Error + 'static>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }

    /// Recover the wrapped error as a `T`, or get `self` back.
    pub fn downcast<T: Error + 'static>(self) -> Result<T, Self> {
        let severity = self.severity;
        match self.inner.downcast::<T>() {
            Ok(error) => Ok(*error),
            Err(inner) => Err(Self { inner, severity }),
        }
    }

    /// The wrapped error.
    pub fn into_inner(self) -> BoxError {
        self.inner
    }
}

/// Erase an already boxed failure.
///
/// The severity is recovered by downcasting to the failure types this crate
/// classifies. Anything else is recoverable.
impl From<BoxError> for Unchecked {
    fn from(boxed: BoxError) -> Self {
        let inner = match boxed.downcast::<Unchecked>() {
            Ok(already) => return *already,
            Err(inner) => inner,
        };
        let severity = if let Some(failure) = inner.downcast_ref::<io::Error>() {
            failure.severity()
        } else if let Some(failure) = inner.downcast_ref::<BridgeError>() {
            failure.severity()
        } else if inner.is::<TryReserveError>() {
            Severity::Fatal
        } else {
            Severity::Recoverable
        };
        Self { inner, severity }
    }
}

impl fmt::Debug for Unchecked {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Unchecked")
            .field("inner", &self.inner)
            .field("severity", &self.severity)
            .finish()
    }
}

impl fmt::Display for Unchecked {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.inner, f)
    }
}

impl Error for Unchecked {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.inner.source()
    }
}

impl Classify for Unchecked {
    fn severity(&self) -> Severity {
        self.severity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Error, PartialEq)]
    #[error("disk on fire: {0}")]
    struct DiskError(u8);

    #[test]
    fn test_nested_keeps_message_and_cause() {
        let err = BridgeError::nested(DiskError(3));

        assert_eq!(err.to_string(), "disk on fire: 3");
        let cause = err.source().expect("nested error has a source");
        assert_eq!(cause.downcast_ref::<DiskError>(), Some(&DiskError(3)));
        assert!(err.cause().is_some());
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_invalid_recovery_names_failure() {
        let err = BridgeError::invalid_recovery(&DiskError(9));
        let text = err.to_string();

        assert!(text.contains("DiskError"));
        assert!(text.contains("disk on fire: 9"));
        assert!(err.cause().is_none());
        assert!(err.is_fatal());
    }

    #[test]
    fn test_unchecked_is_transparent() {
        let unchecked = Unchecked::new(BridgeError::nested(DiskError(1)));

        assert_eq!(unchecked.to_string(), "disk on fire: 1");
        assert!(unchecked.is::<BridgeError>());
        assert!(!unchecked.is::<DiskError>());
        let source = unchecked.source().expect("source passes through");
        assert!(source.is::<DiskError>());
    }

    #[test]
    fn test_unchecked_downcast_returns_original() {
        let unchecked = Unchecked::new(DiskError(7));
        assert_eq!(unchecked.severity(), Severity::Recoverable);

        let unchecked = match unchecked.downcast::<BridgeError>() {
            Ok(_) => panic!("wrong type must not downcast"),
            Err(back) => back,
        };
        assert_eq!(unchecked.downcast::<DiskError>().ok(), Some(DiskError(7)));
    }

    #[test]
    fn test_unchecked_is_never_double_wrapped() {
        let inner = Unchecked::fatal(DiskError(2));
        let outer = Unchecked::new(inner);

        assert!(outer.is::<DiskError>());
        assert_eq!(outer.severity(), Severity::Fatal);
    }

    #[test]
    fn test_boxed_failure_severity_by_downcast() {
        let boxed: BoxError = Box::new(io::Error::from(io::ErrorKind::OutOfMemory));
        assert!(Unchecked::from(boxed).is_fatal());

        let boxed: BoxError = Box::new(DiskError(4));
        let unchecked = Unchecked::from(boxed);
        assert_eq!(unchecked.severity(), Severity::Recoverable);
        assert_eq!(unchecked.downcast::<DiskError>().ok(), Some(DiskError(4)));

        let boxed: BoxError = Box::new(Unchecked::fatal(DiskError(5)));
        let unchecked = Unchecked::from(boxed);
        assert!(unchecked.is::<DiskError>());
        assert!(unchecked.is_fatal());
    }

    #[test]
    fn test_classified_uses_own_severity() {
        let unchecked = Unchecked::classified(BridgeError::invalid_recovery(&DiskError(0)));
        assert!(unchecked.is_fatal());

        let unchecked = Unchecked::classified(BridgeError::nested(DiskError(0)));
        assert!(!unchecked.is_fatal());
    }
}
