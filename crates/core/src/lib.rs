//! # Core - Fallible Operations and Their Bridges
//!
//! This crate provides generic operations and the machinery to move them
//! between "may fail" and "always returns":
//!
//! - **Operations**: One trait for every functional shape and arity
//! - **Composition**: `and_then`, `compose`, predicate logic, partial application
//! - **Severity**: Which failures may be intercepted, and which never are
//! - **Errors**: The type-erased `Unchecked` carrier and bridge errors
//! - **Bridge**: `nest`, `recover` and `sneaky` from fallible to total
//! - **Instrumentation**: Compile-time configurable call logging
//!
//! ## Design Philosophy
//!
//! Operations are values. A pipeline is assembled from small pieces, and the
//! decision of how failures cross its boundary is made once, at the edge,
//! by wrapping the pipeline in a bridge:
//!
//! ```rust
//! use fallible_core::prelude::*;
//!
//! fn checked_div(a: i32, b: i32) -> Result<i32, std::num::TryFromIntError> {
//!     u8::try_from(b)?;
//!     Ok(a.checked_div(b).unwrap_or(0))
//! }
//!
//! let total = nest(checked_div).map_ok(|q: i32| q * 2);
//! assert_eq!(total.apply((10, 5)).unwrap(), 4);
//! assert!(total.apply((10, -1)).is_err());
//! ```

pub mod bridge;
pub mod compose;
pub mod error;
pub mod instrument;
pub mod operation;
pub mod severity;

// Re-export key types at crate root for convenience
pub use bridge::{nest, nest_with, recover, sneaky, Bridge, MapFailure, Nest, Nesting, Recover, Sneaky};
pub use compose::OperationExt;
pub use error::{BoxError, BridgeError, Unchecked};
pub use instrument::{AutoInstrumented, InstrumentExt, Instrumented};
pub use operation::{Arguments, BoxedOperation, Operation};
pub use severity::{Classified, Classify, FatalPolicy, NeverFatal, Severity};

/// Traits and functions needed for everyday use.
pub mod prelude {
    pub use crate::bridge::{nest, nest_with, recover, sneaky, Bridge};
    pub use crate::compose::OperationExt;
    pub use crate::error::{BridgeError, Unchecked};
    pub use crate::instrument::InstrumentExt;
    pub use crate::operation::Operation;
    pub use crate::severity::{Classify, Severity};
}
