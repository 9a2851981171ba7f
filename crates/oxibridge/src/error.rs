//! Error types for the `oxibridge` runtime bridge.
//!
//! This module defines the error taxonomy used throughout the bridge:
//! class resolution failures, rejected construction attempts, message
//! dispatch faults, and faults raised by the native call layer outside a
//! message send.
//!
//! All errors are synchronous and surfaced to the immediate caller. The
//! bridge performs no silent recovery and no retries: message sends to the
//! foreign runtime are assumed to have externally visible side effects that
//! must not be replayed automatically.

use std::fmt;

/// Errors that can occur while bridging to the foreign runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The requested class name is unknown to the native layer.
    ///
    /// Surfaced immediately and never cached: a later registration of the
    /// class by the foreign runtime must make a retry succeed.
    ClassNotFound {
        /// The class name that failed to resolve.
        name: String,
    },

    /// Construction was attempted on a receiver that does not support it.
    ///
    /// Raised when construction syntax is used on an instance surrogate, or
    /// when a class's `alloc`/`init` sequence does not yield an instance.
    InvalidConstruction {
        /// Class name of the receiver the construction targeted.
        class_name: String,
        /// Why the construction was rejected.
        reason: &'static str,
    },

    /// The foreign runtime rejected or faulted on a message send.
    ///
    /// Selectors are never validated before sending, so this is the primary
    /// failure mode for typos and unsupported calls.
    Dispatch {
        /// The full selector string that was sent.
        selector: String,
        /// The foreign runtime's description of the fault.
        reason: String,
    },

    /// A native-layer primitive outside a message send faulted.
    ///
    /// Covers faults from `class_name_of` and `stringify`, which are not
    /// message sends and therefore not [`Error::Dispatch`].
    Runtime {
        /// Description of the fault.
        reason: String,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::ClassNotFound { name } => {
                write!(f, "Class not found: {name}")
            }
            Error::InvalidConstruction { class_name, reason } => {
                write!(f, "Cannot construct {class_name}: {reason}")
            }
            Error::Dispatch { selector, reason } => {
                write!(f, "Dispatch of {selector:?} failed: {reason}")
            }
            Error::Runtime { reason } => {
                write!(f, "Native runtime fault: {reason}")
            }
        }
    }
}

impl std::error::Error for Error {}

/// Result type for bridge operations.
pub type Result<T> = std::result::Result<T, Error>;
