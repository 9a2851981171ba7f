//! Native call layer interface for the `oxibridge` bridge.
//!
//! This module defines the seam between the bridge and the foreign,
//! message-dispatch-based object runtime: the opaque value types that cross
//! it ([`NativeHandle`], [`SelectorToken`], [`RawValue`]) and the
//! [`NativeRuntime`] trait of primitive operations the bridge builds on.
//!
//! The bridge treats an implementation of [`NativeRuntime`] as a trusted,
//! already-correct dependency. Everything behind the trait (class tables,
//! selector registration, the actual message send) is out of scope here;
//! the bridge only wraps, caches, and marshals around it.
//!
//! # Thread Safety
//!
//! [`NativeRuntime`] requires `Send + Sync` so a single bridge can be shared
//! across threads. Dispatch itself is synchronous: every message send blocks
//! the calling thread until the foreign runtime returns.

use crate::error::Result;
use std::fmt;

/// Opaque, fixed-format identifier for a foreign class or instance.
///
/// Handles are immutable value tokens produced by the foreign runtime.
/// Identity is exact byte equality: two handles with equal bytes denote the
/// same foreign object only if the foreign runtime guarantees handle
/// stability for that object. The bridge never decodes the payload.
///
/// # Display
///
/// Handles render as space-separated hex bytes (`"0a 00 00 00 00 00 00 00"`),
/// the same diagnostic form the foreign runtime's tooling uses.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct NativeHandle([u8; Self::LEN]);

impl NativeHandle {
    /// Fixed byte length of every handle.
    pub const LEN: usize = 8;

    /// Creates a handle from its raw byte representation.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; Self::LEN]) -> Self {
        Self(bytes)
    }

    /// Creates a handle from a little-endian integer value.
    ///
    /// Convenient for native layers whose handles are pointer-sized.
    #[must_use]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw.to_le_bytes())
    }

    /// Returns the handle's raw bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; Self::LEN] {
        &self.0
    }
}

impl fmt::Display for NativeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, byte) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for NativeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NativeHandle({self})")
    }
}

/// Classification of a native handle, as reported by the foreign runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleKind {
    /// The handle denotes a foreign class.
    Class,
    /// The handle denotes a foreign instance.
    Instance,
    /// The foreign runtime does not recognize the handle as either.
    ///
    /// The bridge surfaces such handles unchanged rather than corrupting
    /// them; see the marshalling decision table.
    Unrecognized,
}

/// Opaque selector token issued by the native layer.
///
/// Obtained from [`NativeRuntime::register_selector`], which is idempotent:
/// registering the same selector string twice yields tokens that the native
/// layer treats as equivalent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SelectorToken(u64);

impl SelectorToken {
    /// Creates a token from the native layer's raw representation.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw token value.
    #[must_use]
    pub const fn raw(&self) -> u64 {
        self.0
    }
}

/// Wire-level value crossing the dispatch primitive.
///
/// Arguments are lowered to this form before a send (surrogates become their
/// backing [`NativeHandle`]), and every dispatch result arrives as one of
/// these before the bridge classifies and wraps it.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    /// The foreign nil / absence of a value.
    Nil,
    /// A boolean.
    Bool(bool),
    /// A signed integer.
    Int(i64),
    /// A floating point number.
    Float(f64),
    /// Host-native text. Further encoding is the native layer's concern.
    String(String),
    /// An opaque handle to a foreign class or instance.
    Handle(NativeHandle),
}

/// Primitive operations the bridge requires from the native call layer.
///
/// Implementations are trusted: the bridge performs no validation of
/// selectors before sending and no interpretation of handles beyond what
/// [`classify`](Self::classify) reports.
pub trait NativeRuntime: Send + Sync {
    /// Resolves a class name to its native handle.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ClassNotFound`](crate::Error::ClassNotFound) if the
    /// foreign runtime has no class of that name.
    fn resolve_class(&self, name: &str) -> Result<NativeHandle>;

    /// Registers a selector string and returns its token.
    ///
    /// Idempotent: repeated registration of the same full selector string
    /// is harmless. The bridge passes selector strings through whole and
    /// never splits or reassembles their colon-terminated parts.
    fn register_selector(&self, name: &str) -> SelectorToken;

    /// Performs a foreign message send and returns the raw result.
    ///
    /// Blocks until the foreign runtime returns. Effects of two sequential
    /// sends by the same caller are observed in program order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Dispatch`](crate::Error::Dispatch) when the foreign
    /// runtime rejects or faults on the send, e.g. a selector the receiver
    /// does not understand.
    fn dispatch(
        &self,
        receiver: NativeHandle,
        selector: SelectorToken,
        args: &[RawValue],
    ) -> Result<RawValue>;

    /// Classifies a handle as class, instance, or unrecognized.
    ///
    /// Pure: no side effects on the foreign runtime.
    fn classify(&self, handle: NativeHandle) -> HandleKind;

    /// Derives the class name associated with a handle.
    ///
    /// For a class handle this is the class's own name; for an instance
    /// handle, the owning class's name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Runtime`](crate::Error::Runtime) for handles of
    /// unrecognized kind.
    fn class_name_of(&self, handle: NativeHandle) -> Result<String>;

    /// Converts a handle believed to represent foreign text into a host
    /// string. Used for diagnostic display only.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Runtime`](crate::Error::Runtime) when the handle
    /// does not represent a foreign text value.
    fn stringify(&self, handle: NativeHandle) -> Result<String>;
}
