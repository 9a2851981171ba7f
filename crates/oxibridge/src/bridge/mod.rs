//! The bridge proper: surrogate registries, marshalling, and dispatch.
//!
//! This module wires the pieces together around a shared context:
//!
//! - [`classes`]: singleton-per-name cache of class surrogates
//! - [`instances`]: weak, handle-keyed cache of instance surrogates
//! - [`marshal`]: bidirectional value marshalling across the native seam
//! - [`dispatch`]: the [`Receiver`] capability and selector-bound callables
//! - [`selector`]: memoized selector registration
//!
//! # Entry point
//!
//! [`Bridge`] is the namespace-like object the host reads class names off.
//! It owns the registries and the selector cache as constructed-once context
//! objects rather than ambient globals, so cache invariants are testable in
//! isolation and no state leaks across bridge instances.
//!
//! # Thread Safety
//!
//! A `Bridge` can be shared across threads. The class cache is append-only
//! and synchronized insert-if-absent; the instance cache additionally
//! tolerates concurrent reclamation of weakly held entries. Dispatch itself
//! is synchronous and introduces no reordering.

pub mod classes;
pub mod dispatch;
pub mod instances;
pub mod marshal;
pub mod selector;

pub use classes::ClassRef;
pub use dispatch::{BoundMessage, Receiver};
pub use instances::InstanceRef;
pub use marshal::Value;

use crate::error::Result;
use crate::native::{NativeHandle, NativeRuntime, RawValue};
use classes::ClassRegistry;
use instances::InstanceRegistry;
use selector::SelectorCache;
use std::fmt;
use std::sync::{Arc, Weak};

/// Shared bridge state: the native layer plus the process-wide caches.
///
/// Surrogates hold an `Arc` to this so a bound message can marshal, send,
/// and wrap results without reaching back to the [`Bridge`] that minted it.
/// Constructed only inside an `Arc` (see [`Bridge::new`]); `self_handle`
/// lets plain `&self` methods mint surrogates that share ownership.
pub(crate) struct BridgeShared {
    pub(crate) runtime: Arc<dyn NativeRuntime>,
    pub(crate) classes: ClassRegistry,
    pub(crate) instances: InstanceRegistry,
    pub(crate) selectors: SelectorCache,
    self_handle: Weak<BridgeShared>,
}

impl BridgeShared {
    fn arc(&self) -> Arc<Self> {
        // Upgrade cannot fail: a live &self implies a live owning Arc.
        self.self_handle.upgrade().expect("bridge state outlived its Arc")
    }

    /// Resolves a class name to its surrogate, creating it on first use.
    pub(crate) fn resolve_class(&self, name: &str) -> Result<ClassRef> {
        let inner = self.classes.resolve(self.runtime.as_ref(), name)?;
        Ok(ClassRef::new(self.arc(), inner))
    }

    /// Wraps an instance handle, reusing the live surrogate if one exists.
    pub(crate) fn wrap_instance(&self, handle: NativeHandle) -> Result<InstanceRef> {
        let inner = self.instances.wrap(self.runtime.as_ref(), handle)?;
        Ok(InstanceRef::new(self.arc(), inner))
    }
}

/// Namespace-like entry point to the foreign runtime.
///
/// Any class name can be read off a `Bridge` to obtain its surrogate;
/// surrogates then expose call-style access to any selector string and
/// construction-style instantiation. See [`Receiver`].
pub struct Bridge {
    pub(crate) shared: Arc<BridgeShared>,
}

impl Bridge {
    /// Creates a bridge over the given native call layer.
    #[must_use]
    pub fn new(runtime: Arc<dyn NativeRuntime>) -> Self {
        Self {
            shared: Arc::new_cyclic(|self_handle| BridgeShared {
                runtime,
                classes: ClassRegistry::new(),
                instances: InstanceRegistry::new(),
                selectors: SelectorCache::new(),
                self_handle: self_handle.clone(),
            }),
        }
    }

    /// Reads a class name off the namespace, resolving it on first use.
    ///
    /// Idempotent: repeated reads of the same name return the identical
    /// surrogate for the life of the process.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ClassNotFound`](crate::Error::ClassNotFound) if the
    /// foreign runtime has no class of that name. Failures are not cached.
    pub fn class(&self, name: &str) -> Result<ClassRef> {
        self.shared.resolve_class(name)
    }

    /// Adopts a raw value obtained out of band into a host value.
    ///
    /// Public face of the inbound marshalling chokepoint: handles are
    /// classified and wrapped exactly as dispatch results are.
    ///
    /// # Errors
    ///
    /// Propagates native-layer faults from classification.
    pub fn adopt(&self, raw: RawValue) -> Result<Value> {
        self.shared.to_host(raw)
    }

    /// Converts a handle believed to represent foreign text into a host
    /// string. Diagnostic display only; the caller vouches for the handle.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Runtime`](crate::Error::Runtime) when the handle
    /// does not represent a foreign text value.
    pub fn stringify(&self, handle: NativeHandle) -> Result<String> {
        self.shared.runtime.stringify(handle)
    }

    /// Number of instance surrogates currently kept alive by host
    /// references. Primarily useful for testing and diagnostics.
    #[must_use]
    pub fn live_instances(&self) -> usize {
        self.shared.instances.live()
    }
}

impl fmt::Debug for Bridge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bridge")
            .field("live_instances", &self.live_instances())
            .finish()
    }
}
