//! The dispatch interception surface shared by both surrogate kinds.
//!
//! Where the original interception model turned arbitrary property reads
//! into selector sends, this bridge exposes a small closed capability:
//! [`Receiver::bind`] produces a selector-bound callable, [`Receiver::send`]
//! binds and invokes in one step, and [`Receiver::construct`] composes the
//! foreign runtime's two-phase allocate/initialize convention into one host
//! operation.
//!
//! Selectors are never validated before sending. An unsupported or
//! misspelled selector surfaces as [`Error::Dispatch`] from the foreign
//! runtime itself, which is the intended failure mode for a duck-typed
//! bridge. Existence checks against a surrogate report only the intrinsic
//! attributes; the foreign method set is unbounded and is never enumerated.

use super::BridgeShared;
use super::classes::ClassRef;
use super::instances::InstanceRef;
use super::marshal::Value;
use crate::error::{Error, Result};
use crate::native::{HandleKind, NativeHandle, RawValue};
use log::trace;
use std::fmt;
use std::sync::Arc;

/// Intrinsic attribute names every surrogate reports for existence checks:
/// the class name, the backing handle, the kind tag, and the diagnostic
/// string form rendered by `Display`.
pub const INTRINSIC_NAMES: &[&str] = &["class_name", "handle", "kind", "to_string"];

/// The send capability common to class and instance surrogates.
pub trait Receiver {
    /// Backing native handle.
    fn handle(&self) -> NativeHandle;

    /// Kind tag: [`HandleKind::Class`] or [`HandleKind::Instance`].
    fn kind(&self) -> HandleKind;

    /// Class name: the class's own name for a class surrogate, the owning
    /// class's name for an instance surrogate.
    fn class_name(&self) -> &str;

    /// Binds a selector to this receiver, yielding a callable.
    ///
    /// Binding performs no validation and no dispatch; the selector is only
    /// resolved against the foreign runtime when the callable is invoked.
    fn bind(&self, selector: &str) -> BoundMessage;

    /// Sends a selector with arguments: bind and invoke in one step.
    ///
    /// # Errors
    ///
    /// Propagates [`Error::Dispatch`] from the foreign runtime unchanged.
    fn send(&self, selector: &str, args: &[Value]) -> Result<Value> {
        self.bind(selector).invoke(args)
    }

    /// Constructs a new foreign instance, where the receiver supports it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConstruction`] on an instance surrogate, or
    /// when the class's allocate/initialize sequence does not yield an
    /// instance.
    fn construct(&self) -> Result<InstanceRef>;

    /// Intrinsic attribute names reported by existence checks, without
    /// touching the foreign runtime.
    fn intrinsic_names(&self) -> &'static [&'static str] {
        INTRINSIC_NAMES
    }
}

/// A selector bound to a receiver, ready to invoke.
///
/// Invoking marshals each argument outbound, performs the foreign send, and
/// marshals the raw result back through the inbound chokepoint.
pub struct BoundMessage {
    shared: Arc<BridgeShared>,
    receiver: NativeHandle,
    selector: String,
}

impl BoundMessage {
    pub(crate) fn new(
        shared: Arc<BridgeShared>,
        receiver: NativeHandle,
        selector: &str,
    ) -> Self {
        Self {
            shared,
            receiver,
            selector: selector.to_string(),
        }
    }

    /// The full selector string this message sends.
    #[must_use]
    pub fn selector(&self) -> &str {
        &self.selector
    }

    /// The backing handle of the receiver this message is bound to.
    #[must_use]
    pub fn receiver(&self) -> NativeHandle {
        self.receiver
    }

    /// Invokes the bound selector with the given arguments.
    ///
    /// Blocks until the foreign runtime returns. No retries: sends are
    /// assumed to have externally visible side effects.
    ///
    /// # Errors
    ///
    /// Propagates [`Error::Dispatch`] from the foreign runtime unchanged,
    /// plus any fault from classifying the result.
    pub fn invoke(&self, args: &[Value]) -> Result<Value> {
        self.shared.send_to(self.receiver, &self.selector, args)
    }
}

impl fmt::Debug for BoundMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundMessage")
            .field("receiver", &self.receiver)
            .field("selector", &self.selector)
            .finish()
    }
}

impl BridgeShared {
    /// The one dispatch path: register, lower, send, classify.
    pub(crate) fn send_to(
        &self,
        receiver: NativeHandle,
        selector: &str,
        args: &[Value],
    ) -> Result<Value> {
        let token = self.selectors.register(self.runtime.as_ref(), selector);
        let lowered: Vec<RawValue> =
            args.iter().map(|arg| self.to_native(arg)).collect();
        trace!("sending {selector:?} to [{receiver}]");
        let raw = self.runtime.dispatch(receiver, token, &lowered)?;
        self.to_host(raw)
    }
}

impl Receiver for ClassRef {
    fn handle(&self) -> NativeHandle {
        self.inner.handle
    }

    fn kind(&self) -> HandleKind {
        HandleKind::Class
    }

    fn class_name(&self) -> &str {
        &self.inner.name
    }

    fn bind(&self, selector: &str) -> BoundMessage {
        BoundMessage::new(Arc::clone(&self.shared), self.inner.handle, selector)
    }

    /// `alloc` on the class, then `init` on the allocated instance, in that
    /// order, both through the normal dispatch path.
    fn construct(&self) -> Result<InstanceRef> {
        let allocated = match self.send("alloc", &[])? {
            Value::Instance(instance) => instance,
            _ => {
                return Err(Error::InvalidConstruction {
                    class_name: self.name().to_string(),
                    reason: "alloc did not yield an instance",
                });
            }
        };
        match allocated.send("init", &[])? {
            Value::Instance(instance) => Ok(instance),
            _ => Err(Error::InvalidConstruction {
                class_name: self.name().to_string(),
                reason: "init did not yield an instance",
            }),
        }
    }
}

impl Receiver for InstanceRef {
    fn handle(&self) -> NativeHandle {
        self.inner.handle
    }

    fn kind(&self) -> HandleKind {
        HandleKind::Instance
    }

    fn class_name(&self) -> &str {
        &self.inner.class_name
    }

    fn bind(&self, selector: &str) -> BoundMessage {
        BoundMessage::new(Arc::clone(&self.shared), self.inner.handle, selector)
    }

    /// Foreign instances are not constructible a second time. Fails without
    /// ever attempting a dispatch.
    fn construct(&self) -> Result<InstanceRef> {
        Err(Error::InvalidConstruction {
            class_name: self.class_name().to_string(),
            reason: "instances are not constructible",
        })
    }
}
