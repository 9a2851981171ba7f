//! `oxibridge`: a dynamic bridge to a message-dispatch object runtime.
//!
//! `oxibridge` lets Rust code address objects belonging to a foreign,
//! Objective-C-style object runtime (classes and instances identified by
//! opaque native handles, methods invoked by name-based selectors) as if
//! they were native values, without statically declared bindings per class
//! or method. It provides:
//!
//! - **Identity-preserving wrapping**: at most one class surrogate per class
//!   name for the life of the process, at most one live instance surrogate
//!   per native handle identity
//! - **Dynamic Dispatch** by full selector string, resolved only at call
//!   time against the foreign runtime
//! - **Bidirectional marshalling** through a single chokepoint that decides
//!   whether each result is a primitive, a class, an instance, or a handle
//!   the bridge cannot surface yet
//! - **Construction sugar** composing the foreign runtime's two-phase
//!   allocate/initialize convention into one host operation
//!
//! # Architecture
//!
//! The bridge is deliberately duck-typed and built on a layered seam:
//!
//! - **Native layer** ([`native`]): the trusted [`NativeRuntime`] trait of
//!   primitive operations (resolve class, register selector, send message,
//!   classify handle), implemented outside this crate
//! - **Bridge layer** ([`bridge`]): surrogate registries, marshalling, and
//!   the [`Receiver`] send capability
//!
//! # Example
//!
//! ```rust
//! use oxibridge::{
//!     Bridge, Error, HandleKind, NativeHandle, NativeRuntime, RawValue,
//!     Receiver, SelectorToken,
//! };
//! use std::sync::Arc;
//!
//! // A toy native layer with one class whose every selector answers with
//! // the same instance handle.
//! struct Toy;
//!
//! impl NativeRuntime for Toy {
//!     fn resolve_class(&self, name: &str) -> oxibridge::Result<NativeHandle> {
//!         match name {
//!             "Greeter" => Ok(NativeHandle::from_raw(1)),
//!             _ => Err(Error::ClassNotFound { name: name.into() }),
//!         }
//!     }
//!     fn register_selector(&self, _name: &str) -> SelectorToken {
//!         SelectorToken::new(0)
//!     }
//!     fn dispatch(
//!         &self,
//!         _receiver: NativeHandle,
//!         _selector: SelectorToken,
//!         _args: &[RawValue],
//!     ) -> oxibridge::Result<RawValue> {
//!         Ok(RawValue::Handle(NativeHandle::from_raw(2)))
//!     }
//!     fn classify(&self, handle: NativeHandle) -> HandleKind {
//!         if handle == NativeHandle::from_raw(1) {
//!             HandleKind::Class
//!         } else {
//!             HandleKind::Instance
//!         }
//!     }
//!     fn class_name_of(&self, _handle: NativeHandle) -> oxibridge::Result<String> {
//!         Ok("Greeter".into())
//!     }
//!     fn stringify(&self, _handle: NativeHandle) -> oxibridge::Result<String> {
//!         Err(Error::Runtime { reason: "not a text value".into() })
//!     }
//! }
//!
//! let bridge = Bridge::new(Arc::new(Toy));
//! let greeter = bridge.class("Greeter")?;
//!
//! // `construct` is alloc-then-init under the hood.
//! let instance = greeter.construct()?;
//! assert_eq!(instance.class_name(), "Greeter");
//!
//! // Any selector string can be sent; resolution happens at call time.
//! let reply = instance.send("greet", &[])?;
//! assert!(reply.is_surrogate());
//! # Ok::<(), oxibridge::Error>(())
//! ```

pub mod bridge;
pub mod error;
pub mod native;

#[cfg(test)]
pub(crate) mod testing;

pub use bridge::{BoundMessage, Bridge, ClassRef, InstanceRef, Receiver, Value};
pub use error::{Error, Result};
pub use native::{
    HandleKind, NativeHandle, NativeRuntime, RawValue, SelectorToken,
};
