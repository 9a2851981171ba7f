//! Bidirectional value marshalling across the native seam.
//!
//! Outbound, surrogates are lowered to their backing handles and everything
//! else passes through unchanged; any further conversion (text encoding and
//! the like) is the native layer's concern.
//!
//! Inbound, `to_host` is the single chokepoint every dispatch result passes
//! through. No other code path constructs a surrogate from a raw result,
//! which is what keeps the identity caches authoritative.

use super::BridgeShared;
use super::classes::ClassRef;
use super::instances::InstanceRef;
use crate::error::Result;
use crate::native::{HandleKind, NativeHandle, RawValue};
use log::warn;

/// Host-facing value crossing the bridge.
///
/// Every [`RawValue`] shape plus the two surrogate kinds. Surrogates passed
/// as arguments are lowered to their backing handle before a send.
#[derive(Debug, Clone)]
pub enum Value {
    /// The foreign nil / absence of a value.
    Nil,
    /// A boolean.
    Bool(bool),
    /// A signed integer.
    Int(i64),
    /// A floating point number.
    Float(f64),
    /// Host text.
    String(String),
    /// A raw handle the bridge could not classify; see the decision table.
    Handle(NativeHandle),
    /// A foreign class surrogate.
    Class(ClassRef),
    /// A foreign instance surrogate.
    Instance(InstanceRef),
}

impl Value {
    /// True for class and instance surrogates.
    #[must_use]
    pub fn is_surrogate(&self) -> bool {
        matches!(self, Value::Class(_) | Value::Instance(_))
    }

    /// The class surrogate, if this value is one.
    #[must_use]
    pub fn as_class(&self) -> Option<&ClassRef> {
        match self {
            Value::Class(class) => Some(class),
            _ => None,
        }
    }

    /// The instance surrogate, if this value is one.
    #[must_use]
    pub fn as_instance(&self) -> Option<&InstanceRef> {
        match self {
            Value::Instance(instance) => Some(instance),
            _ => None,
        }
    }

    /// The raw handle, if this value is an unclassified handle.
    #[must_use]
    pub fn as_handle(&self) -> Option<NativeHandle> {
        match self {
            Value::Handle(handle) => Some(*handle),
            _ => None,
        }
    }

    /// The string contents, if this value is host text.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// The integer, if this value is one.
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Handle(a), Value::Handle(b)) => a == b,
            (Value::Class(a), Value::Class(b)) => a == b,
            (Value::Instance(a), Value::Instance(b)) => a == b,
            _ => false,
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<ClassRef> for Value {
    fn from(value: ClassRef) -> Self {
        Value::Class(value)
    }
}

impl From<InstanceRef> for Value {
    fn from(value: InstanceRef) -> Self {
        Value::Instance(value)
    }
}

impl BridgeShared {
    /// Lowers a host value into the form the dispatch primitive accepts.
    ///
    /// Surrogates are substituted by their backing native handle; all other
    /// values pass through unchanged.
    pub(crate) fn to_native(&self, value: &Value) -> RawValue {
        match value {
            Value::Class(class) => RawValue::Handle(class.inner.handle),
            Value::Instance(instance) => RawValue::Handle(instance.inner.handle),
            Value::Handle(handle) => RawValue::Handle(*handle),
            Value::Nil => RawValue::Nil,
            Value::Bool(b) => RawValue::Bool(*b),
            Value::Int(i) => RawValue::Int(*i),
            Value::Float(x) => RawValue::Float(*x),
            Value::String(s) => RawValue::String(s.clone()),
        }
    }

    /// Classifies a raw result and wraps it into a host value.
    ///
    /// The decision table, evaluated in order:
    ///
    /// 1. Plain values pass through unchanged.
    /// 2. A class handle resolves through the class registry by name, so
    ///    the name-keyed cache is reused.
    /// 3. An instance handle wraps through the weak instance registry.
    /// 4. A handle of unrecognized kind is returned unchanged with a
    ///    warning; the bridge must not silently corrupt a foreign type it
    ///    cannot surface yet.
    pub(crate) fn to_host(&self, raw: RawValue) -> Result<Value> {
        match raw {
            RawValue::Handle(handle) => match self.runtime.classify(handle) {
                HandleKind::Class => {
                    let name = self.runtime.class_name_of(handle)?;
                    Ok(Value::Class(self.resolve_class(&name)?))
                }
                HandleKind::Instance => {
                    Ok(Value::Instance(self.wrap_instance(handle)?))
                }
                HandleKind::Unrecognized => {
                    warn!(
                        "result handle [{handle}] has unrecognized kind; \
                         returning it unwrapped"
                    );
                    Ok(Value::Handle(handle))
                }
            },
            RawValue::Nil => Ok(Value::Nil),
            RawValue::Bool(b) => Ok(Value::Bool(b)),
            RawValue::Int(i) => Ok(Value::Int(i)),
            RawValue::Float(x) => Ok(Value::Float(x)),
            RawValue::String(s) => Ok(Value::String(s)),
        }
    }
}
