//! Class surrogates and the singleton-per-name class registry.
//!
//! Foreign classes are permanent, so the registry is append-only: a class
//! surrogate created here lives for the rest of the process, matching the
//! foreign runtime's own class permanence. Failed resolutions are never
//! cached; a class the runtime registers later must resolve on retry.

use super::BridgeShared;
use crate::error::Result;
use crate::native::{NativeHandle, NativeRuntime};
use fxhash::FxHashMap;
use log::debug;
use std::fmt;
use std::sync::{Arc, RwLock};

/// Immutable per-class surrogate data, shared by every [`ClassRef`] clone.
#[derive(Debug)]
pub(crate) struct ClassProxy {
    pub(crate) name: String,
    pub(crate) handle: NativeHandle,
}

/// Host-visible surrogate for a foreign class.
///
/// Cheap to clone; all clones of a resolved class share one underlying
/// allocation, and equality is identity of that allocation. For a given
/// class name at most one surrogate exists for the life of the process.
///
/// Call-style access to the class's selectors comes from the
/// [`Receiver`](super::Receiver) implementation.
#[derive(Clone)]
pub struct ClassRef {
    pub(crate) shared: Arc<BridgeShared>,
    pub(crate) inner: Arc<ClassProxy>,
}

impl ClassRef {
    pub(crate) fn new(shared: Arc<BridgeShared>, inner: Arc<ClassProxy>) -> Self {
        Self { shared, inner }
    }

    /// The foreign class's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.inner.name
    }
}

impl PartialEq for ClassRef {
    fn eq(&self, other: &Self) -> bool {
        // Surrogate identity, not name comparison.
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for ClassRef {}

impl fmt::Display for ClassRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{} {}>", self.inner.name, self.inner.handle)
    }
}

impl fmt::Debug for ClassRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassRef")
            .field("name", &self.inner.name)
            .field("handle", &self.inner.handle)
            .finish()
    }
}

/// Singleton-per-name cache of class surrogates.
pub(crate) struct ClassRegistry {
    classes: RwLock<FxHashMap<String, Arc<ClassProxy>>>,
}

impl ClassRegistry {
    pub(crate) fn new() -> Self {
        Self {
            classes: RwLock::new(FxHashMap::default()),
        }
    }

    /// Looks up a class by name, resolving and caching it on a miss.
    ///
    /// Idempotent: repeated calls with the same name return the identical
    /// proxy allocation.
    pub(crate) fn resolve(
        &self,
        runtime: &dyn NativeRuntime,
        name: &str,
    ) -> Result<Arc<ClassProxy>> {
        if let Some(proxy) = self.classes.read().unwrap().get(name) {
            return Ok(Arc::clone(proxy));
        }

        debug!("class cache miss, resolving {name:?}");
        // Resolve outside the lock; a failed resolution is never cached.
        let handle = runtime.resolve_class(name)?;

        let mut classes = self.classes.write().unwrap();
        // A racing resolver may have inserted first; first insert wins so
        // the singleton-per-name invariant holds.
        let proxy = classes
            .entry(name.to_string())
            .or_insert_with(|| {
                Arc::new(ClassProxy {
                    name: name.to_string(),
                    handle,
                })
            })
            .clone();
        Ok(proxy)
    }
}
