//! Instance surrogates and the weak, handle-keyed instance registry.
//!
//! Unlike classes, foreign instances come and go. The registry keeps only a
//! [`Weak`] entry per handle identity: while any host reference to a
//! surrogate is alive, rewrapping its handle returns the same surrogate; once
//! the last reference drops, the entry reads as a miss and a later wrap
//! creates a fresh surrogate. The cache never extends a surrogate's lifetime.
//!
//! Dedup is by exact handle identity only. Distinct handle values that
//! happen to encode the same foreign object are not deduplicated; callers
//! relying on that need the foreign runtime to return canonical handles.

use super::BridgeShared;
use crate::error::Result;
use crate::native::{NativeHandle, NativeRuntime};
use fxhash::FxHashMap;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock, Weak};

/// Map size at which the first dead-entry purge runs.
const PURGE_FLOOR: usize = 64;

/// Immutable per-instance surrogate data, shared by every [`InstanceRef`]
/// clone. Reclaimed when the last host reference drops.
#[derive(Debug)]
pub(crate) struct InstanceProxy {
    pub(crate) class_name: String,
    pub(crate) handle: NativeHandle,
}

/// Host-visible surrogate for a foreign instance.
///
/// Cheap to clone; equality is identity of the underlying allocation. At
/// most one live surrogate exists per native handle identity at any time.
///
/// The `Display` rendering appends the foreign text content when the handle
/// stringifies, mirroring the foreign runtime's own diagnostic form;
/// otherwise it falls back to `<ClassName hh hh ...>`.
#[derive(Clone)]
pub struct InstanceRef {
    pub(crate) shared: Arc<BridgeShared>,
    pub(crate) inner: Arc<InstanceProxy>,
}

impl InstanceRef {
    pub(crate) fn new(shared: Arc<BridgeShared>, inner: Arc<InstanceProxy>) -> Self {
        Self { shared, inner }
    }

    /// Name of the class owning this instance.
    #[must_use]
    pub fn class_name(&self) -> &str {
        &self.inner.class_name
    }
}

impl PartialEq for InstanceRef {
    fn eq(&self, other: &Self) -> bool {
        // Surrogate identity only; foreign equality never participates.
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for InstanceRef {}

impl fmt::Display for InstanceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = &self.inner.class_name;
        let handle = self.inner.handle;
        match self.shared.runtime.stringify(handle) {
            Ok(text) => write!(f, "<{name} {handle}>{text}</{name}>"),
            Err(_) => write!(f, "<{name} {handle}>"),
        }
    }
}

impl fmt::Debug for InstanceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstanceRef")
            .field("class_name", &self.inner.class_name)
            .field("handle", &self.inner.handle)
            .finish()
    }
}

/// Weak, identity-keyed cache of instance surrogates.
pub(crate) struct InstanceRegistry {
    instances: RwLock<FxHashMap<NativeHandle, Weak<InstanceProxy>>>,
    /// Map size that triggers the next dead-entry purge.
    purge_at: AtomicUsize,
}

impl InstanceRegistry {
    pub(crate) fn new() -> Self {
        Self {
            instances: RwLock::new(FxHashMap::default()),
            purge_at: AtomicUsize::new(PURGE_FLOOR),
        }
    }

    /// Wraps an instance handle, reusing the live surrogate if one exists.
    ///
    /// A lookup racing with reclamation of the same entry behaves as a
    /// cache miss, never a stale hit: an entry whose strong count reached
    /// zero cannot be upgraded.
    pub(crate) fn wrap(
        &self,
        runtime: &dyn NativeRuntime,
        handle: NativeHandle,
    ) -> Result<Arc<InstanceProxy>> {
        if let Some(proxy) =
            self.instances.read().unwrap().get(&handle).and_then(Weak::upgrade)
        {
            return Ok(proxy);
        }

        // Miss, or the previous surrogate was reclaimed. Derive the owning
        // class before taking the write lock.
        let class_name = runtime.class_name_of(handle)?;

        let mut instances = self.instances.write().unwrap();
        // A racing wrap may have inserted first.
        if let Some(existing) = instances.get(&handle).and_then(Weak::upgrade) {
            return Ok(existing);
        }

        let proxy = Arc::new(InstanceProxy { class_name, handle });
        instances.insert(handle, Arc::downgrade(&proxy));

        // Dead entries accumulate between purges; sweep them once the map
        // outgrows the watermark so it cannot grow without bound.
        if instances.len() >= self.purge_at.load(Ordering::Relaxed) {
            instances.retain(|_, weak| weak.strong_count() > 0);
            let next = (instances.len() * 2).max(PURGE_FLOOR);
            self.purge_at.store(next, Ordering::Relaxed);
        }

        Ok(proxy)
    }

    /// Number of entries that can still be upgraded.
    pub(crate) fn live(&self) -> usize {
        self.instances
            .read()
            .unwrap()
            .values()
            .filter(|weak| weak.strong_count() > 0)
            .count()
    }

    #[cfg(test)]
    pub(crate) fn entries(&self) -> usize {
        self.instances.read().unwrap().len()
    }
}
