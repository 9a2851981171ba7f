//! Memoized selector registration.
//!
//! The native layer's `register_selector` is idempotent, so this cache is an
//! optimization, not a correctness requirement: it avoids re-registering a
//! selector string on every send. Keys are full selector strings, including
//! all colon-terminated parts; the bridge never splits or reassembles them.

use crate::native::{NativeRuntime, SelectorToken};
use fxhash::FxHashMap;
use std::sync::RwLock;

/// Cache of selector string to native token.
pub(crate) struct SelectorCache {
    tokens: RwLock<FxHashMap<String, SelectorToken>>,
}

impl SelectorCache {
    pub(crate) fn new() -> Self {
        Self {
            tokens: RwLock::new(FxHashMap::default()),
        }
    }

    /// Returns the token for a selector, registering it on first use.
    pub(crate) fn register(
        &self,
        runtime: &dyn NativeRuntime,
        name: &str,
    ) -> SelectorToken {
        if let Some(&token) = self.tokens.read().unwrap().get(name) {
            return token;
        }
        // Losing a race here at worst registers the selector twice, which
        // the native layer treats as equivalent.
        let token = runtime.register_selector(name);
        self.tokens.write().unwrap().insert(name.to_string(), token);
        token
    }
}
