//! In-memory native layer double for unit tests.
//!
//! `StubRuntime` is a scriptable [`NativeRuntime`]: tests register classes,
//! instances, and text handles, program per-(receiver, selector) responses,
//! and inspect the recorded dispatch log afterwards.

use crate::error::{Error, Result};
use crate::native::{
    HandleKind, NativeHandle, NativeRuntime, RawValue, SelectorToken,
};
use std::collections::HashMap;
use std::sync::Mutex;

/// One recorded message send, with arguments as the dispatch primitive
/// received them.
#[derive(Debug, Clone)]
pub(crate) struct DispatchRecord {
    pub(crate) receiver: NativeHandle,
    pub(crate) selector: String,
    pub(crate) args: Vec<RawValue>,
}

#[derive(Default)]
struct StubState {
    classes: HashMap<String, NativeHandle>,
    class_names: HashMap<NativeHandle, String>,
    instance_classes: HashMap<NativeHandle, String>,
    texts: HashMap<NativeHandle, String>,
    selectors: HashMap<String, SelectorToken>,
    selector_names: HashMap<SelectorToken, String>,
    responses: HashMap<(NativeHandle, String), RawValue>,
    log: Vec<DispatchRecord>,
    next_handle: u64,
    next_token: u64,
    register_calls: usize,
    resolve_calls: usize,
}

pub(crate) struct StubRuntime {
    state: Mutex<StubState>,
}

impl StubRuntime {
    pub(crate) fn new() -> Self {
        Self {
            state: Mutex::new(StubState::default()),
        }
    }

    fn fresh_handle(state: &mut StubState) -> NativeHandle {
        state.next_handle += 1;
        NativeHandle::from_raw(state.next_handle)
    }

    /// Registers a class and returns its handle.
    pub(crate) fn add_class(&self, name: &str) -> NativeHandle {
        let mut state = self.state.lock().unwrap();
        let handle = Self::fresh_handle(&mut state);
        state.classes.insert(name.to_string(), handle);
        state.class_names.insert(handle, name.to_string());
        handle
    }

    /// Registers an instance of the named class and returns its handle.
    pub(crate) fn add_instance(&self, class_name: &str) -> NativeHandle {
        let mut state = self.state.lock().unwrap();
        let handle = Self::fresh_handle(&mut state);
        state.instance_classes.insert(handle, class_name.to_string());
        handle
    }

    /// Registers a foreign text value: unrecognized kind, but stringifiable.
    pub(crate) fn add_text(&self, value: &str) -> NativeHandle {
        let mut state = self.state.lock().unwrap();
        let handle = Self::fresh_handle(&mut state);
        state.texts.insert(handle, value.to_string());
        handle
    }

    /// Programs the response for a (receiver, selector) pair.
    pub(crate) fn expect(
        &self,
        receiver: NativeHandle,
        selector: &str,
        result: RawValue,
    ) {
        self.state
            .lock()
            .unwrap()
            .responses
            .insert((receiver, selector.to_string()), result);
    }

    /// Every message send performed so far, in order.
    pub(crate) fn dispatches(&self) -> Vec<DispatchRecord> {
        self.state.lock().unwrap().log.clone()
    }

    pub(crate) fn register_calls(&self) -> usize {
        self.state.lock().unwrap().register_calls
    }

    pub(crate) fn resolve_calls(&self) -> usize {
        self.state.lock().unwrap().resolve_calls
    }
}

impl NativeRuntime for StubRuntime {
    fn resolve_class(&self, name: &str) -> Result<NativeHandle> {
        let mut state = self.state.lock().unwrap();
        state.resolve_calls += 1;
        state
            .classes
            .get(name)
            .copied()
            .ok_or_else(|| Error::ClassNotFound { name: name.to_string() })
    }

    fn register_selector(&self, name: &str) -> SelectorToken {
        let mut state = self.state.lock().unwrap();
        state.register_calls += 1;
        if let Some(&token) = state.selectors.get(name) {
            return token;
        }
        state.next_token += 1;
        let token = SelectorToken::new(state.next_token);
        state.selectors.insert(name.to_string(), token);
        state.selector_names.insert(token, name.to_string());
        token
    }

    fn dispatch(
        &self,
        receiver: NativeHandle,
        selector: SelectorToken,
        args: &[RawValue],
    ) -> Result<RawValue> {
        let mut state = self.state.lock().unwrap();
        let name = state
            .selector_names
            .get(&selector)
            .expect("dispatch with an unregistered selector token")
            .clone();
        state.log.push(DispatchRecord {
            receiver,
            selector: name.clone(),
            args: args.to_vec(),
        });
        state
            .responses
            .get(&(receiver, name.clone()))
            .cloned()
            .ok_or(Error::Dispatch {
                selector: name,
                reason: "unrecognized selector sent to receiver".to_string(),
            })
    }

    fn classify(&self, handle: NativeHandle) -> HandleKind {
        let state = self.state.lock().unwrap();
        if state.class_names.contains_key(&handle) {
            HandleKind::Class
        } else if state.instance_classes.contains_key(&handle) {
            HandleKind::Instance
        } else {
            HandleKind::Unrecognized
        }
    }

    fn class_name_of(&self, handle: NativeHandle) -> Result<String> {
        let state = self.state.lock().unwrap();
        state
            .class_names
            .get(&handle)
            .or_else(|| state.instance_classes.get(&handle))
            .cloned()
            .ok_or(Error::Runtime {
                reason: format!("no class name for handle [{handle}]"),
            })
    }

    fn stringify(&self, handle: NativeHandle) -> Result<String> {
        let state = self.state.lock().unwrap();
        state.texts.get(&handle).cloned().ok_or(Error::Runtime {
            reason: format!("handle [{handle}] is not a foreign text value"),
        })
    }
}
