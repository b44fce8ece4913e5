//! Emitter: per-instance declared types plus the listener registry.
//!
//! An `Emitter` is the private state an instance carries once pub/sub has been
//! attached to it. It can also be used on its own.
//!
//! All methods take `&self`. The two internal locks are never held while a
//! callback runs, so callbacks may subscribe, unsubscribe and emit re-entrantly.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::Value;

use crate::{
    config,
    error::{EmitterError, Result},
    event_type::DeclaredTypes,
    listener::{Callback, Listener, Subscription},
};

pub struct Emitter {
    declared: Mutex<DeclaredTypes>,
    listeners: Mutex<HashMap<String, Arc<Listener>>>,
}

impl Emitter {
    pub fn new(declared: impl Into<DeclaredTypes>) -> Self {
        Self {
            declared: Mutex::new(declared.into()),
            listeners: Mutex::new(HashMap::new()),
        }
    }

    /// Fold another declaration into this emitter's allowed types.
    ///
    /// Lists concatenate; `Wildcard` is terminal. Listeners are left alone.
    pub fn declare(&self, declared: impl Into<DeclaredTypes>) {
        let mut current = self.declared.lock();
        let was_wildcard = current.is_wildcard();
        current.extend(declared.into());
        if !was_wildcard && current.is_wildcard() {
            tracing::debug!("emitter upgraded to wildcard event types");
        }
    }

    /// Snapshot of the declared types.
    pub fn declared(&self) -> DeclaredTypes {
        self.declared.lock().clone()
    }

    pub fn is_declared(&self, event_type: &str) -> bool {
        self.declared.lock().allows(event_type)
    }

    /// The listener for `event_type`, created on first reference.
    pub fn listener(&self, event_type: &str) -> Arc<Listener> {
        let mut listeners = self.listeners.lock();
        Arc::clone(
            listeners
                .entry(event_type.to_string())
                .or_insert_with(|| Arc::new(Listener::new())),
        )
    }

    /// Subscribe without checking `event_type` against the declared types.
    pub fn watch(&self, event_type: &str, callback: Callback) -> Subscription {
        self.listener(event_type).add(callback)
    }

    pub fn on(&self, event_type: &str, callback: Callback) -> &Self {
        self.watch(event_type, callback);
        self
    }

    pub fn watch_once(&self, event_type: &str, callback: Callback) -> Subscription {
        self.listener(event_type).add_once(callback)
    }

    pub fn once(&self, event_type: &str, callback: Callback) -> &Self {
        self.watch_once(event_type, callback);
        self
    }

    /// Unsubscribe.
    ///
    /// - no type: drop every listener of every type. A dispatch already
    ///   running finishes over its old listener.
    /// - type, no callback: empty that type's listener in place.
    /// - type and callback: remove that callback from that type.
    pub fn off(&self, event_type: Option<&str>, callback: Option<&Callback>) -> &Self {
        match event_type {
            None => {
                *self.listeners.lock() = HashMap::new();
                tracing::trace!("emitter registry cleared");
            }
            Some(event_type) => self.listener(event_type).remove(callback),
        }
        self
    }

    pub fn has(&self, event_type: &str, callback: Option<&Callback>) -> bool {
        self.listener(event_type).has(callback)
    }

    /// Number of callbacks registered for `event_type`.
    pub fn listener_count(&self, event_type: &str) -> usize {
        self.listener(event_type).size()
    }

    pub fn emit(&self, event_type: &str, args: &[Value]) -> Result<()> {
        self.emit_as("Emitter", event_type, args)
    }

    /// Validate `event_type` on behalf of `owner`, then dispatch.
    ///
    /// Undeclared types fail in strict mode before anything is dispatched and
    /// are logged and dispatched otherwise.
    pub(crate) fn emit_as(&self, owner: &str, event_type: &str, args: &[Value]) -> Result<()> {
        let unknown = {
            let declared = self.declared.lock();
            (!declared.allows(event_type)).then(|| declared.describe())
        };

        if let Some(declared) = unknown {
            let err = EmitterError::UnknownEventType {
                owner: owner.to_string(),
                event_type: event_type.to_string(),
                declared,
            };
            if config::strict_mode() {
                return Err(err);
            }
            tracing::warn!(owner = %owner, event_type = %event_type, "{err}");
        }

        self.listener(event_type).dispatch(args);
        Ok(())
    }
}

impl Default for Emitter {
    /// Same as attaching with an empty type list.
    fn default() -> Self {
        Self::new(DeclaredTypes::default())
    }
}

impl std::fmt::Debug for Emitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Emitter")
            .field("declared", &*self.declared.lock())
            .field("event_types", &self.listeners.lock().len())
            .finish()
    }
}
