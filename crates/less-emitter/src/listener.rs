//! Listener: the callback slots of one event type.
//!
//! The current slot sequence sits behind an `Arc` so a dispatch can hold on to
//! the sequence it started with:
//!   - `remove(Some(cb))` builds and installs a *new* sequence. A dispatch
//!     already running keeps iterating the old one and still calls `cb`.
//!   - `remove(None)` truncates the *current* sequence in place. A dispatch
//!     already running skips every slot it has not reached yet.
//!
//! No lock is held while a callback runs, so callbacks may add, remove or
//! dispatch on the same listener.

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::Value;

// ============================================================================
// Callback
// ============================================================================

/// Closure type for event callbacks. Receives the emitted positional arguments.
pub type CallbackFn = dyn Fn(&[Value]) + Send + Sync;

/// A shareable event callback compared by identity.
///
/// Clones refer to the same closure and compare equal; two callbacks built
/// from separate `Callback::new` calls never do, even from identical closures.
#[derive(Clone)]
pub struct Callback(Arc<CallbackFn>);

impl Callback {
    pub fn new(f: impl Fn(&[Value]) + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    pub fn call(&self, args: &[Value]) {
        (self.0)(args)
    }

    /// Identity comparison.
    pub fn same(&self, other: &Callback) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.0), Arc::as_ptr(&other.0))
    }
}

impl PartialEq for Callback {
    fn eq(&self, other: &Self) -> bool {
        self.same(other)
    }
}

impl Eq for Callback {}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Callback({:p})", Arc::as_ptr(&self.0) as *const ())
    }
}

// ============================================================================
// Slots
// ============================================================================

#[derive(Clone)]
struct Slot {
    id: u64,
    /// For a once slot this is the original callback.
    callback: Callback,
    /// Present on once slots; set when the slot has fired.
    fired: Option<Arc<AtomicBool>>,
}

impl Slot {
    fn matches(&self, probe: &Callback) -> bool {
        self.callback.same(probe)
    }
}

type Sequence = Arc<Mutex<Vec<Slot>>>;

// ============================================================================
// Listener
// ============================================================================

/// Ordered callback slots for one event type.
///
/// Adding the same callback twice yields two independent slots.
pub struct Listener {
    slots: Mutex<Sequence>,
    next_id: AtomicU64,
}

impl Listener {
    pub fn new() -> Self {
        Self {
            slots: Mutex::new(Arc::new(Mutex::new(Vec::new()))),
            next_id: AtomicU64::new(1),
        }
    }

    /// Append `callback`. The returned handle removes it again.
    pub fn add(self: &Arc<Self>, callback: Callback) -> Subscription {
        self.push(callback.clone(), None);
        Subscription {
            listener: Arc::clone(self),
            callback,
            slot: None,
        }
    }

    /// Append `callback` as a one-shot slot.
    ///
    /// The slot unsubscribes itself before the callback runs. `remove` and
    /// `has` given the original `callback` match it.
    pub fn add_once(self: &Arc<Self>, callback: Callback) -> Subscription {
        let id = self.push(callback.clone(), Some(Arc::new(AtomicBool::new(false))));
        Subscription {
            listener: Arc::clone(self),
            callback,
            slot: Some(id),
        }
    }

    /// Remove every slot matching `callback`, or all slots when `None`.
    pub fn remove(&self, callback: Option<&Callback>) {
        match callback {
            Some(probe) => self.replace_filtered(|slot| !slot.matches(probe)),
            None => self.current().lock().clear(),
        }
    }

    /// With `None`, whether any slot exists; otherwise whether `callback` is registered.
    pub fn has(&self, callback: Option<&Callback>) -> bool {
        let sequence = self.current();
        let slots = sequence.lock();
        match callback {
            Some(probe) => slots.iter().any(|slot| slot.matches(probe)),
            None => !slots.is_empty(),
        }
    }

    /// Call every slot in insertion order with `args`.
    ///
    /// Iterates the sequence that was current when dispatch started, up to the
    /// length it had then. Positions emptied by an in-place clear are skipped.
    pub fn dispatch(&self, args: &[Value]) {
        let sequence = self.current();
        let len = sequence.lock().len();

        for index in 0..len {
            let Some(slot) = sequence.lock().get(index).cloned() else {
                continue;
            };

            if let Some(fired) = &slot.fired {
                if fired.swap(true, Ordering::SeqCst) {
                    continue;
                }
                self.remove_slot(slot.id);
            }

            slot.callback.call(args);
        }
    }

    /// Number of slots currently registered.
    pub fn size(&self) -> usize {
        self.current().lock().len()
    }

    fn current(&self) -> Sequence {
        Arc::clone(&self.slots.lock())
    }

    fn push(&self, callback: Callback, fired: Option<Arc<AtomicBool>>) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        // Hold the outer lock so a concurrent replace cannot discard the slot.
        let current = self.slots.lock();
        current.lock().push(Slot {
            id,
            callback,
            fired,
        });
        id
    }

    fn remove_slot(&self, id: u64) {
        self.replace_filtered(|slot| slot.id != id);
    }

    fn replace_filtered(&self, keep: impl Fn(&Slot) -> bool) {
        let mut current = self.slots.lock();
        let kept: Vec<Slot> = current.lock().iter().filter(|s| keep(s)).cloned().collect();
        *current = Arc::new(Mutex::new(kept));
    }
}

impl Default for Listener {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listener").field("size", &self.size()).finish()
    }
}

// ============================================================================
// Subscription
// ============================================================================

/// Handle returned by [`Listener::add`] and [`Listener::add_once`].
///
/// `unsubscribe` may be called any number of times; after the first call the
/// callback is already gone and later calls change nothing.
pub struct Subscription {
    listener: Arc<Listener>,
    callback: Callback,
    /// Set for once slots, which are removed individually.
    slot: Option<u64>,
}

impl Subscription {
    /// Remove the callback this handle was created for and return it.
    pub fn unsubscribe(&self) -> Callback {
        match self.slot {
            Some(id) => self.listener.remove_slot(id),
            None => self.listener.remove(Some(&self.callback)),
        }
        self.callback.clone()
    }

    pub fn callback(&self) -> &Callback {
        &self.callback
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("callback", &self.callback)
            .field("once", &self.slot.is_some())
            .finish()
    }
}
