//! Process-wide emitter configuration.
//!
//! Strict mode decides what `emit` does with an event type that the instance
//! never declared: return [`EmitterError::UnknownEventType`] (strict) or log a
//! warning and dispatch anyway (default). The flag is shared by every emitter
//! in the process.
//!
//! [`EmitterError::UnknownEventType`]: crate::error::EmitterError::UnknownEventType

use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::{ReentrantMutex, ReentrantMutexGuard};

static STRICT_MODE: AtomicBool = AtomicBool::new(false);

/// Serializes [`StrictModeGuard`] scopes.
static OVERRIDE_LOCK: ReentrantMutex<()> = parking_lot::const_reentrant_mutex(());

/// Whether unknown event types are rejected.
pub fn strict_mode() -> bool {
    STRICT_MODE.load(Ordering::SeqCst)
}

/// Set the strict-mode flag for all emitters. Returns the previous value.
pub fn set_strict_mode(strict: bool) -> bool {
    STRICT_MODE.swap(strict, Ordering::SeqCst)
}

/// Scoped strict-mode override.
///
/// Sets the flag on creation and restores the previous value on drop. Guards
/// on one thread nest and restore in reverse order. A guard on another thread
/// blocks in `new` until every guard of the owning thread is dropped, so
/// concurrent scopes (parallel tests, for instance) see their own value.
pub struct StrictModeGuard {
    previous: bool,
    _lock: ReentrantMutexGuard<'static, ()>,
}

impl StrictModeGuard {
    pub fn new(strict: bool) -> Self {
        let lock = OVERRIDE_LOCK.lock();
        let previous = set_strict_mode(strict);
        Self {
            previous,
            _lock: lock,
        }
    }
}

impl Drop for StrictModeGuard {
    fn drop(&mut self) {
        set_strict_mode(self.previous);
    }
}
