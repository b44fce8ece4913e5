//! Attaching pub/sub to an instance.
//!
//! A type opts in by embedding an [`Emitter`] and implementing [`Emits`].
//! [`attach`] declares the event types it may emit, and [`EmitterExt`] gives
//! every `Emits` type `emit`, `on`, `once`, `off`, `has`, `watch` and
//! `watch_once`.
//!
//! ```
//! use less_emitter::{attach, Callback, Emits, Emitter, EmitterExt};
//! use serde_json::json;
//!
//! #[derive(Default)]
//! struct Http {
//!     events: Emitter,
//! }
//!
//! impl Emits for Http {
//!     fn emitter(&self) -> &Emitter {
//!         &self.events
//!     }
//! }
//!
//! let http = Http::default();
//! attach(&http, ["error"])
//!     .on("error", Callback::new(|args| println!("failed: {args:?}")))
//!     .emit("error", &[json!("timeout")])
//!     .unwrap();
//! ```

use serde_json::Value;

use crate::{
    emitter::Emitter,
    error::Result,
    event_type::DeclaredTypes,
    listener::{Callback, Subscription},
};

/// Types carrying an [`Emitter`].
pub trait Emits {
    fn emitter(&self) -> &Emitter;
}

/// Declare the event types `instance` may emit and return `instance`.
///
/// The first call stores the declaration. Later calls concatenate lists, or
/// switch to `Wildcard`, which then stays. Subscriptions survive every call.
pub fn attach<T, D>(instance: &T, declared: D) -> &T
where
    T: Emits + ?Sized,
    D: Into<DeclaredTypes>,
{
    instance.emitter().declare(declared);
    instance
}

/// Pub/sub operations for every [`Emits`] type.
pub trait EmitterExt: Emits {
    /// Dispatch `args` to the callbacks of `event_type`.
    ///
    /// Unknown-type diagnostics name `Self` as the owner.
    fn emit(&self, event_type: &str, args: &[Value]) -> Result<()> {
        self.emitter()
            .emit_as(short_type_name::<Self>(), event_type, args)
    }

    fn watch(&self, event_type: &str, callback: Callback) -> Subscription {
        self.emitter().watch(event_type, callback)
    }

    fn on(&self, event_type: &str, callback: Callback) -> &Self {
        self.emitter().watch(event_type, callback);
        self
    }

    fn watch_once(&self, event_type: &str, callback: Callback) -> Subscription {
        self.emitter().watch_once(event_type, callback)
    }

    fn once(&self, event_type: &str, callback: Callback) -> &Self {
        self.emitter().watch_once(event_type, callback);
        self
    }

    fn off(&self, event_type: Option<&str>, callback: Option<&Callback>) -> &Self {
        self.emitter().off(event_type, callback);
        self
    }

    fn has(&self, event_type: &str, callback: Option<&Callback>) -> bool {
        self.emitter().has(event_type, callback)
    }
}

impl<T: Emits + ?Sized> EmitterExt for T {}

/// `type_name` without module path or generic arguments.
fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}
