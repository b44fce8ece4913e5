//! Synchronous pub/sub attached to arbitrary instances.
//!
//! # Modules
//!
//! - [`event_type`] - [`DeclaredTypes`] and [`TypeMatcher`] allow-lists.
//! - [`listener`] - per-type [`Listener`], [`Callback`] and [`Subscription`].
//! - [`emitter`] - [`Emitter`], the per-instance registry.
//! - [`capability`] - [`attach`], [`Emits`] and [`EmitterExt`].
//! - [`config`] - process-wide strict mode.
//! - [`error`] - [`EmitterError`].

pub mod capability;
pub mod config;
pub mod emitter;
pub mod error;
pub mod event_type;
pub mod listener;

pub use capability::{attach, Emits, EmitterExt};
pub use emitter::Emitter;
pub use error::{EmitterError, Result};
pub use event_type::{DeclaredTypes, FnPattern, TypeMatcher, TypePattern, WILDCARD};
pub use listener::{Callback, CallbackFn, Listener, Subscription};
