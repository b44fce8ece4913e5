use thiserror::Error;

// ---------------------------------------------------------------------------
// EmitterError
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EmitterError {
    /// `emit` was called in strict mode with a type outside the declared list.
    #[error("{owner} - unknown emit type \"{event_type}\". {}", known_types(.declared))]
    UnknownEventType {
        /// Short type name of the emitting instance.
        owner: String,
        event_type: String,
        /// Display forms of every declared matcher, in declaration order.
        declared: Vec<String>,
    },
}

fn known_types(declared: &[String]) -> String {
    if declared.is_empty() {
        "Types list not defined.".to_string()
    } else {
        format!("Known types are: \"{}\".", declared.join(", "))
    }
}

/// Convenience alias; the default error type is `EmitterError`.
pub type Result<T, E = EmitterError> = std::result::Result<T, E>;

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
