//! Declared event types.
//!
//! An instance declares which event types it may emit. A declaration is
//! either the terminal [`DeclaredTypes::Wildcard`] or an ordered list of
//! [`TypeMatcher`]s, each an exact name or a pattern predicate.

use std::fmt;
use std::sync::Arc;

/// Sentinel string accepted by `DeclaredTypes::from(&str)` for [`DeclaredTypes::Wildcard`].
pub const WILDCARD: &str = "*";

// ============================================================================
// Patterns
// ============================================================================

/// Anything that can test an event type token.
pub trait TypePattern: Send + Sync {
    fn test(&self, event_type: &str) -> bool;

    /// Form shown in unknown-type diagnostics.
    fn describe(&self) -> String {
        "<pattern>".to_string()
    }
}

impl TypePattern for regex::Regex {
    fn test(&self, event_type: &str) -> bool {
        self.is_match(event_type)
    }

    fn describe(&self) -> String {
        format!("/{}/", self.as_str())
    }
}

/// Adapts a closure into a [`TypePattern`].
pub struct FnPattern<F>(pub F);

impl<F> TypePattern for FnPattern<F>
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn test(&self, event_type: &str) -> bool {
        (self.0)(event_type)
    }
}

// ============================================================================
// TypeMatcher
// ============================================================================

/// One entry of a declared type list.
#[derive(Clone)]
pub enum TypeMatcher {
    /// Matches one event type by equality.
    Exact(String),
    /// Matches every event type the pattern accepts.
    Pattern(Arc<dyn TypePattern>),
}

impl TypeMatcher {
    /// Wrap a closure predicate.
    pub fn predicate(f: impl Fn(&str) -> bool + Send + Sync + 'static) -> Self {
        Self::Pattern(Arc::new(FnPattern(f)))
    }

    pub fn matches(&self, event_type: &str) -> bool {
        match self {
            Self::Exact(name) => name == event_type,
            Self::Pattern(pattern) => pattern.test(event_type),
        }
    }
}

impl fmt::Display for TypeMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(name) => f.write_str(name),
            Self::Pattern(pattern) => f.write_str(&pattern.describe()),
        }
    }
}

impl fmt::Debug for TypeMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(name) => f.debug_tuple("Exact").field(name).finish(),
            Self::Pattern(pattern) => f.debug_tuple("Pattern").field(&pattern.describe()).finish(),
        }
    }
}

impl From<&str> for TypeMatcher {
    fn from(name: &str) -> Self {
        Self::Exact(name.to_string())
    }
}

impl From<String> for TypeMatcher {
    fn from(name: String) -> Self {
        Self::Exact(name)
    }
}

impl From<regex::Regex> for TypeMatcher {
    fn from(re: regex::Regex) -> Self {
        Self::Pattern(Arc::new(re))
    }
}

// ============================================================================
// DeclaredTypes
// ============================================================================

/// The allow-list of an instance.
#[derive(Debug, Clone)]
pub enum DeclaredTypes {
    /// Every event type is allowed. Terminal: later declarations are ignored.
    Wildcard,
    List(Vec<TypeMatcher>),
}

impl DeclaredTypes {
    pub fn is_wildcard(&self) -> bool {
        matches!(self, Self::Wildcard)
    }

    /// Whether `event_type` may be emitted without a diagnostic.
    pub fn allows(&self, event_type: &str) -> bool {
        match self {
            Self::Wildcard => true,
            Self::List(matchers) => matchers.iter().any(|m| m.matches(event_type)),
        }
    }

    /// Fold a later declaration into this one.
    ///
    /// `Wildcard` absorbs everything; two lists concatenate without
    /// de-duplication.
    pub fn extend(&mut self, later: DeclaredTypes) {
        match later {
            Self::Wildcard => *self = Self::Wildcard,
            Self::List(more) => {
                if let Self::List(current) = self {
                    current.extend(more);
                }
            }
        }
    }

    /// Display forms of the declared matchers, empty for `Wildcard`.
    pub fn describe(&self) -> Vec<String> {
        match self {
            Self::Wildcard => Vec::new(),
            Self::List(matchers) => matchers.iter().map(ToString::to_string).collect(),
        }
    }
}

impl Default for DeclaredTypes {
    fn default() -> Self {
        Self::List(Vec::new())
    }
}

/// `"*"` is the wildcard; any other string declares that single type.
impl From<&str> for DeclaredTypes {
    fn from(name: &str) -> Self {
        if name == WILDCARD {
            Self::Wildcard
        } else {
            Self::List(vec![TypeMatcher::from(name)])
        }
    }
}

impl From<Vec<TypeMatcher>> for DeclaredTypes {
    fn from(matchers: Vec<TypeMatcher>) -> Self {
        Self::List(matchers)
    }
}

impl From<Vec<&str>> for DeclaredTypes {
    fn from(names: Vec<&str>) -> Self {
        names.into_iter().map(TypeMatcher::from).collect()
    }
}

impl<const N: usize> From<[&str; N]> for DeclaredTypes {
    fn from(names: [&str; N]) -> Self {
        names.into_iter().map(TypeMatcher::from).collect()
    }
}

impl FromIterator<TypeMatcher> for DeclaredTypes {
    fn from_iter<I: IntoIterator<Item = TypeMatcher>>(iter: I) -> Self {
        Self::List(iter.into_iter().collect())
    }
}
