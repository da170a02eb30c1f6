//! Default values for typed lookups.

use std::fmt;

/// Value returned when a looked-up variable is absent.
///
/// Passing `None` instead of a `Fallback` means "no default", which is
/// distinct from a default of `false`, `0` or `None`.
pub enum Fallback<'a, T> {
    /// A ready value
    Value(T),
    /// Computed on demand, only when the variable is absent
    Lazy(Box<dyn FnOnce() -> T + 'a>),
}

impl<'a, T> Fallback<'a, T> {
    pub fn lazy(producer: impl FnOnce() -> T + 'a) -> Self {
        Self::Lazy(Box::new(producer))
    }

    /// Produce the value, running the producer if there is one.
    pub fn resolve(self) -> T {
        match self {
            Self::Value(value) => value,
            Self::Lazy(producer) => producer(),
        }
    }
}

impl<T> From<T> for Fallback<'_, T> {
    fn from(value: T) -> Self {
        Self::Value(value)
    }
}

impl<T: fmt::Debug> fmt::Debug for Fallback<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Self::Lazy(_) => f.write_str("Lazy(..)"),
        }
    }
}
