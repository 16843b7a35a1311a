//! Soft-failure carrier for external lookups
//!
//! Network-bound stages of the pipeline never abort a run: a timeout, a
//! non-success status, or an unparseable response collapses to a usable
//! fallback value. `Collected` keeps that behavior while preserving the
//! difference between "the lookup ran" and "the lookup failed and this is
//! the fallback", so call sites can log the distinction.

/// Result of a lookup that degrades instead of failing
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Collected<T> {
    /// The lookup completed normally
    Complete(T),
    /// The lookup failed; `value` is the fallback the caller proceeds with
    Degraded { value: T, reason: String },
}

impl<T> Collected<T> {
    /// Build a degraded result with the given fallback and reason
    pub fn degraded(value: T, reason: impl Into<String>) -> Self {
        Self::Degraded {
            value,
            reason: reason.into(),
        }
    }

    /// Borrow the carried value regardless of outcome
    pub fn value(&self) -> &T {
        match self {
            Self::Complete(value) => value,
            Self::Degraded { value, .. } => value,
        }
    }

    /// Consume self, returning the carried value
    pub fn into_value(self) -> T {
        match self {
            Self::Complete(value) => value,
            Self::Degraded { value, .. } => value,
        }
    }

    /// True if the lookup failed and the value is a fallback
    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded { .. })
    }

    /// Failure reason, if any
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Complete(_) => None,
            Self::Degraded { reason, .. } => Some(reason.as_str()),
        }
    }

    /// Map the carried value, preserving the outcome
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Collected<U> {
        match self {
            Self::Complete(value) => Collected::Complete(f(value)),
            Self::Degraded { value, reason } => Collected::Degraded {
                value: f(value),
                reason,
            },
        }
    }
}

impl<T: Default> Collected<T> {
    /// Degraded result carrying the type's empty value
    pub fn degraded_empty(reason: impl Into<String>) -> Self {
        Self::degraded(T::default(), reason)
    }
}
