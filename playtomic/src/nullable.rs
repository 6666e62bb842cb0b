/// A replacement for an `Option` field: keep the current value, clear it, or set a new one.
///
/// `#[copyable]` takes one of these for every `Option<T>` field, because a plain `Option<T>`
/// parameter could not tell "keep" apart from "set to `None`".
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Nullable<T> {
    /// Keep whatever is there.
    Unset,
    /// Replace with `None`.
    Null,
    /// Replace with `Some(value)`.
    Value(T),
}

// derive(Default) would require `T: Default`.
impl<T> Default for Nullable<T> {
    fn default() -> Self {
        Self::Unset
    }
}

impl<T> Nullable<T> {
    pub const fn is_unset(&self) -> bool {
        matches!(*self, Self::Unset)
    }

    /// The resulting field value, with `existing` standing in for [`Unset`](Self::Unset).
    pub fn or(self, existing: Option<T>) -> Option<T> {
        self.or_else(|| existing)
    }

    /// Like [`or`](Self::or), but only computes the existing value when it is needed.
    pub fn or_else(self, existing: impl FnOnce() -> Option<T>) -> Option<T> {
        match self {
            Self::Unset => existing(),
            Self::Null => None,
            Self::Value(value) => Some(value),
        }
    }
}

/// `None` clears and `Some` sets; there is no way to spell [`Unset`](Nullable::Unset) this way.
impl<T> From<Option<T>> for Nullable<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Self::Value(value),
            None => Self::Null,
        }
    }
}
