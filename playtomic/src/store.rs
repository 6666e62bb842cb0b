//! Key-value storage behind `#[stored_access]`.

use std::{
    collections::HashMap,
    sync::{OnceLock, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

/// A value as held by a [`KeyValueStore`].
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

/// A type which can be written to and read back from a [`KeyValueStore`].
///
/// Implement this for your own types (typically enums) to use them as the `default_value` of
/// `#[stored_access]`.
pub trait StoredValue: Sized {
    /// Converts back from the stored form. `None` if `value` does not hold a `Self`.
    fn from_value(value: &Value) -> Option<Self>;
    fn into_value(self) -> Value;
}

impl StoredValue for bool {
    fn from_value(value: &Value) -> Option<Self> {
        match *value {
            Value::Bool(value) => Some(value),
            _ => None,
        }
    }

    fn into_value(self) -> Value {
        Value::Bool(self)
    }
}

impl StoredValue for i64 {
    fn from_value(value: &Value) -> Option<Self> {
        match *value {
            Value::Integer(value) => Some(value),
            _ => None,
        }
    }

    fn into_value(self) -> Value {
        Value::Integer(self)
    }
}

impl StoredValue for f64 {
    fn from_value(value: &Value) -> Option<Self> {
        match *value {
            Value::Float(value) => Some(value),
            Value::Integer(value) => Some(value as f64),
            _ => None,
        }
    }

    fn into_value(self) -> Value {
        Value::Float(self)
    }
}

/// Other integers are stored as `Integer`, or as a decimal `String` if they overflow `i64`.
macro_rules! stored_integer {
    ($($TY:ty),+) => {$(
        impl StoredValue for $TY {
            fn from_value(value: &Value) -> Option<Self> {
                match *value {
                    Value::Integer(value) => Self::try_from(value).ok(),
                    Value::String(ref value) => value.parse().ok(),
                    _ => None,
                }
            }

            fn into_value(self) -> Value {
                i64::try_from(self).map_or_else(|_| Value::String(self.to_string()), Value::Integer)
            }
        }
    )+};
}
stored_integer!(i8, i16, i32, i128, isize, u8, u16, u32, u64, u128, usize);

impl StoredValue for f32 {
    fn from_value(value: &Value) -> Option<Self> {
        f64::from_value(value).map(|value| value as f32)
    }

    fn into_value(self) -> Value {
        Value::Float(f64::from(self))
    }
}

impl StoredValue for String {
    fn from_value(value: &Value) -> Option<Self> {
        match *value {
            Value::String(ref value) => Some(value.clone()),
            _ => None,
        }
    }

    fn into_value(self) -> Value {
        Value::String(self)
    }
}

/// Storage for [`Value`]s by key.
///
/// Only [`value`](Self::value), [`set_value`](Self::set_value) and
/// [`remove_value`](Self::remove_value) need implementing. The typed readers coerce between
/// representations the way preference stores traditionally do: a missing or unconvertible value
/// reads as `false`, `0` or `0.0`.
pub trait KeyValueStore {
    fn value(&self, key: &str) -> Option<Value>;
    fn set_value(&self, value: Value, key: &str);
    fn remove_value(&self, key: &str);

    fn bool(&self, key: &str) -> bool {
        match self.value(key) {
            Some(Value::Bool(value)) => value,
            Some(Value::Integer(value)) => value != 0,
            Some(Value::Float(value)) => value != 0.0,
            Some(Value::String(value)) => {
                let value = value.trim();
                value.eq_ignore_ascii_case("true")
                    || value.eq_ignore_ascii_case("yes")
                    || value.parse::<i64>().map_or(false, |value| value != 0)
            }
            None => false,
        }
    }

    fn integer(&self, key: &str) -> i64 {
        match self.value(key) {
            Some(Value::Bool(value)) => i64::from(value),
            Some(Value::Integer(value)) => value,
            Some(Value::Float(value)) => value as i64,
            Some(Value::String(value)) => {
                let value = value.trim();
                value
                    .parse::<i64>()
                    .or_else(|_| value.parse::<f64>().map(|value| value as i64))
                    .unwrap_or(0)
            }
            None => 0,
        }
    }

    fn float(&self, key: &str) -> f64 {
        match self.value(key) {
            Some(Value::Bool(value)) => f64::from(u8::from(value)),
            Some(Value::Integer(value)) => value as f64,
            Some(Value::Float(value)) => value,
            Some(Value::String(value)) => value.trim().parse().unwrap_or(0.0),
            None => 0.0,
        }
    }

    /// The value as a string. Numbers are formatted; booleans read as `"1"` or `"0"`.
    fn string(&self, key: &str) -> Option<String> {
        match self.value(key)? {
            Value::Bool(value) => Some(if value { "1" } else { "0" }.to_owned()),
            Value::Integer(value) => Some(value.to_string()),
            Value::Float(value) => Some(value.to_string()),
            Value::String(value) => Some(value),
        }
    }

    fn get<T: StoredValue>(&self, key: &str) -> Option<T> {
        self.value(key).as_ref().and_then(T::from_value)
    }

    fn set<T: StoredValue>(&self, value: T, key: &str) {
        self.set_value(value.into_value(), key);
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn value(&self, key: &str) -> Option<Value> {
        (**self).value(key)
    }

    fn set_value(&self, value: Value, key: &str) {
        (**self).set_value(value, key);
    }

    fn remove_value(&self, key: &str) {
        (**self).remove_value(key);
    }
}

/// An in-memory [`KeyValueStore`], safe to share between threads.
#[derive(Debug, Default)]
pub struct UserDefaults {
    values: RwLock<HashMap<String, Value>>,
}

impl UserDefaults {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide store, used by `#[stored_access]` when no `store` is given.
    pub fn standard() -> &'static Self {
        static STANDARD: OnceLock<UserDefaults> = OnceLock::new();
        STANDARD.get_or_init(Self::new)
    }

    // A panic while holding the lock cannot leave the map half-updated, so poisoning is ignored.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, Value>> {
        self.values.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, Value>> {
        self.values.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl KeyValueStore for UserDefaults {
    fn value(&self, key: &str) -> Option<Value> {
        self.read().get(key).cloned()
    }

    fn set_value(&self, value: Value, key: &str) {
        let _ = self.write().insert(key.to_owned(), value);
    }

    fn remove_value(&self, key: &str) {
        let _ = self.write().remove(key);
    }
}
