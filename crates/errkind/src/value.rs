//! Dynamically typed values attached to errors.
//!
//! A [`Values`] store is cloned from the template into every occurrence, so
//! inserting into one occurrence never shows up in the template or in a
//! sibling occurrence. Stored values are immutable; `Value::Other` payloads
//! are shared behind an `Arc` across clones.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Arbitrary payload for [`Value::Other`].
///
/// Implemented for every `Any + Debug + Display + Send + Sync` type.
pub trait AnyValue: Any + fmt::Debug + fmt::Display + Send + Sync {
    /// Upcast for downcasting.
    fn as_any(&self) -> &dyn Any;
}

impl<T> AnyValue for T
where
    T: Any + fmt::Debug + fmt::Display + Send + Sync,
{
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A single stored value.
#[derive(Clone, Debug)]
pub enum Value {
    Str(String),
    Int(i64),
    Uint(u64),
    Float(f64),
    Bool(bool),
    Other(Arc<dyn AnyValue>),
}

impl Value {
    /// Wrap an arbitrary displayable value.
    pub fn other<T: AnyValue>(value: T) -> Self {
        Value::Other(Arc::new(value))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_uint(&self) -> Option<u64> {
        match self {
            Value::Uint(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Checked downcast to the concrete stored type.
    ///
    /// Works for every variant: `Str` downcasts to `String`, `Int` to `i64`
    /// and so on; `Other` to its payload type.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match self {
            Value::Str(v) => (v as &dyn Any).downcast_ref(),
            Value::Int(v) => (v as &dyn Any).downcast_ref(),
            Value::Uint(v) => (v as &dyn Any).downcast_ref(),
            Value::Float(v) => (v as &dyn Any).downcast_ref(),
            Value::Bool(v) => (v as &dyn Any).downcast_ref(),
            Value::Other(v) => {
                // Deref past the Arc: `Arc<dyn AnyValue>` is itself an AnyValue.
                let inner: &dyn AnyValue = &**v;
                inner.as_any().downcast_ref()
            }
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(v) => f.write_str(v),
            Value::Int(v) => write!(f, "{}", v),
            Value::Uint(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{}", v),
            Value::Bool(v) => write!(f, "{}", v),
            Value::Other(v) => write!(f, "{}", v),
        }
    }
}

impl PartialEq for Value {
    /// `Other` payloads compare by identity.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Uint(a), Value::Uint(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Other(a), Value::Other(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

// ── Conversions ───────────────────────────────────────────────────

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl From<&String> for Value {
    fn from(v: &String) -> Self {
        Value::Str(v.clone())
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

macro_rules! value_from {
    ($variant:ident as $target:ty: $($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(v: $t) -> Self {
                    Value::$variant(v as $target)
                }
            }
        )*
    };
}

value_from!(Int as i64: i8, i16, i32, i64, isize);
value_from!(Uint as u64: u8, u16, u32, u64, usize);
value_from!(Float as f64: f32, f64);

// ── Store ─────────────────────────────────────────────────────────

/// Key/value store carried by templates and occurrences.
///
/// Keys are unique; inserting an existing key overwrites it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Values {
    map: HashMap<String, Value>,
}

impl Values {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert or overwrite `key`, returning the previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.map.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.map.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.map.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Entries in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.map.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Entries sorted by key.
    pub fn sorted(&self) -> Vec<(&str, &Value)> {
        let mut entries: Vec<_> = self.iter().collect();
        entries.sort_unstable_by_key(|(k, _)| *k);
        entries
    }
}

impl<K, V> FromIterator<(K, V)> for Values
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut values = Values::new();
        for (k, v) in iter {
            values.insert(k, v);
        }
        values
    }
}

/// Typed read access shared by templates and occurrences.
///
/// Every accessor yields `None` when the key is missing or holds a value
/// of another type.
pub trait ValueAccess {
    fn values(&self) -> &Values;

    fn get(&self, key: &str) -> Option<&Value> {
        self.values().get(key)
    }

    fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    fn get_int(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(Value::as_int)
    }

    fn get_uint(&self, key: &str) -> Option<u64> {
        self.get(key).and_then(Value::as_uint)
    }

    fn get_float(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(Value::as_float)
    }

    fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(Value::as_bool)
    }

    fn get_as<T: Any>(&self, key: &str) -> Option<&T> {
        self.get(key).and_then(Value::downcast_ref::<T>)
    }
}

impl ValueAccess for Values {
    fn values(&self) -> &Values {
        self
    }
}
