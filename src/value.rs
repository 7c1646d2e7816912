//! Dynamic values.

use crate::num::Number;
use indexmap::IndexMap;

/// Mapping from strings to values that iterates in insertion order.
pub type Object = IndexMap<String, Value>;

/// JSON value.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// `null`
    Null,
    /// `true` or `false`
    Bool(bool),
    /// number
    Number(Number),
    /// string
    String(String),
    /// array
    Array(Vec<Self>),
    /// mapping from strings to values
    Object(Object),
}

impl Value {
    /// Return true if the value is `null`.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Size of the value.
    ///
    /// This is the number of elements for arrays and objects,
    /// the number of bytes for strings, and 0 for everything else.
    pub fn len(&self) -> usize {
        match self {
            Self::Array(a) => a.len(),
            Self::Object(o) => o.len(),
            Self::String(s) => s.len(),
            Self::Null | Self::Bool(_) | Self::Number(_) => 0,
        }
    }

    /// Return true if [`Value::len`] is 0.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Return the value at `key` if this is an object containing `key`.
    pub fn get(&self, key: &str) -> Option<&Self> {
        match self {
            Self::Object(o) => o.get(key),
            _ => None,
        }
    }

    /// Return the string if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Return the number if this is a number.
    pub fn as_number(&self) -> Option<Number> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Return the elements if this is an array.
    pub fn as_array(&self) -> Option<&[Self]> {
        match self {
            Self::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Return the entries if this is an object.
    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Self::Object(o) => Some(o),
            _ => None,
        }
    }
}

impl_from!(bool, Value, Value::Bool);
impl_from!(Number, Value, Value::Number);
impl_from!(i32, Value, |i: i32| Value::Number(i.into()));
impl_from!(i64, Value, |i: i64| Value::Number(i.into()));
impl_from!(f64, Value, |d: f64| Value::Number(d.into()));
impl_from!(String, Value, Value::String);
impl_from!(&str, Value, |s: &str| Value::String(s.into()));
impl_from!(Vec<Value>, Value, Value::Array);
impl_from!(Object, Value, Value::Object);

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Value {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::Object(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sizes() {
        assert_eq!(Value::Null.len(), 0);
        assert_eq!(Value::from("héllo").len(), 6);
        assert_eq!(Value::from(vec![Value::Null, 1.into()]).len(), 2);

        let obj: Value = [("a", 1), ("b", 2)].into_iter().collect();
        assert_eq!(obj.len(), 2);
        assert_eq!(obj.get("b"), Some(&Value::from(2)));
        assert!(Value::from(Object::new()).is_empty());
    }
}
