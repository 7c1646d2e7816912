//! Shapes of JSON values that typed decoding expects.
//!
//! Every type that can be decoded in typed mode implements [`Field`],
//! which describes its [`JsonShape`] and how to build it from the
//! [`Typed`] value that the parser produced for that shape.
//!
//! ~~~
//! use safeson::shape::{Container, Field, JsonShape, Scalar};
//! use std::collections::BTreeMap;
//!
//! let shape = <BTreeMap<String, Vec<Option<i64>>>>::shape().unwrap();
//! assert_eq!(shape.to_string(), "Map<String, List<Optional<Int64>>>");
//! assert!(<BTreeMap<i32, String>>::shape().is_err());
//! ~~~

use crate::num::Number;
use crate::value::Value;
use core::any::{type_name, Any, TypeId};
use core::fmt::{self, Display};
use core::hash::{BuildHasher, Hash};
use indexmap::IndexMap;
use std::collections::{BTreeMap, HashMap};

/// Shape of a value that is not a container.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Scalar {
    /// string
    String,
    /// `true` or `false`
    Bool,
    /// `null`
    Null,
    /// number, truncated to 32 bits
    Int32,
    /// number, truncated to 64 bits
    Int64,
    /// number, converted to double
    Double,
    /// number in whatever representation it was decoded to
    Number,
    /// any value, decoded dynamically
    Any,
}

/// Container around an inner shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Container {
    /// array with elements of the inner shape
    List,
    /// object with string keys and values of the inner shape
    Map,
    /// `null` or the inner shape
    Optional,
}

/// Identity of a structured record type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RecordType {
    id: TypeId,
    name: &'static str,
}

impl RecordType {
    /// Return the identity of `T`.
    pub fn of<T: 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    /// Type identifier.
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Type name.
    pub fn name(&self) -> &'static str {
        self.name
    }
}

/// Shape of a JSON value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum JsonShape {
    /// value that is not a container
    Scalar(Scalar),
    /// object that is assembled into a registered record type
    Record(RecordType),
    /// container around an inner shape
    Compound(Container, Box<JsonShape>),
}

impl JsonShape {
    /// Array of the given shape.
    pub fn list(inner: Self) -> Self {
        Self::Compound(Container::List, Box::new(inner))
    }

    /// `null` or the given shape.
    pub fn optional(inner: Self) -> Self {
        Self::Compound(Container::Optional, Box::new(inner))
    }

    /// Object with keys of shape `key` and values of shape `value`.
    ///
    /// This fails unless `key` is a string.
    pub fn map(key: Self, value: Self) -> Result<Self, ShapeError> {
        match key {
            Self::Scalar(Scalar::String) => Ok(Self::Compound(Container::Map, Box::new(value))),
            key => Err(ShapeError::MapKey(key)),
        }
    }

    /// Return true if the shape accepts `null` in place of a value.
    pub fn is_optional(&self) -> bool {
        matches!(self, Self::Compound(Container::Optional, _))
    }

    /// Call `f` on every record type that occurs in the shape.
    pub fn records(&self, f: &mut impl FnMut(RecordType)) {
        match self {
            Self::Scalar(_) => (),
            Self::Record(r) => f(*r),
            Self::Compound(_, inner) => inner.records(f),
        }
    }
}

impl Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl Display for JsonShape {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Scalar(s) => s.fmt(f),
            Self::Record(r) => r.name.fmt(f),
            Self::Compound(Container::List, inner) => write!(f, "List<{}>", inner),
            Self::Compound(Container::Map, inner) => write!(f, "Map<String, {}>", inner),
            Self::Compound(Container::Optional, inner) => write!(f, "Optional<{}>", inner),
        }
    }
}

/// Type that cannot be expressed as a [`JsonShape`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ShapeError {
    /// map whose keys are not strings
    #[error("map keys must be strings, found {0}")]
    MapKey(JsonShape),
    /// fixed-size array, use a `Vec` instead
    #[error("arrays are not supported: {0}")]
    Array(&'static str),
}

/// Value decoded according to a [`JsonShape`].
#[derive(Debug)]
pub enum Typed {
    /// value for a scalar shape
    Value(Value),
    /// value for a list shape
    List(Vec<Typed>),
    /// value for a map shape
    Map(IndexMap<String, Typed>),
    /// value for an optional shape
    Optional(Option<Box<Typed>>),
    /// constructed record
    Record(Box<dyn Any>),
}

impl Typed {
    /// Return true if the value is `null` or an empty optional.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Value(Value::Null) | Self::Optional(None))
    }
}

/// Typed value that does not fit the target type.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("decoded value does not fit {0}")]
pub struct Mismatch(pub &'static str);

impl Mismatch {
    fn of<T>() -> Self {
        Self(type_name::<T>())
    }
}

/// Type that can be decoded from JSON in typed mode.
pub trait Field: Sized {
    /// Shape that JSON input must have to be decoded to this type.
    fn shape() -> Result<JsonShape, ShapeError>;

    /// Convert a value decoded with [`Field::shape`].
    fn from_typed(typed: Typed) -> Result<Self, Mismatch>;
}

macro_rules! scalar_field {
    ($ty:ty, $scalar:ident, $pat:pat => $out:expr) => {
        impl Field for $ty {
            fn shape() -> Result<JsonShape, ShapeError> {
                Ok(JsonShape::Scalar(Scalar::$scalar))
            }

            fn from_typed(typed: Typed) -> Result<Self, Mismatch> {
                match typed {
                    Typed::Value($pat) => Ok($out),
                    _ => Err(Mismatch::of::<Self>()),
                }
            }
        }
    };
}

scalar_field!(String, String, Value::String(s) => s);
scalar_field!(bool, Bool, Value::Bool(b) => b);
scalar_field!((), Null, Value::Null => ());
scalar_field!(i32, Int32, Value::Number(n) => n.as_i32());
scalar_field!(i64, Int64, Value::Number(n) => n.as_i64());
scalar_field!(f64, Double, Value::Number(n) => n.as_f64());
scalar_field!(Number, Number, Value::Number(n) => n);
scalar_field!(Value, Any, v => v);

impl<T: Field> Field for Vec<T> {
    fn shape() -> Result<JsonShape, ShapeError> {
        Ok(JsonShape::list(T::shape()?))
    }

    fn from_typed(typed: Typed) -> Result<Self, Mismatch> {
        match typed {
            Typed::List(items) => items.into_iter().map(T::from_typed).collect(),
            _ => Err(Mismatch::of::<Self>()),
        }
    }
}

impl<T: Field> Field for Option<T> {
    fn shape() -> Result<JsonShape, ShapeError> {
        Ok(JsonShape::optional(T::shape()?))
    }

    fn from_typed(typed: Typed) -> Result<Self, Mismatch> {
        match typed {
            Typed::Optional(o) => o.map(|t| T::from_typed(*t)).transpose(),
            _ => Err(Mismatch::of::<Self>()),
        }
    }
}

impl<T: Field, const N: usize> Field for [T; N] {
    fn shape() -> Result<JsonShape, ShapeError> {
        Err(ShapeError::Array(type_name::<Self>()))
    }

    fn from_typed(_: Typed) -> Result<Self, Mismatch> {
        Err(Mismatch::of::<Self>())
    }
}

/// Convert the entries of a decoded map to an arbitrary map type.
fn map_entries<K: Field, V: Field, M: FromIterator<(K, V)>>(typed: Typed) -> Result<M, Mismatch> {
    match typed {
        Typed::Map(m) => m
            .into_iter()
            .map(|(k, v)| -> Result<(K, V), Mismatch> {
                let k = K::from_typed(Typed::Value(Value::String(k)))?;
                Ok((k, V::from_typed(v)?))
            })
            .collect(),
        _ => Err(Mismatch::of::<M>()),
    }
}

impl<K: Field + Ord, V: Field> Field for BTreeMap<K, V> {
    fn shape() -> Result<JsonShape, ShapeError> {
        JsonShape::map(K::shape()?, V::shape()?)
    }

    fn from_typed(typed: Typed) -> Result<Self, Mismatch> {
        map_entries(typed)
    }
}

impl<K: Field + Eq + Hash, V: Field, S: BuildHasher + Default> Field for HashMap<K, V, S> {
    fn shape() -> Result<JsonShape, ShapeError> {
        JsonShape::map(K::shape()?, V::shape()?)
    }

    fn from_typed(typed: Typed) -> Result<Self, Mismatch> {
        map_entries(typed)
    }
}

impl<K: Field + Eq + Hash, V: Field, S: BuildHasher + Default> Field for IndexMap<K, V, S> {
    fn shape() -> Result<JsonShape, ShapeError> {
        JsonShape::map(K::shape()?, V::shape()?)
    }

    fn from_typed(typed: Typed) -> Result<Self, Mismatch> {
        map_entries(typed)
    }
}

impl<T: crate::Record> Field for T {
    fn shape() -> Result<JsonShape, ShapeError> {
        Ok(JsonShape::Record(RecordType::of::<T>()))
    }

    fn from_typed(typed: Typed) -> Result<Self, Mismatch> {
        match typed {
            Typed::Record(r) => r.downcast().map(|r| *r).map_err(|_| Mismatch::of::<T>()),
            _ => Err(Mismatch::of::<T>()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shapes() {
        let s = |s| JsonShape::Scalar(s);
        assert_eq!(<String>::shape(), Ok(s(Scalar::String)));
        assert_eq!(
            <Vec<Option<f64>>>::shape(),
            Ok(JsonShape::list(JsonShape::optional(s(Scalar::Double))))
        );
        assert_eq!(
            <HashMap<String, Value>>::shape().unwrap().to_string(),
            "Map<String, Any>"
        );
        assert_eq!(
            <HashMap<i64, Value>>::shape(),
            Err(ShapeError::MapKey(s(Scalar::Int64)))
        );
        assert!(matches!(<[i32; 2]>::shape(), Err(ShapeError::Array(_))));
        assert!(matches!(<Vec<[i32; 2]>>::shape(), Err(ShapeError::Array(_))));
    }

    #[test]
    fn from_typed() {
        let n = |n: Number| Typed::Value(Value::Number(n));
        assert_eq!(i32::from_typed(n(Number::Double(2.4))), Ok(2));
        assert_eq!(i64::from_typed(n(Number::Double(1.25))), Ok(1));
        assert_eq!(f64::from_typed(n(Number::Int32(4))), Ok(4.0));

        let some = Typed::Optional(Some(Box::new(n(1.into()))));
        let list = Typed::List(vec![Typed::Optional(None), some]);
        assert_eq!(<Vec<Option<i32>>>::from_typed(list), Ok(vec![None, Some(1)]));

        let mut map = IndexMap::new();
        map.insert("a".to_string(), Typed::Value(Value::Bool(true)));
        let map = <BTreeMap<String, bool>>::from_typed(Typed::Map(map)).unwrap();
        assert_eq!(map.get("a"), Some(&true));

        assert_eq!(
            String::from_typed(Typed::Value(Value::Null)),
            Err(Mismatch(type_name::<String>()))
        );
    }
}
