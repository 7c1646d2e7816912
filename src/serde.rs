//! Deserialisation via serde.
//!
//! Values are first decoded with all limits of a [`Decoder`](crate::Decoder),
//! then handed to serde.
//!
//! Example usage:
//!
//! ~~~
//! let mut decoder = safeson::Decoder::new();
//! let value: Vec<u8> = safeson::serde::from_slice(&mut decoder, b"[0, 1]").unwrap();
//! assert_eq!(vec![0, 1], value);
//! ~~~

use crate::value::{Object, Value};
use crate::{Decoder, Number};
use serde::de::{self, DeserializeOwned, IntoDeserializer, Visitor};

/// Deserialisation error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// parse error
    #[error(transparent)]
    Parse(#[from] crate::Error),
    /// error produced by serde
    #[error("{0}")]
    Custom(String),
}

type Result<T> = core::result::Result<T, Error>;

impl de::Error for Error {
    fn custom<T: core::fmt::Display>(e: T) -> Self {
        Self::Custom(e.to_string())
    }
}

/// Deserialise a value of type `T` from a decoded value.
pub fn from_value<T: DeserializeOwned>(value: &Value) -> Result<T> {
    T::deserialize(value)
}

/// Decode a slice and deserialise its value.
pub fn from_slice<T: DeserializeOwned>(decoder: &mut Decoder, bytes: &[u8]) -> Result<T> {
    from_value(&decoder.parse_slice(bytes)?)
}

fn visit_number<'de, V: Visitor<'de>>(n: Number, visitor: V) -> Result<V::Value> {
    match n {
        Number::Int32(i) => visitor.visit_i32(i),
        Number::Int64(i) if i >= 0 => visitor.visit_u64(i as u64),
        Number::Int64(i) => visitor.visit_i64(i),
        Number::Double(d) => visitor.visit_f64(d),
    }
}

impl<'de> de::Deserializer<'de> for &'de Value {
    type Error = Error;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        match self {
            Value::Null => visitor.visit_unit(),
            Value::Bool(b) => visitor.visit_bool(*b),
            Value::Number(n) => visit_number(*n, visitor),
            Value::String(s) => visitor.visit_borrowed_str(s),
            Value::Array(arr) => visitor.visit_seq(de::value::SeqDeserializer::new(arr.iter())),
            Value::Object(obj) => visitor.visit_map(MapAccess::new(obj)),
        }
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        match self {
            Value::Null => visitor.visit_none(),
            v => visitor.visit_some(v),
        }
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value> {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value> {
        match self {
            Value::String(s) => visitor.visit_enum(s.as_str().into_deserializer()),
            Value::Object(obj) if obj.len() == 1 => visitor.visit_enum(EnumAccess(obj)),
            _ => Err(de::Error::custom("expected string or object with one key")),
        }
    }

    serde::forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf unit unit_struct seq tuple
        tuple_struct map struct identifier ignored_any
    }
}

impl<'de> IntoDeserializer<'de, Error> for &'de Value {
    type Deserializer = Self;

    fn into_deserializer(self) -> Self {
        self
    }
}

struct MapAccess<'a> {
    iter: indexmap::map::Iter<'a, String, Value>,
    value: Option<&'a Value>,
}

impl<'a> MapAccess<'a> {
    fn new(obj: &'a Object) -> Self {
        let iter = obj.iter();
        Self { iter, value: None }
    }
}

impl<'de> de::MapAccess<'de> for MapAccess<'de> {
    type Error = Error;

    fn next_key_seed<K: de::DeserializeSeed<'de>>(&mut self, seed: K) -> Result<Option<K::Value>> {
        match self.iter.next() {
            Some((k, v)) => {
                self.value = Some(v);
                seed.deserialize(k.as_str().into_deserializer()).map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V: de::DeserializeSeed<'de>>(&mut self, seed: V) -> Result<V::Value> {
        match self.value.take() {
            Some(v) => seed.deserialize(v),
            None => Err(de::Error::custom("value requested before key")),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.iter.len())
    }
}

/// Externally tagged enum variant, `{"Variant": content}`.
struct EnumAccess<'a>(&'a Object);

impl<'de> de::EnumAccess<'de> for EnumAccess<'de> {
    type Error = Error;
    type Variant = &'de Value;

    fn variant_seed<V: de::DeserializeSeed<'de>>(self, seed: V) -> Result<(V::Value, Self::Variant)> {
        let (k, v) = match self.0.first() {
            Some(kv) => kv,
            None => return Err(de::Error::custom("expected object with one key")),
        };
        let variant = seed.deserialize(IntoDeserializer::<Error>::into_deserializer(k.as_str()))?;
        Ok((variant, v))
    }
}

impl<'de> de::VariantAccess<'de> for &'de Value {
    type Error = Error;

    fn unit_variant(self) -> Result<()> {
        match self {
            Value::Null => Ok(()),
            _ => Err(de::Error::invalid_type(de::Unexpected::Map, &"unit variant")),
        }
    }

    fn newtype_variant_seed<T: de::DeserializeSeed<'de>>(self, seed: T) -> Result<T::Value> {
        seed.deserialize(self)
    }

    fn tuple_variant<V: Visitor<'de>>(self, _len: usize, visitor: V) -> Result<V::Value> {
        de::Deserializer::deserialize_seq(self, visitor)
    }

    fn struct_variant<V: Visitor<'de>>(
        self,
        _fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value> {
        de::Deserializer::deserialize_map(self, visitor)
    }
}
