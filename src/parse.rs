//! Recursive-descent parsing of values.

use crate::buffer::Buffer;
use crate::config::{Config, DuplicateKeyStrategy};
use crate::intern::{FieldId, Key};
use crate::registry::{Args, Registry, TypeDescriptor};
use crate::shape::{Container, JsonShape, RecordType, Scalar, Typed};
use crate::value::{Object, Value};
use crate::{num::Lex as _, str::Lex as _, token::Lex as _};
use crate::{Error, Expect, Kind, Number, Read};
use core::any::Any;
use indexmap::{IndexMap, IndexSet};
use log::trace;

/// State of one parse.
///
/// Every parsing function expects the first byte of its value to be current,
/// and leaves the first byte after its value current.
pub(crate) struct Parser<'a, R> {
    pub(crate) read: &'a mut R,
    config: &'a Config,
    registry: &'a Registry,
    pub(crate) buffer: &'a mut Buffer,
    depth: usize,
}

/// Insert `value` at `key` according to `strategy`.
///
/// A previous `null` does not count as a duplicate.
fn insert<T>(
    map: &mut IndexMap<String, T>,
    key: String,
    value: T,
    strategy: DuplicateKeyStrategy,
    is_null: impl Fn(&T) -> bool,
) -> Result<(), Kind> {
    use DuplicateKeyStrategy::*;
    match strategy {
        Fail => match map.get(&key) {
            Some(prev) if !is_null(prev) => return Err(Kind::DuplicateKey(key)),
            _ => {
                map.insert(key, value);
            }
        },
        KeepFirst => {
            map.entry(key).or_insert(value);
        }
        KeepLast => {
            map.insert(key, value);
        }
    }
    Ok(())
}

impl<'a, R: Read> Parser<'a, R> {
    pub(crate) fn new(
        read: &'a mut R,
        config: &'a Config,
        registry: &'a Registry,
        buffer: &'a mut Buffer,
    ) -> Self {
        Self {
            read,
            config,
            registry,
            buffer,
            depth: 0,
        }
    }

    pub(crate) fn error(&self, kind: impl Into<Kind>) -> Error {
        self.read.error(kind)
    }

    /// Skip whitespace and return the current byte.
    pub(crate) fn ws(&mut self) -> Result<Option<u8>, Error> {
        self.read.skip_whitespace(self.config.max_whitespace())
    }

    /// Fail if anything but whitespace follows.
    pub(crate) fn finish(&mut self) -> Result<(), Error> {
        match self.ws()? {
            Some(c) => Err(self.error(Kind::TrailingContent(c))),
            None => Ok(()),
        }
    }

    fn enter(&mut self) -> Result<(), Error> {
        self.depth += 1;
        if self.depth > self.config.max_recursion_depth() {
            return Err(self.error(Kind::Depth));
        }
        trace!("entering container at {}, depth {}", self.read.index(), self.depth);
        Ok(())
    }

    /// Move past the closing bracket and return its index.
    fn leave(&mut self) -> usize {
        let end = self.read.index();
        self.depth -= 1;
        self.read.advance();
        end
    }

    /// Enter a container whose opening bracket is current.
    ///
    /// Returns the index of the closing bracket if the container is empty.
    fn open(&mut self, bracket: Bracket) -> Result<Option<usize>, Error> {
        self.enter()?;
        self.read.advance();
        match self.ws()? {
            Some(c) if c == bracket.close() => Ok(Some(self.leave())),
            Some(_) => Ok(None),
            None => Err(self.error(bracket.unterminated())),
        }
    }

    /// Move past the separator that follows an item.
    ///
    /// Returns the index of the closing bracket if the container ends.
    fn next(&mut self, bracket: Bracket) -> Result<Option<usize>, Error> {
        match self.ws()? {
            Some(b',') => {
                self.read.advance();
                match self.ws()? {
                    Some(_) => Ok(None),
                    None => Err(self.error(bracket.unterminated())),
                }
            }
            Some(c) if c == bracket.close() => Ok(Some(self.leave())),
            Some(c) => Err(self.error(Kind::Token(bracket.separator(), c))),
            None => Err(self.error(bracket.unterminated())),
        }
    }

    /// Move past the colon between a key and its value.
    fn colon(&mut self) -> Result<(), Error> {
        match self.ws()? {
            Some(b':') => {
                self.read.advance();
            }
            Some(c) => return Err(self.error(Kind::Token(Expect::Colon, c))),
            None => return Err(self.error(Kind::UnterminatedObject)),
        }
        match self.ws()? {
            Some(_) => Ok(()),
            None => Err(self.error(Kind::UnterminatedObject)),
        }
    }

    // One frame of `seq`, `members` and the parsing functions they call
    // is live per nesting level, so these only dispatch.

    /// Parse the elements of an array whose `[` is current.
    pub(crate) fn seq(&mut self, mut f: impl FnMut(&mut Self) -> Result<(), Error>) -> Result<(), Error> {
        let mut end = self.open(Bracket::Square)?;
        while end.is_none() {
            f(self)?;
            end = self.next(Bracket::Square)?;
        }
        Ok(())
    }

    /// Parse the members of an object whose `{` is current.
    ///
    /// `key` parses a key, and `member` parses the value belonging to it,
    /// receiving the index where the key started.
    /// Returns the index of the closing `}`.
    pub(crate) fn members<K>(
        &mut self,
        mut key: impl FnMut(&mut Self) -> Result<K, Error>,
        mut member: impl FnMut(&mut Self, K, usize) -> Result<(), Error>,
    ) -> Result<usize, Error> {
        let mut end = self.open(Bracket::Curly)?;
        loop {
            if let Some(end) = end {
                return Ok(end);
            }
            let key_index = self.read.index();
            let k = key(self)?;
            self.colon()?;
            member(self, k, key_index)?;
            end = self.next(Bracket::Curly)?;
        }
    }

    /// Parse a string whose `"` is current.
    pub(crate) fn string(&mut self) -> Result<String, Error> {
        self.read.str_string(self.buffer)
    }

    /// Fail because the current byte does not start the expected value.
    fn unexpected<T>(&self, expect: Expect) -> Result<T, Error> {
        match self.read.current() {
            Some(c) => Err(self.error(Kind::Token(expect, c))),
            None => Err(self.error(Kind::Eof)),
        }
    }

    /// Parse `null`, `true` or `false`.
    fn null_or_bool(&mut self) -> Result<Value, Error> {
        Ok(match self.read.null_or_bool()? {
            None => Value::Null,
            Some(b) => Value::Bool(b),
        })
    }

    /// Parse a value, determining its kind from its first byte.
    pub(crate) fn value(&mut self) -> Result<Value, Error> {
        match self.read.current() {
            Some(b'"') => self.string().map(Value::String),
            Some(b'n' | b't' | b'f') => self.null_or_bool(),
            Some(b'-' | b'0'..=b'9') => self.read.number().map(Value::Number),
            Some(b'[') => self.array(),
            Some(b'{') => self.object(),
            Some(_) => Err(self.error(Kind::Literal)),
            None => Err(self.error(Kind::Eof)),
        }
    }

    fn array(&mut self) -> Result<Value, Error> {
        let mut arr = Vec::new();
        self.seq(|p| p.value().map(|v| arr.push(v)))?;
        Ok(Value::Array(arr))
    }

    fn object(&mut self) -> Result<Value, Error> {
        let strategy = self.config.duplicate_keys();
        let mut obj = Object::new();
        self.members(Self::string, |p, key, key_index| {
            p.value().and_then(|value| {
                insert(&mut obj, key, value, strategy, Value::is_null)
                    .map_err(|kind| Error::new(key_index, kind))
            })
        })?;
        Ok(Value::Object(obj))
    }

    /// Parse a value of the given shape.
    pub(crate) fn typed(&mut self, shape: &JsonShape) -> Result<Typed, Error> {
        match shape {
            JsonShape::Scalar(s) => self.scalar(*s).map(Typed::Value),
            JsonShape::Record(r) => self.record(r).map(Typed::Record),
            JsonShape::Compound(Container::Optional, inner) => self.optional(inner),
            JsonShape::Compound(Container::List, inner) => self.list(inner),
            JsonShape::Compound(Container::Map, inner) => self.map(inner),
        }
    }

    fn optional(&mut self, inner: &JsonShape) -> Result<Typed, Error> {
        if self.read.current() == Some(b'n') {
            self.read.literal(b"ull")?;
            return Ok(Typed::Optional(None));
        }
        self.typed(inner).map(|t| Typed::Optional(Some(Box::new(t))))
    }

    fn list(&mut self, inner: &JsonShape) -> Result<Typed, Error> {
        self.read.expect_byte(b'[', Expect::Array)?;
        let mut items = Vec::new();
        self.seq(|p| p.typed(inner).map(|t| items.push(t)))?;
        Ok(Typed::List(items))
    }

    fn map(&mut self, inner: &JsonShape) -> Result<Typed, Error> {
        self.read.expect_byte(b'{', Expect::Object)?;
        let strategy = self.config.duplicate_keys();
        let mut map = IndexMap::new();
        self.members(Self::string, |p, key, key_index| {
            p.typed(inner).and_then(|value| {
                insert(&mut map, key, value, strategy, Typed::is_null)
                    .map_err(|kind| Error::new(key_index, kind))
            })
        })?;
        Ok(Typed::Map(map))
    }

    fn scalar(&mut self, scalar: Scalar) -> Result<Value, Error> {
        let number = |n: Number| -> Number {
            match scalar {
                Scalar::Int32 => Number::Int32(n.as_i32()),
                Scalar::Int64 => Number::Int64(n.as_i64()),
                Scalar::Double => Number::Double(n.as_f64()),
                _ => n,
            }
        };
        match (scalar, self.read.current()) {
            (Scalar::Any, _) => self.value(),
            (Scalar::String, _) => self.string().map(Value::String),
            (Scalar::Bool, Some(b't' | b'f')) | (Scalar::Null, Some(b'n')) => self.null_or_bool(),
            (Scalar::Bool, _) => self.unexpected(Expect::Bool),
            (Scalar::Null, _) => self.unexpected(Expect::Null),
            (_, Some(b'-' | b'0'..=b'9')) => Ok(Value::Number(number(self.read.number()?))),
            _ => self.unexpected(Expect::Number),
        }
    }

    /// Assemble an object into a registered record type.
    fn record(&mut self, record: &RecordType) -> Result<Box<dyn Any>, Error> {
        let registry = self.registry;
        let desc = match registry.get(record.id()) {
            Some(desc) => desc,
            None => return Err(self.error(Kind::Unmapped(record.name()))),
        };
        self.read.expect_byte(b'{', Expect::Object)?;
        trace!("assembling {}", record.name());

        let mut slots = Slots::new(record.name(), desc, self.config.duplicate_keys());
        let end = self.members(
            |p| p.field_key(desc),
            |p, key, key_index| p.field(&mut slots, key, key_index),
        )?;
        slots.construct(end)
    }

    /// Parse a record key whose `"` is current.
    fn field_key(&mut self, desc: &TypeDescriptor) -> Result<Key, Error> {
        self.read.str_bytes(self.buffer)?;
        Ok(desc.interner().intern(self.buffer.as_bytes()))
    }

    /// Parse the value of a record member into its slot.
    fn field(&mut self, slots: &mut Slots, key: Key, key_index: usize) -> Result<(), Error> {
        slots.see(key.name());
        let (id, name) = match key {
            Key::Field(id, name) => (id, name),
            Key::Other(name) => {
                trace!("skipping unknown key {:?} of {}", name, slots.type_name);
                return self.ignore();
            }
        };
        let desc = slots.desc;
        let value = self.typed(&desc.field(id).shape);
        let value = value.map_err(|e| Error {
            index: e.index,
            kind: Kind::InvalidValueForKey {
                key: name.to_string(),
                source: Box::new(e),
            },
        })?;
        slots.set(id, &name, value, key_index)
    }
}

#[derive(Clone, Copy)]
enum Bracket {
    Square,
    Curly,
}

impl Bracket {
    fn close(self) -> u8 {
        match self {
            Self::Square => b']',
            Self::Curly => b'}',
        }
    }

    fn separator(self) -> Expect {
        match self {
            Self::Square => Expect::CommaOrRSquare,
            Self::Curly => Expect::CommaOrRCurly,
        }
    }

    fn unterminated(self) -> Kind {
        match self {
            Self::Square => Kind::UnterminatedArray,
            Self::Curly => Kind::UnterminatedObject,
        }
    }
}

/// Field values of a record that is being assembled.
struct Slots<'d> {
    type_name: &'static str,
    desc: &'d TypeDescriptor,
    strategy: DuplicateKeyStrategy,
    values: Vec<Option<Typed>>,
    /// keys in the order they were first seen
    keys: IndexSet<String>,
}

impl<'d> Slots<'d> {
    fn new(type_name: &'static str, desc: &'d TypeDescriptor, strategy: DuplicateKeyStrategy) -> Self {
        Self {
            type_name,
            desc,
            strategy,
            values: desc.fields().iter().map(|_| None).collect(),
            keys: IndexSet::new(),
        }
    }

    fn see(&mut self, key: &str) {
        if !self.keys.contains(key) {
            self.keys.insert(key.to_string());
        }
    }

    /// Store the value of a field.
    ///
    /// An empty optional is a value, only an explicit `null` is not.
    fn set(&mut self, id: FieldId, name: &str, value: Typed, key_index: usize) -> Result<(), Error> {
        let slot = &mut self.values[id.index()];
        match (slot.as_ref(), self.strategy) {
            (Some(prev), DuplicateKeyStrategy::Fail) if !matches!(prev, Typed::Value(Value::Null)) => {
                Err(Error::new(key_index, Kind::DuplicateKey(name.to_string())))
            }
            (Some(_), DuplicateKeyStrategy::KeepFirst) => Ok(()),
            _ => {
                *slot = Some(value);
                Ok(())
            }
        }
    }

    /// Run the most specific constructor whose parameters are all present.
    ///
    /// `end` is the index of the closing `}`.
    fn construct(self, end: usize) -> Result<Box<dyn Any>, Error> {
        let Self { type_name, desc, mut values, keys, .. } = self;
        let filled = |id: FieldId| values[id.index()].is_some();
        let ctor = match desc.constructors().iter().find(|c| c.is_satisfied(filled)) {
            Some(ctor) => ctor,
            None => {
                let keys = keys.into_iter().collect();
                return Err(Error::new(end, Kind::NoMatchingConstructor { type_name, keys }));
            }
        };
        trace!("constructing {}", ctor.signature());

        let args = ctor.params().iter().map(|p| {
            let value = values[p.field.index()].take();
            let value = value.or_else(|| p.optional.then_some(Typed::Optional(None)));
            (desc.field(p.field).name.clone(), value)
        });
        let mut args = Args::new(args.collect());
        ctor.construct(&mut args)
            .map_err(|source| Error::new(end, Kind::Construct { type_name, source }))
    }
}
