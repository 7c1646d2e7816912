//! Decoding entry points.

use crate::buffer::Buffer;
use crate::config::Config;
use crate::parse::Parser;
use crate::registry::Registry;
use crate::shape::{Field, JsonShape, Typed};
use crate::token::Lex as _;
use crate::value::Value;
use crate::{Error, Kind, Read, SliceScanner};
use std::sync::Arc;

/// JSON decoder.
///
/// A decoder owns the buffer that strings are decoded into,
/// so it decodes one document at a time.
/// Decoders that run in parallel should each have their own instance;
/// they can share one [`Registry`].
///
/// ~~~
/// use safeson::{Decoder, Value};
///
/// let mut decoder = Decoder::new();
/// let value = decoder.parse(r#"{"a": [1, 2.5, "x", null]}"#).unwrap();
/// let a = value.get("a").unwrap();
/// assert_eq!(a.len(), 4);
/// assert_eq!(a.as_array().unwrap()[2], Value::from("x"));
/// ~~~
#[derive(Debug)]
pub struct Decoder {
    config: Config,
    registry: Arc<Registry>,
    buffer: Buffer,
}

impl Default for Decoder {
    fn default() -> Self {
        Self::with_config(Config::default())
    }
}

impl Decoder {
    /// Create a decoder with default configuration and without record types.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a decoder with the given configuration.
    pub fn with_config(config: Config) -> Self {
        Self {
            buffer: Buffer::new(config.max_string_length()),
            config,
            registry: Arc::default(),
        }
    }

    /// Use the record types of the given registry.
    pub fn with_registry(mut self, registry: impl Into<Arc<Registry>>) -> Self {
        self.registry = registry.into();
        self
    }

    /// Configuration of the decoder.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Registry of the decoder.
    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// Decode a string to a dynamic value.
    pub fn parse(&mut self, s: &str) -> Result<Value, Error> {
        self.parse_slice(s.as_bytes())
    }

    /// Decode a byte slice to a dynamic value.
    pub fn parse_slice(&mut self, bytes: &[u8]) -> Result<Value, Error> {
        self.parse_reader(&mut SliceScanner::new(bytes))
    }

    /// Decode a dynamic value from a scanner.
    ///
    /// Unless trailing content is consumed,
    /// the scanner can be passed again to decode the following value.
    pub fn parse_reader<R: Read>(&mut self, read: &mut R) -> Result<Value, Error> {
        let finish = self.config.consume_trailing_content();
        self.run(read, finish, |p| p.value())
    }

    /// Decode a string to a value of type `T`.
    pub fn parse_as<T: Field>(&mut self, s: &str) -> Result<T, Error> {
        self.parse_reader_as(&mut SliceScanner::new(s.as_bytes()))
    }

    /// Decode a value of type `T` from a scanner.
    pub fn parse_reader_as<T: Field, R: Read>(&mut self, read: &mut R) -> Result<T, Error> {
        let shape = T::shape().map_err(|e| read.error(e))?;
        let typed = self.parse_shape(read, &shape)?;
        T::from_typed(typed).map_err(|e| read.error(e))
    }

    /// Decode a value of the given shape from a scanner.
    pub fn parse_shape<R: Read>(&mut self, read: &mut R, shape: &JsonShape) -> Result<Typed, Error> {
        let finish = self.config.consume_trailing_content();
        self.run(read, finish, |p| p.typed(shape))
    }

    /// Validate a value from a scanner without building it.
    pub fn validate<R: Read>(&mut self, read: &mut R) -> Result<(), Error> {
        let finish = self.config.consume_trailing_content();
        self.run(read, finish, |p| p.ignore())
    }

    /// Decode whitespace-separated values until the end of input.
    ///
    /// Iteration stops after the first error.
    ///
    /// ~~~
    /// let mut decoder = safeson::Decoder::new();
    /// let mut scanner = safeson::SliceScanner::new(b"1 [2] {\"a\": 3}");
    /// let values: Result<Vec<_>, _> = decoder.many(&mut scanner).collect();
    /// assert_eq!(values.unwrap().len(), 3);
    /// ~~~
    pub fn many<'a, R: Read>(
        &'a mut self,
        read: &'a mut R,
    ) -> impl Iterator<Item = Result<Value, Error>> + 'a {
        let mut failed = false;
        core::iter::from_fn(move || {
            if failed {
                return None;
            }
            if !read.started() {
                read.advance();
            }
            let next = match read.skip_whitespace(self.config.max_whitespace()) {
                Ok(None) if !read.failed() => return None,
                Ok(_) => self.run(read, false, |p| p.value()),
                Err(e) => Err(e),
            };
            failed = next.is_err();
            Some(next)
        })
    }

    fn run<R: Read, T>(
        &mut self,
        read: &mut R,
        finish: bool,
        f: impl FnOnce(&mut Parser<R>) -> Result<T, Error>,
    ) -> Result<T, Error> {
        if !read.started() {
            read.advance();
        }
        let mut parser = Parser::new(read, &self.config, &self.registry, &mut self.buffer);
        let result = parser.ws().and_then(|_| f(&mut parser));
        let result = result.and_then(|v| if finish { parser.finish().map(|()| v) } else { Ok(v) });
        // a failing source looks like the end of input to the parser
        if read.failed() {
            return Err(read.error(Kind::Read));
        }
        result
    }
}
