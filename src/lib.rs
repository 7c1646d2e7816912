//! Resource-bounded JSON decoder.
//!
//! This crate decodes JSON in a single forward pass,
//! either to dynamic [`Value`]s or directly to typed values,
//! including user-defined records with several constructors.
//! All resources that a document can make the decoder consume are bounded
//! (see [`Config`]), and every error carries the index of the byte where it was detected.
//!
//! # Examples
//!
//! ## Parsing strings to values
//!
//! ~~~
//! use safeson::{Decoder, Number, Value};
//!
//! let json = r#"[null, true, "hello", 4000000000, 3.25, {"x": 1, "y": 2}]"#;
//! let value = Decoder::new().parse(json).unwrap();
//!
//! let arr = value.as_array().unwrap();
//! assert_eq!(arr[1], Value::Bool(true));
//! // integers keep their precision, and only become doubles
//! // if they have a fraction or an exponent
//! assert_eq!(arr[3], Value::Number(Number::Int64(4000000000)));
//! assert_eq!(arr[4], Value::Number(Number::Double(3.25)));
//! // objects preserve the order of their keys
//! let keys: Vec<_> = arr[5].as_object().unwrap().keys().collect();
//! assert_eq!(keys, ["x", "y"]);
//! ~~~
//!
//! ## Errors
//!
//! ~~~
//! use safeson::{Decoder, Error, Expect, Kind};
//!
//! let err = Decoder::new().parse(r#"{"a": 1 "b": 2}"#).unwrap_err();
//! assert_eq!(err, Error::new(8, Kind::Token(Expect::CommaOrRCurly, b'"')));
//! assert_eq!(
//!     err.to_string(),
//!     r#"JSON parsing error at index 8: expected ',' or '}' but got '"'"#
//! );
//! ~~~
//!
//! ## Parsing files and streams
//!
//! Input can be read from slices as well as from iterators over fallible bytes.
//! The following example reads JSON from a file if an argument is given,
//! otherwise from standard input:
//!
//! ~~~ no_run
//! use safeson::{Decoder, IterScanner, SliceScanner};
//! use std::io::Read;
//!
//! let mut decoder = Decoder::new();
//! let value = if let Some(filename) = std::env::args().nth(1) {
//!     let file = std::fs::read(filename).expect("read file");
//!     decoder.parse_reader(&mut SliceScanner::new(&file))
//! } else {
//!     let stdin = std::io::BufReader::new(std::io::stdin());
//!     decoder.parse_reader(&mut IterScanner::new(stdin.bytes()))
//! };
//! println!("{} top-level entries", value.expect("parse").len());
//! ~~~
//!
//! ## Typed decoding
//!
//! Any type implementing [`Field`] can be decoded directly,
//! without building a [`Value`] first.
//! Record types implement [`Record`] and have to be registered;
//! see the [`registry`] module.
//!
//! ~~~
//! use std::collections::BTreeMap;
//! let mut decoder = safeson::Decoder::new();
//! let m: BTreeMap<String, Vec<Option<f64>>> = decoder.parse_as(r#"{"a": [1, null]}"#).unwrap();
//! assert_eq!(m["a"], [Some(1.0), None]);
//! ~~~

#![forbid(unsafe_code)]
#![warn(missing_docs)]

macro_rules! impl_from {
    ($from:ty, $to:ty, $proj:expr) => {
        impl From<$from> for $to {
            fn from(x: $from) -> Self {
                $proj(x)
            }
        }
    };
}

mod buffer;
mod decoder;
mod ignore;
mod parse;
mod read;

pub mod config;
pub mod escape;
pub mod intern;
pub mod num;
pub mod registry;
pub mod shape;
pub mod str;
pub mod token;
pub mod value;

#[cfg(feature = "serde")]
pub mod serde;

pub use config::{Config, ConfigBuilder, DuplicateKeyStrategy};
pub use decoder::Decoder;
pub use num::Number;
pub use read::{IterScanner, Read, SliceScanner};
pub use registry::{ArgError, Args, Constructor, Record, Registry};
pub use shape::{Field, JsonShape, Typed};
pub use token::Expect;
pub use value::{Object, Value};

/// Decoding error, with the index of the byte where it was detected.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("JSON parsing error at index {index}: {kind}")]
pub struct Error {
    /// 0-based byte index
    pub index: usize,
    /// what went wrong
    pub kind: Kind,
}

impl Error {
    /// Create a new error.
    pub fn new(index: usize, kind: impl Into<Kind>) -> Self {
        Self {
            index,
            kind: kind.into(),
        }
    }
}

/// Kind of decoding error.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Kind {
    /// `nul`, `[1,,` or `[}`
    #[error("invalid literal")]
    Literal,
    /// we did not get a character that we expected
    #[error("expected {0} but got '{}'", char::from(*.1))]
    Token(Expect, u8),
    /// end of input where a value was expected
    #[error("unexpected end of input")]
    Eof,
    /// string lexing has failed
    #[error(transparent)]
    Str(#[from] str::Error),
    /// number lexing has failed
    #[error(transparent)]
    Num(#[from] num::Error),
    /// `{"a": 1`
    #[error("unterminated object")]
    UnterminatedObject,
    /// `[1, 2`
    #[error("unterminated array")]
    UnterminatedArray,
    /// `{}}`
    #[error("illegal trailing content '{}'", char::from(*.0))]
    TrailingContent(u8),
    /// too many consecutive whitespace bytes
    #[error("too much whitespace")]
    Whitespace,
    /// too deeply nested arrays and objects
    #[error("recursion limit exceeded")]
    Depth,
    /// `{"a": 1, "a": 2}`
    #[error("duplicate key \"{0}\"")]
    DuplicateKey(String),
    /// the underlying source failed
    #[error("unable to read input")]
    Read,
    /// record type that is not in the registry of the decoder
    #[error("type {0} is not registered")]
    Unmapped(&'static str),
    /// target type without JSON shape
    #[error(transparent)]
    Shape(#[from] shape::ShapeError),
    /// decoded value that does not fit the target type
    #[error(transparent)]
    Mismatch(#[from] shape::Mismatch),
    /// no constructor of a record type has all its parameters
    #[error("no constructor of {type_name} matches keys {keys:?}")]
    NoMatchingConstructor {
        /// record type
        type_name: &'static str,
        /// keys in the order they were first seen
        keys: Vec<String>,
    },
    /// value that could not be decoded to its field
    #[error("invalid value for key \"{key}\": {}", .source.kind)]
    InvalidValueForKey {
        /// object key
        key: String,
        /// underlying error
        source: Box<Error>,
    },
    /// constructor that rejected its arguments
    #[error("cannot construct {type_name}: {source}")]
    Construct {
        /// record type
        type_name: &'static str,
        /// reason
        source: ArgError,
    },
}

impl_from!(escape::Error, Kind, |e| Kind::Str(str::Error::Escape(e)));

impl Kind {
    /// Return the innermost kind, looking through [`Kind::InvalidValueForKey`].
    pub fn root(&self) -> &Kind {
        match self {
            Kind::InvalidValueForKey { source, .. } => source.kind.root(),
            kind => kind,
        }
    }
}
