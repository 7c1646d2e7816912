//! Whitespace, literals, and structural characters.

use crate::{Error, Kind, Read};

/// What we expected to get, but did not get.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Expect {
    /// `{0: 1}`
    Quote,
    /// `{"a" 1}`
    Colon,
    /// `{"a": 1 2}`
    CommaOrRCurly,
    /// `[1 2]`
    CommaOrRSquare,
    /// `]` where an object was declared
    Object,
    /// `}` where a list was declared
    Array,
    /// `"true"` where a boolean was declared
    Bool,
    /// `0` where null was declared
    Null,
    /// `"1"` where a number was declared
    Number,
}

impl core::fmt::Display for Expect {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        use Expect::*;
        match self {
            Quote => "'\"'".fmt(f),
            Colon => "':'".fmt(f),
            CommaOrRCurly => "',' or '}'".fmt(f),
            CommaOrRSquare => "',' or ']'".fmt(f),
            Object => "object".fmt(f),
            Array => "array".fmt(f),
            Bool => "boolean".fmt(f),
            Null => "null".fmt(f),
            Number => "number".fmt(f),
        }
    }
}

/// Lexing of everything that is neither a string nor a number.
pub trait Lex: Read {
    /// Skip whitespace, starting from the current byte,
    /// and return the first byte that is not whitespace.
    ///
    /// More than `max` consecutive whitespace bytes are rejected
    /// at the index of the first byte beyond the limit.
    fn skip_whitespace(&mut self, max: usize) -> Result<Option<u8>, Error> {
        let mut run = 0;
        while let Some(b' ' | b'\t' | b'\r' | b'\n') = self.current() {
            run += 1;
            if run > max {
                return Err(self.error(Kind::Whitespace));
            }
            self.advance();
        }
        Ok(self.current())
    }

    /// Match the remainder of a literal whose first byte is current,
    /// such as `rue` for `true`, and move past it.
    fn literal(&mut self, rest: &[u8]) -> Result<(), Error> {
        for expected in rest {
            match self.advance() {
                Some(c) if c == *expected => continue,
                _ => return Err(self.error(Kind::Literal)),
            }
        }
        self.advance();
        Ok(())
    }

    /// Parse `null`, `true`, or `false`, depending on the current byte.
    fn null_or_bool(&mut self) -> Result<Option<bool>, Error> {
        match self.current() {
            Some(b'n') => self.literal(b"ull").map(|()| None),
            Some(b't') => self.literal(b"rue").map(|()| Some(true)),
            Some(b'f') => self.literal(b"alse").map(|()| Some(false)),
            _ => Err(self.error(Kind::Literal)),
        }
    }

    /// Succeed if the current byte is `c`, else fail with `expect`.
    fn expect_byte(&self, c: u8, expect: Expect) -> Result<(), Error> {
        match self.current() {
            Some(cur) if cur == c => Ok(()),
            Some(cur) => Err(self.error(Kind::Token(expect, cur))),
            None => Err(self.error(Kind::Eof)),
        }
    }
}

impl<T> Lex for T where T: Read {}
