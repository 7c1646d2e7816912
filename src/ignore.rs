//! Discarding values.
//!
//! Discarded values are validated like any other value and count towards
//! all limits, but no values are built for them.
//! Repeated keys in discarded objects are not detected.

use crate::parse::Parser;
use crate::{num::Lex as _, str::Lex as _, token::Lex as _};
use crate::{Error, Kind, Read};

impl<'a, R: Read> Parser<'a, R> {
    /// Parse and discard a value.
    pub(crate) fn ignore(&mut self) -> Result<(), Error> {
        match self.read.current() {
            Some(b'"') => self.read.str_bytes(self.buffer),
            Some(b'n' | b't' | b'f') => self.read.null_or_bool().map(|_| ()),
            Some(b'-' | b'0'..=b'9') => self.read.number().map(|_| ()),
            Some(b'[') => self.seq(Self::ignore),
            Some(b'{') => self
                .members(|p| p.read.str_bytes(p.buffer), |p, (), _| p.ignore())
                .map(|_| ()),
            Some(_) => Err(self.error(Kind::Literal)),
            None => Err(self.error(Kind::Eof)),
        }
    }
}
