//! Strings.

use crate::buffer::Buffer;
use crate::{escape, Error as JsonError, Expect, Kind};

/// String lexing error.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// raw byte below 0x20
    #[error("illegal control character {0:#04x} in string")]
    Control(u8),
    /// `0xFF` never occurs in UTF-8
    #[error("illegal codepoint: {0:x}")]
    IllegalByte(u8),
    /// escape sequence lexing failed
    #[error(transparent)]
    Escape(#[from] escape::Error),
    /// end of input before the closing quote
    #[error("unterminated string")]
    Eof,
    /// string does not fit into the maximal string length
    #[error("string too long")]
    TooLong,
}

/// String lexing.
pub trait Lex: escape::Lex {
    /// Decode the string starting at the current `"` into `buf`,
    /// and move past its closing quote.
    fn str_bytes(&mut self, buf: &mut Buffer) -> Result<(), JsonError> {
        match self.current() {
            Some(b'"') => (),
            Some(c) => return Err(self.error(Kind::Token(Expect::Quote, c))),
            None => return Err(self.error(Error::Eof)),
        }

        buf.clear();
        loop {
            let c = self.advance().ok_or_else(|| self.error(Error::Eof))?;
            buf.reserve().map_err(|e| self.error(e))?;
            match c {
                b'"' => break,
                b'\\' => {
                    let next = self.advance().ok_or_else(|| self.error(Error::Eof))?;
                    let c = self.escape(next)?;
                    buf.push_char(c)
                }
                0xFF => return Err(self.error(Error::IllegalByte(c))),
                0x00..=0x1F => return Err(self.error(Error::Control(c))),
                c => buf.push(c),
            }
        }
        self.advance();
        Ok(())
    }

    /// Decode a string into a fresh [`String`].
    fn str_string(&mut self, buf: &mut Buffer) -> Result<String, JsonError> {
        self.str_bytes(buf)?;
        Ok(buf.to_string_lossy())
    }
}

impl<T> Lex for T where T: escape::Lex {}
