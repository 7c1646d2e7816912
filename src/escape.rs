//! Escape sequences.

use crate::{Error as JsonError, Kind, Read};

/// Escape literal, such as `\n`.
pub enum Lit {
    /// `\"`
    QuotationMark,
    /// `\\`
    ReverseSolidus,
    /// `\/`
    Solidus,
    /// `\b`
    Backspace,
    /// `\f`
    FormFeed,
    /// `\n`
    LineFeed,
    /// `\t`
    Tab,
    /// `\r`
    CarriageReturn,
}

impl Lit {
    /// Try to interpret an ASCII character as first character of an escape sequence.
    pub fn try_from(c: u8) -> Option<Self> {
        use Lit::*;
        Some(match c {
            b'"' => QuotationMark,
            b'\\' => ReverseSolidus,
            b'/' => Solidus,
            b'b' => Backspace,
            b'f' => FormFeed,
            b'n' => LineFeed,
            b'r' => CarriageReturn,
            b't' => Tab,
            _ => return None,
        })
    }

    /// Return the byte that the escape sequence stands for.
    pub fn as_u8(&self) -> u8 {
        use Lit::*;
        match self {
            QuotationMark => 0x22,
            ReverseSolidus => 0x5C,
            Solidus => 0x2F,
            Backspace => 0x08,
            FormFeed => 0x0C,
            LineFeed => 0x0A,
            CarriageReturn => 0x0D,
            Tab => 0x09,
        }
    }
}

/// Parse a hexadecimal digit.
pub(crate) fn decode_hex(val: u8) -> Option<u8> {
    match val {
        b'0'..=b'9' => Some(val - b'0'),
        b'a'..=b'f' => Some(val - b'a' + 10),
        b'A'..=b'F' => Some(val - b'A' + 10),
        _ => None,
    }
}

/// Escape sequence lexing error.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// `\x` or `\U`
    #[error("illegal escaped character '{}'", char::from(*.0))]
    InvalidKind(u8),
    /// `\u000X`
    #[error("illegal hex digit '{}'", char::from(*.0))]
    InvalidHex(u8),
    /// `\uDC37` without preceding high surrogate, or `\uD801A`
    #[error("invalid code unit {0:#06x}")]
    InvalidCodeUnit(u16),
    /// `\uD801` followed by anything but `\u`
    #[error("expected low surrogate")]
    ExpectedLowSurrogate,
    /// `\u00`
    #[error("unterminated unicode sequence")]
    Eof,
}

/// Escape sequence lexing.
pub trait Lex: Read {
    /// Read the four hexadecimal digits that follow a current `u`.
    ///
    /// Afterwards, the last digit is current.
    fn hex4(&mut self) -> Result<u16, JsonError> {
        let mut hex = 0;
        for _ in 0..4 {
            let h = self.advance().ok_or_else(|| self.error(Error::Eof))?;
            let h = decode_hex(h).ok_or_else(|| self.error(Error::InvalidHex(h)))?;
            hex = (hex << 4) | u16::from(h);
        }
        Ok(hex)
    }

    /// Given a high surrogate, read a `\u` low surrogate and combine them.
    fn low_surrogate(&mut self, high: u16) -> Result<u32, JsonError> {
        if self.advance() != Some(b'\\') || self.advance() != Some(b'u') {
            return Err(self.error(Error::ExpectedLowSurrogate));
        }
        match self.hex4()? {
            low @ 0xDC00..=0xDFFF => {
                let high = u32::from(high - 0xD800);
                let low = u32::from(low - 0xDC00);
                Ok(((high << 10) | low) + 0x10000)
            }
            low => Err(code_unit_error(self, low)),
        }
    }

    /// Convert an escape sequence, such as `\n` or `\u0009`, to a char,
    /// potentially reading more.
    ///
    /// The character after `\` must be current,
    /// and the last character of the sequence is current afterwards.
    fn escape(&mut self, c: u8) -> Result<char, JsonError> {
        if c == b'u' {
            let u = match self.hex4()? {
                high @ 0xD800..=0xDBFF => self.low_surrogate(high)?,
                low @ 0xDC00..=0xDFFF => return Err(code_unit_error(self, low)),
                u => u.into(),
            };
            // all surrogates have been handled above
            return char::from_u32(u).ok_or_else(|| self.error(Kind::Literal));
        }
        Lit::try_from(c)
            .map(|lit| char::from(lit.as_u8()))
            .ok_or_else(|| self.error(Error::InvalidKind(c)))
    }
}

impl<T> Lex for T where T: Read {}

/// Report an invalid code unit at the `u` of its escape sequence.
fn code_unit_error<R: Read + ?Sized>(read: &R, unit: u16) -> JsonError {
    let index = read.index().saturating_sub(4);
    JsonError::new(index, Error::InvalidCodeUnit(unit))
}
