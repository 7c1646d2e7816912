//! Numbers.

use crate::{Error as JsonError, Read};
use core::fmt::{self, Display};

/// Number lexing error.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// `-a`, `1.e`, or `1e+x`
    #[error("invalid literal")]
    Invalid,
    /// `1.` or `1e` at the end of input
    #[error("unterminated number")]
    Eof,
}

/// Decoded number.
///
/// Integers without fraction or exponent keep their exact value as long as
/// they fit into 64 bits. Everything else is a double with about 15
/// significant digits.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Number {
    /// integer that fits into 32 bits
    Int32(i32),
    /// integer that fits into 64, but not into 32 bits
    Int64(i64),
    /// number with fraction or exponent, or integer beyond 64 bits
    Double(f64),
}

impl Number {
    /// Convert to a 32-bit integer, truncating fractions and wrapping wider integers.
    pub fn as_i32(&self) -> i32 {
        match *self {
            Self::Int32(i) => i,
            Self::Int64(i) => i as i32,
            Self::Double(d) => d as i32,
        }
    }

    /// Convert to a 64-bit integer, truncating fractions.
    pub fn as_i64(&self) -> i64 {
        match *self {
            Self::Int32(i) => i.into(),
            Self::Int64(i) => i,
            Self::Double(d) => d as i64,
        }
    }

    /// Convert to a double.
    pub fn as_f64(&self) -> f64 {
        match *self {
            Self::Int32(i) => i.into(),
            Self::Int64(i) => i as f64,
            Self::Double(d) => d,
        }
    }

    /// Return true if the number is an integer.
    pub fn is_int(&self) -> bool {
        !matches!(self, Self::Double(_))
    }

    fn from_int(negative: bool, int: u64) -> Option<Self> {
        let int = if negative {
            0i64.checked_sub_unsigned(int)?
        } else {
            i64::try_from(int).ok()?
        };
        Some(match i32::try_from(int) {
            Ok(i) => Self::Int32(i),
            Err(_) => Self::Int64(int),
        })
    }
}

impl Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Int32(i) => i.fmt(f),
            Self::Int64(i) => i.fmt(f),
            Self::Double(d) => d.fmt(f),
        }
    }
}

impl From<i32> for Number {
    fn from(i: i32) -> Self {
        Self::Int32(i)
    }
}

impl From<i64> for Number {
    fn from(i: i64) -> Self {
        match i32::try_from(i) {
            Ok(i) => Self::Int32(i),
            Err(_) => Self::Int64(i),
        }
    }
}

impl From<f64> for Number {
    fn from(d: f64) -> Self {
        Self::Double(d)
    }
}

/// Powers of ten from 1e-12 to 1e31.
#[rustfmt::skip]
const POW10: [f64; 44] = [
    1e-12, 1e-11, 1e-10, 1e-9, 1e-8, 1e-7, 1e-6, 1e-5, 1e-4, 1e-3, 1e-2, 1e-1,
    1e0, 1e1, 1e2, 1e3, 1e4, 1e5, 1e6, 1e7, 1e8, 1e9, 1e10, 1e11, 1e12, 1e13,
    1e14, 1e15, 1e16, 1e17, 1e18, 1e19, 1e20, 1e21, 1e22, 1e23, 1e24, 1e25,
    1e26, 1e27, 1e28, 1e29, 1e30, 1e31,
];

/// Return `10^exp`, using a table for common exponents.
pub fn pow10(exp: i32) -> f64 {
    match usize::try_from(i64::from(exp) + 12) {
        Ok(i) if i < POW10.len() => POW10[i],
        _ => 10f64.powi(exp),
    }
}

/// Integer part of a number.
struct Int {
    /// exact value, unless it overflowed
    exact: Option<u64>,
    /// approximate value
    approx: f64,
}

impl Int {
    fn push(&mut self, digit: u8) {
        let d = digit - b'0';
        self.exact = self.exact.and_then(|i| i.checked_mul(10)?.checked_add(d.into()));
        self.approx = self.approx * 10.0 + f64::from(d);
    }

    fn as_f64(&self) -> f64 {
        self.exact.map_or(self.approx, |i| i as f64)
    }
}

/// Number lexing.
pub trait Lex: Read {
    /// Fail unless the current byte is a digit.
    fn expect_digit(&self) -> Result<u8, JsonError> {
        match self.current() {
            Some(d @ b'0'..=b'9') => Ok(d),
            Some(_) => Err(self.error(Error::Invalid)),
            None => Err(self.error(Error::Eof)),
        }
    }

    /// Decode a number starting at the current byte.
    ///
    /// Afterwards, the first byte after the number is current.
    fn number(&mut self) -> Result<Number, JsonError> {
        let negative = self.current() == Some(b'-');
        if negative {
            self.advance();
        }

        let mut int = Int {
            exact: Some(0),
            approx: 0.0,
        };
        match self.current() {
            Some(b'0') => {
                self.advance();
            }
            Some(d @ b'1'..=b'9') => {
                int.push(d);
                while let Some(d @ b'0'..=b'9') = self.advance() {
                    int.push(d)
                }
            }
            _ => return Err(self.error(Error::Invalid)),
        }

        let mut frac = None;
        if self.current() == Some(b'.') {
            self.advance();
            self.expect_digit()?;
            let mut sum = 0.0;
            let mut pos = 0i32;
            while let Some(d @ b'0'..=b'9') = self.current() {
                pos = pos.saturating_add(1);
                sum += f64::from(d - b'0') * pow10(-pos);
                self.advance();
            }
            frac = Some(sum);
        }

        let mut exp = None;
        if let Some(b'e' | b'E') = self.current() {
            let exp_negative = self.advance() == Some(b'-');
            if let Some(b'+' | b'-') = self.current() {
                self.advance();
            }
            self.expect_digit()?;
            let mut e = 0i32;
            while let Some(d @ b'0'..=b'9') = self.current() {
                e = e.saturating_mul(10).saturating_add((d - b'0').into());
                self.advance();
            }
            exp = Some(if exp_negative { -e } else { e });
        }

        if frac.is_none() && exp.is_none() {
            if let Some(n) = int.exact.and_then(|i| Number::from_int(negative, i)) {
                return Ok(n);
            }
        }

        let mult = pow10(exp.unwrap_or(0));
        let d = int.as_f64() * mult + frac.unwrap_or(0.0) * mult;
        Ok(Number::Double(if negative { -d } else { d }))
    }
}

impl<T> Lex for T where T: Read {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Kind, SliceScanner};

    fn decode(s: &[u8]) -> Result<Number, JsonError> {
        let mut scanner = SliceScanner::new(s);
        scanner.advance();
        scanner.number()
    }

    #[test]
    fn integers() {
        assert_eq!(decode(b"0"), Ok(Number::Int32(0)));
        assert_eq!(decode(b"-0"), Ok(Number::Int32(0)));
        assert_eq!(decode(b"2147483647"), Ok(Number::Int32(i32::MAX)));
        assert_eq!(decode(b"-2147483648"), Ok(Number::Int32(i32::MIN)));
        assert_eq!(decode(b"4000000000"), Ok(Number::Int64(4_000_000_000)));
        assert_eq!(
            decode(b"-9223372036854775808"),
            Ok(Number::Int64(i64::MIN))
        );
        assert_eq!(
            decode(b"9223372036854775808"),
            Ok(Number::Double(9223372036854775808.0))
        );
        let huge = decode(b"123456789012345678901234567890").unwrap();
        assert!(!huge.is_int());
        assert!((huge.as_f64() / 1.2345678901234568e29 - 1.0).abs() < 1e-12);
    }

    #[test]
    fn doubles() {
        assert_eq!(decode(b"1.1e5"), Ok(Number::Double(110000.0)));
        assert_eq!(decode(b"1.5"), Ok(Number::Double(1.5)));
        assert_eq!(decode(b"-0.5"), Ok(Number::Double(-0.5)));
        assert_eq!(decode(b"2E+2"), Ok(Number::Double(200.0)));
        assert_eq!(decode(b"3.0"), Ok(Number::Double(3.0)));

        let big = decode(b"99E99").unwrap().as_f64();
        assert!((big / 99e99 - 1.0).abs() < 1e-12);
        let small = decode(b"99E-99").unwrap().as_f64();
        assert!((small / 99e-99 - 1.0).abs() < 1e-12);
    }

    #[test]
    fn stops_after_number() {
        let mut scanner = SliceScanner::new(b"12,");
        scanner.advance();
        assert_eq!(scanner.number(), Ok(Number::Int32(12)));
        assert_eq!(scanner.current(), Some(b','));

        let mut scanner = SliceScanner::new(b"01");
        scanner.advance();
        assert_eq!(scanner.number(), Ok(Number::Int32(0)));
        assert_eq!(scanner.current(), Some(b'1'));
    }

    #[test]
    fn errors() {
        let at = |index, e: Error| Err(JsonError::new(index, Kind::Num(e)));
        assert_eq!(decode(b"-"), at(0, Error::Invalid));
        assert_eq!(decode(b"-a"), at(1, Error::Invalid));
        assert_eq!(decode(b"1."), at(1, Error::Eof));
        assert_eq!(decode(b"1.a"), at(2, Error::Invalid));
        assert_eq!(decode(b"1e"), at(1, Error::Eof));
        assert_eq!(decode(b"1e+"), at(2, Error::Eof));
        assert_eq!(decode(b"1E-x"), at(3, Error::Invalid));
    }
}
