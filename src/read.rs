//! Byte scanners.

use crate::{Error, Kind};

/// Low-level input operations.
///
/// A scanner holds a *current* byte, which is `None` at the end of input,
/// and the 0-based index of that byte.
/// Reading past the end does not move the index,
/// so errors detected at the end of input point at the last byte read.
pub trait Read {
    /// Read the next byte and make it the current one.
    fn advance(&mut self) -> Option<u8>;

    /// Return the current byte, or `None` at the end of input.
    fn current(&self) -> Option<u8>;

    /// Return the index of the current byte.
    fn index(&self) -> usize;

    /// Return `true` if [`Read::advance`] has been called at least once.
    fn started(&self) -> bool;

    /// Return `true` if the underlying source failed to deliver a byte.
    fn failed(&self) -> bool {
        false
    }

    /// Construct an error at the index of the current byte.
    fn error(&self, kind: impl Into<Kind>) -> Error {
        Error::new(self.index(), kind)
    }
}

/// Scanner over a shared byte slice.
pub struct SliceScanner<'a> {
    slice: &'a [u8],
    reads: usize,
    current: Option<u8>,
    started: bool,
}

impl<'a> SliceScanner<'a> {
    /// Create a new slice scanner.
    pub fn new(slice: &'a [u8]) -> Self {
        Self {
            slice,
            reads: 0,
            current: None,
            started: false,
        }
    }
}

impl<'a> Read for SliceScanner<'a> {
    fn advance(&mut self) -> Option<u8> {
        self.started = true;
        self.current = self.slice.get(self.reads).copied();
        if self.current.is_some() {
            self.reads += 1;
        }
        self.current
    }

    fn current(&self) -> Option<u8> {
        self.current
    }

    fn index(&self) -> usize {
        self.reads.saturating_sub(1)
    }

    fn started(&self) -> bool {
        self.started
    }
}

/// Scanner over an iterator of fallible bytes.
///
/// Once the iterator has yielded an error,
/// the scanner behaves as if the input had ended.
///
/// ~~~
/// use std::io::Read as _;
/// let input = std::io::Cursor::new(br#"{"a": [1, 2]}"#);
/// let mut scanner = safeson::IterScanner::new(std::io::BufReader::new(input).bytes());
/// let value = safeson::Decoder::new().parse_reader(&mut scanner).unwrap();
/// assert_eq!(value.len(), 1);
/// ~~~
pub struct IterScanner<E, I> {
    bytes: I,
    reads: usize,
    current: Option<u8>,
    started: bool,
    /// error occurred during reading a byte
    pub error: Option<E>,
}

impl<E, I: Iterator<Item = Result<u8, E>>> IterScanner<E, I> {
    /// Create a new iterator scanner.
    pub fn new(iter: I) -> Self {
        Self {
            bytes: iter,
            reads: 0,
            current: None,
            started: false,
            error: None,
        }
    }
}

impl<E, I: Iterator<Item = Result<u8, E>>> Read for IterScanner<E, I> {
    fn advance(&mut self) -> Option<u8> {
        self.started = true;
        if self.error.is_some() {
            self.current = None;
            return None;
        }
        self.current = match self.bytes.next() {
            Some(Ok(b)) => {
                self.reads += 1;
                Some(b)
            }
            Some(Err(e)) => {
                self.error = Some(e);
                None
            }
            None => None,
        };
        self.current
    }

    fn current(&self) -> Option<u8> {
        self.current
    }

    fn index(&self) -> usize {
        self.reads.saturating_sub(1)
    }

    fn started(&self) -> bool {
        self.started
    }

    fn failed(&self) -> bool {
        self.error.is_some()
    }
}
