//! Growable string buffer.

use crate::str::Error;
use log::debug;

/// Capacity that a fresh buffer starts with, unless the maximum is smaller.
const INITIAL_CAPACITY: usize = 1024;

/// Worst-case number of bytes that a single escape sequence can append.
const HEADROOM: usize = 6;

/// Byte buffer that strings are decoded into.
///
/// The buffer is owned by a decoder and reused for every string it decodes.
/// Its capacity doubles whenever fewer than [`HEADROOM`] bytes remain free,
/// but never beyond the configured maximum string length.
#[derive(Debug)]
pub struct Buffer {
    bytes: Vec<u8>,
    capacity: usize,
    max: usize,
}

impl Buffer {
    /// Create a buffer for strings of at most `max` bytes.
    pub(crate) fn new(max: usize) -> Self {
        let capacity = INITIAL_CAPACITY.min(max);
        Self {
            bytes: Vec::with_capacity(capacity),
            capacity,
            max,
        }
    }

    /// Make room for one more byte of input.
    pub(crate) fn reserve(&mut self) -> Result<(), Error> {
        if self.bytes.len() + 1 + HEADROOM < self.capacity {
            return Ok(());
        }
        if self.capacity >= self.max {
            return Err(Error::TooLong);
        }
        self.capacity = self.capacity.saturating_mul(2).min(self.max);
        debug!("growing string buffer to {} bytes", self.capacity);
        self.bytes.reserve(self.capacity - self.bytes.len());
        Ok(())
    }

    pub(crate) fn clear(&mut self) {
        self.bytes.clear()
    }

    pub(crate) fn push(&mut self, b: u8) {
        self.bytes.push(b)
    }

    pub(crate) fn push_char(&mut self, c: char) {
        self.bytes
            .extend_from_slice(c.encode_utf8(&mut [0; 4]).as_bytes())
    }

    /// Decoded bytes of the last string.
    pub(crate) fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Convert the decoded bytes to a string,
    /// replacing invalid UTF-8 sequences with U+FFFD.
    pub(crate) fn to_string_lossy(&self) -> String {
        String::from_utf8_lossy(&self.bytes).into_owned()
    }

    #[cfg(test)]
    fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grows_up_to_max() {
        let mut buf = Buffer::new(2048);
        assert_eq!(buf.capacity(), 1024);
        for _ in 0..1017 {
            buf.reserve().unwrap();
            buf.push(b'a');
        }
        assert_eq!(buf.capacity(), 1024);
        buf.reserve().unwrap();
        assert_eq!(buf.capacity(), 2048);
    }

    #[test]
    fn small_max() {
        let mut buf = Buffer::new(16);
        assert_eq!(buf.capacity(), 16);
        for _ in 0..9 {
            buf.reserve().unwrap();
            buf.push(b'a');
        }
        assert_eq!(buf.reserve(), Err(Error::TooLong));
    }
}
