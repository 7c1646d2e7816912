//! Decoder configuration.
//!
//! ~~~
//! use safeson::{Config, DuplicateKeyStrategy};
//! let config = Config::builder()
//!     .max_recursion_depth(16)
//!     .duplicate_keys(DuplicateKeyStrategy::KeepLast)
//!     .build()
//!     .unwrap();
//! assert_eq!(config.max_recursion_depth(), 16);
//! assert_eq!(config.max_whitespace(), 128);
//!
//! assert!(Config::builder().max_whitespace(1).build().is_err());
//! ~~~

/// Smallest admissible maximal string length.
pub const MIN_STRING_LENGTH: usize = 16;
/// Smallest admissible maximal recursion depth.
pub const MIN_RECURSION_DEPTH: usize = 4;
/// Smallest admissible maximal whitespace run.
pub const MIN_WHITESPACE: usize = 2;

/// What to do when an object contains the same key more than once.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DuplicateKeyStrategy {
    /// Reject the object, unless the previous value was `null`.
    #[default]
    Fail,
    /// Keep the value that came first.
    KeepFirst,
    /// Keep the value that came last.
    KeepLast,
}

/// Resource limits and policies of a decoder.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    max_string_length: usize,
    max_recursion_depth: usize,
    max_whitespace: usize,
    consume_trailing_content: bool,
    duplicate_keys: DuplicateKeyStrategy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_string_length: 1024 * 1000,
            max_recursion_depth: 512,
            max_whitespace: 128,
            consume_trailing_content: true,
            duplicate_keys: DuplicateKeyStrategy::Fail,
        }
    }
}

impl Config {
    /// Start from the default configuration.
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder {
            config: Self::default(),
        }
    }

    /// Maximal number of bytes of a decoded string.
    pub fn max_string_length(&self) -> usize {
        self.max_string_length
    }

    /// Maximal number of nested arrays and objects.
    pub fn max_recursion_depth(&self) -> usize {
        self.max_recursion_depth
    }

    /// Maximal number of consecutive whitespace bytes.
    pub fn max_whitespace(&self) -> usize {
        self.max_whitespace
    }

    /// Whether anything but whitespace after a value is an error.
    ///
    /// If not, decoding stops right after the value,
    /// and the rest of the input can be decoded by subsequent calls.
    pub fn consume_trailing_content(&self) -> bool {
        self.consume_trailing_content
    }

    /// Handling of repeated object keys.
    pub fn duplicate_keys(&self) -> DuplicateKeyStrategy {
        self.duplicate_keys
    }
}

/// Builder for [`Config`].
#[derive(Clone, Debug)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the maximal number of bytes of a decoded string.
    pub fn max_string_length(mut self, n: usize) -> Self {
        self.config.max_string_length = n;
        self
    }

    /// Set the maximal number of nested arrays and objects.
    pub fn max_recursion_depth(mut self, n: usize) -> Self {
        self.config.max_recursion_depth = n;
        self
    }

    /// Set the maximal number of consecutive whitespace bytes.
    pub fn max_whitespace(mut self, n: usize) -> Self {
        self.config.max_whitespace = n;
        self
    }

    /// Set whether anything but whitespace after a value is an error.
    pub fn consume_trailing_content(mut self, consume: bool) -> Self {
        self.config.consume_trailing_content = consume;
        self
    }

    /// Set the handling of repeated object keys.
    pub fn duplicate_keys(mut self, strategy: DuplicateKeyStrategy) -> Self {
        self.config.duplicate_keys = strategy;
        self
    }

    /// Validate the limits and return the configuration.
    pub fn build(self) -> Result<Config, Error> {
        let c = self.config;
        if c.max_string_length < MIN_STRING_LENGTH {
            Err(Error::StringLength(c.max_string_length))
        } else if c.max_recursion_depth < MIN_RECURSION_DEPTH {
            Err(Error::RecursionDepth(c.max_recursion_depth))
        } else if c.max_whitespace < MIN_WHITESPACE {
            Err(Error::Whitespace(c.max_whitespace))
        } else {
            Ok(c)
        }
    }
}

/// Invalid configuration.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// maximal string length below [`MIN_STRING_LENGTH`]
    #[error("max string length must be at least {min}, got {0}", min = MIN_STRING_LENGTH)]
    StringLength(usize),
    /// maximal recursion depth below [`MIN_RECURSION_DEPTH`]
    #[error("max recursion depth must be at least {min}, got {0}", min = MIN_RECURSION_DEPTH)]
    RecursionDepth(usize),
    /// maximal whitespace run below [`MIN_WHITESPACE`]
    #[error("max whitespace must be at least {min}, got {0}", min = MIN_WHITESPACE)]
    Whitespace(usize),
}
