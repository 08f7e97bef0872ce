//! Store configuration.

use crate::partition::DEFAULT_SPECIAL_CHARS;

/// Configuration for opening a store.
#[derive(Debug, Clone)]
pub struct Config {
    /// Whether to create the top-level directories if they don't exist.
    pub create_if_missing: bool,

    /// Maximum number of records in a segment file before rotation.
    pub segment_capacity: usize,

    /// Characters whose presence as a leading character routes a record
    /// to the `SPECIAL` partition.
    pub special_chars: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            create_if_missing: true,
            segment_capacity: 10_000,
            special_chars: DEFAULT_SPECIAL_CHARS.to_string(),
        }
    }
}

impl Config {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether to create the top-level directories if missing.
    #[must_use]
    pub const fn create_if_missing(mut self, value: bool) -> Self {
        self.create_if_missing = value;
        self
    }

    /// Sets the maximum number of records per segment file.
    #[must_use]
    pub const fn segment_capacity(mut self, capacity: usize) -> Self {
        self.segment_capacity = capacity;
        self
    }

    /// Sets the special-character set.
    #[must_use]
    pub fn special_chars(mut self, chars: impl Into<String>) -> Self {
        self.special_chars = chars.into();
        self
    }
}
