//! Partition resolution from a record's leading character.
//!
//! Every record belongs to exactly one partition, chosen by its first
//! character:
//!
//! ```text
//! Index/
//! ├─ SPECIAL/        # leading char in the special set
//! ├─ A/              # upper-case (and caseless) chars live at the top
//! │  └─ a/           # lower-case chars nest under their upper-case form
//! └─ 5/
//! ```
//!
//! The nesting asymmetry determines where segment files live and must not
//! change: lookups derive the same path from the query's first character.

use crate::error::{StoreError, StoreResult};
use std::fmt;
use std::path::PathBuf;

/// Characters routed to the `SPECIAL` partition by default.
///
/// A fixed set, not locale-driven: punctuation, symbols, a few accented
/// letters, and ASCII whitespace.
pub const DEFAULT_SPECIAL_CHARS: &str = "!@#$%^&*(),.?\":{}|<>_-;+=~\u{d1}\u{d0}\u{ef}`[]\\/ \t\r";

/// Directory and file-name label of the special partition.
pub const SPECIAL_TAG: &str = "SPECIAL";

/// Identifies the partition a record belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PartitionTag {
    /// The leading character was in the configured special set.
    Special,
    /// Any other leading character; the character itself is the tag.
    Char(char),
}

impl PartitionTag {
    /// Resolves the partition for a leading character.
    #[must_use]
    pub fn resolve(first: char, special_chars: &str) -> Self {
        if special_chars.contains(first) {
            Self::Special
        } else {
            Self::Char(first)
        }
    }

    /// Resolves the partition for a whole key.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::EmptyKey`] if the key has no characters.
    pub fn for_key(key: &str, special_chars: &str) -> StoreResult<Self> {
        key.chars()
            .next()
            .map(|first| Self::resolve(first, special_chars))
            .ok_or(StoreError::EmptyKey)
    }

    /// The label used in segment file names (`<label>-<seq>.txt`).
    #[must_use]
    pub fn label(&self) -> String {
        self.to_string()
    }

    /// Relative path of this partition's directory under `Index/`.
    ///
    /// Upper-case and caseless characters map directly to `<char>/`;
    /// lower-case characters map to `<UPPER>/<char>/`.
    #[must_use]
    pub fn relative_dir(&self) -> PathBuf {
        match self {
            Self::Special => PathBuf::from(SPECIAL_TAG),
            Self::Char(c) => {
                let upper: String = c.to_uppercase().collect();
                if upper == c.to_string() {
                    PathBuf::from(upper)
                } else {
                    PathBuf::from(upper).join(c.to_string())
                }
            }
        }
    }
}

impl fmt::Display for PartitionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Special => f.write_str(SPECIAL_TAG),
            Self::Char(c) => write!(f, "{c}"),
        }
    }
}
