//! Record type and its on-disk line format.
//!
//! A record serializes to one newline-terminated line:
//!
//! ```text
//! key | md5 | sha1 | sha256 | origin
//! ```
//!
//! The separator is the literal three characters space-pipe-space; the hex
//! digest alphabets can never contain it. A key that itself contains the
//! separator will be read back truncated at its first occurrence. Lookups
//! compare only the leading field, so such a key can never be matched.

use crate::digest::DigestSet;
use crate::error::{StoreError, StoreResult};

/// Field separator in serialized record lines.
pub const FIELD_SEPARATOR: &str = " | ";

/// One password record: the key, its digest triple, and where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// The password as read from an input line. Never mutated.
    pub key: String,
    /// Digest representations of `key`.
    pub digests: DigestSet,
    /// Name of the batch file that contributed the key, or the search
    /// sentinel for lookup-miss inserts.
    pub origin: String,
}

impl Record {
    /// Creates a record, computing the digest triple from the key.
    #[must_use]
    pub fn new(key: impl Into<String>, origin: impl Into<String>) -> Self {
        let key = key.into();
        let digests = DigestSet::compute(key.as_bytes());
        Self {
            key,
            digests,
            origin: origin.into(),
        }
    }

    /// Serializes the record to its line format, without the trailing
    /// newline.
    #[must_use]
    pub fn encode(&self) -> String {
        [
            self.key.as_str(),
            self.digests.md5.as_str(),
            self.digests.sha1.as_str(),
            self.digests.sha256.as_str(),
            self.origin.as_str(),
        ]
        .join(FIELD_SEPARATOR)
    }

    /// Parses a record from one stored line.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::MalformedRecord`] if the line does not split
    /// into five fields.
    pub fn decode(line: &str) -> StoreResult<Self> {
        let mut fields = line.splitn(5, FIELD_SEPARATOR);
        let (Some(key), Some(md5), Some(sha1), Some(sha256), Some(origin)) = (
            fields.next(),
            fields.next(),
            fields.next(),
            fields.next(),
            fields.next(),
        ) else {
            return Err(StoreError::malformed_record(line));
        };

        Ok(Self {
            key: key.to_string(),
            digests: DigestSet {
                md5: md5.to_string(),
                sha1: sha1.to_string(),
                sha256: sha256.to_string(),
            },
            origin: origin.to_string(),
        })
    }
}
