//! Digest enrichment for password records.

use md5::Md5;
use sha1::Sha1;
use sha2::{Digest, Sha256};

/// The three digest representations stored alongside every record.
///
/// All digests are lowercase hex over the key's bytes: MD5 (32 chars),
/// SHA-1 (40 chars), SHA-256 (64 chars).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigestSet {
    /// MD5 digest, 32 hex characters.
    pub md5: String,
    /// SHA-1 digest, 40 hex characters.
    pub sha1: String,
    /// SHA-256 digest, 64 hex characters.
    pub sha256: String,
}

impl DigestSet {
    /// Computes the digest triple for the given bytes.
    ///
    /// Pure and deterministic; defined for empty input.
    #[must_use]
    pub fn compute(input: &[u8]) -> Self {
        Self {
            md5: hex::encode(Md5::digest(input)),
            sha1: hex::encode(Sha1::digest(input)),
            sha256: hex::encode(Sha256::digest(input)),
        }
    }
}
