//! Bounded append-only segment files.
//!
//! Each partition owns an ordered sequence of segment files named
//! `<tag>-<sequence>.txt`, sequence numbers starting at 0. Only the
//! highest-sequence segment ever receives appends; when it reaches capacity
//! a fresh segment becomes the active one. Sealed segments are immutable
//! and are never deleted or merged.

mod scan;
mod store;

pub use scan::{PartitionScan, ScannedRecord};
pub use store::SegmentStore;

use crate::partition::PartitionTag;
use std::fmt;

/// File extension of segment files.
pub const SEGMENT_EXTENSION: &str = "txt";

/// Identifies one segment file within a partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SegmentId {
    tag: PartitionTag,
    sequence: u32,
}

impl SegmentId {
    /// Creates a segment id.
    #[must_use]
    pub const fn new(tag: PartitionTag, sequence: u32) -> Self {
        Self { tag, sequence }
    }

    /// Returns the owning partition's tag.
    #[must_use]
    pub const fn tag(self) -> PartitionTag {
        self.tag
    }

    /// Returns the sequence number, monotonic per partition.
    #[must_use]
    pub const fn sequence(self) -> u32 {
        self.sequence
    }

    /// Returns the segment's file name, `<tag>-<sequence>.txt`.
    #[must_use]
    pub fn file_name(self) -> String {
        format!("{}-{}.{}", self.tag, self.sequence, SEGMENT_EXTENSION)
    }
}

impl fmt::Display for SegmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.file_name())
    }
}
