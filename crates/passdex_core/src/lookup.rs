//! Point lookups with insert-on-miss.

use crate::config::Config;
use crate::error::StoreResult;
use crate::layout::StoreLayout;
use crate::partition::PartitionTag;
use crate::record::Record;
use crate::segment::{SegmentId, SegmentStore};
use tracing::{debug, error};

/// Origin sentinel marking records inserted by a lookup miss.
pub const SEARCH_ORIGIN: &str = "search";

/// Result of one lookup.
#[derive(Debug)]
pub enum LookupOutcome {
    /// The key was found; the scan stopped at the match.
    Found {
        /// The matched record.
        record: Record,
        /// Segment the match was read from.
        segment: SegmentId,
        /// Lines examined, including the matching one.
        scanned: usize,
    },
    /// The key was absent from its partition.
    NotFound {
        /// The record written by the miss-insert, or `None` when the
        /// best-effort insert failed (the failure is logged, not raised).
        inserted: Option<MissInsert>,
    },
}

/// A record written by the lookup-miss fallback.
#[derive(Debug)]
pub struct MissInsert {
    /// The inserted record.
    pub record: Record,
    /// Segment the record landed in.
    pub segment: SegmentId,
}

/// Linear-scan lookups over one store.
///
/// Stateless per call: the only state read or mutated is the on-disk
/// store itself.
#[derive(Debug)]
pub struct LookupEngine<'a> {
    layout: &'a StoreLayout,
    config: &'a Config,
}

impl<'a> LookupEngine<'a> {
    /// Creates a lookup engine over the given layout.
    #[must_use]
    pub fn new(layout: &'a StoreLayout, config: &'a Config) -> Self {
        Self { layout, config }
    }

    /// Looks up a key in its partition, inserting it on a miss.
    ///
    /// Scans segments in ascending sequence order and lines in file order,
    /// comparing only the leading field of each line, and stops at the
    /// first exact match. A partition with no segments is a miss. On a
    /// miss the key is recorded with origin [`SEARCH_ORIGIN`]; the insert
    /// is best-effort and the miss is reported even if it fails.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::EmptyKey`] for an empty query, and I/O or
    /// decode errors encountered mid-scan.
    ///
    /// [`StoreError::EmptyKey`]: crate::error::StoreError::EmptyKey
    pub fn lookup(&self, key: &str) -> StoreResult<LookupOutcome> {
        let tag = PartitionTag::for_key(key, &self.config.special_chars)?;
        let store = SegmentStore::new(self.layout, self.config);

        let mut scanned = 0;
        for entry in store.scan(&tag)? {
            let entry = entry?;
            scanned += 1;
            if entry.record.key == key {
                debug!(%tag, scanned, segment = %entry.segment, "lookup hit");
                return Ok(LookupOutcome::Found {
                    record: entry.record,
                    segment: entry.segment,
                    scanned,
                });
            }
        }

        debug!(%tag, scanned, "lookup miss");
        let record = Record::new(key, SEARCH_ORIGIN);
        let inserted = match store.append(&tag, std::slice::from_ref(&record)) {
            Ok(Some(segment)) => Some(MissInsert { record, segment }),
            Ok(None) => None,
            Err(err) => {
                error!(%tag, %err, "failed to record missed key");
                None
            }
        };
        Ok(LookupOutcome::NotFound { inserted })
    }
}
