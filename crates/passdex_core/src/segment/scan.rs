//! Lazy full-partition scans.

use crate::error::StoreResult;
use crate::partition::PartitionTag;
use crate::record::Record;
use crate::segment::SegmentId;
use std::fs;
use std::path::PathBuf;

/// One record yielded by a scan, with the segment it was read from.
#[derive(Debug, Clone)]
pub struct ScannedRecord {
    /// The segment the record was read from.
    pub segment: SegmentId,
    /// The decoded record.
    pub record: Record,
}

/// Iterator over every record in a partition, in ascending
/// (sequence, line-offset) order.
///
/// Segment files are opened one at a time as the iteration reaches them.
/// The scan is finite and restartable: each [`SegmentStore::scan`] call
/// re-reads from disk.
///
/// [`SegmentStore::scan`]: crate::segment::SegmentStore::scan
#[derive(Debug)]
pub struct PartitionScan {
    tag: PartitionTag,
    files: std::vec::IntoIter<(u32, PathBuf)>,
    current: Option<SegmentLines>,
}

#[derive(Debug)]
struct SegmentLines {
    id: SegmentId,
    lines: std::vec::IntoIter<String>,
}

impl PartitionScan {
    pub(crate) fn new(tag: PartitionTag, files: Vec<(u32, PathBuf)>) -> Self {
        Self {
            tag,
            files: files.into_iter(),
            current: None,
        }
    }
}

impl Iterator for PartitionScan {
    type Item = StoreResult<ScannedRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(current) = &mut self.current {
                if let Some(line) = current.lines.next() {
                    let segment = current.id;
                    return Some(
                        Record::decode(&line).map(|record| ScannedRecord { segment, record }),
                    );
                }
                self.current = None;
            }

            let (sequence, path) = self.files.next()?;
            let content = match fs::read_to_string(&path) {
                Ok(content) => content,
                Err(err) => return Some(Err(err.into())),
            };
            self.current = Some(SegmentLines {
                id: SegmentId::new(self.tag, sequence),
                lines: content
                    .lines()
                    .map(str::to_string)
                    .collect::<Vec<_>>()
                    .into_iter(),
            });
        }
    }
}
