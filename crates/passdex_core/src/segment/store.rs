//! Segment store: active-segment location and the append protocol.

use crate::config::Config;
use crate::error::{StoreError, StoreResult};
use crate::layout::StoreLayout;
use crate::partition::PartitionTag;
use crate::record::Record;
use crate::segment::{PartitionScan, SegmentId, SEGMENT_EXTENSION};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Append and scan access to the partitioned segment files under `Index/`.
///
/// Appends use a rewrite-on-append strategy: the active segment's full
/// content is read back into memory and the whole file is rewritten on
/// every flush. A partial write can lose the active segment's tail but
/// cannot touch sealed segments. There is no cross-process coordination;
/// concurrent writers to one partition can lose updates.
#[derive(Debug)]
pub struct SegmentStore<'a> {
    layout: &'a StoreLayout,
    capacity: usize,
}

/// Buffered state of a partition's highest-sequence segment.
#[derive(Debug)]
struct ActiveSegment {
    sequence: u32,
    count: usize,
    buffer: String,
}

impl ActiveSegment {
    fn empty(sequence: u32) -> Self {
        Self {
            sequence,
            count: 0,
            buffer: String::new(),
        }
    }
}

impl<'a> SegmentStore<'a> {
    /// Creates a store over the given layout.
    #[must_use]
    pub fn new(layout: &'a StoreLayout, config: &Config) -> Self {
        Self {
            layout,
            capacity: config.segment_capacity,
        }
    }

    /// Appends records, in order, to the partition's active segment,
    /// rotating to a new segment whenever the record count reaches
    /// capacity.
    ///
    /// Creates the partition directory (including the upper-case parent of
    /// a nested lower-case partition) on first use. Returns the id of the
    /// segment that received the final record, or `None` when `records` is
    /// empty.
    ///
    /// # Errors
    ///
    /// Any failure abandons this partition's append as a whole; appends to
    /// other partitions are unaffected.
    pub fn append(
        &self,
        tag: &PartitionTag,
        records: &[Record],
    ) -> StoreResult<Option<SegmentId>> {
        if records.is_empty() {
            return Ok(None);
        }

        let dir = self.layout.partition_dir(tag);
        fs::create_dir_all(&dir)?;

        let mut active = self
            .locate_active(tag)?
            .unwrap_or_else(|| ActiveSegment::empty(0));

        // A segment already at capacity on disk stays sealed as-is; the
        // next sequence number becomes active without rewriting it.
        if active.count >= self.capacity {
            active = ActiveSegment::empty(active.sequence + 1);
        }

        let mut last = None;
        let mut dirty = false;

        for record in records {
            active.buffer.push_str(&record.encode());
            active.buffer.push('\n');
            active.count += 1;
            dirty = true;
            last = Some(SegmentId::new(*tag, active.sequence));

            if active.count == self.capacity {
                self.flush(&dir, tag, &active)?;
                active = ActiveSegment::empty(active.sequence + 1);
                dirty = false;
            }
        }

        if dirty {
            self.flush(&dir, tag, &active)?;
        }

        Ok(last)
    }

    /// Returns a lazy scan over every record in the partition.
    ///
    /// An absent partition directory scans as empty.
    pub fn scan(&self, tag: &PartitionTag) -> StoreResult<PartitionScan> {
        Ok(PartitionScan::new(*tag, self.segment_files(tag)?))
    }

    /// Reads the highest-sequence segment back as the append buffer.
    fn locate_active(&self, tag: &PartitionTag) -> StoreResult<Option<ActiveSegment>> {
        let Some((sequence, path)) = self.segment_files(tag)?.into_iter().last() else {
            return Ok(None);
        };

        let buffer = fs::read_to_string(&path)?;
        let count = buffer.lines().count();
        Ok(Some(ActiveSegment {
            sequence,
            count,
            buffer,
        }))
    }

    /// Lists a partition's segment files in ascending sequence order.
    fn segment_files(&self, tag: &PartitionTag) -> StoreResult<Vec<(u32, PathBuf)>> {
        let dir = self.layout.partition_dir(tag);
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut files = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let path = entry?.path();
            let is_segment = path.is_file()
                && path.extension().and_then(|ext| ext.to_str()) == Some(SEGMENT_EXTENSION);
            if !is_segment {
                continue;
            }
            files.push((parse_sequence(&path)?, path));
        }

        files.sort_unstable_by_key(|(sequence, _)| *sequence);
        Ok(files)
    }

    fn flush(&self, dir: &Path, tag: &PartitionTag, active: &ActiveSegment) -> StoreResult<()> {
        let id = SegmentId::new(*tag, active.sequence);
        fs::write(dir.join(id.file_name()), &active.buffer)?;
        debug!(segment = %id, records = active.count, "segment flushed");
        Ok(())
    }
}

/// Parses the numeric suffix after the last `-` in a segment file stem.
fn parse_sequence(path: &Path) -> StoreResult<u32> {
    let name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or_default();
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .and_then(|stem| stem.rsplit_once('-'))
        .and_then(|(_, suffix)| suffix.parse().ok())
        .ok_or_else(|| StoreError::invalid_segment_name(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn open_layout(base: &Path) -> StoreLayout {
        StoreLayout::open(base, true).unwrap()
    }

    fn records(keys: &[&str]) -> Vec<Record> {
        keys.iter().map(|key| Record::new(*key, "test.txt")).collect()
    }

    #[test]
    fn append_creates_nested_partition_dir() {
        let temp = tempdir().unwrap();
        let layout = open_layout(temp.path());
        let store = SegmentStore::new(&layout, &Config::default());
        let tag = PartitionTag::Char('a');

        let receipt = store.append(&tag, &records(&["abc"])).unwrap();

        assert!(temp.path().join("Index").join("A").join("a").is_dir());
        assert_eq!(receipt.unwrap().file_name(), "a-0.txt");
    }

    #[test]
    fn append_then_scan_round_trip() {
        let temp = tempdir().unwrap();
        let layout = open_layout(temp.path());
        let store = SegmentStore::new(&layout, &Config::default());
        let tag = PartitionTag::Char('p');

        let written = records(&["pass1", "pass2", "pass3"]);
        store.append(&tag, &written).unwrap();

        let read: Vec<Record> = store
            .scan(&tag)
            .unwrap()
            .map(|entry| entry.unwrap().record)
            .collect();
        assert_eq!(read, written);
    }

    #[test]
    fn rotation_at_capacity() {
        let temp = tempdir().unwrap();
        let layout = open_layout(temp.path());
        let config = Config::default().segment_capacity(3);
        let store = SegmentStore::new(&layout, &config);
        let tag = PartitionTag::Char('r');

        let receipt = store
            .append(&tag, &records(&["r1", "r2", "r3", "r4", "r5", "r6", "r7"]))
            .unwrap();

        let dir = layout.partition_dir(&tag);
        let count = |name: &str| {
            fs::read_to_string(dir.join(name))
                .unwrap()
                .lines()
                .count()
        };
        assert_eq!(count("r-0.txt"), 3);
        assert_eq!(count("r-1.txt"), 3);
        assert_eq!(count("r-2.txt"), 1);
        assert_eq!(receipt.unwrap().sequence(), 2);
    }

    #[test]
    fn append_continues_partial_segment() {
        let temp = tempdir().unwrap();
        let layout = open_layout(temp.path());
        let store = SegmentStore::new(&layout, &Config::default());
        let tag = PartitionTag::Char('c');

        store.append(&tag, &records(&["one"])).unwrap();
        store.append(&tag, &records(&["two"])).unwrap();

        let content = fs::read_to_string(layout.partition_dir(&tag).join("c-0.txt")).unwrap();
        assert_eq!(content.lines().count(), 2);
        assert!(content.lines().next().unwrap().starts_with("one | "));
    }

    #[test]
    fn full_segment_on_disk_is_not_rewritten() {
        let temp = tempdir().unwrap();
        let layout = open_layout(temp.path());
        let config = Config::default().segment_capacity(2);
        let store = SegmentStore::new(&layout, &config);
        let tag = PartitionTag::Char('f');

        store.append(&tag, &records(&["a1", "a2"])).unwrap();
        let dir = layout.partition_dir(&tag);
        let sealed = fs::read_to_string(dir.join("f-0.txt")).unwrap();

        let receipt = store.append(&tag, &records(&["a3"])).unwrap();

        assert_eq!(fs::read_to_string(dir.join("f-0.txt")).unwrap(), sealed);
        assert_eq!(receipt.unwrap().file_name(), "f-1.txt");
        let next = fs::read_to_string(dir.join("f-1.txt")).unwrap();
        assert_eq!(next.lines().count(), 1);
    }

    #[test]
    fn active_segment_is_highest_sequence() {
        let temp = tempdir().unwrap();
        let layout = open_layout(temp.path());
        let store = SegmentStore::new(&layout, &Config::default());
        let tag = PartitionTag::Char('h');

        let dir = layout.partition_dir(&tag);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("h-0.txt"), "").unwrap();
        fs::write(dir.join("h-3.txt"), "").unwrap();

        let receipt = store.append(&tag, &records(&["high"])).unwrap();
        assert_eq!(receipt.unwrap().sequence(), 3);
    }

    #[test]
    fn empty_append_is_a_no_op() {
        let temp = tempdir().unwrap();
        let layout = open_layout(temp.path());
        let store = SegmentStore::new(&layout, &Config::default());
        let tag = PartitionTag::Char('n');

        let receipt = store.append(&tag, &[]).unwrap();
        assert!(receipt.is_none());
        assert!(!layout.partition_dir(&tag).exists());
    }

    #[test]
    fn scan_of_absent_partition_is_empty() {
        let temp = tempdir().unwrap();
        let layout = open_layout(temp.path());
        let store = SegmentStore::new(&layout, &Config::default());

        let mut scan = store.scan(&PartitionTag::Char('z')).unwrap();
        assert!(scan.next().is_none());
    }

    #[test]
    fn scan_reads_segments_in_sequence_order() {
        let temp = tempdir().unwrap();
        let layout = open_layout(temp.path());
        let config = Config::default().segment_capacity(2);
        let store = SegmentStore::new(&layout, &config);
        let tag = PartitionTag::Char('s');

        store
            .append(&tag, &records(&["s1", "s2", "s3", "s4", "s5"]))
            .unwrap();

        let order: Vec<(u32, String)> = store
            .scan(&tag)
            .unwrap()
            .map(|entry| {
                let entry = entry.unwrap();
                (entry.segment.sequence(), entry.record.key)
            })
            .collect();
        assert_eq!(
            order,
            vec![
                (0, "s1".to_string()),
                (0, "s2".to_string()),
                (1, "s3".to_string()),
                (1, "s4".to_string()),
                (2, "s5".to_string()),
            ]
        );
    }

    #[test]
    fn scan_is_restartable() {
        let temp = tempdir().unwrap();
        let layout = open_layout(temp.path());
        let store = SegmentStore::new(&layout, &Config::default());
        let tag = PartitionTag::Char('t');

        store.append(&tag, &records(&["t1", "t2"])).unwrap();

        let first: Vec<String> = store
            .scan(&tag)
            .unwrap()
            .map(|entry| entry.unwrap().record.key)
            .collect();
        let second: Vec<String> = store
            .scan(&tag)
            .unwrap()
            .map(|entry| entry.unwrap().record.key)
            .collect();
        assert_eq!(first, second);
    }

    #[test]
    fn unparseable_segment_name_fails_the_partition() {
        let temp = tempdir().unwrap();
        let layout = open_layout(temp.path());
        let store = SegmentStore::new(&layout, &Config::default());
        let tag = PartitionTag::Char('u');

        let dir = layout.partition_dir(&tag);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("stray.txt"), "not a segment\n").unwrap();

        let result = store.append(&tag, &records(&["u1"]));
        assert!(matches!(
            result,
            Err(StoreError::InvalidSegmentName { .. })
        ));
    }
}
