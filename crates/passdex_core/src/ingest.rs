//! Batch ingest: read drop-folder sources, dedupe per run, commit per
//! partition, archive consumed files.

use crate::config::Config;
use crate::error::{StoreError, StoreResult};
use crate::layout::StoreLayout;
use crate::partition::PartitionTag;
use crate::record::Record;
use crate::segment::SegmentStore;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::PathBuf;
use tracing::{error, info, warn};

/// Per-run deduplication accumulator.
///
/// Created by one ingest invocation and consumed by it; never retained
/// across runs. Keys are deduplicated per partition on exact equality
/// (no case or whitespace normalization), first seen wins, and each
/// partition's insertion order is preserved.
#[derive(Debug, Default)]
pub struct Accumulator {
    partitions: HashMap<PartitionTag, PartitionBatch>,
}

#[derive(Debug, Default)]
struct PartitionBatch {
    seen: HashSet<String>,
    records: Vec<Record>,
}

impl Accumulator {
    /// Creates an empty accumulator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Splits one source's contents into lines and absorbs every non-empty
    /// line. Empty lines (including the one produced by a trailing
    /// terminator) are discarded silently; keys already seen for the same
    /// partition this run are dropped, keeping the first origin.
    pub fn absorb(&mut self, source_name: &str, contents: &str, special_chars: &str) {
        for line in contents.split('\n') {
            let Some(first) = line.chars().next() else {
                continue;
            };
            let tag = PartitionTag::resolve(first, special_chars);
            let batch = self.partitions.entry(tag).or_default();
            if !batch.seen.insert(line.to_string()) {
                continue;
            }
            batch.records.push(Record::new(line, source_name));
        }
    }

    /// Total number of accumulated records.
    #[must_use]
    pub fn record_count(&self) -> usize {
        self.partitions.values().map(|batch| batch.records.len()).sum()
    }

    /// Number of partitions with at least one record.
    #[must_use]
    pub fn partition_count(&self) -> usize {
        self.partitions.len()
    }

    /// Consumes the accumulator, yielding each partition's records in
    /// first-seen order, partitions sorted by tag for a stable commit
    /// order.
    fn into_partitions(self) -> Vec<(PartitionTag, Vec<Record>)> {
        let mut partitions: Vec<_> = self
            .partitions
            .into_iter()
            .map(|(tag, batch)| (tag, batch.records))
            .collect();
        partitions.sort_unstable_by_key(|(tag, _)| *tag);
        partitions
    }
}

/// Counters describing one ingest run.
#[derive(Debug, Default)]
pub struct IngestReport {
    /// Sources read successfully.
    pub sources_read: usize,
    /// Sources skipped because they could not be read.
    pub sources_failed: usize,
    /// Records accumulated after in-run deduplication.
    pub records: usize,
    /// Partitions whose append committed.
    pub partitions_committed: usize,
    /// Partitions whose append was abandoned.
    pub partitions_failed: usize,
}

/// Ingests every file in `Unprocessed/` into the segment store.
///
/// Sources are read in sorted file-name order so that first-seen-wins
/// deduplication is deterministic across platforms. A source that cannot
/// be read is logged and skipped; a partition whose append fails is logged
/// and abandoned without affecting the others.
///
/// # Errors
///
/// Returns [`StoreError::MissingDirectory`] when the drop location is
/// absent — fatal to the ingest phase; nothing is written.
pub fn ingest_dir(layout: &StoreLayout, config: &Config) -> StoreResult<IngestReport> {
    let drop_dir = layout.unprocessed_dir();
    if !drop_dir.is_dir() {
        return Err(StoreError::MissingDirectory { path: drop_dir });
    }

    let mut sources: Vec<PathBuf> = Vec::new();
    for entry in fs::read_dir(&drop_dir)? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            sources.push(entry.path());
        }
    }
    sources.sort();

    let mut report = IngestReport::default();
    let mut accumulator = Accumulator::new();

    for path in &sources {
        let name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or_default();
        match fs::read_to_string(path) {
            Ok(contents) => {
                accumulator.absorb(name, &contents, &config.special_chars);
                report.sources_read += 1;
            }
            Err(err) => {
                warn!(source = %path.display(), %err, "skipping unreadable source");
                report.sources_failed += 1;
            }
        }
    }

    report.records = accumulator.record_count();

    let store = SegmentStore::new(layout, config);
    for (tag, records) in accumulator.into_partitions() {
        match store.append(&tag, &records) {
            Ok(_) => report.partitions_committed += 1,
            Err(err) => {
                error!(partition = %tag, %err, "abandoning partition append");
                report.partitions_failed += 1;
            }
        }
    }

    info!(
        sources = report.sources_read,
        records = report.records,
        partitions = report.partitions_committed,
        "ingest complete"
    );
    Ok(report)
}

/// Relocates every entry in `Unprocessed/` into `Processed/`.
///
/// Relocation is a rename, atomic when both directories live on one
/// filesystem. Individual failures are logged and skipped. An absent drop
/// location makes this a no-op. Returns the number of entries moved.
pub fn archive_consumed(layout: &StoreLayout) -> StoreResult<usize> {
    let drop_dir = layout.unprocessed_dir();
    if !drop_dir.is_dir() {
        return Ok(0);
    }

    let processed_dir = layout.processed_dir();
    let mut moved = 0;
    for entry in fs::read_dir(&drop_dir)? {
        let entry = entry?;
        let target = processed_dir.join(entry.file_name());
        match fs::rename(entry.path(), &target) {
            Ok(()) => moved += 1,
            Err(err) => {
                warn!(source = %entry.path().display(), %err, "failed to archive source");
            }
        }
    }
    Ok(moved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::partition::DEFAULT_SPECIAL_CHARS;
    use tempfile::tempdir;

    fn absorb(accumulator: &mut Accumulator, source: &str, contents: &str) {
        accumulator.absorb(source, contents, DEFAULT_SPECIAL_CHARS);
    }

    #[test]
    fn drops_empty_and_duplicate_lines() {
        let mut accumulator = Accumulator::new();
        absorb(&mut accumulator, "batch.txt", "abc\nAbc\n\nabc\n");

        assert_eq!(accumulator.record_count(), 2);
        assert_eq!(accumulator.partition_count(), 2);
    }

    #[test]
    fn first_seen_origin_wins_across_sources() {
        let mut accumulator = Accumulator::new();
        absorb(&mut accumulator, "early.txt", "shared\n");
        absorb(&mut accumulator, "late.txt", "shared\nunique\n");

        let partitions = accumulator.into_partitions();
        let records: Vec<&Record> = partitions
            .iter()
            .flat_map(|(_, records)| records)
            .collect();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].key, "shared");
        assert_eq!(records[0].origin, "early.txt");
        assert_eq!(records[1].origin, "late.txt");
    }

    #[test]
    fn dedupe_is_case_sensitive() {
        let mut accumulator = Accumulator::new();
        absorb(&mut accumulator, "batch.txt", "aBc\nabc\n");

        // Both route to partition `a` but stay distinct keys.
        assert_eq!(accumulator.record_count(), 2);
        assert_eq!(accumulator.partition_count(), 1);
    }

    #[test]
    fn ingest_requires_drop_dir() {
        let temp = tempdir().unwrap();
        let layout = StoreLayout::open(temp.path(), true).unwrap();
        fs::remove_dir(layout.unprocessed_dir()).unwrap();

        let result = ingest_dir(&layout, &Config::default());
        assert!(matches!(result, Err(StoreError::MissingDirectory { .. })));
    }

    #[test]
    fn unreadable_source_is_skipped() {
        let temp = tempdir().unwrap();
        let layout = StoreLayout::open(temp.path(), true).unwrap();
        fs::write(layout.unprocessed_dir().join("bad.txt"), [0xFF, 0xFE, 0xFD]).unwrap();
        fs::write(layout.unprocessed_dir().join("good.txt"), "ok\n").unwrap();

        let report = ingest_dir(&layout, &Config::default()).unwrap();
        assert_eq!(report.sources_failed, 1);
        assert_eq!(report.sources_read, 1);
        assert_eq!(report.records, 1);
    }

    #[test]
    fn partition_write_failure_is_isolated() {
        let temp = tempdir().unwrap();
        let layout = StoreLayout::open(temp.path(), true).unwrap();
        fs::write(layout.unprocessed_dir().join("batch.txt"), "Abc\nxyz\n").unwrap();
        // A file where partition `A`'s directory belongs blocks that append.
        fs::write(layout.index_dir().join("A"), "in the way").unwrap();

        let report = ingest_dir(&layout, &Config::default()).unwrap();
        assert_eq!(report.partitions_failed, 1);
        assert_eq!(report.partitions_committed, 1);
        assert!(layout
            .partition_dir(&PartitionTag::Char('x'))
            .join("x-0.txt")
            .is_file());
    }

    #[test]
    fn archive_moves_consumed_sources() {
        let temp = tempdir().unwrap();
        let layout = StoreLayout::open(temp.path(), true).unwrap();
        fs::write(layout.unprocessed_dir().join("done.txt"), "abc\n").unwrap();

        let moved = archive_consumed(&layout).unwrap();
        assert_eq!(moved, 1);
        assert!(!layout.unprocessed_dir().join("done.txt").exists());
        assert!(layout.processed_dir().join("done.txt").is_file());
    }

    #[test]
    fn archive_without_drop_dir_is_a_no_op() {
        let temp = tempdir().unwrap();
        let layout = StoreLayout::open(temp.path(), true).unwrap();
        fs::remove_dir(layout.unprocessed_dir()).unwrap();

        assert_eq!(archive_consumed(&layout).unwrap(), 0);
    }
}
