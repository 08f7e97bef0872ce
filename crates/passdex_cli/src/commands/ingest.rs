//! Ingest command implementation.

use passdex_core::ingest::{archive_consumed, ingest_dir};
use passdex_core::{Config, StoreLayout};
use std::path::Path;

/// Runs the ingest command: consume `Unprocessed/`, then archive.
pub fn run(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::default();
    let layout = StoreLayout::open(path, config.create_if_missing)?;

    let report = ingest_dir(&layout, &config)?;
    println!(
        "Ingested {} records from {} sources into {} partitions",
        report.records, report.sources_read, report.partitions_committed
    );
    if report.sources_failed > 0 || report.partitions_failed > 0 {
        println!(
            "Skipped {} unreadable sources, abandoned {} partition appends (see logs)",
            report.sources_failed, report.partitions_failed
        );
    }

    let moved = archive_consumed(&layout)?;
    println!("Archived {moved} batch files into Processed/");

    Ok(())
}
