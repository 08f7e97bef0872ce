//! # passdex core
//!
//! Store engine for passdex: a partitioned, segmented on-disk index of
//! password records.
//!
//! This crate provides:
//! - Digest enrichment (MD5, SHA-1, SHA-256) for password records
//! - Partition resolution from a password's leading character
//! - Bounded append-only segment files with rotation per partition
//! - Batch ingest with per-run deduplication and archive relocation
//! - Linear-scan lookup with insert-on-miss
//!
//! The on-disk layout places segment files under `Index/`, grouped by
//! partition, while `Unprocessed/` and `Processed/` hold raw batch files
//! before and after ingest. See [`layout::StoreLayout`] for the directory
//! contract and [`segment::SegmentStore`] for the append/scan protocol.

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod digest;
pub mod error;
pub mod ingest;
pub mod layout;
pub mod lookup;
pub mod partition;
pub mod record;
pub mod segment;

pub use config::Config;
pub use digest::DigestSet;
pub use error::{StoreError, StoreResult};
pub use layout::StoreLayout;
pub use lookup::{LookupEngine, LookupOutcome};
pub use partition::PartitionTag;
pub use record::Record;
pub use segment::{SegmentId, SegmentStore};

/// Crate version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
