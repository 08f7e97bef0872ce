//! Store directory layout.
//!
//! All paths are relative to a configured base directory:
//!
//! ```text
//! <base>/
//! ├─ Unprocessed/    # drop location for raw batch files
//! ├─ Processed/      # archive for consumed batch files
//! └─ Index/          # partition directories holding segment files
//! ```

use crate::error::{StoreError, StoreResult};
use crate::partition::PartitionTag;
use std::fs;
use std::path::{Path, PathBuf};

/// Drop location for raw batch files.
pub const UNPROCESSED_DIR: &str = "Unprocessed";
/// Archive for consumed batch files.
pub const PROCESSED_DIR: &str = "Processed";
/// Root of the partitioned segment store.
pub const INDEX_DIR: &str = "Index";

/// The top-level directory structure of a store.
#[derive(Debug, Clone)]
pub struct StoreLayout {
    /// Base directory path.
    base: PathBuf,
}

impl StoreLayout {
    /// Opens a store layout at the given base path.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::MissingDirectory`] naming the first absent
    /// top-level directory when `create_if_missing` is false; I/O errors
    /// when creation fails.
    pub fn open(base: &Path, create_if_missing: bool) -> StoreResult<Self> {
        let layout = Self {
            base: base.to_path_buf(),
        };

        for dir in [
            layout.unprocessed_dir(),
            layout.processed_dir(),
            layout.index_dir(),
        ] {
            if dir.is_dir() {
                continue;
            }
            if !create_if_missing {
                return Err(StoreError::MissingDirectory { path: dir });
            }
            fs::create_dir_all(&dir)?;
        }

        Ok(layout)
    }

    /// Returns the base directory path.
    #[must_use]
    pub fn base(&self) -> &Path {
        &self.base
    }

    /// Returns the drop location for raw batch files.
    #[must_use]
    pub fn unprocessed_dir(&self) -> PathBuf {
        self.base.join(UNPROCESSED_DIR)
    }

    /// Returns the archive location for consumed batch files.
    #[must_use]
    pub fn processed_dir(&self) -> PathBuf {
        self.base.join(PROCESSED_DIR)
    }

    /// Returns the root of the partitioned segment store.
    #[must_use]
    pub fn index_dir(&self) -> PathBuf {
        self.base.join(INDEX_DIR)
    }

    /// Returns the directory holding a partition's segment files.
    ///
    /// The directory may not exist yet; appends create it on first use.
    #[must_use]
    pub fn partition_dir(&self, tag: &PartitionTag) -> PathBuf {
        self.index_dir().join(tag.relative_dir())
    }
}
