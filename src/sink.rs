//! Table sinks.
//!
//! A sink receives the finished table with all-or-nothing semantics:
//! consumers either see the previous contents or the complete new table,
//! never a partial write.

use crate::error::{Error, Result};
use crate::model::RecordTable;
use crate::render;
use std::fs;
use std::path::{Path, PathBuf};

/// Consumer of a finished record table.
pub trait TableSink {
    /// Replace the sink's contents with `table`, all-or-nothing.
    fn replace(&mut self, table: &RecordTable) -> Result<()>;
}

/// Writes the table as CSV to a destination file, staging to a sibling
/// path and renaming into place so readers never observe a partial file.
#[derive(Debug, Clone)]
pub struct CsvFileSink {
    dest: PathBuf,
}

impl CsvFileSink {
    /// Create a sink writing to `dest`.
    pub fn new(dest: impl Into<PathBuf>) -> Self {
        Self { dest: dest.into() }
    }

    /// The destination path.
    pub fn dest(&self) -> &Path {
        &self.dest
    }

    fn staging_path(&self) -> PathBuf {
        let mut name = self.dest.file_name().unwrap_or_default().to_os_string();
        name.push(".staging");
        self.dest.with_file_name(name)
    }
}

impl TableSink for CsvFileSink {
    fn replace(&mut self, table: &RecordTable) -> Result<()> {
        let staging = self.staging_path();
        let content = render::to_csv(table)?;

        fs::write(&staging, content)?;
        if let Err(err) = fs::rename(&staging, &self.dest) {
            // Tear the staging artifact down before reporting.
            let _ = fs::remove_file(&staging);
            return Err(Error::Sink(format!(
                "failed to swap staged table into {}: {err}",
                self.dest.display()
            )));
        }
        log::debug!(
            "replaced {} with {} records",
            self.dest.display(),
            table.len()
        );
        Ok(())
    }
}
