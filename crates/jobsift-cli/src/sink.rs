//! File-backed report sink.

use std::path::{Path, PathBuf};

use jobsift::{ReportSink, SiftResult};

/// Writes the whole report to one file, replacing any previous contents.
#[derive(Debug, Clone)]
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ReportSink for FileSink {
    fn write_rows(&mut self, rows: &[String]) -> SiftResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, rows.join("\n"))?;
        tracing::debug!(path = %self.path.display(), rows = rows.len(), "report written");
        Ok(())
    }
}
