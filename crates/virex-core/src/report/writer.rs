//! Appending writer for the delimited report file.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use super::ReportLayout;
use crate::extraction::ExtractionRecord;

/// Appends rows to a report file, writing the header only once.
pub struct PipeWriter {
    path: PathBuf,
    layout: ReportLayout,
    out: BufWriter<File>,
    rows_written: usize,
}

impl PipeWriter {
    /// Open `path` for appending. The header is written when the file is
    /// new or empty.
    pub fn open(path: impl AsRef<Path>, layout: ReportLayout) -> std::io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let needs_header = std::fs::metadata(&path).map(|m| m.len() == 0).unwrap_or(true);

        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let mut out = BufWriter::new(file);
        if needs_header {
            debug!("Writing report header to {}", path.display());
            writeln!(out, "{}", layout.header_line())?;
        }

        Ok(Self {
            path,
            layout,
            out,
            rows_written: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn layout(&self) -> &ReportLayout {
        &self.layout
    }

    /// Rows written since this writer was opened.
    pub fn rows_written(&self) -> usize {
        self.rows_written
    }

    pub fn write_row(&mut self, row: &ExtractionRecord) -> std::io::Result<()> {
        writeln!(self.out, "{}", self.layout.render_row(row))?;
        self.rows_written += 1;
        Ok(())
    }

    pub fn flush(&mut self) -> std::io::Result<()> {
        self.out.flush()
    }
}
