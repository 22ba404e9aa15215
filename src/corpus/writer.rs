use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use crate::corpus::extract::RelationAnnotation;
use crate::error::Result;

/// One tab-separated training row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputRow<'a> {
    /// `{file stem}_{local id}`
    pub global_id: String,
    pub target: &'a str,
    pub document_text: &'a str,
    pub label: &'a str,
}

impl<'a> OutputRow<'a> {
    pub fn new(stem: &str, relation: &'a RelationAnnotation, document_text: &'a str) -> Self {
        Self {
            global_id: format!("{}_{}", stem, relation.id),
            target: &relation.target,
            document_text,
            label: &relation.label,
        }
    }
}

/// Sequential writer for `global_id \t target \t text \t label` lines
pub struct RowWriter<W: Write> {
    inner: W,
    rows: usize,
}

impl RowWriter<BufWriter<File>> {
    /// Create (or truncate) the output file. The parent directory must exist.
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path)?;
        log::debug!("Writing rows to {}", path.display());
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> RowWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner, rows: 0 }
    }

    pub fn write_row(&mut self, row: &OutputRow<'_>) -> Result<()> {
        writeln!(
            self.inner,
            "{}\t{}\t{}\t{}",
            row.global_id, row.target, row.document_text, row.label
        )?;
        self.rows += 1;
        Ok(())
    }

    /// Rows written so far
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Flush and hand back the underlying writer.
    pub fn finish(mut self) -> Result<W> {
        self.inner.flush()?;
        Ok(self.inner)
    }
}
