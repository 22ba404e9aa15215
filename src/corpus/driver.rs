//! One flattening run: corpus directory in, TSV file out.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

use crate::config::CorpusConfig;
use crate::corpus::extract::extract_annotations;
use crate::corpus::sanitize::load_sanitized;
use crate::corpus::walker::{CorpusFile, list_corpus_files};
use crate::corpus::writer::{OutputRow, RowWriter};
use crate::error::Result;

/// Width of the separator printed after each run
const SEPARATOR_WIDTH: usize = 80;

/// How corpus files are selected and ordered
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub extension: String,
    pub sort_files: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            extension: "xml".to_string(),
            sort_files: true,
        }
    }
}

impl From<&CorpusConfig> for RunOptions {
    fn from(config: &CorpusConfig) -> Self {
        Self {
            extension: config.extension.clone(),
            sort_files: config.sort_files,
        }
    }
}

/// Rows emitted for a single input file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    pub file_name: String,
    pub rows: usize,
    /// TLINKs dropped for having an empty type
    pub skipped: usize,
}

/// Outcome of one run. Owned by the caller; runs share nothing.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub files: Vec<FileReport>,
    /// Label vocabulary with the number of rows carrying each label
    pub labels: BTreeMap<String, usize>,
}

impl RunSummary {
    pub fn total_rows(&self) -> usize {
        self.files.iter().map(|f| f.rows).sum()
    }

    pub fn distinct_labels(&self) -> usize {
        self.labels.len()
    }
}

/// Flatten every annotation file under `input_dir` into `output_file`.
///
/// Prints the file count, one `"<file> linkNO = <n>"` line per file, the
/// distinct label count and a separator to stdout. The first error aborts
/// the run; rows already written stay in the output file.
pub fn run(input_dir: &Path, output_file: &Path, options: &RunOptions) -> Result<RunSummary> {
    let files = list_corpus_files(input_dir, &options.extension, options.sort_files)?;
    println!("{}", files.len());
    if files.is_empty() {
        log::warn!("No .{} files found under {}", options.extension, input_dir.display());
    }

    let mut writer = RowWriter::create(output_file)?;
    let summary = write_corpus(&files, &options.extension, &mut writer)?;
    let rows_written = writer.rows();
    writer.finish()?;

    println!("distinct labels = {}", summary.distinct_labels());
    println!("{}", "*".repeat(SEPARATOR_WIDTH));

    log::info!(
        "Wrote {} rows from {} files to {} ({} labels)",
        rows_written,
        summary.files.len(),
        output_file.display(),
        summary.distinct_labels()
    );
    log::debug!("Label vocabulary: {:?}", summary.labels);

    Ok(summary)
}

/// Process `files` in order, writing one row per kept relation.
pub fn write_corpus<W: Write>(
    files: &[CorpusFile],
    extension: &str,
    writer: &mut RowWriter<W>,
) -> Result<RunSummary> {
    let mut summary = RunSummary::default();

    for file in files {
        let xml = load_sanitized(&file.absolute_path)?;
        let document = extract_annotations(&xml, &file.file_name)?;
        let stem = file.stem(extension);

        for relation in &document.relations {
            writer.write_row(&OutputRow::new(stem, relation, &document.text))?;
            *summary.labels.entry(relation.label.clone()).or_insert(0) += 1;
        }

        println!("{} linkNO = {}", file.file_name, document.relations.len());
        log::debug!(
            "{}: {} rows, {} empty-type links skipped",
            file.file_name,
            document.relations.len(),
            document.skipped
        );

        summary.files.push(FileReport {
            file_name: file.file_name.clone(),
            rows: document.relations.len(),
            skipped: document.skipped,
        });
    }

    Ok(summary)
}
