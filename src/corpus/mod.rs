pub mod walker;
pub mod sanitize;
pub mod extract;
pub mod writer;
pub mod driver;

pub use walker::{CorpusFile, list_corpus_files};
pub use sanitize::{load_sanitized, sanitize, sanitize_line};
pub use extract::{AnnotatedDocument, RelationAnnotation, extract_annotations};
pub use writer::{OutputRow, RowWriter};
pub use driver::{FileReport, RunOptions, RunSummary, run, write_corpus};
