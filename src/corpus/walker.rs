use walkdir::WalkDir;
use std::path::{Path, PathBuf};
use crate::error::Result;

/// An annotation file found under a corpus directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorpusFile {
    /// Bare filename, e.g. `100.xml`
    pub file_name: String,
    pub absolute_path: PathBuf,
}

impl CorpusFile {
    /// Filename with the `.{extension}` suffix removed; prefix of every global id.
    pub fn stem(&self, extension: &str) -> &str {
        let suffix_len = extension.len() + 1;
        &self.file_name[..self.file_name.len().saturating_sub(suffix_len)]
    }
}

/// Discover every file under `root` (recursively) whose final extension is
/// exactly `extension`.
///
/// A missing or unreadable directory is an error, as is any entry the walk
/// cannot read. With `sort` set, files are ordered by filename; otherwise
/// they come back in filesystem traversal order.
pub fn list_corpus_files(root: &Path, extension: &str, sort: bool) -> Result<Vec<CorpusFile>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root) {
        let entry = entry?;
        let path = entry.path();

        // symlinked files count, symlinked directories are not descended
        if !entry.file_type().is_file() && !(entry.path_is_symlink() && path.is_file()) {
            continue;
        }

        if path.extension().and_then(|s| s.to_str()) != Some(extension) {
            continue;
        }

        let file_name = match path.file_name().and_then(|s| s.to_str()) {
            Some(name) => name.to_string(),
            None => {
                log::warn!("Skipping non UTF-8 filename: {}", path.display());
                continue;
            }
        };

        files.push(CorpusFile {
            file_name,
            absolute_path: path.to_path_buf(),
        });
    }

    if sort {
        files.sort_by(|a, b| a.file_name.cmp(&b.file_name));
    }

    log::info!("Discovered {} .{} files in {}", files.len(), extension, root.display());
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PrepError;
    use tempfile::TempDir;
    use std::fs;

    #[test]
    fn test_list_corpus_files_recursive() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        fs::create_dir_all(root.join("batch1/nested")).unwrap();
        fs::write(root.join("10.xml"), "<ClinicalNarrativeTemporalAnnotation/>").unwrap();
        fs::write(root.join("batch1/2.xml"), "<x/>").unwrap();
        fs::write(root.join("batch1/nested/33.xml"), "<x/>").unwrap();
        fs::write(root.join("batch1/notes.txt"), "not xml").unwrap();
        fs::write(root.join("batch1/upper.XML"), "<x/>").unwrap(); // extension match is exact
        fs::write(root.join("archive.xml.bak"), "<x/>").unwrap();

        let files = list_corpus_files(root, "xml", true).unwrap();
        let names: Vec<&str> = files.iter().map(|f| f.file_name.as_str()).collect();

        assert_eq!(names, vec!["10.xml", "2.xml", "33.xml"]);
        assert!(files[2].absolute_path.ends_with("batch1/nested/33.xml"));
    }

    #[test]
    fn test_list_corpus_files_empty() {
        let temp_dir = TempDir::new().unwrap();
        let files = list_corpus_files(temp_dir.path(), "xml", true).unwrap();
        assert!(files.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_directories_are_not_followed() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("corpus");
        let outside = temp_dir.path().join("outside");
        fs::create_dir_all(&root).unwrap();
        fs::create_dir_all(&outside).unwrap();
        fs::write(root.join("1.xml"), "<x/>").unwrap();
        fs::write(outside.join("2.xml"), "<x/>").unwrap();
        std::os::unix::fs::symlink(&outside, root.join("linked")).unwrap();
        // a cycle back to the root must not abort the walk
        std::os::unix::fs::symlink(&root, root.join("loop")).unwrap();

        std::os::unix::fs::symlink(outside.join("2.xml"), root.join("3.xml")).unwrap();

        let files = list_corpus_files(&root, "xml", true).unwrap();
        let names: Vec<&str> = files.iter().map(|f| f.file_name.as_str()).collect();
        assert_eq!(names, vec!["1.xml", "3.xml"]);
    }

    #[test]
    fn test_missing_directory_is_fatal() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("does-not-exist");
        let err = list_corpus_files(&missing, "xml", false).unwrap_err();
        assert!(matches!(err, PrepError::Walk(_)));
    }

    #[test]
    fn test_stem_strips_configured_extension() {
        let file = CorpusFile {
            file_name: "record.final.xml".to_string(),
            absolute_path: PathBuf::from("/tmp/record.final.xml"),
        };
        assert_eq!(file.stem("xml"), "record.final");
    }
}
