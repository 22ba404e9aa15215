//! Ampersand clean-up applied before XML parsing.
//!
//! i2b2 releases are not reliably escaped: raw `&` shows up in note text and
//! attribute values. Two substitutions run on every line: `" & "` becomes a
//! single space, and any other `&` becomes `" and "`. This is a heuristic, not
//! an entity escaper; documents it cannot rescue fail later as malformed XML.

use std::path::Path;
use crate::error::Result;

/// Apply the ampersand substitutions to one line.
pub fn sanitize_line(line: &str) -> String {
    line.replace(" & ", " ").replace('&', " and ")
}

/// Apply [`sanitize_line`] to every line of `content`, keeping line terminators.
///
/// `\r\n` and lone `\r` are normalised to `\n` first.
pub fn sanitize(content: &str) -> String {
    let normalized = content.replace("\r\n", "\n").replace('\r', "\n");

    let mut out = String::with_capacity(normalized.len());
    for line in normalized.split_inclusive('\n') {
        out.push_str(&sanitize_line(line));
    }
    out
}

/// Read a whole annotation file and sanitize it.
pub fn load_sanitized(path: &Path) -> Result<String> {
    let raw = std::fs::read_to_string(path)?;
    Ok(sanitize(&raw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use std::fs;

    #[test]
    fn test_spaced_ampersand_collapses_to_space() {
        assert_eq!(sanitize_line("arrived & was stable"), "arrived was stable");
    }

    #[test]
    fn test_bare_ampersand_becomes_and() {
        assert_eq!(sanitize_line("R&D"), "R and D");
        assert_eq!(sanitize_line("&amp;"), " and amp;");
    }

    #[test]
    fn test_clean_input_is_untouched() {
        let clean = "<ROOT>\n<TEXT>no ampersands here</TEXT>\n</ROOT>\n";
        assert_eq!(sanitize(clean), clean);
        assert_eq!(sanitize(&sanitize(clean)), clean);
    }

    #[test]
    fn test_substitution_is_per_line() {
        // " &\n" is not the spaced form on a single line
        assert_eq!(sanitize("a &\n b"), "a  and \n b");
    }

    #[test]
    fn test_crlf_normalised() {
        assert_eq!(sanitize("a\r\nb\rc"), "a\nb\nc");
    }

    #[test]
    fn test_load_sanitized_reads_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("1.xml");
        fs::write(&path, "<TEXT>x & y&z</TEXT>\n").unwrap();

        assert_eq!(load_sanitized(&path).unwrap(), "<TEXT>x y and z</TEXT>\n");
    }

    #[test]
    fn test_load_sanitized_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        assert!(load_sanitized(&temp_dir.path().join("nope.xml")).is_err());
    }
}
