//! Line sources for document text
//!
//! Documents and scripts are read from a file or, when no path (or `-`) is
//! given, from standard input. Lines are read eagerly; trailing `\r` is
//! dropped so CRLF files terminate on `eod` like LF files.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use anyhow::{Context, Result};

use crate::domain::{Document, LoadReport};

/// Path argument meaning standard input
pub const STDIN_PATH: &str = "-";

/// Name given to a document read from standard input
const STDIN_NAME: &str = "stdin";

fn is_stdin(path: Option<&Path>) -> bool {
    path.map_or(true, |p| p.as_os_str() == STDIN_PATH)
}

/// Reads all lines from a file, or from stdin
pub fn read_lines(path: Option<&Path>) -> Result<Vec<String>> {
    match path {
        Some(path) if !is_stdin(Some(path)) => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open: {}", path.display()))?;
            collect_lines(BufReader::new(file))
                .with_context(|| format!("Failed to read: {}", path.display()))
        }
        _ => collect_lines(io::stdin().lock()).context("Failed to read standard input"),
    }
}

fn collect_lines(reader: impl BufRead) -> io::Result<Vec<String>> {
    reader
        .lines()
        .map(|line| {
            line.map(|mut l| {
                if l.ends_with('\r') {
                    l.pop();
                }
                l
            })
        })
        .collect()
}

/// Default document name for a source: the file stem, or `stdin`
pub fn document_name(path: Option<&Path>) -> String {
    if is_stdin(path) {
        return STDIN_NAME.to_string();
    }
    path.and_then(|p| p.file_stem())
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| STDIN_NAME.to_string())
}

/// Reads one document from a source
pub fn load_document(
    path: Option<&Path>,
    name: Option<&str>,
    terminator: &str,
) -> Result<(Document, LoadReport)> {
    let lines = read_lines(path)?;
    let name = name.map_or_else(|| document_name(path), str::to_string);

    let mut document = Document::new(&name);
    let report = document.load_until(&lines, terminator);
    Ok((document, report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn reads_lines_and_strips_carriage_returns() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("doc.txt");
        fs::write(&path, "link=a\r\neod\r\n").unwrap();

        let lines = read_lines(Some(&path)).unwrap();
        assert_eq!(lines, vec!["link=a", "eod"]);
    }

    #[test]
    fn missing_file_reports_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nope.txt");

        let err = read_lines(Some(&path)).unwrap_err();
        assert!(format!("{:#}", err).contains("nope.txt"));
    }

    #[test]
    fn name_defaults_to_file_stem() {
        assert_eq!(document_name(Some(Path::new("dir/Home.txt"))), "Home");
        assert_eq!(document_name(Some(Path::new("-"))), "stdin");
        assert_eq!(document_name(None), "stdin");
    }

    #[test]
    fn load_document_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Index.doc");
        fs::write(&path, "link=b link=a(3)\neod\nlink=ignored\n").unwrap();

        let (document, report) = load_document(Some(&path), None, "eod").unwrap();
        assert_eq!(document.name(), "index");
        assert_eq!(document.to_string(), "Document: index\na(3) b(1)");
        assert!(report.terminated);

        let (named, _) = load_document(Some(&path), Some("Other"), "eod").unwrap();
        assert_eq!(named.name(), "other");
    }
}
