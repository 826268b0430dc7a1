//! CSV readers for the two job sources.
//!
//! Both readers inspect only the first column and treat the first record as
//! a header. Records must all have the same number of fields; a ragged or
//! badly quoted document is rejected as a whole.

use std::borrow::Cow;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::{debug, instrument, warn};

use super::error::InputError;
use super::media::extract_media_links;
use super::{Target, dedup_stable};

/// Reads a values export (direct mode): the first column already holds
/// resource paths.
///
/// The header record is skipped, as is any later record repeating the header
/// value (concatenated exports). Empty cells are ignored.
///
/// # Errors
///
/// Returns [`InputError::Open`] if the file cannot be opened and
/// [`InputError::Malformed`] if it is not valid CSV.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn read_values_file(path: &Path) -> Result<Vec<Target>, InputError> {
    let file = File::open(path).map_err(|e| InputError::open(path, e))?;
    read_values(file, path)
}

/// Reads a content export (content-extraction mode): the first column holds
/// page markup with embedded `{{media url=...}}` references.
///
/// # Errors
///
/// Returns [`InputError::Open`] if the file cannot be opened and
/// [`InputError::Malformed`] if it is not valid CSV.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn read_content_file(path: &Path) -> Result<Vec<Target>, InputError> {
    let file = File::open(path).map_err(|e| InputError::open(path, e))?;
    read_content(file, path)
}

/// Direct-mode parsing over any reader. `source` is only used for error context.
pub(crate) fn read_values<R: Read>(reader: R, source: &Path) -> Result<Vec<Target>, InputError> {
    let mut cells = first_column_cells(reader, source)?.into_iter();
    let Some(header) = cells.next() else {
        debug!("values file has no records");
        return Ok(Vec::new());
    };
    let header = header.trim().to_string();

    let targets: Vec<Target> = cells
        .filter(|cell| cell.trim() != header)
        .filter_map(Target::new)
        .collect();

    let targets = dedup_stable(targets);
    debug!(targets = targets.len(), "read values file");
    Ok(targets)
}

/// Content-mode parsing over any reader. `source` is only used for error context.
pub(crate) fn read_content<R: Read>(reader: R, source: &Path) -> Result<Vec<Target>, InputError> {
    let targets: Vec<Target> = first_column_cells(reader, source)?
        .into_iter()
        .skip(1)
        .filter(|cell| !cell.is_empty())
        .flat_map(|cell| extract_media_links(&cell))
        .filter_map(Target::new)
        .collect();

    let targets = dedup_stable(targets);
    debug!(targets = targets.len(), "extracted media references");
    Ok(targets)
}

/// Returns the first cell of every record, header included.
///
/// Only the first cell is decoded; other columns may hold any bytes. A first
/// cell that is not UTF-8 is decoded lossily.
fn first_column_cells<R: Read>(reader: R, source: &Path) -> Result<Vec<String>, InputError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(false)
        .from_reader(reader);

    let mut cells = Vec::new();
    for record in csv_reader.byte_records() {
        let record = record.map_err(|e| InputError::malformed(source, e))?;
        if let Some(first) = record.get(0) {
            let cell = String::from_utf8_lossy(first);
            if matches!(cell, Cow::Owned(_)) {
                warn!(
                    path = %source.display(),
                    line = record.position().map(csv::Position::line),
                    "first column is not valid UTF-8, decoding lossily"
                );
            }
            cells.push(cell.into_owned());
        }
    }
    Ok(cells)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn values(data: &str) -> Vec<String> {
        read_values(data.as_bytes(), Path::new("values.csv"))
            .unwrap()
            .into_iter()
            .map(|t| t.as_str().to_string())
            .collect()
    }

    fn content(data: &str) -> Vec<String> {
        read_content(data.as_bytes(), Path::new("content.csv"))
            .unwrap()
            .into_iter()
            .map(|t| t.as_str().to_string())
            .collect()
    }

    #[test]
    fn test_read_values_skips_header_and_duplicates() {
        let targets = values("path\n/a/b.jpg\n/a/b.jpg\n/c/d.jpg\n");
        assert_eq!(targets, vec!["/a/b.jpg", "/c/d.jpg"]);
    }

    #[test]
    fn test_read_values_only_inspects_first_column() {
        let targets = values("path,label\n/a.jpg,Front\n/b.jpg,/ignored.jpg\n");
        assert_eq!(targets, vec!["/a.jpg", "/b.jpg"]);
    }

    #[test]
    fn test_read_values_skips_repeated_header_rows() {
        let targets = values("value\n/a.jpg\nvalue\n/b.jpg\n");
        assert_eq!(targets, vec!["/a.jpg", "/b.jpg"]);
    }

    #[test]
    fn test_read_values_ignores_empty_cells() {
        let targets = values("path,sku\n,SKU-1\n/a.jpg,SKU-2\n\"  \",SKU-3\n");
        assert_eq!(targets, vec!["/a.jpg"]);
    }

    #[test]
    fn test_read_values_header_only_yields_nothing() {
        assert!(values("path\n").is_empty());
        assert!(values("").is_empty());
    }

    #[test]
    fn test_read_values_ragged_rows_are_malformed() {
        let result = read_values("path,label\n/a.jpg\n".as_bytes(), Path::new("bad.csv"));
        assert!(matches!(result, Err(InputError::Malformed { .. })));
    }

    #[test]
    fn test_read_values_ignores_non_utf8_bytes_in_other_columns() {
        let targets = read_values(
            &b"value,label\n/a.jpg,Caf\xe9\n/b.jpg,ok\n"[..],
            Path::new("latin1.csv"),
        )
        .unwrap();
        let targets: Vec<&str> = targets.iter().map(Target::as_str).collect();
        assert_eq!(targets, vec!["/a.jpg", "/b.jpg"]);
    }

    #[test]
    fn test_read_values_non_utf8_first_cell_is_decoded_lossily() {
        let targets = read_values(
            &b"value\n/caf\xe9.jpg\n/b.jpg\n"[..],
            Path::new("latin1.csv"),
        )
        .unwrap();
        let targets: Vec<&str> = targets.iter().map(Target::as_str).collect();
        assert_eq!(targets, vec!["/caf\u{FFFD}.jpg", "/b.jpg"]);
    }

    #[test]
    fn test_read_content_ignores_non_utf8_bytes_in_other_columns() {
        let data = b"content,title\n{{media url=a.jpg}},Caf\xe9\n";
        let targets = read_content(&data[..], Path::new("content.csv")).unwrap();
        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].as_str(), "/media/a.jpg");
    }

    #[test]
    fn test_read_content_extracts_from_quoted_multiline_cells() {
        let data = "content\n\"<p>\n<img src=\"\"{{media url=wysiwyg/x.jpg}}\"\">\n</p>\"\n";
        assert_eq!(content(data), vec!["/media/wysiwyg/x.jpg"]);
    }

    #[test]
    fn test_read_content_skips_header_cell() {
        let data = "{{media url=header.jpg}}\n{{media url=body.jpg}}\n";
        assert_eq!(content(data), vec!["/media/body.jpg"]);
    }

    #[test]
    fn test_read_content_dedups_across_rows() {
        let data = "content\n{{media url=a.jpg}}\n\"{{media url=a.jpg}} {{media url=b.jpg}}\"\n";
        assert_eq!(content(data), vec!["/media/a.jpg", "/media/b.jpg"]);
    }

    #[test]
    fn test_read_content_without_references_is_empty() {
        assert!(content("content\n<p>no media</p>\n\n").is_empty());
    }

    #[test]
    fn test_read_values_file_missing_is_open_error() {
        let result = read_values_file(Path::new("/definitely/not/here.csv"));
        assert!(matches!(result, Err(InputError::Open { .. })));
    }

    #[test]
    fn test_read_content_file_from_disk() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("content.csv");
        std::fs::write(
            &path,
            "content,identifier\n\"<img src=\"\"{{media url=wysiwyg/x.jpg}}\"\">\",home\n",
        )
        .unwrap();

        let targets = read_content_file(&path).unwrap();
        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].as_str(), "/media/wysiwyg/x.jpg");
    }
}
