//! Integration tests for job-set resolution from CSV exports on disk.

use std::fs;
use std::path::PathBuf;

use mediadump_core::{InputError, Target, resolve_job_set};
use tempfile::TempDir;

fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

fn as_strs(targets: &[Target]) -> Vec<&str> {
    targets.iter().map(Target::as_str).collect()
}

#[test]
fn test_values_export_drops_header_and_duplicates() {
    let dir = TempDir::new().unwrap();
    let values = write(&dir, "values.csv", "path\n/a/b.jpg\n/a/b.jpg\n/c/d.jpg\n");

    let jobs = resolve_job_set(Some(&values), None).unwrap();

    assert_eq!(jobs.len(), 2);
    assert_eq!(as_strs(jobs.targets()), vec!["/a/b.jpg", "/c/d.jpg"]);
}

#[test]
fn test_content_export_yields_media_paths() {
    let dir = TempDir::new().unwrap();
    let content = write(
        &dir,
        "content.csv",
        "content\n\"<img src=\"\"{{media url=wysiwyg/x.jpg}}\"\">\"\n",
    );

    let jobs = resolve_job_set(None, Some(&content)).unwrap();

    assert_eq!(as_strs(jobs.targets()), vec!["/media/wysiwyg/x.jpg"]);
}

#[test]
fn test_content_export_with_multiline_page_builder_cell() {
    let dir = TempDir::new().unwrap();
    let cell = concat!(
        "<div data-content-type=\"row\">\n",
        "  <picture>\n",
        "    <source srcset=\"{{media url=wysiwyg/plp/hf/plp-grid-image-desktop.jpg}}\">\n",
        "    <img src=\"{{media url=wysiwyg/plp/hf/plp-grid-image-mobile.jpg}}\">\n",
        "  </picture>\n",
        "</div>"
    );
    let escaped = cell.replace('"', "\"\"");
    let content = write(
        &dir,
        "content.csv",
        &format!("content,identifier\n\"{escaped}\",plp-grid\n"),
    );

    let jobs = resolve_job_set(None, Some(&content)).unwrap();

    assert_eq!(
        as_strs(jobs.targets()),
        vec![
            "/media/wysiwyg/plp/hf/plp-grid-image-desktop.jpg",
            "/media/wysiwyg/plp/hf/plp-grid-image-mobile.jpg",
        ]
    );
}

#[test]
fn test_both_exports_content_first_then_values_deduplicated() {
    let dir = TempDir::new().unwrap();
    let values = write(
        &dir,
        "values.csv",
        "value\n/media/shared.jpg\n/media/values-only.jpg\n",
    );
    let content = write(
        &dir,
        "content.csv",
        "content\n{{media url=content-only.jpg}} {{media url=shared.jpg}}\n",
    );

    let jobs = resolve_job_set(Some(&values), Some(&content)).unwrap();

    assert_eq!(
        as_strs(jobs.targets()),
        vec![
            "/media/content-only.jpg",
            "/media/shared.jpg",
            "/media/values-only.jpg",
        ]
    );
}

#[test]
fn test_missing_file_is_an_open_error() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("absent.csv");

    let error = resolve_job_set(Some(&missing), None).unwrap_err();

    assert!(matches!(error, InputError::Open { .. }));
    assert!(error.to_string().contains("absent.csv"));
}

#[test]
fn test_ragged_csv_is_a_malformed_error() {
    let dir = TempDir::new().unwrap();
    let values = write(&dir, "values.csv", "path,label\n/a.jpg,a\n/b.jpg\n");

    let error = resolve_job_set(Some(&values), None).unwrap_err();

    assert!(matches!(error, InputError::Malformed { .. }));
}

#[test]
fn test_no_sources_yields_empty_job_set() {
    let jobs = resolve_job_set(None, None).unwrap();
    assert!(jobs.is_empty());
}
