/*!
 * Tests for file utility functions
 */

use std::fs;
use anyhow::Result;
use lexparity::file_utils::FileManager;
use crate::common;

/// Test that file_exists returns true for existing files
#[test]
fn test_file_exists_withExistingFile_shouldReturnTrue() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let test_file = common::create_test_file(temp_dir.path(), "BDB1.html", "<p>x</p>")?;

    assert!(FileManager::file_exists(&test_file));
    assert!(!FileManager::dir_exists(&test_file));

    Ok(())
}

/// Test that file_exists returns false for non-existent files
#[test]
fn test_file_exists_withNonExistentFile_shouldReturnFalse() {
    assert!(!FileManager::file_exists("non_existent_file.tmp"));
}

/// Test that find_files walks subdirectories and matches extensions case-insensitively
#[test]
fn test_find_files_withMixedExtensions_shouldReturnMatchesOnly() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_test_file(temp_dir.path(), "BDB1.html", "a")?;
    common::create_test_file(temp_dir.path(), "BDB2.HTML", "b")?;
    common::create_test_file(temp_dir.path(), "style.css", "c")?;
    common::create_test_file(temp_dir.path(), "nested/BDB3.html", "d")?;

    let mut found = FileManager::find_files(temp_dir.path(), ".html")?;
    found.sort();

    assert_eq!(found.len(), 3);
    assert!(found.iter().all(|p| p.extension().is_some_and(|e| e.eq_ignore_ascii_case("html"))));

    Ok(())
}

/// Test that file_stem gives the entry key
#[test]
fn test_file_stem_withEntryPath_shouldReturnKey() {
    assert_eq!(FileManager::file_stem("Entries/BDB17.html"), Some("BDB17".to_string()));
}

/// Test that write_to_file creates missing parent directories
#[test]
fn test_write_to_file_withMissingParent_shouldCreateIt() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let test_file = temp_dir.path().join("out").join("report.jsonl");

    FileManager::write_to_file(&test_file, "line\n")?;

    assert_eq!(fs::read_to_string(&test_file)?, "line\n");
    Ok(())
}

/// Test that append_line keeps previous lines
#[test]
fn test_append_line_calledTwice_shouldKeepBothLines() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let test_file = temp_dir.path().join("clean.txt");

    FileManager::append_line(&test_file, "BDB1 0123abcd")?;
    FileManager::append_line(&test_file, "BDB2 4567ef01")?;

    let content = FileManager::read_to_string(&test_file)?;
    assert_eq!(content, "BDB1 0123abcd\nBDB2 4567ef01\n");
    Ok(())
}

/// Test that read_to_string reports the path on failure
#[test]
fn test_read_to_string_withMissingFile_shouldNameThePath() {
    let error = FileManager::read_to_string("missing_entry_12345.html").unwrap_err();
    assert!(error.to_string().contains("missing_entry_12345.html"));
}
