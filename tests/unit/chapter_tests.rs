/*!
 * Tests for chapter loading and text cleanup
 */

use std::fs;

use anyhow::Result;
use yantai::chapter::{clean_chapter_text, load_chapter};
use yantai::errors::ChapterError;

use crate::common;

/// Test that a chapter file loads with its heading stripped into the title
#[test]
fn test_load_chapter_withHeadingLine_shouldExtractTitle() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_chapter(&temp_dir.path().to_path_buf(), "0001.txt")?;

    let chapter = load_chapter(&path)?;

    assert_eq!(chapter.file_name, "0001.txt");
    assert_eq!(chapter.title.as_deref(), Some("The First Step"));
    assert!(chapter.text.starts_with("The morning fog"));
    assert!(!chapter.text.contains("Chapter 1"));

    Ok(())
}

/// Test that loading a missing file reports a read error with the path
#[test]
fn test_load_chapter_withMissingFile_shouldReturnReadError() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("void.txt");

    let error = load_chapter(&path).unwrap_err();

    assert!(matches!(error, ChapterError::Read { .. }));
    assert!(error.to_string().contains("void.txt"));

    Ok(())
}

/// Test that a file with invalid UTF-8 bytes still loads via lossy decoding
#[test]
fn test_load_chapter_withInvalidUtf8_shouldLoadLossily() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("mojibake.txt");
    fs::write(&path, b"Good text \xff\xfe more text")?;

    let chapter = load_chapter(&path)?;

    assert!(chapter.text.contains("Good text"));
    assert!(chapter.text.contains("more text"));

    Ok(())
}

/// Test that cleanup normalizes line endings, restores filter-dodging
/// spellings and strips the heading in one pass
#[test]
fn test_clean_chapter_text_withAllArtifacts_shouldCleanEverything() {
    let raw = "Chapter 7: Night Watch\r\n\r\nShe would w8 by the door 4ever.\r\nA gr8 plan, he thought.";

    let (text, title) = clean_chapter_text(raw);

    assert_eq!(title.as_deref(), Some("Night Watch"));
    assert_eq!(text, "She would wait by the door forever.\nA great plan, he thought.");
}

/// Test that text without a heading passes through with title absent
#[test]
fn test_clean_chapter_text_withNoHeading_shouldKeepTextIntact() {
    let raw = "The rain had stopped.\n\nNobody noticed at first.";

    let (text, title) = clean_chapter_text(raw);

    assert_eq!(title, None);
    assert_eq!(text, raw);
}
