/*!
 * Tests for the per-novel report writer
 */

use std::time::Duration;

use anyhow::Result;
use yantai::report::{ChapterStats, ReportWriter, REPORT_FILE_NAME};
use yantai::translation::pipeline::ChapterMetrics;
use yantai::file_utils::FileManager;

use crate::common;

fn metrics() -> ChapterMetrics {
    ChapterMetrics {
        source_words: 120,
        translated_words: 117,
        source_chars: 640,
        translated_chars: 655,
        chunk_count: 2,
        retry_count: 0,
        low_fidelity_chunks: 0,
        elapsed: Duration::from_secs(4),
    }
}

/// Test that write_to lands the CSV under the configured file name
#[test]
fn test_write_to_withRows_shouldCreateReportFile() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;

    let mut report = ReportWriter::new();
    report.add_row(ChapterStats::from_metrics("0001.txt", &metrics(), 3));
    report.add_row(ChapterStats::failed("0002.txt", "lost chapter text"));

    let path = report.write_to(temp_dir.path())?;

    assert_eq!(path.file_name().unwrap(), REPORT_FILE_NAME);
    let content = FileManager::read_to_string(&path)?;
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("file,source_words,"));
    assert!(lines[1].starts_with("0001.txt,120,117,97.5,"));
    assert!(lines[2].ends_with(",failed"));

    Ok(())
}

/// Test that an empty report still writes a header-only file
#[test]
fn test_write_to_withNoRows_shouldWriteHeaderOnly() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;

    let report = ReportWriter::new();
    let path = report.write_to(temp_dir.path())?;

    let content = FileManager::read_to_string(&path)?;
    assert_eq!(content.lines().count(), 1);

    Ok(())
}

/// Test that rows() exposes what was added, in order
#[test]
fn test_rows_afterAdding_shouldPreserveOrder() {
    let mut report = ReportWriter::new();
    report.add_row(ChapterStats::from_metrics("0002.txt", &metrics(), 0));
    report.add_row(ChapterStats::from_metrics("0001.txt", &metrics(), 0));

    let names: Vec<&str> = report.rows().iter().map(|r| r.file_name.as_str()).collect();
    assert_eq!(names, vec!["0002.txt", "0001.txt"]);
}
