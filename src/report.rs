/*!
 * Per-novel translation stats report.
 *
 * One CSV row per chapter with the volume numbers worth checking after a
 * run: word and character counts on both sides, the fidelity percentage,
 * and how hard the guard had to work. Failed chapters stay visible as
 * zero-output rows instead of silently disappearing from the report.
 */

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::file_utils::FileManager;
use crate::translation::fidelity::count_words;
use crate::translation::pipeline::ChapterMetrics;

/// File name of the per-novel report.
pub const REPORT_FILE_NAME: &str = "translation_report.csv";

const CSV_HEADER: &str = "file,source_words,translated_words,volume_fidelity_pct,source_chars,translated_chars,chunks,retries,low_fidelity_chunks,new_terms,elapsed_s,status";

/// Count characters excluding spaces, tabs and newlines.
pub fn count_chars(text: &str) -> usize {
    text.chars().filter(|c| !matches!(c, ' ' | '\n' | '\t')).count()
}

/// Outcome recorded for one chapter row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChapterStatus {
    /// Chapter translated and written
    Ok,
    /// Chapter aborted, zero output
    Failed,
}

impl ChapterStatus {
    fn as_str(self) -> &'static str {
        match self {
            ChapterStatus::Ok => "ok",
            ChapterStatus::Failed => "failed",
        }
    }
}

/// One stats row of the report.
#[derive(Debug, Clone)]
pub struct ChapterStats {
    pub file_name: String,
    pub source_words: usize,
    pub translated_words: usize,
    pub source_chars: usize,
    pub translated_chars: usize,
    pub chunk_count: usize,
    pub retry_count: u32,
    pub low_fidelity_chunks: usize,
    pub new_terms: usize,
    pub elapsed_secs: f64,
    pub status: ChapterStatus,
}

impl ChapterStats {
    /// Build a row from the metrics of a completed chapter.
    pub fn from_metrics(file_name: &str, metrics: &ChapterMetrics, new_terms: usize) -> Self {
        Self {
            file_name: file_name.to_string(),
            source_words: metrics.source_words,
            translated_words: metrics.translated_words,
            source_chars: metrics.source_chars,
            translated_chars: metrics.translated_chars,
            chunk_count: metrics.chunk_count,
            retry_count: metrics.retry_count,
            low_fidelity_chunks: metrics.low_fidelity_chunks,
            new_terms,
            elapsed_secs: metrics.elapsed.as_secs_f64(),
            status: ChapterStatus::Ok,
        }
    }

    /// Build the zero-output row for a chapter that failed.
    pub fn failed(file_name: &str, source_text: &str) -> Self {
        Self {
            file_name: file_name.to_string(),
            source_words: count_words(source_text),
            translated_words: 0,
            source_chars: count_chars(source_text),
            translated_chars: 0,
            chunk_count: 0,
            retry_count: 0,
            low_fidelity_chunks: 0,
            new_terms: 0,
            elapsed_secs: 0.0,
            status: ChapterStatus::Failed,
        }
    }

    /// Translated word volume as a percentage of the source word count.
    pub fn volume_fidelity_pct(&self) -> f64 {
        if self.source_words == 0 {
            return 100.0;
        }
        (self.translated_words as f64 / self.source_words as f64) * 100.0
    }

    fn to_csv_line(&self) -> String {
        [
            escape_csv_field(&self.file_name),
            self.source_words.to_string(),
            self.translated_words.to_string(),
            format!("{:.1}", self.volume_fidelity_pct()),
            self.source_chars.to_string(),
            self.translated_chars.to_string(),
            self.chunk_count.to_string(),
            self.retry_count.to_string(),
            self.low_fidelity_chunks.to_string(),
            self.new_terms.to_string(),
            format!("{:.2}", self.elapsed_secs),
            self.status.as_str().to_string(),
        ]
        .join(",")
    }
}

/// Collects chapter rows and writes the per-novel CSV report.
#[derive(Debug, Default)]
pub struct ReportWriter {
    rows: Vec<ChapterStats>,
}

impl ReportWriter {
    /// Create an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one chapter row.
    pub fn add_row(&mut self, row: ChapterStats) {
        self.rows.push(row);
    }

    /// Get the collected rows.
    pub fn rows(&self) -> &[ChapterStats] {
        &self.rows
    }

    /// Render the full report as CSV text.
    pub fn to_csv(&self) -> String {
        let mut out = String::from(CSV_HEADER);
        out.push('\n');
        for row in &self.rows {
            out.push_str(&row.to_csv_line());
            out.push('\n');
        }
        out
    }

    /// Write the report into the given novel output directory.
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(REPORT_FILE_NAME);
        FileManager::write_to_file(&path, &self.to_csv())?;
        Ok(path)
    }
}

fn escape_csv_field(raw: &str) -> String {
    if raw.contains(',') || raw.contains('"') || raw.contains('\n') {
        format!("\"{}\"", raw.replace('"', "\"\""))
    } else {
        raw.to_string()
    }
}
