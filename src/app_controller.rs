use anyhow::{anyhow, Context, Result};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use log::{debug, error, info, warn};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::app_config::Config;
use crate::chapter::{self, Chapter};
use crate::file_utils::FileManager;
use crate::providers::{create_provider, Provider};
use crate::report::{ChapterStats, ReportWriter};
use crate::session::store::trim_to_tail;
use crate::session::SessionStore;
use crate::translation::terms;
use crate::translation::ChapterPipeline;

// @module: Batch controller driving novel-by-novel chapter translation

/// Session name of the implicit novel formed by chapter files sitting
/// directly in the input directory
pub const ROOT_NOVEL: &str = ".";

/// Largest context-memory block appended per finished chapter, in characters
const CONTEXT_TAIL_CHARS: usize = 1200;

/// Occurrences required before a capitalized token becomes a glossary
/// suggestion
const SUGGESTION_MIN_OCCURRENCES: usize = 3;

/// One novel to process: its session name and chapter files in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NovelBatch {
    /// Session name ("." for loose files at the input root)
    pub name: String,
    /// Chapter files in lexicographic order
    pub chapters: Vec<PathBuf>,
}

/// Counters for one batch run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// Chapters translated and written
    pub processed: usize,
    /// Chapters skipped because their output already existed
    pub skipped: usize,
    /// Chapters recorded as failed rows
    pub failed: usize,
}

/// Main application controller for batch novel translation
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        Ok(Self { config })
    }

    /// Run the batch over every novel under the input directory.
    ///
    /// Builds the configured provider and checks it is reachable once,
    /// before any chapter work starts.
    pub async fn run(
        &self,
        input_dir: PathBuf,
        output_dir: PathBuf,
        force_overwrite: bool,
    ) -> Result<BatchSummary> {
        if !FileManager::dir_exists(&input_dir) {
            return Err(anyhow!("Input directory does not exist: {:?}", input_dir));
        }

        let provider = create_provider(&self.config.translation)?;

        info!(
            "🚀 yantai: {} - {}",
            self.config.translation.provider.display_name(),
            self.config.translation.get_model()
        );

        provider.test_connection().await.with_context(|| {
            format!(
                "Provider '{}' is not reachable, check the endpoint configuration",
                provider.name()
            )
        })?;

        self.run_with_provider(provider.as_ref(), &input_dir, &output_dir, force_overwrite)
            .await
    }

    /// Run the batch against an already-built provider. Split out from
    /// [`Controller::run`] so tests can drive the full flow with a mock.
    pub async fn run_with_provider(
        &self,
        provider: &dyn Provider,
        input_dir: &Path,
        output_dir: &Path,
        force_overwrite: bool,
    ) -> Result<BatchSummary> {
        let start_time = Instant::now();

        if !FileManager::dir_exists(input_dir) {
            return Err(anyhow!("Input directory does not exist: {:?}", input_dir));
        }

        let novels = discover_novels(input_dir)?;
        if novels.is_empty() {
            return Err(anyhow!(
                "No .txt chapter files found in directory: {:?}",
                input_dir
            ));
        }

        let store = SessionStore::open(&self.config.session)?;
        let pipeline = ChapterPipeline::new(provider, &self.config)?;

        let total_chapters: usize = novels.iter().map(|novel| novel.chapters.len()).sum();
        let multi_progress = MultiProgress::new();
        let batch_pb = multi_progress.add(ProgressBar::new(total_chapters as u64));
        batch_pb.set_style(progress_style("chapters"));
        batch_pb.set_message("Processing chapters");

        let mut summary = BatchSummary::default();

        for novel in &novels {
            info!(
                "Novel '{}': {} chapter file(s)",
                novel.name,
                novel.chapters.len()
            );
            store.ensure_novel(&novel.name)?;

            let novel_output_dir = if novel.name == ROOT_NOVEL {
                output_dir.to_path_buf()
            } else {
                output_dir.join(&novel.name)
            };
            FileManager::ensure_dir(&novel_output_dir)?;

            let mut report = ReportWriter::new();

            for chapter_file in &novel.chapters {
                let file_name = chapter_file
                    .file_name()
                    .map(|f| f.to_string_lossy().to_string())
                    .unwrap_or_else(|| "unknown".to_string());
                batch_pb.set_message(format!("Translating: {}", file_name));

                let output_path = FileManager::generate_output_path(
                    chapter_file,
                    &novel_output_dir,
                    &self.config.target_language,
                    "txt",
                );
                if output_path.exists() && !force_overwrite {
                    warn!(
                        "Skipping {}, translation already exists (use -f to force overwrite)",
                        file_name
                    );
                    summary.skipped += 1;
                    batch_pb.inc(1);
                    continue;
                }

                let loaded = match chapter::load_chapter(chapter_file) {
                    Ok(loaded) => loaded,
                    Err(e) => {
                        error!("Error loading chapter {}: {}", file_name, e);
                        report.add_row(ChapterStats::failed(&file_name, ""));
                        summary.failed += 1;
                        batch_pb.inc(1);
                        continue;
                    }
                };

                match self
                    .process_chapter(
                        &pipeline,
                        &store,
                        &novel.name,
                        &loaded,
                        &output_path,
                        &multi_progress,
                    )
                    .await
                {
                    Ok(stats) => {
                        report.add_row(stats);
                        summary.processed += 1;
                    }
                    Err(e) => {
                        error!("Error translating chapter {}: {}", file_name, e);
                        report.add_row(ChapterStats::failed(&loaded.file_name, &loaded.text));
                        summary.failed += 1;
                    }
                }

                batch_pb.inc(1);
            }

            let report_path = report.write_to(&novel_output_dir)?;
            info!("Report written to {}", report_path.display());
        }

        batch_pb.finish_with_message("Batch complete");

        info!(
            "Batch completed: {} translated, {} skipped, {} failed - Duration: {}",
            summary.processed,
            summary.skipped,
            summary.failed,
            format_duration(start_time.elapsed())
        );

        Ok(summary)
    }

    /// Translate one loaded chapter, write its output and update the novel
    /// session. Returns the stats row for the report.
    async fn process_chapter(
        &self,
        pipeline: &ChapterPipeline<'_>,
        store: &SessionStore,
        novel: &str,
        loaded: &Chapter,
        output_path: &Path,
        multi_progress: &MultiProgress,
    ) -> Result<ChapterStats> {
        let glossary = store.load_glossary(novel)?;
        let context = store.read_context(novel)?;

        if let Some(title) = &loaded.title {
            debug!("Chapter {} title: {}", loaded.file_name, title);
        }
        debug!(
            "Translating {} ({} chars, {} glossary terms)",
            loaded.file_name,
            loaded.text.chars().count(),
            glossary.len()
        );

        // Chunk count is only known once segmentation runs, so the bar
        // length is set from inside the progress callback.
        let chunk_pb = multi_progress.add(ProgressBar::new(1));
        chunk_pb.set_style(progress_style("chunks"));
        chunk_pb.set_message("Translating");

        let pb = chunk_pb.clone();
        let result = pipeline
            .translate_chapter(&loaded.text, &glossary, &context, move |done, total| {
                pb.set_length(total as u64);
                pb.set_position(done as u64);
            })
            .await;

        // Clear the chunk bar, also on failure, so only the batch bar stays
        // visible between chapters
        chunk_pb.finish_and_clear();
        let outcome = result?;

        FileManager::write_to_file(output_path, &outcome.text)?;
        info!("Success: {}", output_path.display());

        store.append_context(novel, &context_block(loaded, &outcome.text))?;

        let new_terms = terms::count_new_terms(&loaded.text, &glossary);
        let candidates = terms::suggest_terms(&loaded.text, &glossary, SUGGESTION_MIN_OCCURRENCES);
        if !candidates.is_empty() {
            store.append_suggestions(novel, &candidates)?;
        }

        Ok(ChapterStats::from_metrics(
            &loaded.file_name,
            &outcome.metrics,
            new_terms,
        ))
    }
}

/// Discover the novels under the input directory: each immediate
/// subdirectory is one novel, loose .txt files at the top level form the
/// implicit novel ".". Subdirectories without any chapter file are skipped.
pub fn discover_novels(input_dir: &Path) -> Result<Vec<NovelBatch>> {
    let mut novels = Vec::new();

    let mut root_chapters: Vec<PathBuf> = Vec::new();
    for entry in fs::read_dir(input_dir)
        .with_context(|| format!("Failed to read directory: {:?}", input_dir))?
    {
        let entry = entry.context("Failed to read directory entry")?;
        let path = entry.path();
        if path.is_file()
            && path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("txt"))
        {
            root_chapters.push(path);
        }
    }
    root_chapters.sort();
    if !root_chapters.is_empty() {
        novels.push(NovelBatch {
            name: ROOT_NOVEL.to_string(),
            chapters: root_chapters,
        });
    }

    for subdir in FileManager::list_subdirs(input_dir)? {
        let name = match subdir.file_name() {
            Some(name) => name.to_string_lossy().to_string(),
            None => continue,
        };

        let chapters = FileManager::find_files(&subdir, "txt")?;
        if chapters.is_empty() {
            debug!("Skipping '{}', no chapter files found", name);
            continue;
        }

        novels.push(NovelBatch { name, chapters });
    }

    Ok(novels)
}

/// Build the context-memory block for a finished chapter: the tail of the
/// translated text, headed by the chapter title when one was detected.
fn context_block(loaded: &Chapter, translated: &str) -> String {
    let tail = trim_to_tail(translated, CONTEXT_TAIL_CHARS);
    match &loaded.title {
        Some(title) => format!("[{}]\n{}", title, tail),
        None => tail,
    }
}

/// Progress bar style shared by the batch and chunk bars
fn progress_style(unit: &str) -> ProgressStyle {
    ProgressStyle::default_bar()
        .template(&format!(
            "{{spinner:.green}} [{{elapsed_precise}}] [{{bar:40.cyan/blue}}] {{pos}}/{{len}} {} ({{percent}}%) {{msg}} {{eta}}",
            unit
        ))
        .or_else(|_| {
            ProgressStyle::default_bar().template(&format!(
                "{{spinner}} [{{elapsed_precise}}] [{{bar:40}}] {{pos}}/{{len}} {} ({{percent}}%) {{msg}}",
                unit
            ))
        })
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▓▒░")
}

// Format duration in a human-readable format (HH:MM:SS)
fn format_duration(duration: std::time::Duration) -> String {
    let total_seconds = duration.as_secs();
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, seconds)
    } else {
        format!("{}.{:03}s", seconds, duration.subsec_millis())
    }
}
