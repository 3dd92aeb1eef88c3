/*!
 * Per-chapter translation orchestration.
 *
 * One call takes cleaned chapter text through segmentation, the guarded
 * sequential chunk loop, concatenation, quote normalization, glossary
 * post-correction and the optional review pass. Chunks are translated
 * strictly one at a time: the provider is a shared, rate-limited resource
 * and the guard paces every call.
 */

use std::time::{Duration, Instant};

use anyhow::Result;
use log::{debug, info, warn};

use crate::app_config::Config;
use crate::errors::ChapterError;
use crate::language_utils::get_language_name;
use crate::providers::Provider;
use crate::report::count_chars;
use crate::session::Glossary;
use crate::translation::chunker::{segment, Chunk};
use crate::translation::fidelity::{count_words, FidelityGuard};
use crate::translation::prompts::{ChapterPromptBuilder, PromptTemplate};
use crate::translation::quotes::QuoteNormalizer;

/// Numbers gathered while translating one chapter.
#[derive(Debug, Clone)]
pub struct ChapterMetrics {
    /// Source word count (whitespace tokens)
    pub source_words: usize,

    /// Final translated word count
    pub translated_words: usize,

    /// Source character count excluding whitespace
    pub source_chars: usize,

    /// Final translated character count excluding whitespace
    pub translated_chars: usize,

    /// Number of chunks the chapter was split into
    pub chunk_count: usize,

    /// Fidelity retries spent across all chunks
    pub retry_count: u32,

    /// Chunks still under the fidelity threshold after their retry
    pub low_fidelity_chunks: usize,

    /// Wall-clock time for the whole chapter
    pub elapsed: Duration,
}

/// Final text and metrics for one translated chapter.
#[derive(Debug, Clone)]
pub struct ChapterOutcome {
    /// The chapter translation after all post-processing
    pub text: String,

    /// What it took to get there
    pub metrics: ChapterMetrics,
}

/// Orchestrates the translation of one chapter at a time.
pub struct ChapterPipeline<'a> {
    provider: &'a dyn Provider,
    guard: FidelityGuard,
    source_language: String,
    target_language: String,
    custom_template: Option<PromptTemplate>,
    chunk_size: usize,
    overlap: usize,
    direct_translation_cutoff: usize,
    semantic_review: bool,
    review_temperature: f32,
}

impl<'a> ChapterPipeline<'a> {
    /// Create a pipeline for the given provider and configuration.
    pub fn new(provider: &'a dyn Provider, config: &Config) -> Result<Self> {
        let system_prompt = config.translation.common.system_prompt.trim();
        let custom_template = if system_prompt.is_empty() {
            None
        } else {
            Some(PromptTemplate::new(system_prompt))
        };

        Ok(Self {
            provider,
            guard: FidelityGuard::from_config(config),
            source_language: get_language_name(&config.source_language)?,
            target_language: get_language_name(&config.target_language)?,
            custom_template,
            chunk_size: config.chunking.chunk_size,
            overlap: config.chunking.overlap,
            direct_translation_cutoff: config.chunking.direct_translation_cutoff,
            semantic_review: config.translation.semantic_review,
            review_temperature: config.translation.common.temperature,
        })
    }

    /// Translate one cleaned chapter.
    ///
    /// The glossary and prior-chapter context are the caller's session
    /// state, passed explicitly. `progress_callback` is invoked with
    /// (completed, total) after every chunk.
    ///
    /// A provider error on any chunk aborts the chapter and discards the
    /// chunks translated so far; recovering is the caller's call.
    pub async fn translate_chapter(
        &self,
        source_text: &str,
        glossary: &Glossary,
        context: &str,
        progress_callback: impl Fn(usize, usize),
    ) -> Result<ChapterOutcome, ChapterError> {
        let started = Instant::now();
        let prompts = self.chapter_prompts(glossary, context);

        let chunks = self.plan_chunks(source_text)?;
        let total = chunks.len();

        let mut translated_chunks: Vec<String> = Vec::with_capacity(total);
        let mut retry_count = 0u32;
        let mut low_fidelity_chunks = 0usize;

        for (i, chunk) in chunks.iter().enumerate() {
            debug!(
                "Translating chunk {}/{} (offsets {}..{}, {} words)",
                i + 1,
                total,
                chunk.start_offset,
                chunk.end_offset,
                count_words(&chunk.text)
            );

            let guarded = self
                .guard
                .translate_chunk(self.provider, &prompts, &chunk.text)
                .await?;

            retry_count += guarded.attempts - 1;
            if guarded.low_fidelity {
                low_fidelity_chunks += 1;
            }

            translated_chunks.push(guarded.text);
            progress_callback(i + 1, total);
        }

        // Overlap regions are small by construction; join without separators
        // and fix quoting over the whole text so no dialogue line is split
        // across a chunk boundary.
        let combined = translated_chunks.concat();
        let normalized = QuoteNormalizer::normalize(&combined);
        let corrected = glossary.apply(&normalized);

        let text = if self.semantic_review {
            self.review(&prompts, corrected).await
        } else {
            corrected
        };

        let metrics = ChapterMetrics {
            source_words: count_words(source_text),
            translated_words: count_words(&text),
            source_chars: count_chars(source_text),
            translated_chars: count_chars(&text),
            chunk_count: total,
            retry_count,
            low_fidelity_chunks,
            elapsed: started.elapsed(),
        };

        info!(
            "Chapter done: {}/{} words, {} chunks, {} retries, {:.1}s",
            metrics.translated_words,
            metrics.source_words,
            metrics.chunk_count,
            metrics.retry_count,
            metrics.elapsed.as_secs_f64()
        );

        Ok(ChapterOutcome { text, metrics })
    }

    fn chapter_prompts(&self, glossary: &Glossary, context: &str) -> ChapterPromptBuilder {
        let mut builder = ChapterPromptBuilder::new(&self.source_language, &self.target_language)
            .with_glossary(glossary)
            .with_context(context);

        if let Some(template) = &self.custom_template {
            builder = builder.with_template(template.clone());
        }

        builder
    }

    /// Segment the chapter, or take the short-text fast path: below the
    /// cutoff the whole chapter goes through as a single chunk.
    fn plan_chunks(&self, source_text: &str) -> Result<Vec<Chunk>, ChapterError> {
        if source_text.chars().count() < self.direct_translation_cutoff {
            debug!(
                "Chapter under the direct translation cutoff ({} chars), skipping segmentation",
                self.direct_translation_cutoff
            );
            return Ok(vec![Chunk {
                text: source_text.to_string(),
                start_offset: 0,
                end_offset: source_text.len(),
            }]);
        }

        Ok(segment(source_text, self.chunk_size, self.overlap)?)
    }

    /// Whole-chapter review pass, best-effort: any failure or empty answer
    /// keeps the unreviewed draft.
    async fn review(&self, prompts: &ChapterPromptBuilder, draft: String) -> String {
        debug!("Running semantic review pass over the full chapter");
        let request = prompts.review_request(&draft, self.review_temperature);

        match self.guard.call_unguarded(self.provider, &request).await {
            Ok(reviewed) if !reviewed.trim().is_empty() => reviewed,
            Ok(_) => {
                warn!("Semantic review returned empty text, keeping unreviewed draft");
                draft
            }
            Err(e) => {
                warn!("Semantic review failed ({}), keeping unreviewed draft", e);
                draft
            }
        }
    }
}
