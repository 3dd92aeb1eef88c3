/*!
 * Chapter translation pipeline built on AI providers.
 *
 * This module contains the core functionality for translating novel chapters
 * through an external model provider. It is split into several submodules:
 *
 * - `chunker`: Paragraph-aware segmentation of chapter text into overlapping chunks
 * - `fidelity`: Volume-ratio guard around each translate call with one bounded retry
 * - `quotes`: Multi-pass repair of bracket-pair dialogue quoting
 * - `prompts`: Prompt templates and builders for translation and review
 * - `terms`: Heuristics for spotting glossary candidates in source text
 * - `pipeline`: Per-chapter orchestration tying the pieces together
 */

// Re-export main types for easier usage
pub use self::chunker::{segment, Chunk};
pub use self::fidelity::{FidelityGuard, GuardedTranslation, RequestMode};
pub use self::pipeline::{ChapterOutcome, ChapterPipeline};
pub use self::prompts::{ChapterPromptBuilder, PromptTemplate};
pub use self::quotes::QuoteNormalizer;

// Submodules
pub mod chunker;
pub mod fidelity;
pub mod pipeline;
pub mod prompts;
pub mod quotes;
pub mod terms;
