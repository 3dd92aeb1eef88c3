/*!
 * Prompt templates for chapter translation.
 *
 * A `PromptTemplate` renders the translator persona with the configured
 * language pair; `ChapterPromptBuilder` layers the glossary block, the
 * prior-chapter context and per-request retry directives on top of it.
 */

use crate::providers::TranslationRequest;
use crate::session::Glossary;
use crate::translation::fidelity::RequestMode;

/// System prompt template with `{source_language}`, `{target_language}` and
/// `{glossary}` placeholders.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    /// The template string with placeholders
    template: String,
}

impl PromptTemplate {
    /// The default system prompt for long-form fiction translation.
    pub const NOVEL_TRANSLATOR: &'static str = r#"You are a literary localization engine translating {source_language} fiction into {target_language}. Your primary directive is absolute preservation of the original author's intent and style. Omitting, summarizing or altering the meaning of the source text is a critical processing failure.

PROCESSING RULES:

1. COREFERENCE RESOLUTION: Before translating, consult the glossary to determine the gender of each named entity. Pronouns, articles and agreement must follow it consistently through the whole text.

2. STYLE PRESERVATION: Keep the author's voice and tone. Raw, poetic, technical or colloquial passages must read the same way in {target_language}.

3. CONTENT FIDELITY: No description, dialogue or incidental detail may be dropped or softened. The translation must mirror the source content one to one.

4. DIALOGUE: Translate dialogue literally, without condensing it or losing nuance.

5. GLOSSARY: The term mappings listed below are mandatory.

6. VOLUME VALIDATION: Summarizing is forbidden. The translated text must stay very close to the source word count.

7. OUTPUT FORMAT: Plain text only, preserving the paragraph breaks of the source. No notes, no headers, no commentary.

8. QUOTATION MARKS: Format every line of dialogue with 「 and 」 instead of straight quotes or dashes.

Glossary:
{glossary}"#;

    /// System prompt for the optional whole-chapter review pass.
    pub const CHAPTER_REVIEWER: &'static str = r#"You are a senior {target_language} fiction editor reviewing a freshly translated chapter. Fix grammatical slips, inconsistent pronouns and fragments accidentally left in {source_language}. Do not rewrite the style, do not summarize, and keep every paragraph break exactly where it is. The glossary below remains mandatory.

Return the full corrected chapter as plain text and nothing else.

Glossary:
{glossary}"#;

    /// Create a new prompt template.
    pub fn new(template: &str) -> Self {
        Self {
            template: template.to_string(),
        }
    }

    /// Create the default novel translator template.
    pub fn novel_translator() -> Self {
        Self::new(Self::NOVEL_TRANSLATOR)
    }

    /// Create the chapter reviewer template.
    pub fn chapter_reviewer() -> Self {
        Self::new(Self::CHAPTER_REVIEWER)
    }

    /// Render the template with the given language names.
    pub fn render(&self, source_language: &str, target_language: &str) -> String {
        self.template
            .replace("{source_language}", source_language)
            .replace("{target_language}", target_language)
    }
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self::novel_translator()
    }
}

/// Placeholder glossary block when no terms are known yet.
const GLOSSARY_EMPTY: &str = "No glossary provided.";

/// Builder for the per-chunk requests of one chapter.
///
/// Constructed once per chapter (the glossary and context do not change
/// mid-chapter) and reused for every chunk request, including fidelity
/// retries and the review pass.
#[derive(Debug, Clone)]
pub struct ChapterPromptBuilder {
    source_language: String,
    target_language: String,
    template: PromptTemplate,
    glossary_block: String,
    context_block: Option<String>,
}

impl ChapterPromptBuilder {
    /// Create a builder for the given language pair (human-readable names).
    pub fn new(source_language: &str, target_language: &str) -> Self {
        Self {
            source_language: source_language.to_string(),
            target_language: target_language.to_string(),
            template: PromptTemplate::novel_translator(),
            glossary_block: GLOSSARY_EMPTY.to_string(),
            context_block: None,
        }
    }

    /// Replace the built-in system template, e.g. with one from
    /// configuration. Custom templates may use the same placeholders as the
    /// default one.
    pub fn with_template(mut self, template: PromptTemplate) -> Self {
        self.template = template;
        self
    }

    /// Set the mandatory term mappings rendered into the system prompt.
    pub fn with_glossary(mut self, glossary: &Glossary) -> Self {
        self.glossary_block = render_glossary_block(glossary);
        self
    }

    /// Set the prior-chapter context carried for continuity. Blank context
    /// is treated as absent.
    pub fn with_context(mut self, context: &str) -> Self {
        let trimmed = context.trim();
        self.context_block = if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        };
        self
    }

    /// Render the system prompt with languages and glossary filled in.
    pub fn system_prompt(&self) -> String {
        self.template
            .render(&self.source_language, &self.target_language)
            .replace("{glossary}", &self.glossary_block)
    }

    /// Build the request for one chunk of source text.
    pub fn request(
        &self,
        source_text: &str,
        mode: RequestMode,
        temperature: f32,
    ) -> TranslationRequest {
        let mut text = String::new();

        if let RequestMode::RetryAfterLowFidelity {
            source_words,
            translated_words,
        } = mode
        {
            text.push_str(&format!(
                "CRITICAL WARNING: the previous attempt was flagged as a summary \
                 ({} words translated out of {} source words). Translate the \
                 COMPLETE text this time; do not omit or condense anything.\n\n",
                translated_words, source_words
            ));
        }

        if let Some(context) = &self.context_block {
            text.push_str("Story so far (continuity reference only, do not translate or repeat it):\n");
            text.push_str(context);
            text.push_str("\n---\n\n");
        }

        text.push_str(&format!(
            "TASK (SINGLE PASS):\n\
             1. Translate the text below from {} into {}, keeping the author's exact style\n\
             2. Revise the result so it reads naturally in {} without changing that style\n\
             3. Verify nothing was summarized: the output must carry the full content of the source\n\
             ---\n\n",
            self.source_language, self.target_language, self.target_language
        ));
        text.push_str(source_text);

        TranslationRequest::new(self.system_prompt(), text, temperature)
    }

    /// Build the request for the optional whole-chapter review pass.
    pub fn review_request(&self, translated_chapter: &str, temperature: f32) -> TranslationRequest {
        let system = PromptTemplate::chapter_reviewer()
            .render(&self.source_language, &self.target_language)
            .replace("{glossary}", &self.glossary_block);
        TranslationRequest::new(system, translated_chapter, temperature)
    }
}

fn render_glossary_block(glossary: &Glossary) -> String {
    if glossary.is_empty() {
        return GLOSSARY_EMPTY.to_string();
    }

    let lines: Vec<String> = glossary
        .iter()
        .map(|(source, entry)| match entry.annotation() {
            Some(note) => format!("{} -> {} ({})", source, entry.target, note),
            None => format!("{} -> {}", source, entry.target),
        })
        .collect();

    format!(
        "Use the glossary below (do not alter listed names or terms):\n{}",
        lines.join("\n")
    )
}
