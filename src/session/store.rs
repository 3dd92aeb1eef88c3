/*!
 * File-backed persistence for per-novel session state.
 *
 * Layout under the session root:
 *
 * ```text
 * sessions/<novel>/glossary/terms.json   accumulated term mappings
 * sessions/<novel>/context_memory.txt    running tail of translated chapters
 * sessions/<novel>/suggestions.json      extracted glossary candidates
 * ```
 *
 * Plain files so state can be inspected and hand-edited between runs.
 */

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use log::debug;

use crate::app_config::SessionConfig;
use crate::errors::SessionError;
use crate::session::models::Glossary;

/// Persistent store for per-novel glossaries, context memory and term
/// suggestions.
#[derive(Debug, Clone)]
pub struct SessionStore {
    root: PathBuf,
    context_char_budget: usize,
}

impl SessionStore {
    /// Open a store rooted at the configured directory, falling back to the
    /// platform data directory.
    pub fn open(config: &SessionConfig) -> Result<Self, SessionError> {
        let root = match &config.root {
            Some(root) => root.clone(),
            None => Self::default_root()?,
        };

        Ok(Self {
            root,
            context_char_budget: config.context_char_budget,
        })
    }

    /// Get the default session root under the system data directory.
    pub fn default_root() -> Result<PathBuf, SessionError> {
        let base_dir = dirs::data_local_dir()
            .or_else(dirs::data_dir)
            .or_else(|| dirs::home_dir().map(|h| h.join(".local").join("share")))
            .ok_or(SessionError::NoDataDir)?;

        Ok(base_dir.join("yantai"))
    }

    /// Get the root directory of this store.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the session directory of one novel.
    pub fn novel_dir(&self, novel: &str) -> PathBuf {
        self.root.join("sessions").join(novel)
    }

    fn terms_path(&self, novel: &str) -> PathBuf {
        self.novel_dir(novel).join("glossary").join("terms.json")
    }

    fn context_path(&self, novel: &str) -> PathBuf {
        self.novel_dir(novel).join("context_memory.txt")
    }

    fn suggestions_path(&self, novel: &str) -> PathBuf {
        self.novel_dir(novel).join("suggestions.json")
    }

    /// Create the session layout for a novel if it does not exist yet.
    pub fn ensure_novel(&self, novel: &str) -> Result<(), SessionError> {
        fs::create_dir_all(self.novel_dir(novel).join("glossary"))?;

        let terms = self.terms_path(novel);
        if !terms.exists() {
            fs::write(&terms, "{}")?;
        }

        let context = self.context_path(novel);
        if !context.exists() {
            fs::write(&context, "")?;
        }

        Ok(())
    }

    /// Load the glossary of a novel. A missing file is an empty glossary;
    /// a file that does not parse is an error, not silently discarded state.
    pub fn load_glossary(&self, novel: &str) -> Result<Glossary, SessionError> {
        let path = self.terms_path(novel);
        if !path.exists() {
            return Ok(Glossary::default());
        }

        let content = fs::read_to_string(&path)?;
        serde_json::from_str(&content).map_err(|source| SessionError::Malformed {
            path: path.display().to_string(),
            source,
        })
    }

    /// Merge new terms into the stored glossary, append-only: existing keys
    /// are never overwritten or deleted. Returns the merged glossary.
    pub fn append_terms(&self, novel: &str, new_terms: &Glossary) -> Result<Glossary, SessionError> {
        let mut glossary = self.load_glossary(novel)?;
        let added = glossary.merge_missing(new_terms);

        if added > 0 {
            self.ensure_novel(novel)?;
            let json = serde_json::to_string_pretty(&glossary)?;
            fs::write(self.terms_path(novel), json)?;
            debug!("Added {} glossary terms for novel '{}'", added, novel);
        }

        Ok(glossary)
    }

    /// Read the running context memory, trimmed to the configured character
    /// budget. Over budget, the oldest content is dropped first and the kept
    /// tail starts at the next block boundary.
    pub fn read_context(&self, novel: &str) -> Result<String, SessionError> {
        let path = self.context_path(novel);
        if !path.exists() {
            return Ok(String::new());
        }

        let content = fs::read_to_string(&path)?;
        Ok(trim_to_tail(&content, self.context_char_budget))
    }

    /// Append one chapter's block to the context memory.
    pub fn append_context(&self, novel: &str, entry: &str) -> Result<(), SessionError> {
        self.ensure_novel(novel)?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.context_path(novel))?;
        file.write_all(format!("{}\n\n", entry.trim_end()).as_bytes())?;

        Ok(())
    }

    /// Load the suggestion list of a novel (missing file is an empty list).
    pub fn load_suggestions(&self, novel: &str) -> Result<Vec<String>, SessionError> {
        let path = self.suggestions_path(novel);
        if !path.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&path)?;
        serde_json::from_str(&content).map_err(|source| SessionError::Malformed {
            path: path.display().to_string(),
            source,
        })
    }

    /// Append candidate terms to the suggestion list, skipping duplicates.
    /// Returns how many were new.
    pub fn append_suggestions(
        &self,
        novel: &str,
        candidates: &[String],
    ) -> Result<usize, SessionError> {
        if candidates.is_empty() {
            return Ok(0);
        }

        let mut suggestions = self.load_suggestions(novel)?;
        let mut added = 0;
        for candidate in candidates {
            if !suggestions.contains(candidate) {
                suggestions.push(candidate.clone());
                added += 1;
            }
        }

        if added > 0 {
            self.ensure_novel(novel)?;
            let json = serde_json::to_string_pretty(&suggestions)?;
            fs::write(self.suggestions_path(novel), json)?;
            debug!("Recorded {} new term suggestions for novel '{}'", added, novel);
        }

        Ok(added)
    }
}

/// Keep at most `budget` characters from the end of `text`, dropping the
/// partial block left at the front of the cut.
pub(crate) fn trim_to_tail(text: &str, budget: usize) -> String {
    let total = text.chars().count();
    if total <= budget {
        return text.trim().to_string();
    }

    let tail: String = text.chars().skip(total - budget).collect();
    match tail.find("\n\n") {
        Some(pos) => tail[pos..].trim().to_string(),
        None => tail.trim().to_string(),
    }
}
